//! Builds the templated reply cards out of lookup results.

use crate::config::AppConfig;
use crate::recipes::repo::Recipe;
use crate::vegetables::nutrients::{display_name, unit_suffix};
use crate::vegetables::repo::VegRecord;

use super::flex::{Action, Bubble, Component, FlexBox, FlexButton, FlexImage, FlexText, Message};

const DEFAULT_RECIPE_IMAGE: &str = "https://i.imgur.com/your-default-image.png";

/// Identification phrasing by confidence band.
pub fn confidence_prefix(label: &str, confidence: f64) -> String {
    let mut text = if confidence >= 1.0 {
        format!("真相只有一個 就是\"{label}\"!!")
    } else if confidence >= 0.8 {
        format!("哼哼 根據我的判斷 它就是\"{label}\"!!")
    } else if confidence >= 0.5 {
        format!("可能是\"{label}\"   也許讓我再看更清楚的一張")
    } else {
        "歐內該  請提供更清晰的".to_string()
    };
    if confidence >= 0.5 {
        text.push_str(&format!("\n我有{:.0}%的信心", confidence * 100.0));
    }
    text
}

/// Quick-reply prompt for the "上傳圖片" command.
pub fn upload_prompt() -> Message {
    Message::text_with_quick_reply(
        "請選擇拍照或從相簿選擇圖片(請盡量讓背景單純)：",
        vec![
            Action::Camera {
                label: "開啟相機".into(),
            },
            Action::CameraRoll {
                label: "從相簿選擇".into(),
            },
        ],
    )
}

/// Instructional reply for the "輸入營養成分" command.
pub fn nutrient_help() -> Message {
    Message::text(
        "請輸入您想查詢的營養成分，例如：蛋白質、維生素C、鐵質\n\
         您也可以輸入蔬菜名稱或別名，例如：高麗菜、大白菜",
    )
}

/// What the card was searched by, shown on nutrient-search cards.
pub struct NutrientQuery<'a> {
    /// The user's input, as typed.
    pub input: &'a str,
    pub column: &'static str,
}

/// Carousel of vegetable cards; a plain "no results" text when empty.
pub fn vegetable_carousel(
    config: &AppConfig,
    records: &[VegRecord],
    alt_prefix: &str,
    query: Option<&NutrientQuery<'_>>,
) -> Message {
    let bubbles: Vec<Bubble> = records
        .iter()
        .map(|record| vegetable_bubble(config, record, query))
        .collect();

    if bubbles.is_empty() {
        return Message::text("沒有找到符合條件的蔬菜。");
    }
    Message::carousel(format!("{alt_prefix}相關蔬菜"), bubbles)
}

fn vegetable_bubble(
    config: &AppConfig,
    record: &VegRecord,
    query: Option<&NutrientQuery<'_>>,
) -> Bubble {
    let aliases_text = if record.aliases.is_empty() {
        "無別名".to_string()
    } else {
        format!("別名：{}", record.aliases.join(", "))
    };

    let mut body = vec![
        Component::Text(FlexText {
            text: record.name.clone(),
            weight: Some("bold"),
            size: Some("xl"),
            ..Default::default()
        }),
        Component::Text(FlexText {
            text: aliases_text,
            size: Some("sm"),
            color: Some("#aaaaaa"),
            wrap: Some(true),
            margin: Some("sm"),
            ..Default::default()
        }),
        Component::Text(FlexText {
            text: nutrient_block(record),
            size: Some("sm"),
            color: Some("#555555"),
            wrap: Some(true),
            margin: Some("md"),
            ..Default::default()
        }),
    ];

    if let Some(q) = query {
        let value = record
            .nutrition
            .as_ref()
            .and_then(|n| n.value(q.column))
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "N/A".into());
        let unit = q.column.rsplit('_').next().unwrap_or("");
        body.insert(
            1,
            Component::Text(FlexText {
                text: format!("查詢成分：{} {}{}", q.input, value, unit),
                size: Some("md"),
                margin: Some("md"),
                ..Default::default()
            }),
        );
    }

    let image_url = hero_image_url(config, &record.name);
    let footer = FlexBox::vertical(vec![
        Component::Button(FlexButton::link(Action::Postback {
            label: "查看相關食譜".into(),
            data: format!("action=get_recipes&veg_id={}", record.id),
            display_text: "為您查詢相關食譜...".into(),
        })),
        Component::Button(FlexButton::link(Action::Uri {
            label: "前往網站看得更詳細".into(),
            uri: format!("{}/?id={}", config.web_base_url, record.id),
        })),
    ])
    .with_spacing("sm");

    Bubble::new(
        Some(FlexImage::hero(
            image_url.clone(),
            Some(Action::Uri {
                label: "查看圖片".into(),
                uri: image_url,
            }),
        )),
        FlexBox::vertical(body),
        Some(footer),
    )
}

/// Nutrient summary block: entries 3..=7 of the profile (calories and water
/// are skipped), per 100g edible portion.
fn nutrient_block(record: &VegRecord) -> String {
    let mut lines = Vec::new();
    if let Some(nutrition) = &record.nutrition {
        for (column, value) in nutrition.entries().into_iter().skip(2).take(5) {
            let display = display_name(column);
            let value = value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "N/A".into());
            lines.push(format!("{display}：{value}{}", unit_suffix(column)));
        }
    }
    format!("營養資訊(每100 克可食部分)：\n{}", lines.join("\n"))
}

fn hero_image_url(config: &AppConfig, name: &str) -> String {
    let filename = urlencoding::encode(&format!("{name}.jpg")).into_owned();
    format!(
        "{}/{}/images/{}",
        config.media_base_url, config.minio.bucket, filename
    )
}

/// Carousel of recipe cards; `None` when there are no recipes.
pub fn recipe_carousel(config: &AppConfig, recipes: &[Recipe]) -> Option<Message> {
    if recipes.is_empty() {
        return None;
    }

    let bubbles = recipes
        .iter()
        .map(|recipe| {
            let steps_text = format!(
                "步驟：\n{}",
                recipe
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(i, step)| format!("{}. {}", i + 1, step.description))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
            let description = recipe
                .steps
                .first()
                .map(|s| s.description.clone())
                .unwrap_or_default();

            Bubble::new(
                Some(FlexImage::hero(
                    DEFAULT_RECIPE_IMAGE,
                    Some(Action::Uri {
                        label: "查看圖片".into(),
                        uri: DEFAULT_RECIPE_IMAGE.into(),
                    }),
                )),
                FlexBox::vertical(vec![
                    Component::Text(FlexText {
                        text: recipe.recipe_name.clone(),
                        weight: Some("bold"),
                        size: Some("xl"),
                        wrap: Some(true),
                        ..Default::default()
                    }),
                    Component::Text(FlexText {
                        text: description,
                        size: Some("sm"),
                        color: Some("#aaaaaa"),
                        wrap: Some(true),
                        margin: Some("sm"),
                        ..Default::default()
                    }),
                    Component::Text(FlexText {
                        text: steps_text,
                        size: Some("sm"),
                        color: Some("#555555"),
                        wrap: Some(true),
                        margin: Some("md"),
                        ..Default::default()
                    }),
                ]),
                Some(
                    FlexBox::vertical(vec![Component::Button(FlexButton::link(Action::Uri {
                        label: "前往網站看得更詳細".into(),
                        uri: format!("{}/?id={}", config.web_base_url, recipe.recipe_id),
                    }))])
                    .with_spacing("sm"),
                ),
            )
        })
        .collect();

    Some(Message::carousel("相關食譜", bubbles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineConfig, MinioConfig};
    use crate::recipes::repo::RecipeStep;
    use crate::vegetables::repo::VegNutrition;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/test".into(),
            line: LineConfig {
                channel_secret: "secret".into(),
                channel_access_token: "token".into(),
            },
            minio: MinioConfig {
                endpoint: "http://localhost:9000".into(),
                bucket: "veg-data-bucket".into(),
                access_key: "minio".into(),
                secret_key: "minio".into(),
            },
            classifier_url: "http://localhost:7000".into(),
            web_base_url: "https://veg.example".into(),
            media_base_url: "https://media.example".into(),
        }
    }

    fn record() -> VegRecord {
        VegRecord {
            id: 7,
            name: "高麗菜".into(),
            aliases: vec!["甘藍".into(), "包心菜".into()],
            nutrition: Some(VegNutrition {
                vege_id: 7,
                calories_kcal: Some(23.0),
                water_g: Some(93.5),
                protein_g: Some(1.3),
                fat_g: Some(0.2),
                carb_g: Some(4.8),
                fiber_g: Some(1.1),
                sugar_g: None,
                sodium_mg: Some(11.0),
                potassium_mg: Some(187.0),
                calcium_mg: Some(47.0),
                magnesium_mg: Some(12.0),
                iron_mg: Some(0.4),
                zinc_mg: Some(0.2),
                phosphorus_mg: Some(28.0),
                vitamin_a_iu: Some(33.0),
                vitamin_c_mg: Some(37.2),
                vitamin_e_mg: Some(0.2),
                vitamin_b1_mg: Some(0.03),
                folic_acid_ug: None,
            }),
        }
    }

    #[test]
    fn confidence_bands() {
        assert!(confidence_prefix("高麗菜", 1.0).starts_with("真相只有一個"));
        assert!(confidence_prefix("高麗菜", 0.85).starts_with("哼哼"));
        assert!(confidence_prefix("高麗菜", 0.6).starts_with("可能是"));
        assert!(confidence_prefix("高麗菜", 0.3).starts_with("歐內該"));
    }

    #[test]
    fn confidence_percent_only_at_half_and_above() {
        assert!(confidence_prefix("高麗菜", 0.85).contains("我有85%的信心"));
        assert!(!confidence_prefix("高麗菜", 0.49).contains("信心"));
    }

    #[test]
    fn vegetable_card_contents() {
        let config = test_config();
        let msg = vegetable_carousel(&config, &[record()], "辨識結果：高麗菜", None);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["altText"], "辨識結果：高麗菜相關蔬菜");

        let bubble = &json["contents"]["contents"][0];
        assert_eq!(bubble["body"]["contents"][0]["text"], "高麗菜");
        assert_eq!(bubble["body"]["contents"][1]["text"], "別名：甘藍, 包心菜");

        // Five entries, starting at protein; null renders as N/A.
        let block = bubble["body"]["contents"][2]["text"].as_str().unwrap();
        assert!(block.starts_with("營養資訊(每100 克可食部分)：\n"));
        assert!(block.contains("蛋白質：1.3克"));
        assert!(block.contains("糖：N/A克"));
        assert!(!block.contains("熱量"));
        assert!(!block.contains("鈉"));

        // Hero image filename is percent-encoded.
        let url = bubble["hero"]["url"].as_str().unwrap();
        assert!(url.starts_with("https://media.example/veg-data-bucket/images/"));
        assert!(!url.contains("高麗菜"));
        assert!(url.ends_with(".jpg"));

        let footer = bubble["footer"]["contents"].as_array().unwrap();
        assert_eq!(footer[0]["action"]["data"], "action=get_recipes&veg_id=7");
        assert_eq!(footer[1]["action"]["uri"], "https://veg.example/?id=7");
    }

    #[test]
    fn nutrient_search_inserts_query_line() {
        let config = test_config();
        let query = NutrientQuery {
            input: "維生素C",
            column: "vitamin_c_mg",
        };
        let msg = vegetable_carousel(&config, &[record()], "為您推薦", Some(&query));
        let json = serde_json::to_value(&msg).unwrap();
        let contents = &json["contents"]["contents"][0]["body"]["contents"];
        assert_eq!(contents[1]["text"], "查詢成分：維生素C 37.2mg");
    }

    #[test]
    fn empty_results_become_plain_text() {
        let config = test_config();
        let msg = vegetable_carousel(&config, &[], "任何", None);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "沒有找到符合條件的蔬菜。");
    }

    #[test]
    fn recipe_cards_number_their_steps() {
        let config = test_config();
        let recipes = vec![Recipe {
            recipe_id: 3,
            recipe_name: "清炒高麗菜".into(),
            vege_id: 7,
            steps: vec![
                RecipeStep {
                    step_no: 1,
                    description: "洗淨切段".into(),
                },
                RecipeStep {
                    step_no: 2,
                    description: "大火快炒".into(),
                },
            ],
        }];
        let msg = recipe_carousel(&config, &recipes).unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        let body = &json["contents"]["contents"][0]["body"]["contents"];
        assert_eq!(body[0]["text"], "清炒高麗菜");
        assert_eq!(body[1]["text"], "洗淨切段");
        assert_eq!(body[2]["text"], "步驟：\n1. 洗淨切段\n2. 大火快炒");

        assert!(recipe_carousel(&config, &[]).is_none());
    }
}
