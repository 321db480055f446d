//! Outgoing message model, serialized to the LINE messaging JSON shapes.
//! Serialize-only; these structures are built per reply and discarded.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
    #[serde(rename_all = "camelCase")]
    Flex {
        alt_text: String,
        contents: Container,
    },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text {
            text: text.into(),
            quick_reply: None,
        }
    }

    pub fn text_with_quick_reply(text: impl Into<String>, items: Vec<Action>) -> Self {
        Message::Text {
            text: text.into(),
            quick_reply: Some(QuickReply {
                items: items
                    .into_iter()
                    .map(|action| QuickReplyItem {
                        kind: "action",
                        action,
                    })
                    .collect(),
            }),
        }
    }

    pub fn carousel(alt_text: impl Into<String>, bubbles: Vec<Bubble>) -> Self {
        Message::Flex {
            alt_text: alt_text.into(),
            contents: Container::Carousel { contents: bubbles },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Container {
    Carousel { contents: Vec<Bubble> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Bubble {
    #[serde(rename = "type")]
    kind: &'static str,
    direction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<FlexImage>,
    pub body: FlexBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FlexBox>,
}

impl Bubble {
    pub fn new(hero: Option<FlexImage>, body: FlexBox, footer: Option<FlexBox>) -> Self {
        Self {
            kind: "bubble",
            direction: "ltr",
            hero,
            body,
            footer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlexBox {
    #[serde(rename = "type")]
    kind: &'static str,
    pub layout: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<&'static str>,
    pub contents: Vec<Component>,
}

impl FlexBox {
    pub fn vertical(contents: Vec<Component>) -> Self {
        Self {
            kind: "box",
            layout: "vertical",
            spacing: None,
            contents,
        }
    }

    pub fn with_spacing(mut self, spacing: &'static str) -> Self {
        self.spacing = Some(spacing);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Text(FlexText),
    Button(FlexButton),
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FlexText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexImage {
    #[serde(rename = "type")]
    kind: &'static str,
    pub url: String,
    pub size: &'static str,
    pub aspect_ratio: &'static str,
    pub aspect_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl FlexImage {
    /// Full-width 1.5:1 cover image, the hero style every card uses.
    pub fn hero(url: impl Into<String>, action: Option<Action>) -> Self {
        Self {
            kind: "image",
            url: url.into(),
            size: "full",
            aspect_ratio: "1.5:1",
            aspect_mode: "cover",
            action,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlexButton {
    pub style: &'static str,
    pub height: &'static str,
    pub action: Action,
}

impl FlexButton {
    pub fn link(action: Action) -> Self {
        Self {
            style: "link",
            height: "sm",
            action,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    Uri { label: String, uri: String },
    #[serde(rename_all = "camelCase")]
    Postback {
        label: String,
        data: String,
        display_text: String,
    },
    Camera { label: String },
    CameraRoll { label: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    kind: &'static str,
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_shape() {
        let msg = Message::text("哈囉");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "哈囉");
        assert!(json.get("quickReply").is_none());
    }

    #[test]
    fn quick_reply_shape() {
        let msg = Message::text_with_quick_reply(
            "請選擇",
            vec![
                Action::Camera {
                    label: "開啟相機".into(),
                },
                Action::CameraRoll {
                    label: "從相簿選擇".into(),
                },
            ],
        );
        let json = serde_json::to_value(&msg).unwrap();
        let items = json["quickReply"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["type"], "action");
        assert_eq!(items[0]["action"]["type"], "camera");
        assert_eq!(items[1]["action"]["type"], "cameraRoll");
    }

    #[test]
    fn flex_carousel_shape() {
        let bubble = Bubble::new(
            Some(FlexImage::hero(
                "https://example.test/a.jpg",
                Some(Action::Uri {
                    label: "查看圖片".into(),
                    uri: "https://example.test/a.jpg".into(),
                }),
            )),
            FlexBox::vertical(vec![Component::Text(FlexText {
                text: "高麗菜".into(),
                weight: Some("bold"),
                size: Some("xl"),
                ..Default::default()
            })]),
            Some(
                FlexBox::vertical(vec![Component::Button(FlexButton::link(Action::Postback {
                    label: "查看相關食譜".into(),
                    data: "action=get_recipes&veg_id=1".into(),
                    display_text: "為您查詢相關食譜...".into(),
                }))])
                .with_spacing("sm"),
            ),
        );
        let msg = Message::carousel("相關蔬菜", vec![bubble]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "flex");
        assert_eq!(json["altText"], "相關蔬菜");
        assert_eq!(json["contents"]["type"], "carousel");
        let bubble = &json["contents"]["contents"][0];
        assert_eq!(bubble["type"], "bubble");
        assert_eq!(bubble["hero"]["aspectRatio"], "1.5:1");
        assert_eq!(bubble["body"]["contents"][0]["weight"], "bold");
        let action = &bubble["footer"]["contents"][0]["action"];
        assert_eq!(action["type"], "postback");
        assert_eq!(action["displayText"], "為您查詢相關食譜...");
    }
}
