use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeStep {
    pub step_no: i32,
    pub description: String,
}

/// A recipe with its ordered steps.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub recipe_id: i32,
    pub recipe_name: String,
    pub vege_id: i32,
    pub steps: Vec<RecipeStep>,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i32,
    recipe: String,
}

#[derive(Debug, FromRow)]
struct JoinedRow {
    id: i32,
    recipe: String,
    vege_id: i32,
    step_no: i32,
    description: String,
}

/// Up to 10 recipes for one vegetable, each with ordered steps. Used by the
/// postback reply.
pub async fn for_vegetable(db: &PgPool, vege_id: i32) -> anyhow::Result<Vec<Recipe>> {
    let mains = sqlx::query_as::<_, RecipeRow>(
        r#"SELECT id, recipe FROM main_recipe WHERE vege_id = $1 LIMIT 10"#,
    )
    .bind(vege_id)
    .fetch_all(db)
    .await?;

    let mut out = Vec::with_capacity(mains.len());
    for main in mains {
        let steps = sqlx::query_as::<_, RecipeStep>(
            r#"
            SELECT step_no, description
            FROM recipe_steps
            WHERE recipe_id = $1
            ORDER BY step_no ASC
            "#,
        )
        .bind(main.id)
        .fetch_all(db)
        .await?;

        out.push(Recipe {
            recipe_id: main.id,
            recipe_name: main.recipe,
            vege_id,
            steps,
        });
    }
    Ok(out)
}

/// All recipes for one vegetable via a single join, grouped per recipe.
/// Used by the JSON endpoint.
pub async fn joined_for_vegetable(db: &PgPool, vege_id: i32) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, JoinedRow>(
        r#"
        SELECT mr.id, mr.recipe, mr.vege_id, rs.step_no, rs.description
        FROM main_recipe AS mr
        JOIN recipe_steps AS rs ON mr.id = rs.recipe_id
        WHERE mr.vege_id = $1
        ORDER BY mr.id, rs.step_no
        "#,
    )
    .bind(vege_id)
    .fetch_all(db)
    .await?;

    let mut out: Vec<Recipe> = Vec::new();
    for row in rows {
        match out.last_mut() {
            Some(last) if last.recipe_id == row.id => last.steps.push(RecipeStep {
                step_no: row.step_no,
                description: row.description,
            }),
            _ => out.push(Recipe {
                recipe_id: row.id,
                recipe_name: row.recipe,
                vege_id: row.vege_id,
                steps: vec![RecipeStep {
                    step_no: row.step_no,
                    description: row.description,
                }],
            }),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_serializes_with_nested_steps() {
        let recipe = Recipe {
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
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["recipe_id"], 3);
        assert_eq!(json["steps"][1]["description"], "大火快炒");
    }
}
