use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::nutrients::NUTRIENT_COLUMNS;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BasicVege {
    pub id: i32,
    pub vege_name: String,
}

/// One row of `vege_nutrition`, per 100g edible portion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VegNutrition {
    pub vege_id: i32,
    pub calories_kcal: Option<f64>,
    pub water_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub carb_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub potassium_mg: Option<f64>,
    pub calcium_mg: Option<f64>,
    pub magnesium_mg: Option<f64>,
    pub iron_mg: Option<f64>,
    pub zinc_mg: Option<f64>,
    pub phosphorus_mg: Option<f64>,
    pub vitamin_a_iu: Option<f64>,
    pub vitamin_c_mg: Option<f64>,
    pub vitamin_e_mg: Option<f64>,
    pub vitamin_b1_mg: Option<f64>,
    pub folic_acid_ug: Option<f64>,
}

impl VegNutrition {
    /// Nutrient values in table-column order.
    pub fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("calories_kcal", self.calories_kcal),
            ("water_g", self.water_g),
            ("protein_g", self.protein_g),
            ("fat_g", self.fat_g),
            ("carb_g", self.carb_g),
            ("fiber_g", self.fiber_g),
            ("sugar_g", self.sugar_g),
            ("sodium_mg", self.sodium_mg),
            ("potassium_mg", self.potassium_mg),
            ("calcium_mg", self.calcium_mg),
            ("magnesium_mg", self.magnesium_mg),
            ("iron_mg", self.iron_mg),
            ("zinc_mg", self.zinc_mg),
            ("phosphorus_mg", self.phosphorus_mg),
            ("vitamin_a_iu", self.vitamin_a_iu),
            ("vitamin_c_mg", self.vitamin_c_mg),
            ("vitamin_e_mg", self.vitamin_e_mg),
            ("vitamin_b1_mg", self.vitamin_b1_mg),
            ("folic_acid_ug", self.folic_acid_ug),
        ]
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, v)| v)
    }
}

/// A vegetable as handed to the reply formatter: identity, aliases and the
/// full nutrient profile.
#[derive(Debug, Clone)]
pub struct VegRecord {
    pub id: i32,
    pub name: String,
    pub aliases: Vec<String>,
    pub nutrition: Option<VegNutrition>,
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<BasicVege>> {
    let rows = sqlx::query_as::<_, BasicVege>(
        r#"
        SELECT id, vege_name
        FROM basic_vege
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// The 5 vegetables highest in `column`. The column must come from
/// [`NUTRIENT_COLUMNS`]; anything else is rejected before touching SQL.
pub async fn top_by_nutrient(db: &PgPool, column: &str) -> anyhow::Result<Vec<VegRecord>> {
    anyhow::ensure!(
        NUTRIENT_COLUMNS.contains(&column),
        "unknown nutrient column {column}"
    );

    let query = format!(
        r#"
        SELECT vege_id, calories_kcal, water_g, protein_g, fat_g, carb_g, fiber_g,
               sugar_g, sodium_mg, potassium_mg, calcium_mg, magnesium_mg, iron_mg,
               zinc_mg, phosphorus_mg, vitamin_a_iu, vitamin_c_mg, vitamin_e_mg,
               vitamin_b1_mg, folic_acid_ug
        FROM vege_nutrition
        ORDER BY {column} DESC NULLS LAST
        LIMIT 5
        "#
    );
    let nutrition_rows = sqlx::query_as::<_, VegNutrition>(&query)
        .fetch_all(db)
        .await?;

    let ids: Vec<i32> = nutrition_rows.iter().map(|n| n.vege_id).collect();
    let names = names_for(db, &ids).await?;
    let mut aliases = aliases_for(db, &ids).await?;

    let records = nutrition_rows
        .into_iter()
        .map(|n| {
            let id = n.vege_id;
            VegRecord {
                id,
                name: names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("未知蔬菜 (ID: {id})")),
                aliases: aliases.remove(&id).unwrap_or_default(),
                nutrition: Some(n),
            }
        })
        .collect();
    Ok(records)
}

/// Case-insensitive substring match over names and aliases.
pub async fn search_by_name_or_alias(db: &PgPool, term: &str) -> anyhow::Result<Vec<VegRecord>> {
    let pattern = format!("%{}%", term.trim());

    let ids: Vec<i32> = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT DISTINCT id FROM basic_vege WHERE vege_name ILIKE $1
        UNION
        SELECT DISTINCT vege_id FROM vege_alias WHERE alias ILIKE $1
        "#,
    )
    .bind(&pattern)
    .fetch_all(db)
    .await?;

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let names = names_for(db, &ids).await?;
    let mut aliases = aliases_for(db, &ids).await?;

    let nutrition_rows = sqlx::query_as::<_, VegNutrition>(
        r#"
        SELECT vege_id, calories_kcal, water_g, protein_g, fat_g, carb_g, fiber_g,
               sugar_g, sodium_mg, potassium_mg, calcium_mg, magnesium_mg, iron_mg,
               zinc_mg, phosphorus_mg, vitamin_a_iu, vitamin_c_mg, vitamin_e_mg,
               vitamin_b1_mg, folic_acid_ug
        FROM vege_nutrition
        WHERE vege_id = ANY($1)
        "#,
    )
    .bind(&ids)
    .fetch_all(db)
    .await?;
    let mut nutrition: HashMap<i32, VegNutrition> = nutrition_rows
        .into_iter()
        .map(|n| (n.vege_id, n))
        .collect();

    let records = ids
        .into_iter()
        .filter_map(|id| {
            let name = names.get(&id).cloned()?;
            Some(VegRecord {
                id,
                name,
                aliases: aliases.remove(&id).unwrap_or_default(),
                nutrition: nutrition.remove(&id),
            })
        })
        .collect();
    Ok(records)
}

async fn names_for(db: &PgPool, ids: &[i32]) -> anyhow::Result<HashMap<i32, String>> {
    let rows = sqlx::query_as::<_, BasicVege>(
        r#"SELECT id, vege_name FROM basic_vege WHERE id = ANY($1)"#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|r| (r.id, r.vege_name)).collect())
}

/// Aliases per vegetable, excluding romanization and typo entries.
async fn aliases_for(db: &PgPool, ids: &[i32]) -> anyhow::Result<HashMap<i32, Vec<String>>> {
    let rows = sqlx::query_as::<_, (i32, String)>(
        r#"
        SELECT vege_id, alias
        FROM vege_alias
        WHERE vege_id = ANY($1) AND type NOT IN ('羅馬拼音', '錯字')
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;

    let mut out: HashMap<i32, Vec<String>> = HashMap::new();
    for (vege_id, alias) in rows {
        out.entry(vege_id).or_default().push(alias);
    }
    Ok(out)
}
