use std::collections::HashMap;

use lazy_static::lazy_static;

/// Nutrient columns of `vege_nutrition`, in table order. The first two entries
/// (calories, water) are skipped by the card formatter.
pub const NUTRIENT_COLUMNS: [&str; 19] = [
    "calories_kcal",
    "water_g",
    "protein_g",
    "fat_g",
    "carb_g",
    "fiber_g",
    "sugar_g",
    "sodium_mg",
    "potassium_mg",
    "calcium_mg",
    "magnesium_mg",
    "iron_mg",
    "zinc_mg",
    "phosphorus_mg",
    "vitamin_a_iu",
    "vitamin_c_mg",
    "vitamin_e_mg",
    "vitamin_b1_mg",
    "folic_acid_ug",
];

const NUTRIENT_NAMES: [(&str, &str); 19] = [
    ("熱量", "calories_kcal"),
    ("水", "water_g"),
    ("蛋白質", "protein_g"),
    ("脂肪", "fat_g"),
    ("碳水化合物", "carb_g"),
    ("膳食纖維", "fiber_g"),
    ("糖", "sugar_g"),
    ("鈉", "sodium_mg"),
    ("鉀", "potassium_mg"),
    ("鈣", "calcium_mg"),
    ("鎂", "magnesium_mg"),
    ("鐵", "iron_mg"),
    ("鋅", "zinc_mg"),
    ("磷", "phosphorus_mg"),
    ("維生素A", "vitamin_a_iu"),
    ("維生素C", "vitamin_c_mg"),
    ("維生素E", "vitamin_e_mg"),
    ("維生素B1", "vitamin_b1_mg"),
    ("葉酸", "folic_acid_ug"),
];

lazy_static! {
    static ref NAME_TO_COLUMN: HashMap<&'static str, &'static str> =
        NUTRIENT_NAMES.iter().copied().collect();
    static ref COLUMN_TO_NAME: HashMap<&'static str, &'static str> =
        NUTRIENT_NAMES.iter().map(|(zh, col)| (*col, *zh)).collect();
}

/// Maps free-text input to a nutrient column: first through the Chinese name
/// table, then accepting input that already is a canonical column key.
pub fn resolve_column(input: &str) -> Option<&'static str> {
    let trimmed = input.trim();
    if let Some(col) = NAME_TO_COLUMN.get(trimmed) {
        return Some(col);
    }
    let lower = trimmed.to_lowercase();
    NUTRIENT_COLUMNS.iter().find(|c| **c == lower).copied()
}

/// Display name for a column; unknown columns fall back to the capitalized
/// key stem ("protein_g" → "Protein").
pub fn display_name(column: &str) -> String {
    if let Some(zh) = COLUMN_TO_NAME.get(column) {
        return (*zh).to_string();
    }
    let stem = column.split('_').next().unwrap_or(column);
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Chinese unit suffix derived from the column's trailing abbreviation.
pub fn unit_suffix(column: &str) -> &'static str {
    let abbrev = column.rsplit('_').next().unwrap_or("");
    match abbrev {
        "kcal" => "大卡",
        "g" => "克",
        "mg" => "毫克",
        "iu" => "IU",
        "ug" => "微克",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_chinese_names() {
        assert_eq!(resolve_column("蛋白質"), Some("protein_g"));
        assert_eq!(resolve_column(" 維生素C "), Some("vitamin_c_mg"));
        assert_eq!(resolve_column("葉酸"), Some("folic_acid_ug"));
    }

    #[test]
    fn resolves_raw_column_keys_case_insensitively() {
        assert_eq!(resolve_column("protein_g"), Some("protein_g"));
        assert_eq!(resolve_column("SODIUM_MG"), Some("sodium_mg"));
    }

    #[test]
    fn unknown_input_does_not_resolve() {
        assert_eq!(resolve_column("高麗菜"), None);
        assert_eq!(resolve_column(""), None);
    }

    #[test]
    fn display_names_cover_all_columns() {
        for col in NUTRIENT_COLUMNS {
            assert!(!display_name(col).is_empty(), "no display name for {col}");
        }
        assert_eq!(display_name("vitamin_a_iu"), "維生素A");
        assert_eq!(display_name("something_odd_g"), "Something");
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(unit_suffix("calories_kcal"), "大卡");
        assert_eq!(unit_suffix("protein_g"), "克");
        assert_eq!(unit_suffix("sodium_mg"), "毫克");
        assert_eq!(unit_suffix("vitamin_a_iu"), "IU");
        assert_eq!(unit_suffix("folic_acid_ug"), "微克");
        assert_eq!(unit_suffix("weird"), "");
    }
}
