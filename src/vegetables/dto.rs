use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VegetableListItem {
    pub id: i32,
    pub name: String,
}
