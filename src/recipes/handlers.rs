use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, instrument};

use super::repo::{self, Recipe};
use crate::state::AppState;

/// GET /api/recipes/:veg_id — recipes with their steps for one vegetable.
#[instrument(skip(state))]
pub async fn get_recipes(
    State(state): State<AppState>,
    Path(veg_id): Path<i32>,
) -> Result<Json<Vec<Recipe>>, (StatusCode, Json<Value>)> {
    let recipes = repo::joined_for_vegetable(&state.db, veg_id)
        .await
        .map_err(|e| {
            error!(error = %e, veg_id, "recipe query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    if recipes.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "查無此蔬菜的食譜" })),
        ));
    }
    Ok(Json(recipes))
}
