use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, instrument};

use super::{dto::VegetableListItem, repo};
use crate::state::AppState;

/// GET /api/vegetables — id and display name of every vegetable.
#[instrument(skip(state))]
pub async fn list_vegetables(
    State(state): State<AppState>,
) -> Result<Json<Vec<VegetableListItem>>, (StatusCode, Json<Value>)> {
    let rows = repo::list_all(&state.db).await.map_err(|e| {
        error!(error = %e, "list vegetables failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    let items = rows
        .into_iter()
        .map(|r| VegetableListItem {
            id: r.id,
            name: r.vege_name,
        })
        .collect();
    Ok(Json(items))
}
