use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, instrument};

use super::client::strip_data_url_prefix;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictBody {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictReply {
    pub vegetable: String,
    pub confidence: String,
}

/// POST /predict { "image": "<base64>" } → { "vegetable", "confidence" }
#[instrument(skip(state, body))]
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictReply>, (StatusCode, Json<Value>)> {
    let Some(image_b64) = body.image else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "請求格式錯誤，未包含 'image' 欄位" })),
        ));
    };

    let raw = general_purpose::STANDARD
        .decode(strip_data_url_prefix(&image_b64))
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid base64" })),
            )
        })?;

    match state.classifier.predict(Bytes::from(raw)).await {
        Ok(p) => Ok(Json(PredictReply {
            vegetable: p.label,
            confidence: format!("{:.2}", p.confidence * 100.0),
        })),
        Err(e) => {
            error!(error = %e, "prediction failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "伺服器內部錯誤，無法辨識圖片" })),
            ))
        }
    }
}
