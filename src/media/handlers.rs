use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument};

use crate::state::AppState;

/// GET /api/image/:filename — jpeg passthrough from the bucket's images/ prefix.
#[instrument(skip(state))]
pub async fn get_image(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    let key = format!("images/{filename}");
    serve_object(&state, &key, "image/jpeg").await
}

/// GET /api/csv/:filename — csv passthrough from the bucket root.
#[instrument(skip(state))]
pub async fn get_csv(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    info!(key = %filename, "fetching csv from object storage");
    serve_object(&state, &filename, "text/csv").await
}

async fn serve_object(state: &AppState, key: &str, content_type: &'static str) -> Response {
    match state.storage.get_object(key).await {
        Ok(Some(bytes)) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            error!(error = %e, key, "object fetch failed");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};

    #[tokio::test]
    async fn image_passthrough_sets_content_type() {
        let state = AppState::fake();
        let res = get_image(State(state), Path("高麗菜.jpg".into())).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "image/jpeg");
    }

    #[tokio::test]
    async fn missing_object_is_404() {
        let state = AppState::fake();
        let res = get_csv(State(state), Path("missing.csv".into())).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn csv_passthrough_sets_content_type() {
        let state = AppState::fake();
        let res = get_csv(State(state), Path("nutrition.csv".into())).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv");
    }
}
