pub mod handlers;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/image/:filename", get(handlers::get_image))
        .route("/api/csv/:filename", get(handlers::get_csv))
}
