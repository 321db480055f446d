mod dto;
pub mod handlers;
pub mod nutrients;
pub mod repo;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/vegetables", get(handlers::list_vegetables))
}
