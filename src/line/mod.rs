pub mod cards;
mod client;
pub mod events;
pub mod flex;
pub mod handlers;
pub mod signature;

pub use client::{LineApi, LineClient};

use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/callback", post(handlers::callback))
}
