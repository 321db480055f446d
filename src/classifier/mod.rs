mod client;
pub mod handlers;

pub use client::{Classifier, Prediction, PredictClient};

use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(handlers::predict))
}
