use anyhow::Context;
use axum::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Result of running the vegetable recognition model on one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn predict(&self, image: Bytes) -> anyhow::Result<Prediction>;
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    vegetable: String,
    /// Percentage with two decimals, e.g. "97.42".
    confidence: String,
}

/// HTTP client for the model service. The model itself is a black box; we
/// only ship bytes in and read a label and confidence out.
#[derive(Clone)]
pub struct PredictClient {
    base_url: String,
    client: Client,
}

impl PredictClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    async fn call(&self, body: PredictRequest) -> anyhow::Result<PredictResponse> {
        let url = format!("{}/predict", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("classifier request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("classifier returned {}: {}", status, error_text);
        }

        response
            .json::<PredictResponse>()
            .await
            .context("parse classifier response")
    }
}

#[async_trait]
impl Classifier for PredictClient {
    async fn predict(&self, image: Bytes) -> anyhow::Result<Prediction> {
        let encoded = general_purpose::STANDARD.encode(&image);
        let res = self.call(PredictRequest { image: encoded }).await?;
        parse_prediction(res)
    }
}

fn parse_prediction(res: PredictResponse) -> anyhow::Result<Prediction> {
    let percent: f64 = res
        .confidence
        .trim()
        .trim_end_matches('%')
        .parse()
        .with_context(|| format!("bad confidence value {:?}", res.confidence))?;
    Ok(Prediction {
        label: res.vegetable,
        confidence: (percent / 100.0).clamp(0.0, 1.0),
    })
}

/// Strips an optional `data:image/...;base64,` prefix from user-supplied input.
pub fn strip_data_url_prefix(b64: &str) -> &str {
    if b64.starts_with("data:image") {
        match b64.split_once(',') {
            Some((_, rest)) => rest,
            None => b64,
        }
    } else {
        b64
    }
}
