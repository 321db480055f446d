use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::flex::Message;

const REPLY_URL: &str = "https://api.line.me/v2/bot/message/reply";
const CONTENT_URL: &str = "https://api-data.line.me/v2/bot/message";

#[async_trait]
pub trait LineApi: Send + Sync {
    /// Sends up to 5 messages on a reply token.
    async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> anyhow::Result<()>;
    /// Downloads the binary content of a received message (e.g. an image).
    async fn get_message_content(&self, message_id: &str) -> anyhow::Result<Bytes>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<Message>,
}

#[derive(Clone)]
pub struct LineClient {
    access_token: String,
    client: Client,
}

impl LineClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LineApi for LineClient {
    async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> anyhow::Result<()> {
        debug!(count = messages.len(), "sending reply");
        let response = self
            .client
            .post(REPLY_URL)
            .bearer_auth(&self.access_token)
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await
            .context("reply request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("reply API returned {}: {}", status, error_text);
        }
        Ok(())
    }

    async fn get_message_content(&self, message_id: &str) -> anyhow::Result<Bytes> {
        let url = format!("{CONTENT_URL}/{message_id}/content");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("content request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("content API returned {}", response.status());
        }
        response.bytes().await.context("read message content")
    }
}
