use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::recipes;
use crate::state::AppState;
use crate::vegetables::{nutrients, repo as veg_repo};

use super::cards::{self, NutrientQuery};
use super::events::{recipe_postback_veg_id, Event, MessageContent, WebhookRequest};
use super::flex::Message;
use super::signature;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing X-Line-Signature header")]
    MissingSignature,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed webhook payload: {0}")]
    BadPayload(#[from] serde_json::Error),
}

/// POST /callback — platform webhook entrypoint.
///
/// Events are handled one by one; a failing event is logged and the rest
/// still run, so the platform never retries the whole batch.
#[instrument(skip(state, headers, body))]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, (StatusCode, String)> {
    let request = verify_and_parse(&state, &headers, &body).map_err(|e| {
        warn!(error = %e, "webhook rejected");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    for event in request.events {
        match event {
            Event::Message {
                reply_token,
                message: MessageContent::Text { text },
            } => {
                if let Err(e) = handle_text(&state, &reply_token, &text).await {
                    error!(error = %e, "text handler failed");
                }
            }
            Event::Message {
                reply_token,
                message: MessageContent::Image { id },
            } => handle_image(&state, &reply_token, &id).await,
            Event::Message { .. } => info!("ignoring unsupported message type"),
            Event::Postback {
                reply_token,
                postback,
            } => {
                if let Err(e) = handle_postback(&state, &reply_token, &postback.data).await {
                    error!(error = %e, "postback handler failed");
                }
            }
            Event::Other => info!("ignoring unhandled event type"),
        }
    }

    Ok("OK")
}

fn verify_and_parse(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookRequest, WebhookError> {
    let sig = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    if !signature::verify(&state.config.line.channel_secret, sig, body) {
        return Err(WebhookError::InvalidSignature);
    }
    Ok(serde_json::from_slice(body)?)
}

async fn handle_text(state: &AppState, reply_token: &str, text: &str) -> anyhow::Result<()> {
    let text = text.trim();
    info!(%text, "text message received");

    let reply = match text {
        "上傳圖片" => cards::upload_prompt(),
        "輸入營養成分" => cards::nutrient_help(),
        _ => free_text_reply(state, text).await?,
    };
    state.line.reply(reply_token, vec![reply]).await
}

/// Free-text resolution: nutrient ranking first, then name/alias search,
/// then a "nothing matched" text.
async fn free_text_reply(state: &AppState, input: &str) -> anyhow::Result<Message> {
    if let Some(column) = nutrients::resolve_column(input) {
        let records = veg_repo::top_by_nutrient(&state.db, column).await?;
        if !records.is_empty() {
            let query = NutrientQuery { input, column };
            return Ok(cards::vegetable_carousel(
                &state.config,
                &records,
                &format!("為您推薦 {input} 含量最高的"),
                Some(&query),
            ));
        }
    }

    let mut records = veg_repo::search_by_name_or_alias(&state.db, input).await?;
    records.truncate(12);
    if !records.is_empty() {
        return Ok(cards::vegetable_carousel(
            &state.config,
            &records,
            &format!("為您推薦 {input} "),
            None,
        ));
    }

    Ok(Message::text(
        "沒有找到符合條件的營養成分或蔬菜。請檢查您的輸入。",
    ))
}

/// Image flow replies a failure text on the same token instead of surfacing
/// an HTTP error.
async fn handle_image(state: &AppState, reply_token: &str, message_id: &str) {
    match image_reply(state, message_id).await {
        Ok(messages) => {
            if let Err(e) = state.line.reply(reply_token, messages).await {
                error!(error = %e, "image reply failed");
            } else {
                info!("image recognition reply sent");
            }
        }
        Err(e) => {
            error!(error = %e, "image handling failed");
            let fallback = Message::text(format!("圖片處理失敗：{e}"));
            if let Err(e) = state.line.reply(reply_token, vec![fallback]).await {
                error!(error = %e, "failure reply also failed");
            }
        }
    }
}

async fn image_reply(state: &AppState, message_id: &str) -> anyhow::Result<Vec<Message>> {
    let image = state.line.get_message_content(message_id).await?;
    let prediction = state.classifier.predict(image).await?;
    info!(label = %prediction.label, confidence = prediction.confidence, "image classified");

    let mut messages = vec![Message::text(cards::confidence_prefix(
        &prediction.label,
        prediction.confidence,
    ))];

    if prediction.confidence >= 0.5 {
        let records = veg_repo::search_by_name_or_alias(&state.db, &prediction.label).await?;
        if records.is_empty() {
            messages.push(Message::text("未能找到該蔬菜的詳細資訊。"));
        } else {
            messages.push(cards::vegetable_carousel(
                &state.config,
                &records,
                &format!("辨識結果：{}", prediction.label),
                None,
            ));
        }
    }
    Ok(messages)
}

async fn handle_postback(state: &AppState, reply_token: &str, data: &str) -> anyhow::Result<()> {
    info!(%data, "postback received");
    if !data.starts_with("action=get_recipes") {
        return Ok(());
    }

    let Some(veg_id) = recipe_postback_veg_id(data) else {
        return state
            .line
            .reply(reply_token, vec![Message::text("食譜查詢參數錯誤。")])
            .await;
    };

    let recipes = recipes::repo::for_vegetable(&state.db, veg_id).await?;
    let reply = cards::recipe_carousel(&state.config, &recipes)
        .unwrap_or_else(|| Message::text("找不到相關食譜喔！"));
    state.line.reply(reply_token, vec![reply]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use base64::{engine::general_purpose, Engine as _};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    fn signed_headers(secret: &str, body: &[u8]) -> HeaderMap {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let sig = general_purpose::STANDARD.encode(mac.finalize().into_bytes());
        let mut headers = HeaderMap::new();
        headers.insert("x-line-signature", sig.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn callback_rejects_missing_signature() {
        let state = AppState::fake();
        let (status, msg) = callback(State(state), HeaderMap::new(), Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("missing"));
    }

    #[tokio::test]
    async fn callback_rejects_bad_signature() {
        let state = AppState::fake();
        let mut headers = HeaderMap::new();
        headers.insert("x-line-signature", "AAAA".parse().unwrap());
        let (status, msg) = callback(State(state), headers, Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("invalid signature"));
    }

    #[tokio::test]
    async fn callback_accepts_signed_empty_batch() {
        let state = AppState::fake();
        let body = br#"{"events":[]}"#;
        let headers = signed_headers(&state.config.line.channel_secret, body);
        let ok = callback(State(state), headers, Bytes::from_static(body))
            .await
            .unwrap();
        assert_eq!(ok, "OK");
    }

    #[tokio::test]
    async fn callback_rejects_signed_garbage_payload() {
        let state = AppState::fake();
        let body = b"not json";
        let headers = signed_headers(&state.config.line.channel_secret, body);
        let (status, msg) = callback(State(state), headers, Bytes::from_static(body))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("malformed"));
    }
}
