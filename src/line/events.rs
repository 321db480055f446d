use serde::Deserialize;

/// Webhook envelope posted by the platform.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    #[allow(dead_code)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    Message {
        reply_token: String,
        message: MessageContent,
    },
    #[serde(rename_all = "camelCase")]
    Postback {
        reply_token: String,
        postback: Postback,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
    Image { id: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    pub data: String,
}

/// Extracts the vegetable id from `action=get_recipes&veg_id=N` postback data.
pub fn recipe_postback_veg_id(data: &str) -> Option<i32> {
    if !data.starts_with("action=get_recipes") {
        return None;
    }
    data.split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == "veg_id")
        .and_then(|(_, v)| v.parse().ok())
}
