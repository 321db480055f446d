use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Checks the `X-Line-Signature` header: base64 of HMAC-SHA256 over the raw
/// request body, keyed with the channel secret.
pub fn verify(channel_secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(expected) = general_purpose::STANDARD.decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
