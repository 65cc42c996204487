use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::DateTime;
use rand::Rng;
use serde_json::Value;

const STATE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const STATE_LEN: usize = 16;

/// Random CSRF nonce for an authorization request: 16 uppercase alphanumerics.
pub fn generate_state() -> String {
    let mut rng = rand::rng();
    (0..STATE_LEN)
        .map(|_| STATE_CHARSET[rng.random_range(0..STATE_CHARSET.len())] as char)
        .collect()
}

/// Value of an `Authorization` header for HTTP Basic client authentication.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

/// Comma separated artist names of a track object.
pub fn artist_names(track: &Value) -> String {
    track["artists"]
        .as_array()
        .map(|artists| {
            artists
                .iter()
                .filter_map(|a| a["name"].as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Date part of an RFC 3339 timestamp such as a saved track's `added_at`.
pub fn format_added_at(added_at: Option<&str>) -> String {
    match added_at.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}
