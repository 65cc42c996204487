use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Opaque pass-through payload from the streaming API (profile, playlist, artist, ...).
pub type ProxiedResource = Value;

/// Client credentials of one registered application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Tokens returned by an exchange or refresh. Never stored by the backend.
///
/// Keys the provider sends beyond the known ones (`scope`, ...) are kept in
/// `extra` so the bundle reaches the frontend unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters of one authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub state: String,
    pub scope: String,
    pub response_type: &'static str,
}

impl AuthorizationRequest {
    pub fn new(state: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            scope: scope.into(),
            response_type: "code",
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Value>,
    pub total: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u32 {
    50
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: String,
    pub owner: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub added: String,
    pub name: String,
    pub artists: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct FieldTableRow {
    pub field: String,
    pub value: String,
}
