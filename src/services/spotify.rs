use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{MAX_PAGE_LIMIT, MAX_PLAYLIST_TRACKS_LIMIT, MusicService, require, require_limit};
use crate::{
    config::{self, Settings},
    error::{ConfigError, ServiceError},
    types::{
        AddTracksRequest, AuthorizationRequest, CreatePlaylistRequest, Page, ProxiedResource,
        RemoveTracksRequest, ServiceCredentials, Snapshot, TokenBundle, TrackUri,
    },
    utils,
};

/// OAuth scopes the frontend needs: profile, playlist read/write and the saved-track library.
pub const SPOTIFY_SCOPES: [&str; 8] = [
    "user-read-private",
    "user-read-email",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-library-read",
    "user-library-modify",
];

/// Base URLs of the Spotify accounts service and Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Default for SpotifyEndpoints {
    fn default() -> Self {
        Self {
            auth_url: config::DEFAULT_SPOTIFY_AUTH_URL.to_string(),
            token_url: config::DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
            api_url: config::DEFAULT_SPOTIFY_API_URL.to_string(),
        }
    }
}

impl SpotifyEndpoints {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            auth_url: settings.spotify_auth_url.clone(),
            token_url: settings.spotify_token_url.clone(),
            api_url: settings.spotify_api_url.clone(),
        }
    }
}

/// Spotify adapter. Immutable after construction and cheap to share behind an `Arc`.
pub struct SpotifyService {
    credentials: ServiceCredentials,
    auth_url: Url,
    token_url: Url,
    api_url: Url,
    client: Client,
}

impl std::fmt::Debug for SpotifyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyService")
            .field("client_id", &self.credentials.client_id)
            .field("redirect_uri", &self.credentials.redirect_uri)
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SpotifyService {
    /// Builds the adapter.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCredential`] if the client id or secret is empty or a placeholder
    /// - [`ConfigError::Env`] if one of the endpoint URLs does not parse
    /// - [`ConfigError::HttpClient`] if the HTTP client cannot be built
    pub fn new(
        credentials: ServiceCredentials,
        endpoints: SpotifyEndpoints,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if is_placeholder(&credentials.client_id) {
            return Err(ConfigError::MissingCredential("SPOTIFY_CLIENT_ID"));
        }
        if is_placeholder(&credentials.client_secret) {
            return Err(ConfigError::MissingCredential("SPOTIFY_CLIENT_SECRET"));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            credentials,
            auth_url: parse_endpoint(&endpoints.auth_url)?,
            token_url: parse_endpoint(&endpoints.token_url)?,
            api_url: parse_endpoint(&endpoints.api_url)?,
            client,
        })
    }

    /// Web API URL for the given path segments, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Decode("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn token_request(
        &self,
        form: &[(&str, &str)],
        fallback: &str,
    ) -> Result<TokenBundle, ServiceError> {
        let res = self
            .client
            .post(self.token_url.clone())
            .header(
                AUTHORIZATION,
                utils::basic_auth_header(
                    &self.credentials.client_id,
                    &self.credentials.client_secret,
                ),
            )
            .form(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "token endpoint rejected request");
            let description = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|json| {
                    json.get("error_description")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(ServiceError::Auth(description));
        }

        decode(&body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
        context: &'static str,
    ) -> Result<T, ServiceError> {
        let res = request.send().await?;
        let status = res.status();

        if !accepted.contains(&status) {
            warn!(status = status.as_u16(), context, "spotify request failed");
            return Err(ServiceError::Upstream { status, context });
        }

        let body = res.bytes().await?;
        decode(&body)
    }

    async fn get_page(
        &self,
        access_token: &str,
        url: Url,
        limit: u32,
        offset: u32,
        context: &'static str,
    ) -> Result<Page, ServiceError> {
        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(&[("limit", limit), ("offset", offset)]);
        self.send(request, &[StatusCode::OK], context).await
    }
}

#[async_trait]
impl MusicService for SpotifyService {
    fn name(&self) -> &'static str {
        "spotify"
    }

    fn build_authorization_url(&self, state: &str) -> Result<String, ServiceError> {
        require(state, "state")?;
        let request = AuthorizationRequest::new(state, SPOTIFY_SCOPES.join(" "));

        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("response_type", request.response_type)
            .append_pair("redirect_uri", &self.credentials.redirect_uri)
            .append_pair("scope", &request.scope)
            .append_pair("state", &request.state);

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenBundle, ServiceError> {
        require(code, "authorization code")?;
        debug!("exchanging authorization code");

        self.token_request(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.credentials.redirect_uri),
            ],
            "Failed to get tokens",
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, ServiceError> {
        require(refresh_token, "refresh token")?;
        debug!("refreshing access token");

        self.token_request(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
            "Failed to refresh token",
        )
        .await
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProxiedResource, ServiceError> {
        require(access_token, "access token")?;
        let request = self
            .client
            .get(self.endpoint(&["me"])?)
            .bearer_auth(access_token);
        self.send(request, &[StatusCode::OK], "Failed to fetch user profile")
            .await
    }

    async fn fetch_playlists(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page, ServiceError> {
        require(access_token, "access token")?;
        require_limit(limit, MAX_PAGE_LIMIT)?;
        let url = self.endpoint(&["me", "playlists"])?;
        self.get_page(access_token, url, limit, offset, "Failed to fetch playlists")
            .await
    }

    async fn fetch_playlist_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page, ServiceError> {
        require(access_token, "access token")?;
        require(playlist_id, "playlist id")?;
        require_limit(limit, MAX_PLAYLIST_TRACKS_LIMIT)?;
        let url = self.endpoint(&["playlists", playlist_id, "tracks"])?;
        self.get_page(
            access_token,
            url,
            limit,
            offset,
            "Failed to fetch playlist tracks",
        )
        .await
    }

    async fn fetch_liked_tracks(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page, ServiceError> {
        require(access_token, "access token")?;
        require_limit(limit, MAX_PAGE_LIMIT)?;
        let url = self.endpoint(&["me", "tracks"])?;
        self.get_page(access_token, url, limit, offset, "Failed to fetch liked tracks")
            .await
    }

    async fn add_track(
        &self,
        access_token: &str,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Snapshot, ServiceError> {
        require(access_token, "access token")?;
        require(playlist_id, "playlist id")?;
        require(track_id, "track id")?;

        let body = AddTracksRequest {
            uris: vec![utils::track_uri(track_id)],
        };
        let request = self
            .client
            .post(self.endpoint(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(access_token)
            .json(&body);
        self.send(
            request,
            &[StatusCode::OK, StatusCode::CREATED],
            "Failed to add track to playlist",
        )
        .await
    }

    async fn remove_track(
        &self,
        access_token: &str,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Snapshot, ServiceError> {
        require(access_token, "access token")?;
        require(playlist_id, "playlist id")?;
        require(track_id, "track id")?;

        let body = RemoveTracksRequest {
            tracks: vec![TrackUri {
                uri: utils::track_uri(track_id),
            }],
        };
        let request = self
            .client
            .delete(self.endpoint(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(access_token)
            .json(&body);
        self.send(
            request,
            &[StatusCode::OK],
            "Failed to remove track from playlist",
        )
        .await
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<ProxiedResource, ServiceError> {
        require(access_token, "access token")?;
        require(user_id, "user id")?;
        require(name, "playlist name")?;

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
        };
        let request = self
            .client
            .post(self.endpoint(&["users", user_id, "playlists"])?)
            .bearer_auth(access_token)
            .json(&body);
        self.send(
            request,
            &[StatusCode::OK, StatusCode::CREATED],
            "Failed to create playlist",
        )
        .await
    }

    async fn fetch_artist(
        &self,
        access_token: &str,
        artist_id: &str,
    ) -> Result<ProxiedResource, ServiceError> {
        require(access_token, "access token")?;
        require(artist_id, "artist id")?;
        let request = self
            .client
            .get(self.endpoint(&["artists", artist_id])?)
            .bearer_auth(access_token);
        self.send(request, &[StatusCode::OK], "Failed to fetch artist data")
            .await
    }
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "None"
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Env(format!("invalid endpoint URL {raw}: {e}")))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::Decode(e.to_string()))
}
