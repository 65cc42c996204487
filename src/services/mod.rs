//! # Streaming Service Adapters
//!
//! Every streaming provider is reached through the [`MusicService`] trait. The
//! HTTP layer and the CLI only ever hold an `Arc<dyn MusicService>`; which concrete
//! adapter sits behind it is decided once at startup by [`ServiceFactory`] from the
//! `STREAMING_SERVICE` setting.
//!
//! ## Adapters
//!
//! - [`SpotifyService`] - Spotify Web API (`accounts.spotify.com`, `api.spotify.com/v1`)
//!
//! ## Contract
//!
//! - Each operation performs at most one outbound HTTP call and never retries.
//! - Input constraints (non-empty ids, page limits) are checked before the call and
//!   reported as [`ServiceError::Validation`].
//! - Token endpoint rejections surface as [`ServiceError::Auth`], every other
//!   non-success status as [`ServiceError::Upstream`] carrying the upstream status.
//! - Adapters hold only immutable credentials and are shared read-only across
//!   requests.

mod factory;
mod spotify;

use async_trait::async_trait;

pub use factory::{ServiceFactory, ServiceKind};
pub use spotify::{SPOTIFY_SCOPES, SpotifyEndpoints, SpotifyService};

use crate::{
    error::ServiceError,
    types::{Page, ProxiedResource, Snapshot, TokenBundle},
};

/// Maximum page size for playlist and saved-track listings.
pub const MAX_PAGE_LIMIT: u32 = 50;
/// Maximum page size for playlist track listings.
pub const MAX_PLAYLIST_TRACKS_LIMIT: u32 = 100;

#[async_trait]
pub trait MusicService: Send + Sync {
    /// Short lower-case service name, e.g. `spotify`.
    fn name(&self) -> &'static str;

    /// Builds the provider's authorization URL for the given CSRF `state`.
    fn build_authorization_url(&self, state: &str) -> Result<String, ServiceError>;

    /// Exchanges an authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<TokenBundle, ServiceError>;

    /// Obtains a fresh access token. The returned bundle may omit `refresh_token`.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, ServiceError>;

    /// Profile of the token's user, as returned by the provider.
    async fn fetch_profile(&self, access_token: &str) -> Result<ProxiedResource, ServiceError>;

    /// One page of the user's playlists. `limit` must be in `1..=50`.
    async fn fetch_playlists(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page, ServiceError>;

    /// One page of a playlist's tracks. `limit` must be in `1..=100`.
    async fn fetch_playlist_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page, ServiceError>;

    /// One page of the user's saved tracks. `limit` must be in `1..=50`.
    async fn fetch_liked_tracks(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page, ServiceError>;

    /// Appends a track to a playlist and returns the new snapshot.
    ///
    /// Both 200 and 201 count as success.
    async fn add_track(
        &self,
        access_token: &str,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Snapshot, ServiceError>;

    /// Removes a track from a playlist and returns the new snapshot.
    ///
    /// Only 200 counts as success.
    async fn remove_track(
        &self,
        access_token: &str,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Snapshot, ServiceError>;

    /// Creates a playlist owned by `user_id` and returns it.
    async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<ProxiedResource, ServiceError>;

    /// Artist details by id.
    async fn fetch_artist(
        &self,
        access_token: &str,
        artist_id: &str,
    ) -> Result<ProxiedResource, ServiceError>;
}

/// Rejects empty or whitespace-only required inputs.
pub(crate) fn require(value: &str, what: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Checks a page size against the endpoint's upper bound.
pub(crate) fn require_limit(limit: u32, max: u32) -> Result<(), ServiceError> {
    if limit == 0 || limit > max {
        return Err(ServiceError::validation(format!(
            "limit must be between 1 and {max}"
        )));
    }
    Ok(())
}
