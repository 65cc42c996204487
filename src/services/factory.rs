use std::{fmt, str::FromStr, sync::Arc};

use tracing::info;

use super::{MusicService, SpotifyEndpoints, SpotifyService};
use crate::{config::Settings, error::ConfigError, types::ServiceCredentials};

/// Streaming services the selector knows about, built or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Spotify,
    SoundCloud,
    YouTubeMusic,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Spotify => "spotify",
            ServiceKind::SoundCloud => "soundcloud",
            ServiceKind::YouTubeMusic => "youtube_music",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spotify" => Ok(ServiceKind::Spotify),
            "soundcloud" => Ok(ServiceKind::SoundCloud),
            "youtube_music" => Ok(ServiceKind::YouTubeMusic),
            other => Err(ConfigError::UnsupportedService(other.to_string())),
        }
    }
}

/// Selects and builds the adapter named by `STREAMING_SERVICE`.
pub struct ServiceFactory;

impl ServiceFactory {
    /// Builds the configured adapter.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnsupportedService`] for an unknown service name
    /// - [`ConfigError::NotImplemented`] for a known service without an adapter yet
    /// - [`ConfigError::MissingCredential`] if the client id or secret is absent
    pub fn create(settings: &Settings) -> Result<Arc<dyn MusicService>, ConfigError> {
        match settings.streaming_service.parse::<ServiceKind>()? {
            ServiceKind::Spotify => {
                let client_id = settings
                    .spotify_client_id
                    .clone()
                    .ok_or(ConfigError::MissingCredential("SPOTIFY_CLIENT_ID"))?;
                let client_secret = settings
                    .spotify_client_secret
                    .clone()
                    .ok_or(ConfigError::MissingCredential("SPOTIFY_CLIENT_SECRET"))?;

                let service = SpotifyService::new(
                    ServiceCredentials {
                        client_id,
                        client_secret,
                        redirect_uri: settings.redirect_uri.clone(),
                    },
                    SpotifyEndpoints::from_settings(settings),
                    settings.upstream_timeout,
                )?;

                info!(
                    redirect_uri = %settings.redirect_uri,
                    "initialized spotify streaming service"
                );
                Ok(Arc::new(service))
            }
            kind @ (ServiceKind::SoundCloud | ServiceKind::YouTubeMusic) => {
                Err(ConfigError::NotImplemented(kind.to_string()))
            }
        }
    }

    /// Service names that can actually be instantiated.
    pub fn available_services() -> Vec<&'static str> {
        vec![ServiceKind::Spotify.as_str()]
    }
}
