use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    api::{self, proxy},
    config::Settings,
    services::{MusicService, ServiceFactory},
};

/// State shared by every handler.
///
/// Holds the one adapter built at startup, or `None` if it could not be built, in
/// which case the OAuth routes answer 500 until the configuration is fixed.
#[derive(Clone)]
pub struct AppState {
    service: Option<Arc<dyn MusicService>>,
    service_type: String,
    available_services: Vec<&'static str>,
}

impl AppState {
    pub fn new(service: Option<Arc<dyn MusicService>>, service_type: impl Into<String>) -> Self {
        Self {
            service,
            service_type: service_type.into(),
            available_services: ServiceFactory::available_services(),
        }
    }

    /// Builds the adapter from `settings`. A failure is logged, not returned.
    pub fn from_settings(settings: &Settings) -> Self {
        let service = match ServiceFactory::create(settings) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!(error = %e, "failed to initialize streaming service");
                None
            }
        };
        Self::new(service, settings.streaming_service.clone())
    }

    pub fn service(&self) -> Option<&Arc<dyn MusicService>> {
        self.service.as_ref()
    }

    /// Configured service name, or `none` when no adapter is available.
    pub fn service_type(&self) -> &str {
        match self.service {
            Some(_) => &self.service_type,
            None => "none",
        }
    }

    pub fn available_services(&self) -> &[&'static str] {
        &self.available_services
    }
}

/// All routes with request tracing, without CORS.
pub fn router(state: AppState) -> Router {
    let library = Router::new()
        .route("/me", get(proxy::profile))
        .route("/me/playlists", get(proxy::playlists))
        .route("/me/tracks", get(proxy::liked_tracks))
        .route("/playlists/{playlist_id}/tracks", get(proxy::playlist_tracks))
        .route(
            "/playlists/{playlist_id}/tracks/{track_id}",
            post(proxy::add_track).delete(proxy::remove_track),
        )
        .route("/users/{user_id}/playlists", post(proxy::create_playlist))
        .route("/artists/{artist_id}", get(proxy::artist));

    Router::new()
        .route("/", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/refresh_token", post(api::refresh_token))
        .nest("/api", library)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: local frontend origins in development, `FRONTEND_URL` otherwise.
pub fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("origin"),
        ])
        .expose_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Binds `settings.server_addr` and serves until the process stops.
pub async fn start_api_server(settings: &Settings, state: AppState) -> std::io::Result<()> {
    let app = router(state).layer(cors_layer(settings));

    let addr = SocketAddr::from_str(&settings.server_addr).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid server address {}: {e}", settings.server_addr),
        )
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        %addr,
        development = settings.development,
        origins = ?settings.allowed_origins(),
        "listening"
    );
    axum::serve(listener, app).await
}
