use tracing::info;

use crate::{
    config::{self, Settings},
    error,
    server::{self, AppState},
};

/// Runs the HTTP backend until the process is stopped.
///
/// A configuration problem does not prevent startup: the server still comes up,
/// `GET /` reports `none` as the service and the OAuth routes answer 500.
pub async fn serve() {
    let settings = Settings::from_env();

    info!(service = %settings.streaming_service, "loaded config");
    info!(
        redirect_uri = %settings.redirect_uri,
        frontend_url = %settings.frontend_url,
        "loaded config"
    );
    info!(
        client_id = config::presence(&settings.spotify_client_id),
        client_secret = config::presence(&settings.spotify_client_secret),
        "loaded config"
    );

    let state = AppState::from_settings(&settings);

    if let Err(e) = server::start_api_server(&settings, state).await {
        error!("Server stopped. Err: {}", e);
    }
}
