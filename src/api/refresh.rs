use axum::{Json, body::Bytes, extract::State};
use tracing::{info, warn};

use super::ApiError;
use crate::{
    server::AppState,
    types::{RefreshTokenRequest, TokenBundle},
};

/// `POST /refresh_token`: trades `{"refresh_token": "..."}` for a fresh access token.
///
/// An empty or malformed body is treated like a body without a refresh token.
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenBundle>, ApiError> {
    let request: RefreshTokenRequest = serde_json::from_slice(&body).unwrap_or_default();

    let Some(refresh_token) = request.refresh_token.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::bad_request("No refresh token provided"));
    };

    let Some(service) = state.service() else {
        return Err(ApiError::unconfigured("Streaming service is not configured."));
    };

    match service.refresh(&refresh_token).await {
        Ok(tokens) => {
            info!("token refreshed successfully");
            Ok(Json(tokens))
        }
        Err(e) => {
            warn!(error = %e, "failed to refresh token");
            Err(ApiError::token_failure(&e, "Failed to refresh token"))
        }
    }
}
