use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::{info, warn};

use super::ApiError;
use crate::{
    server::AppState,
    types::{CallbackParams, TokenBundle},
};

/// `GET /callback`: exchanges the authorization code for tokens.
///
/// A provider `error` wins over a `code`. Every exchange failure is a 400.
pub async fn callback(
    query: Result<Query<CallbackParams>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<TokenBundle>, ApiError> {
    let Query(params) = query?;

    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        warn!(error, "authorization error");
        return Err(ApiError::bad_request(format!(
            "Authorization failed: {error}"
        )));
    }

    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        warn!("no authorization code received in callback");
        return Err(ApiError::bad_request("No authorization code provided"));
    };

    let Some(service) = state.service() else {
        return Err(ApiError::unconfigured("Streaming service is not configured."));
    };

    match service.exchange_code(code).await {
        Ok(tokens) => {
            info!("token exchange successful");
            Ok(Json(tokens))
        }
        Err(e) => {
            warn!(error = %e, "token exchange failed");
            Err(ApiError::token_failure(&e, "Failed to get tokens"))
        }
    }
}
