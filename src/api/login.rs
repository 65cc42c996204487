use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::info;

use super::ApiError;
use crate::{server::AppState, utils};

/// `GET /login`: authorization URL for the frontend to redirect the user to.
///
/// The generated `state` travels to the provider and back through the frontend;
/// the backend does not keep it, so comparing it on return is up to the frontend.
pub async fn login(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let Some(service) = state.service() else {
        return Err(ApiError::unconfigured(
            "Streaming service is not configured. Please check your .env file.",
        ));
    };

    let auth_state = utils::generate_state();
    let url = service
        .build_authorization_url(&auth_state)
        .map_err(|e| ApiError::unconfigured(e.to_string()))?;

    info!(service = service.name(), "generated authorization url");
    Ok(Json(json!({ "url": url })))
}
