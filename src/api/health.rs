use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "message": "Music Playlist Organizer Backend API is running",
        "service": state.service_type(),
        "available_services": state.available_services(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
