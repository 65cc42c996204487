//! Pass-through routes for the signed-in user's library.
//!
//! Each handler reads the caller's bearer token, makes one adapter call and
//! returns the upstream JSON as is.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{HeaderMap, header::AUTHORIZATION},
};

use super::ApiError;
use crate::{
    server::AppState,
    services::MusicService,
    types::{CreatePlaylistRequest, Page, PageParams, ProxiedResource, Snapshot},
};

/// Extracts the token of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))
}

fn service(state: &AppState) -> Result<&Arc<dyn MusicService>, ApiError> {
    state
        .service()
        .ok_or_else(|| ApiError::unconfigured("Streaming service is not configured."))
}

/// `GET /api/me`: profile of the token's user.
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProxiedResource>, ApiError> {
    let token = bearer_token(&headers)?;
    let profile = service(&state)?.fetch_profile(token).await?;
    Ok(Json(profile))
}

/// `GET /api/me/playlists?limit&offset`: one page of the user's playlists.
pub async fn playlists(
    State(state): State<AppState>,
    headers: HeaderMap,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let Query(page) = page?;
    let token = bearer_token(&headers)?;
    let playlists = service(&state)?
        .fetch_playlists(token, page.limit, page.offset)
        .await?;
    Ok(Json(playlists))
}

/// `GET /api/me/tracks?limit&offset`: one page of saved tracks, newest first.
pub async fn liked_tracks(
    State(state): State<AppState>,
    headers: HeaderMap,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let Query(page) = page?;
    let token = bearer_token(&headers)?;
    let tracks = service(&state)?
        .fetch_liked_tracks(token, page.limit, page.offset)
        .await?;
    Ok(Json(tracks))
}

/// `GET /api/playlists/{playlist_id}/tracks?limit&offset`: one page of a playlist's
/// tracks. Accepts up to 100 items per page.
pub async fn playlist_tracks(
    State(state): State<AppState>,
    headers: HeaderMap,
    playlist_id: Result<Path<String>, PathRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let Path(playlist_id) = playlist_id?;
    let Query(page) = page?;
    let token = bearer_token(&headers)?;
    let tracks = service(&state)?
        .fetch_playlist_tracks(token, &playlist_id, page.limit, page.offset)
        .await?;
    Ok(Json(tracks))
}

/// `POST /api/playlists/{playlist_id}/tracks/{track_id}`: appends one track.
///
/// Answers with the playlist's new `snapshot_id`.
pub async fn add_track(
    State(state): State<AppState>,
    headers: HeaderMap,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Snapshot>, ApiError> {
    let Path((playlist_id, track_id)) = ids?;
    let token = bearer_token(&headers)?;
    let snapshot = service(&state)?
        .add_track(token, &playlist_id, &track_id)
        .await?;
    Ok(Json(snapshot))
}

/// `DELETE /api/playlists/{playlist_id}/tracks/{track_id}`: removes every
/// occurrence of the track.
pub async fn remove_track(
    State(state): State<AppState>,
    headers: HeaderMap,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Snapshot>, ApiError> {
    let Path((playlist_id, track_id)) = ids?;
    let token = bearer_token(&headers)?;
    let snapshot = service(&state)?
        .remove_track(token, &playlist_id, &track_id)
        .await?;
    Ok(Json(snapshot))
}

/// `POST /api/users/{user_id}/playlists`: creates a playlist from
/// `{"name", "description"?, "public"?}`.
///
/// `description` defaults to empty and `public` to `false`.
pub async fn create_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    user_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<ProxiedResource>, ApiError> {
    let Path(user_id) = user_id?;
    let token = bearer_token(&headers)?;
    let request: CreatePlaylistRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?;

    let playlist = service(&state)?
        .create_playlist(
            token,
            &user_id,
            &request.name,
            &request.description,
            request.public,
        )
        .await?;
    Ok(Json(playlist))
}

/// `GET /api/artists/{artist_id}`: artist details.
pub async fn artist(
    State(state): State<AppState>,
    headers: HeaderMap,
    artist_id: Result<Path<String>, PathRejection>,
) -> Result<Json<ProxiedResource>, ApiError> {
    let Path(artist_id) = artist_id?;
    let token = bearer_token(&headers)?;
    let artist = service(&state)?.fetch_artist(token, &artist_id).await?;
    Ok(Json(artist))
}
