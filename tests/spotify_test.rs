mod common;

use std::{collections::HashMap, time::Duration};

use axum::{
    Form, Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use pretty_assertions::assert_eq;
use reqwest::Url;
use serde_json::{Value, json};
use sporlproxy::{
    error::{ConfigError, ServiceError},
    services::{SPOTIFY_SCOPES, SpotifyEndpoints, SpotifyService},
    types::ServiceCredentials,
    utils,
};

use common::{CLIENT_ID, CLIENT_SECRET, REDIRECT_URI, spawn_upstream, spotify_service};

fn has_client_auth(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == utils::basic_auth_header(CLIENT_ID, CLIENT_SECRET))
}

fn has_bearer(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {token}"))
}

async fn token_endpoint(
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !has_client_auth(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client", "error_description": "bad client auth" })),
        );
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => match form.get("code").map(String::as_str) {
            Some("good-code")
                if form.get("redirect_uri").map(String::as_str) == Some(REDIRECT_URI) =>
            {
                (
                    StatusCode::OK,
                    Json(json!({
                        "access_token": "abc",
                        "token_type": "Bearer",
                        "scope": "user-read-private",
                        "expires_in": 3600,
                        "refresh_token": "refresh-1"
                    })),
                )
            }
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_grant", "error_description": "invalid_grant" })),
            ),
        },
        Some("refresh_token") => match form.get("refresh_token").map(String::as_str) {
            Some("refresh-1") => (
                StatusCode::OK,
                Json(json!({ "access_token": "def", "token_type": "Bearer", "expires_in": 3600 })),
            ),
            _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))),
        },
        _ => (StatusCode::BAD_REQUEST, Json(json!({}))),
    }
}

async fn playlists(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !has_bearer(&headers, "abc") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": { "status": 401 } })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "href": "https://api.spotify.com/v1/me/playlists",
            "items": [{ "id": "p1", "name": "Mix" }],
            "limit": query.get("limit").and_then(|l| l.parse::<u64>().ok()),
            "offset": query.get("offset").and_then(|o| o.parse::<u64>().ok()),
            "total": 1,
            "next": null,
            "previous": null
        })),
    )
}

async fn playlist_tracks(
    Path(playlist_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!({
        "items": [{ "track": { "id": "t1", "name": playlist_id } }],
        "limit": query.get("limit"),
        "total": 1,
        "next": null,
        "previous": null
    }))
}

/// Answers 201, or 200 for playlist `p200`.
async fn add_tracks(
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body != json!({ "uris": ["spotify:track:t42"] }) {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    let status = if playlist_id == "p200" {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (
        status,
        Json(json!({ "snapshot_id": format!("{playlist_id}-added") })),
    )
}

/// Answers 200, or 201 for playlist `p201`.
async fn remove_tracks(
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body != json!({ "tracks": [{ "uri": "spotify:track:t42" }] }) {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    let status = if playlist_id == "p201" {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({ "snapshot_id": format!("{playlist_id}-removed") })),
    )
}

async fn create_playlist(
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "new-playlist",
            "owner": { "id": user_id },
            "name": body["name"],
            "description": body["description"],
            "public": body["public"]
        })),
    )
}

async fn artist(Path(artist_id): Path<String>) -> (StatusCode, Json<Value>) {
    if artist_id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "internal detail" } })),
        );
    }
    (StatusCode::OK, Json(json!({ "id": artist_id, "name": "Band" })))
}

async fn upstream() -> String {
    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .route(
            "/v1/me",
            get(|| async { Json(json!({ "id": "user-1", "display_name": "User" })) }),
        )
        .route("/v1/me/playlists", get(playlists))
        .route("/v1/me/tracks", get(|| async { "not json" }))
        .route(
            "/v1/playlists/{playlist_id}/tracks",
            get(playlist_tracks).post(add_tracks).delete(remove_tracks),
        )
        .route("/v1/users/{user_id}/playlists", post(create_playlist))
        .route("/v1/artists/{artist_id}", get(artist));
    spawn_upstream(app).await
}

fn credentials(client_id: &str, client_secret: &str) -> ServiceCredentials {
    ServiceCredentials {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
    }
}

#[test]
fn test_placeholder_credentials_fail_construction() {
    let err = SpotifyService::new(
        credentials("None", CLIENT_SECRET),
        SpotifyEndpoints::default(),
        Duration::from_secs(5),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredential("SPOTIFY_CLIENT_ID")));

    let err = SpotifyService::new(
        credentials(CLIENT_ID, ""),
        SpotifyEndpoints::default(),
        Duration::from_secs(5),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredential("SPOTIFY_CLIENT_SECRET")));
}

#[test]
fn test_invalid_endpoint_fails_construction() {
    let endpoints = SpotifyEndpoints {
        api_url: "not a url".to_string(),
        ..SpotifyEndpoints::default()
    };
    let result = SpotifyService::new(
        credentials(CLIENT_ID, CLIENT_SECRET),
        endpoints,
        Duration::from_secs(5),
    );
    assert!(matches!(result, Err(ConfigError::Env(_))));
}

#[tokio::test]
async fn test_authorization_url_round_trip() {
    let service = spotify_service("http://127.0.0.1:9");

    let generated = utils::generate_state();

    for state in ["ABCDEF0123456789", generated.as_str(), "a b&c=d/é"] {
        let url = service.build_authorization_url(state).unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("accounts.spotify.com"));
        assert_eq!(parsed.path(), "/authorize");

        let params: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        let expected: HashMap<String, String> = [
            ("client_id", CLIENT_ID.to_string()),
            ("response_type", "code".to_string()),
            ("redirect_uri", REDIRECT_URI.to_string()),
            ("scope", SPOTIFY_SCOPES.join(" ")),
            ("state", state.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        assert_eq!(params, expected);
    }
}

#[tokio::test]
async fn test_authorization_url_requires_state() {
    let service = spotify_service("http://127.0.0.1:9");
    let err = service.build_authorization_url("").unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_exchange_code() {
    let service = spotify_service(&upstream().await);

    let tokens = service.exchange_code("good-code").await.unwrap();
    assert_eq!(tokens.access_token, "abc");
    assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(tokens.expires_in, 3600);
    assert_eq!(tokens.token_type.as_deref(), Some("Bearer"));
    assert_eq!(tokens.extra.get("scope"), Some(&json!("user-read-private")));
}

#[tokio::test]
async fn test_exchange_code_rejected() {
    let service = spotify_service(&upstream().await);

    let err = service.exchange_code("bad-code").await.unwrap_err();
    assert!(matches!(err, ServiceError::Auth(ref msg) if msg == "invalid_grant"));
    assert_eq!(err.to_string(), "invalid_grant");
}

#[tokio::test]
async fn test_exchange_code_requires_code() {
    let service = spotify_service("http://127.0.0.1:9");
    let err = service.exchange_code("  ").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_refresh() {
    let service = spotify_service(&upstream().await);

    let tokens = service.refresh("refresh-1").await.unwrap();
    assert_eq!(tokens.access_token, "def");
    assert_eq!(tokens.refresh_token, None);

    // No error_description upstream: generic message
    let err = service.refresh("stale").await.unwrap_err();
    assert!(matches!(err, ServiceError::Auth(ref msg) if msg == "Failed to refresh token"));
}

#[tokio::test]
async fn test_fetch_profile() {
    let service = spotify_service(&upstream().await);
    let profile = service.fetch_profile("abc").await.unwrap();
    assert_eq!(profile["id"], "user-1");
}

#[tokio::test]
async fn test_fetch_playlists() {
    let service = spotify_service(&upstream().await);

    let page = service.fetch_playlists("abc", 20, 40).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0]["id"], "p1");
    assert_eq!(page.next, None);
    assert_eq!(page.extra.get("limit"), Some(&json!(20)));
    assert_eq!(page.extra.get("offset"), Some(&json!(40)));

    // Upstream status is carried through
    let err = service.fetch_playlists("wrong", 20, 0).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Upstream { status, .. } if status == StatusCode::UNAUTHORIZED
    ));
}

#[tokio::test]
async fn test_page_limits() {
    let service = spotify_service(&upstream().await);

    let err = service.fetch_playlists("abc", 51, 0).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = service.fetch_liked_tracks("abc", 0, 0).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    // Playlist tracks allow up to 100
    let page = service
        .fetch_playlist_tracks("abc", "p1", 100, 0)
        .await
        .unwrap();
    assert_eq!(page.items[0]["track"]["name"], "p1");
    assert_eq!(page.extra.get("limit"), Some(&json!("100")));

    let err = service
        .fetch_playlist_tracks("abc", "p1", 101, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_undecodable_body() {
    let service = spotify_service(&upstream().await);
    let err = service.fetch_liked_tracks("abc", 50, 0).await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[tokio::test]
async fn test_add_and_remove_track() {
    let service = spotify_service(&upstream().await);

    let added = service.add_track("abc", "p1", "t42").await.unwrap();
    assert_eq!(added.snapshot_id, "p1-added");

    let removed = service.remove_track("abc", "p1", "t42").await.unwrap();
    assert_eq!(removed.snapshot_id, "p1-removed");

    let err = service.add_track("abc", "p1", "").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_track_mutation_status_codes() {
    let service = spotify_service(&upstream().await);

    // Adding accepts 200 as well as 201
    let added = service.add_track("abc", "p200", "t42").await.unwrap();
    assert_eq!(added.snapshot_id, "p200-added");

    // Removing accepts only 200
    let err = service.remove_track("abc", "p201", "t42").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Upstream { status, .. } if status == StatusCode::CREATED
    ));
    assert_eq!(
        err.to_string(),
        "Failed to remove track from playlist: HTTP 201"
    );
}

#[tokio::test]
async fn test_create_playlist() {
    let service = spotify_service(&upstream().await);

    let playlist = service
        .create_playlist("abc", "user-1", "Road trip", "Songs for the car", true)
        .await
        .unwrap();
    assert_eq!(
        playlist,
        json!({
            "id": "new-playlist",
            "owner": { "id": "user-1" },
            "name": "Road trip",
            "description": "Songs for the car",
            "public": true
        })
    );

    let err = service
        .create_playlist("abc", "user-1", "", "", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_fetch_artist() {
    let service = spotify_service(&upstream().await);

    let artist = service.fetch_artist("abc", "a1").await.unwrap();
    assert_eq!(artist["name"], "Band");

    let err = service.fetch_artist("abc", "missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch artist data: HTTP 404");
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let service = spotify_service(&upstream().await);

    // Each id stays a single path segment; the mock decodes it back
    for id in ["a/b", "a?b", "a#b", "a b%2F"] {
        let artist = service.fetch_artist("abc", id).await.unwrap();
        assert_eq!(artist["id"], id);
    }

    let page = service
        .fetch_playlist_tracks("abc", "p/../me", 10, 0)
        .await
        .unwrap();
    assert_eq!(page.items[0]["track"]["name"], "p/../me");
}
