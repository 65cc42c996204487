#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use axum::Router;
use sporlproxy::{
    config::Settings,
    services::{MusicService, ServiceFactory},
};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";

/// Serves `app` on an ephemeral port and returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Settings built from the given variables only, never from the process environment.
pub fn settings_from(vars: &[(&str, &str)]) -> Settings {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

/// Spotify settings whose accounts and API endpoints point at `base`.
pub fn spotify_settings(base: &str) -> Settings {
    let token_url = format!("{base}/api/token");
    let api_url = format!("{base}/v1");
    settings_from(&[
        ("SPOTIFY_CLIENT_ID", CLIENT_ID),
        ("SPOTIFY_CLIENT_SECRET", CLIENT_SECRET),
        ("REDIRECT_URI", REDIRECT_URI),
        ("SPOTIFY_API_TOKEN_URL", &token_url),
        ("SPOTIFY_API_URL", &api_url),
        ("UPSTREAM_TIMEOUT_SECS", "5"),
    ])
}

pub fn spotify_service(base: &str) -> Arc<dyn MusicService> {
    ServiceFactory::create(&spotify_settings(base)).unwrap()
}
