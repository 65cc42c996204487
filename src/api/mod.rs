//! # API Module
//!
//! HTTP handlers of the backend. Every handler receives the shared
//! [`AppState`](crate::server::AppState), makes at most one adapter call and
//! answers with JSON. Failures use the `{"error": "..."}` envelope of [`ApiError`].
//!
//! ## Endpoints
//!
//! ### OAuth
//!
//! - [`login`] - `GET /login`, authorization URL with a fresh `state`
//! - [`callback`] - `GET /callback`, authorization code to token exchange
//! - [`refresh_token`] - `POST /refresh_token`, access token refresh
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /`, configured service and the services that can be built
//!
//! ### Library pass-through
//!
//! [`proxy`] - routes under `/api` that forward the caller's bearer token to the
//! streaming service: profile, playlists, playlist tracks, liked tracks, playlist
//! track mutation, playlist creation and artist lookup.

mod callback;
mod error;
mod health;
mod login;
pub mod proxy;
mod refresh;

pub use callback::callback;
pub use error::ApiError;
pub use health::health;
pub use login::login;
pub use refresh::refresh_token;
