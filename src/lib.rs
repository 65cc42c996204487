//! Music Playlist Organizer Backend Library
//!
//! This library brokers the OAuth 2.0 authorization-code flow between a
//! single-page frontend and a streaming service, and forwards a fixed set of
//! library calls (profile, playlists, tracks, artists) with the user's bearer
//! token. Spotify is the only streaming service implemented today.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the JSON error envelope
//! - `cli` - Command-line subcommands of the `sporlproxy` binary
//! - `config` - Environment loading and the startup [`config::Settings`] snapshot
//! - `error` - Configuration and adapter error types
//! - `logging` - Tracing subscriber setup
//! - `server` - Router, CORS policy and the shared [`server::AppState`]
//! - `services` - Streaming service adapters and the adapter selector
//! - `types` - Data structures exchanged with the frontend and the provider
//! - `utils` - State nonces, basic auth and small formatting helpers
//!
//! # Example
//!
//! ```
//! use sporlproxy::{config::{self, Settings}, server::{self, AppState}};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let _ = config::load_env().await;
//!     let settings = Settings::from_env();
//!     let state = AppState::from_settings(&settings);
//!     server::start_api_server(&settings, state).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod services;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Opening browser...");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors of the command-line front end; the server never calls it
/// once it is running.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
