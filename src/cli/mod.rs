//! # CLI Module
//!
//! Subcommands of the `sporlproxy` binary.
//!
//! - [`serve`] - Runs the HTTP backend (the default)
//! - [`auth_url`] - Prints, and optionally opens, an authorization URL
//! - [`profile`], [`playlists`], [`liked`], [`tracks`], [`artist`] - One-shot library
//!   calls through the configured adapter, printed as tables. Handy to check that
//!   credentials, scopes and a freshly issued access token actually work.
//!
//! Every command reads its configuration once through [`Settings::from_env`] and
//! builds the adapter with [`ServiceFactory`], the same way the server does.
//!
//! ```bash
//! sporlproxy                          # serve on 0.0.0.0:5000
//! sporlproxy auth-url --open          # start a login in the browser
//! sporlproxy playlists --token BQC... # list the first 50 playlists
//! ```

mod auth;
mod library;
mod serve;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Settings,
    error,
    services::{MusicService, ServiceFactory},
};

pub use auth::auth_url;
pub use library::{artist, liked, playlists, profile, tracks};
pub use serve::serve;

/// Builds the configured adapter or exits with the configuration error.
fn service(settings: &Settings) -> Arc<dyn MusicService> {
    match ServiceFactory::create(settings) {
        Ok(service) => service,
        Err(e) => error!("Cannot initialize streaming service. Err: {}", e),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
