use crate::{config::Settings, error, info, success, utils, warning};

/// Prints an authorization URL with a fresh `state` and optionally opens it.
pub async fn auth_url(open: bool) {
    let settings = Settings::from_env();
    let service = super::service(&settings);

    let state = utils::generate_state();
    let url = match service.build_authorization_url(&state) {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization URL. Err: {}", e),
    };

    info!("State: {}", state);
    println!("{}", url);

    if open {
        if webbrowser::open(&url).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        } else {
            success!("Opened authorization page in the browser.");
        }
    }
}
