use std::net::SocketAddr;

use crate::{
    config::Config,
    error, info,
    server::{self, AppState},
    warning,
};

/// URL of the landing page for a bind address; wildcard binds map to `localhost`.
pub fn landing_url(address: &str) -> String {
    match address.parse::<SocketAddr>() {
        Ok(addr) if addr.ip().is_unspecified() => format!("http://localhost:{}/", addr.port()),
        Ok(addr) => format!("http://{}/", addr),
        Err(_) => format!("http://{}/", address),
    }
}

pub async fn serve(address: Option<String>, open: bool) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    if let Some(address) = address {
        config.server_address = address;
    }

    let listener = match server::bind(&config.server_address).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot bind {}: {}", config.server_address, e),
    };

    let url = landing_url(&config.server_address);
    info!("Host login page: {}", url);
    if open && webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        );
    }

    if let Err(e) = server::serve(listener, AppState::new(config)).await {
        error!("Server stopped: {}", e);
    }
}
