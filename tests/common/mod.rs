#![allow(dead_code)]

use std::time::Duration;

use hostmix::config::{Config, DEFAULT_SCOPE};

pub fn test_config(base: &str) -> Config {
    Config {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:5000/callback".to_string(),
        scope: DEFAULT_SCOPE.to_string(),
        auth_url: format!("{}/authorize", base),
        token_url: format!("{}/api/token", base),
        api_url: format!("{}/v1", base),
        show_dialog: false,
        server_address: "127.0.0.1:0".to_string(),
        session_ttl: Duration::from_secs(3600),
        max_sessions: 16,
    }
}

pub fn track_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("t{}", i)).collect()
}
