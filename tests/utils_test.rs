use std::{collections::HashMap, time::Duration};

use hostmix::cli::landing_url;
use hostmix::config::{
    Config, DEFAULT_API_URL, DEFAULT_MAX_SESSIONS, DEFAULT_REDIRECT_URI, DEFAULT_SCOPE,
    DEFAULT_SESSION_TTL_SECS,
};
use hostmix::error::Error;
use hostmix::utils::*;

mod common;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_seed_batches_twelve_ids() {
    let ids = common::track_ids(12);
    let batches = seed_batches(&ids);

    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    assert_eq!(batches[2], &ids[10..12]);
}

#[test]
fn test_seed_batches_empty() {
    let ids: Vec<String> = Vec::new();
    assert!(seed_batches(&ids).is_empty());
}

#[test]
fn test_seed_batches_cover_all_ids_in_order() {
    for n in 0..=50 {
        let ids = common::track_ids(n);
        let batches = seed_batches(&ids);

        // ceil(n / 5) batches, none larger than the seed limit
        assert_eq!(batches.len(), n.div_ceil(MAX_SEED_TRACKS));
        assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= MAX_SEED_TRACKS));

        // flattening restores the original sequence, so no overlap and no gaps
        let flattened: Vec<String> = batches.iter().flat_map(|b| b.iter().cloned()).collect();
        assert_eq!(flattened, ids);
    }
}

#[test]
fn test_parse_num_songs() {
    assert_eq!(parse_num_songs("1").unwrap(), 1);
    assert_eq!(parse_num_songs(" 12 ").unwrap(), 12);
    assert_eq!(parse_num_songs("50").unwrap(), 50);

    for bad in ["0", "51", "-3", "twelve", "", "4.5"] {
        assert!(
            matches!(parse_num_songs(bad), Err(Error::Validation(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_playlist_url() {
    assert_eq!(
        playlist_url("37i9dQZF1DXcBWIGoYBM5M"),
        "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M"
    );
}

#[test]
fn test_random_tokens() {
    let id = generate_session_id();
    assert_eq!(id.len(), 48);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(id, generate_session_id());

    let state = generate_oauth_state();
    assert_eq!(state.len(), 32);
    assert_ne!(state, generate_oauth_state());
}

#[test]
fn test_cookie_value() {
    let header = "theme=dark; hostmix_session=abc123; other=1";
    assert_eq!(cookie_value(header, "hostmix_session"), Some("abc123"));
    assert_eq!(cookie_value(header, "theme"), Some("dark"));
    assert_eq!(cookie_value(header, "missing"), None);
    assert_eq!(cookie_value("hostmix_session=", "hostmix_session"), None);
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html("<b>\"Rock\" & 'Roll'</b>"),
        "&lt;b&gt;&quot;Rock&quot; &amp; &#39;Roll&#39;&lt;/b&gt;"
    );
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn test_config_defaults() {
    let config = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
    ]))
    .unwrap();

    assert_eq!(config.client_id, "id");
    assert_eq!(config.client_secret, "secret");
    assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
    assert_eq!(config.scope, DEFAULT_SCOPE);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert!(!config.show_dialog);
    assert!(config.scope.contains("user-top-read"));
    assert!(config.scope.contains("playlist-modify-public"));
}

#[test]
fn test_config_overrides_and_endpoint_join() {
    let config = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ("SPOTIFY_API_URL", "http://127.0.0.1:9999/v1/"),
        ("SPOTIFY_API_SHOW_DIALOG", "true"),
        ("SERVER_ADDRESS", "127.0.0.1:8888"),
    ]))
    .unwrap();

    assert!(config.show_dialog);
    assert_eq!(config.server_address, "127.0.0.1:8888");
    assert_eq!(
        config.api_endpoint(&["me", "top", "tracks"]).unwrap().as_str(),
        "http://127.0.0.1:9999/v1/me/top/tracks"
    );
}

#[test]
fn test_api_endpoint_encodes_each_segment() {
    let config = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ("SPOTIFY_API_URL", "http://127.0.0.1:9999/v1"),
    ]))
    .unwrap();

    let url = config.api_endpoint(&["users", "../me", "playlists"]).unwrap();
    assert_eq!(url.path(), "/v1/users/..%2Fme/playlists");

    let url = config
        .api_endpoint(&["users", "victim?x=1", "playlists"])
        .unwrap();
    assert_eq!(url.path(), "/v1/users/victim%3Fx=1/playlists");
    assert_eq!(url.query(), None);

    let url = config.api_endpoint(&["playlists", "a#b", "tracks"]).unwrap();
    assert_eq!(url.path(), "/v1/playlists/a%23b/tracks");
    assert_eq!(url.fragment(), None);
}

#[test]
fn test_config_session_limits() {
    let config = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
    ]))
    .unwrap();
    assert_eq!(config.session_ttl, Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
    assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);

    let config = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ("SESSION_TTL_SECS", "90"),
        ("MAX_SESSIONS", "8"),
    ]))
    .unwrap();
    assert_eq!(config.session_ttl, Duration::from_secs(90));
    assert_eq!(config.max_sessions, 8);

    for (key, raw) in [("SESSION_TTL_SECS", "soon"), ("MAX_SESSIONS", "0")] {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
            (key, raw),
        ]))
        .unwrap_err();
        assert!(err.contains(key), "{}", err);
    }
}

#[test]
fn test_config_missing_secret() {
    let err = Config::from_lookup(lookup(&[("SPOTIFY_API_AUTH_CLIENT_ID", "id")])).unwrap_err();
    assert!(err.contains("SPOTIFY_API_AUTH_CLIENT_SECRET"));

    let err = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ("SPOTIFY_API_SHOW_DIALOG", "sometimes"),
    ]))
    .unwrap_err();
    assert!(err.contains("SPOTIFY_API_SHOW_DIALOG"));

    let err = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ("SPOTIFY_API_URL", "api.spotify.com/v1"),
    ]))
    .unwrap_err();
    assert!(err.contains("SPOTIFY_API_URL"));
}

#[test]
fn test_landing_url() {
    assert_eq!(landing_url("0.0.0.0:5000"), "http://localhost:5000/");
    assert_eq!(landing_url("127.0.0.1:8080"), "http://127.0.0.1:8080/");
}
