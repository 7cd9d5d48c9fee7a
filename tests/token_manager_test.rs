use hostmix::error::Error;
use hostmix::management::{TokenManager, now_timestamp};
use hostmix::spotify;
use hostmix::types::{Credential, TokenResponse};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn expired_credential() -> Credential {
    Credential {
        access_token: "old-access".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at: now_timestamp() - 10.0,
    }
}

#[test]
fn test_new_manager_is_not_authenticated() {
    let tokens = TokenManager::new();
    assert!(!tokens.is_authenticated());
    assert!(tokens.credential().is_none());
    assert!(matches!(tokens.access_token(), Err(Error::NotAuthenticated)));
}

#[test]
fn test_is_expired_at_boundary() {
    let tokens = TokenManager::with_credential(Credential {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        expires_at: 100.0,
    });

    assert!(!tokens.is_expired_at(99.0));
    assert!(!tokens.is_expired_at(100.0));
    assert!(tokens.is_expired_at(100.001));
}

#[test]
fn test_access_token_gate_order() {
    let tokens = TokenManager::with_credential(expired_credential());
    assert!(tokens.is_authenticated());
    assert!(tokens.is_expired());
    assert!(matches!(tokens.access_token(), Err(Error::TokenExpired)));

    let mut tokens = tokens;
    tokens.clear();
    assert!(matches!(tokens.access_token(), Err(Error::NotAuthenticated)));
}

#[test]
fn test_code_grant_without_refresh_token_is_rejected() {
    let mut tokens = TokenManager::new();
    let response = TokenResponse {
        access_token: "a".to_string(),
        token_type: Some("Bearer".to_string()),
        scope: None,
        expires_in: 3600,
        refresh_token: None,
    };

    assert!(matches!(
        tokens.apply_code_grant(response, 1_000.0),
        Err(Error::Auth(_))
    ));
    assert!(!tokens.is_authenticated());
}

#[tokio::test]
async fn test_exchange_code_sets_future_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "Bearer",
            "scope": "user-top-read",
            "expires_in": 3600,
            "refresh_token": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri());
    let mut tokens = TokenManager::new();
    let before = now_timestamp();

    tokens
        .exchange_code_for_token(&config, "auth-code")
        .await
        .unwrap();

    let credential = tokens.credential().unwrap();
    assert_eq!(credential.access_token, "access-1");
    assert_eq!(credential.refresh_token, "refresh-1");
    assert!(credential.expires_at > before);
    assert!(credential.expires_at >= before + 3600.0);
    assert!(tokens.is_authenticated());
    assert!(!tokens.is_expired());
    assert_eq!(tokens.access_token().unwrap(), "access-1");
}

#[tokio::test]
async fn test_exchange_code_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri());
    let mut tokens = TokenManager::new();

    let err = tokens
        .exchange_code_for_token(&config, "bad-code")
        .await
        .unwrap_err();

    match err {
        Error::Auth(msg) => assert!(msg.contains("invalid_grant")),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert!(!tokens.is_authenticated());
}

#[tokio::test]
async fn test_exchange_code_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri());
    let mut tokens = TokenManager::new();

    assert!(matches!(
        tokens.exchange_code_for_token(&config, "code").await,
        Err(Error::Auth(_))
    ));
}

#[tokio::test]
async fn test_refresh_without_credential_does_not_call_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri());
    let mut tokens = TokenManager::new();

    assert!(matches!(tokens.refresh(&config).await, Err(Error::Auth(_))));
}

#[tokio::test]
async fn test_refresh_overwrites_access_token_and_keeps_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "rotated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri());
    let mut tokens = TokenManager::with_credential(expired_credential());
    assert!(tokens.is_expired());

    tokens.refresh(&config).await.unwrap();

    let credential = tokens.credential().unwrap();
    assert_eq!(credential.access_token, "access-2");
    assert_eq!(credential.refresh_token, "refresh-1");
    assert!(!tokens.is_expired());
}

#[tokio::test]
async fn test_refresh_rejected_by_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })))
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri());
    let mut tokens = TokenManager::with_credential(expired_credential());

    assert!(matches!(tokens.refresh(&config).await, Err(Error::Auth(_))));
    assert_eq!(tokens.credential().unwrap().access_token, "old-access");
}

#[test]
fn test_authorize_url_parameters() {
    let mut config = common::test_config("https://accounts.example");
    let url = reqwest::Url::parse(&spotify::auth::authorize_url(&config, "xyz").unwrap()).unwrap();

    assert_eq!(url.path(), "/authorize");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    assert_eq!(get("client_id").as_deref(), Some("client-id"));
    assert_eq!(get("response_type").as_deref(), Some("code"));
    assert_eq!(get("redirect_uri").as_deref(), Some("http://localhost:5000/callback"));
    assert_eq!(get("state").as_deref(), Some("xyz"));
    assert_eq!(get("scope"), Some(config.scope.clone()));
    assert_eq!(get("show_dialog"), None);

    config.show_dialog = true;
    let url = spotify::auth::authorize_url(&config, "xyz").unwrap();
    assert!(url.contains("show_dialog=true"));
}
