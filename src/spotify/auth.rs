use reqwest::{Client, Response, Url};

use crate::{
    config::Config,
    error::{Error, Result},
    types::{AuthErrorResponse, TokenResponse},
};

/// Builds the URL of Spotify's authorization page.
///
/// The browser is redirected here by `/login`. The query carries the client
/// id, `response_type=code`, the requested scopes, the redirect URI and the
/// anti-forgery `state`. `show_dialog=true` is added when configured, which
/// forces the consent screen even for users who already approved the app.
///
/// # Errors
///
/// Returns [`Error::Auth`] when the configured authorization URL is not a
/// valid absolute URL.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config, "k2Jd...state")?;
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn authorize_url(config: &Config, state: &str) -> Result<String> {
    let mut params = vec![
        ("client_id", config.client_id.as_str()),
        ("response_type", "code"),
        ("scope", config.scope.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("state", state),
    ];
    if config.show_dialog {
        params.push(("show_dialog", "true"));
    }

    let url = Url::parse_with_params(&config.auth_url, &params)
        .map_err(|e| Error::Auth(format!("invalid authorization url: {}", e)))?;
    Ok(url.into())
}

/// Exchanges an authorization code for a token.
///
/// Sends the code together with the client credentials, the redirect URI and
/// `grant_type=authorization_code` as a form body to the token endpoint.
///
/// # Errors
///
/// - [`Error::Auth`] when Spotify answers with an `error` field or a body that
///   is not a token response
/// - [`Error::Http`] on network failures
pub async fn exchange_code(config: &Config, code: &str) -> Result<TokenResponse> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    read_token(res).await
}

/// Requests a new access token with a refresh token.
///
/// # Errors
///
/// Same as [`exchange_code`]. An `invalid_grant` answer means the refresh
/// token was revoked and the user has to log in again.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Result<TokenResponse> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    read_token(res).await
}

async fn read_token(res: Response) -> Result<TokenResponse> {
    let status = res.status();
    let body = res.text().await?;

    if let Ok(err) = serde_json::from_str::<AuthErrorResponse>(&body) {
        return Err(Error::Auth(match err.error_description {
            Some(description) => format!("{}: {}", err.error, description),
            None => err.error,
        }));
    }

    if !status.is_success() {
        return Err(Error::Auth(format!("token endpoint answered {}", status)));
    }

    serde_json::from_str::<TokenResponse>(&body)
        .map_err(|e| Error::Auth(format!("malformed token response: {}", e)))
}
