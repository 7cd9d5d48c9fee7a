use chrono::Utc;

use crate::{
    config::Config,
    error::{Error, Result},
    spotify,
    types::{Credential, TokenResponse},
};

/// Seconds since the Unix epoch with millisecond precision.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Owns the OAuth credential of a single session.
///
/// The manager answers the two questions every protected step asks, in this
/// order: is there a credential at all, and has it expired. It also performs
/// the two grants that create or renew the credential.
#[derive(Debug, Clone, Default)]
pub struct TokenManager {
    credential: Option<Credential>,
}

impl TokenManager {
    pub fn new() -> Self {
        TokenManager { credential: None }
    }

    pub fn with_credential(credential: Credential) -> Self {
        TokenManager {
            credential: Some(credential),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// True iff the current time is past `expires_at`.
    ///
    /// A manager without a credential reports expired; callers check
    /// [`TokenManager::is_authenticated`] first.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_timestamp())
    }

    pub fn is_expired_at(&self, now: f64) -> bool {
        match &self.credential {
            Some(credential) => now > credential.expires_at,
            None => true,
        }
    }

    /// Runs the access gate and hands out the bearer token.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] when no credential exists
    /// - [`Error::TokenExpired`] when the credential is past its expiry
    pub fn access_token(&self) -> Result<String> {
        let Some(credential) = &self.credential else {
            return Err(Error::NotAuthenticated);
        };

        if self.is_expired() {
            return Err(Error::TokenExpired);
        }

        Ok(credential.access_token.clone())
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Replaces the stored credential.
    pub fn store(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    /// Forgets the credential, e.g. after the provider rejected a refresh.
    pub fn clear(&mut self) {
        self.credential = None;
    }

    /// Exchanges an authorization code for a fresh credential.
    ///
    /// On success the access token, the refresh token and
    /// `expires_at = now + expires_in` are stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the token endpoint answers with an error
    /// field, a malformed body, or a grant without a refresh token.
    pub async fn exchange_code_for_token(&mut self, config: &Config, code: &str) -> Result<()> {
        let issued_at = now_timestamp();
        let response = spotify::auth::exchange_code(config, code).await?;
        self.apply_code_grant(response, issued_at)
    }

    /// Stores the result of an `authorization_code` grant issued at `issued_at`.
    pub fn apply_code_grant(&mut self, response: TokenResponse, issued_at: f64) -> Result<()> {
        let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) else {
            return Err(Error::Auth(
                "token response did not contain a refresh token".into(),
            ));
        };

        self.store(Credential {
            access_token: response.access_token,
            refresh_token,
            expires_at: issued_at + response.expires_in as f64,
        });
        Ok(())
    }

    /// Renews the access token with the stored refresh token.
    ///
    /// Only `access_token` and `expires_at` are overwritten; the refresh token
    /// is kept even if the provider sends a new one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when there is no refresh token or the provider
    /// rejects the grant.
    pub async fn refresh(&mut self, config: &Config) -> Result<()> {
        let refresh_token = match &self.credential {
            Some(credential) if !credential.refresh_token.is_empty() => {
                credential.refresh_token.clone()
            }
            _ => return Err(Error::Auth("no refresh token stored".into())),
        };

        let issued_at = now_timestamp();
        let response = spotify::auth::refresh_token(config, &refresh_token).await?;
        self.apply_refresh_grant(response, issued_at)
    }

    /// Stores the result of a `refresh_token` grant issued at `issued_at`.
    pub fn apply_refresh_grant(&mut self, response: TokenResponse, issued_at: f64) -> Result<()> {
        let Some(credential) = self.credential.as_mut() else {
            return Err(Error::Auth("no refresh token stored".into()));
        };

        credential.access_token = response.access_token;
        credential.expires_at = issued_at + response.expires_in as f64;
        Ok(())
    }
}
