use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::COOKIE, request::Parts},
};

use crate::{
    error::Error,
    management::{SESSION_COOKIE, SharedSession},
    server::AppState,
    utils,
};

/// Session id sent by the browser, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| utils::cookie_value(header, SESSION_COOKIE))
        .map(str::to_string)
}

/// The session of the requesting browser.
///
/// Rejects with [`Error::NotAuthenticated`] (a redirect to `/login`) when the
/// request carries no session cookie or the id is unknown to the store.
pub struct CurrentSession {
    pub id: String,
    pub session: SharedSession,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(app) = parts.extensions.get::<AppState>().cloned() else {
            return Err(Error::NotAuthenticated);
        };
        let Some(id) = session_id(&parts.headers) else {
            return Err(Error::NotAuthenticated);
        };

        match app.sessions.get(&id).await {
            Some(session) => Ok(CurrentSession { id, session }),
            None => Err(Error::NotAuthenticated),
        }
    }
}
