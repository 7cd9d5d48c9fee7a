use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde_json::json;

use crate::{
    api::session::CurrentSession,
    error::Error,
    management::{Event, Route},
    server::AppState,
    success, warning,
};

/// Receives the redirect back from Spotify's authorization page.
///
/// - `?error=...` is answered with `{"error": ...}`
/// - `?code=...&state=...` is exchanged for a credential when `state` matches
///   the one stored by `/login`; the host then lands on the playlist form
/// - anything else is a bad request
pub async fn callback(
    Extension(state): Extension<AppState>,
    current: Result<CurrentSession, Error>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(error) = params.get("error") {
        warning!("Authorization denied: {}", error);
        return Json(json!({ "error": error })).into_response();
    }

    let Some(code) = params.get("code") else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        )
            .into_response();
    };

    let current = match current {
        Ok(current) => current,
        Err(e) => {
            warning!("Callback without a known session");
            return e.into_response();
        }
    };

    let mut session = current.session.lock().await;

    let expected_state = session.oauth_state.take();
    if expected_state.is_none() || params.get("state") != expected_state.as_ref() {
        warning!("Callback state does not match the login request");
        return Error::Auth("state mismatch".into()).into_response();
    }

    if let Err(e) = session
        .tokens
        .exchange_code_for_token(&state.config, code)
        .await
    {
        warning!("Token exchange failed: {}", e);
        session.sign_out();
        state.sessions.remove(&current.id).await;
        return e.into_response();
    }

    success!("Host authenticated");
    match session.advance(Event::Authenticated) {
        Ok(Some(next)) => Redirect::to(next.path()).into_response(),
        Ok(None) => Redirect::to(Route::Form.path()).into_response(),
        Err(e) => e.into_response(),
    }
}
