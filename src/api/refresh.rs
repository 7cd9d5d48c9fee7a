use axum::{
    Extension,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    api::session::CurrentSession,
    error::Error,
    management::Route,
    server::AppState,
    success, warning,
};

/// Renews the access token and sends the host back to the step that asked for it.
///
/// The resume target is the route recorded by the access gate, or the
/// playlist form when none was recorded. A token that is still valid is not
/// refreshed. A session without a credential ends at `/login`; a refresh the
/// provider rejects also forgets the session.
pub async fn refresh_token(
    Extension(state): Extension<AppState>,
    current: Result<CurrentSession, Error>,
) -> Response {
    let Ok(current) = current else {
        return Redirect::to(Route::Login.path()).into_response();
    };
    let mut session = current.session.lock().await;

    if !session.tokens.is_authenticated() {
        return Redirect::to(Route::Login.path()).into_response();
    }

    let resume = session.resume_to.take().unwrap_or(Route::Form);
    if !session.tokens.is_expired() {
        return Redirect::to(resume.path()).into_response();
    }

    match session.tokens.refresh(&state.config).await {
        Ok(()) => {
            success!("Access token refreshed, resuming at {}", resume.path());
            Redirect::to(resume.path()).into_response()
        }
        Err(Error::Auth(msg)) => {
            warning!("Refresh rejected: {}", msg);
            session.sign_out();
            state.sessions.remove(&current.id).await;
            Redirect::to(Route::Login.path()).into_response()
        }
        Err(e) => {
            warning!("Refresh failed: {}", e);
            session.resume_to = Some(resume);
            e.into_response()
        }
    }
}
