use axum::{
    Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::session::session_id, info, management::session_cookie, server::AppState, spotify,
    utils, warning,
};

/// Starts the authorization-code flow.
///
/// Reuses the browser's session when its cookie is known, otherwise creates a
/// new one, stores a fresh OAuth `state` in it and redirects to Spotify's
/// authorization page.
pub async fn login(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    let cookie_id = session_id(&headers);
    let (id, session, created) = state.sessions.get_or_create(cookie_id.as_deref()).await;
    if created {
        info!("New session started");
    }

    let oauth_state = utils::generate_oauth_state();
    let auth_url = match spotify::auth::authorize_url(&state.config, &oauth_state) {
        Ok(url) => url,
        Err(e) => {
            warning!("Cannot build authorization url: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h4>Authorization is misconfigured.</h4>"),
            )
                .into_response();
        }
    };

    session.lock().await.oauth_state = Some(oauth_state);

    info!("Redirecting host to Spotify authorization");
    (
        [(SET_COOKIE, session_cookie(&id))],
        Redirect::to(&auth_url),
    )
        .into_response()
}
