use axum::{
    Form,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::{redirect_to_state, session::CurrentSession},
    error::{Error, Result},
    info,
    management::{Event, Route},
    types::PlaylistRequest,
    utils::{self, MAX_SONGS},
};

/// Raw playlist form fields, kept as strings so bad input can be re-shown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostForm {
    #[serde(default)]
    pub pname: String,
    #[serde(rename = "numSongs", default)]
    pub num_songs: String,
    #[serde(default)]
    pub host_user_id: String,
    #[serde(default)]
    pub genres: String,
}

impl HostForm {
    /// Coerces the form into a [`PlaylistRequest`].
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an empty playlist name or a song count that is
    /// not a whole number between 1 and 50.
    pub fn into_request(self) -> Result<PlaylistRequest> {
        let playlist_name = self.pname.trim().to_string();
        if playlist_name.is_empty() {
            return Err(Error::Validation("playlist name must not be empty".into()));
        }

        Ok(PlaylistRequest {
            playlist_name,
            num_songs: utils::parse_num_songs(&self.num_songs)?,
            host_user_id: self.host_user_id.trim().to_string(),
        })
    }
}

fn render_form(form: &HostForm, message: Option<&str>) -> String {
    let message = message
        .map(|m| format!("<p style='color:#b00'>{}</p>", utils::escape_html(m)))
        .unwrap_or_default();

    format!(
        r#"<h2>Create a playlist</h2>
{message}
<form method="post" action="{action}">
  <label for="pname">Playlist name</label>
  <input type="text" id="pname" name="pname" value="{pname}" required>
  <label for="numSongs">Number of songs (1-{max})</label>
  <input type="number" id="numSongs" name="numSongs" min="1" max="{max}" value="{num_songs}" required>
  <label for="host_user_id">Spotify user id (empty for the logged in host)</label>
  <input type="text" id="host_user_id" name="host_user_id" value="{host_user_id}">
  <label for="genres">Genres</label>
  <input type="text" id="genres" name="genres" value="{genres}">
  <button type="submit">Create</button>
</form>"#,
        action = Route::Form.path(),
        max = MAX_SONGS,
        pname = utils::escape_html(&form.pname),
        num_songs = utils::escape_html(&form.num_songs),
        host_user_id = utils::escape_html(&form.host_user_id),
        genres = utils::escape_html(&form.genres),
    )
}

pub async fn playlist_form(current: CurrentSession) -> Result<Response> {
    let mut session = current.session.lock().await;
    session.gate(Route::Form)?;
    if !session.workflow.accepts(Route::Form) {
        return Ok(redirect_to_state(&session));
    }

    Ok(Html(render_form(&HostForm::default(), None)).into_response())
}

/// Accepts the playlist form and restarts the build with the new request.
///
/// Invalid input re-renders the form with a 400 instead of failing the step.
pub async fn submit_playlist_form(
    current: CurrentSession,
    Form(form): Form<HostForm>,
) -> Result<Response> {
    let mut session = current.session.lock().await;
    session.gate(Route::Form)?;
    if !session.workflow.accepts(Route::Form) {
        return Ok(redirect_to_state(&session));
    }

    let request = match form.clone().into_request() {
        Ok(request) => request,
        Err(Error::Validation(msg)) => {
            return Ok((StatusCode::BAD_REQUEST, Html(render_form(&form, Some(&msg)))).into_response());
        }
        Err(e) => return Err(e),
    };

    if !form.genres.trim().is_empty() {
        info!("Genres requested (not used for seeding): {}", form.genres.trim());
    }
    info!(
        "Building playlist '{}' from {} top tracks",
        request.playlist_name, request.num_songs
    );

    let next = session
        .advance(Event::FormSubmitted(request))?
        .unwrap_or(Route::CreatePlaylist);
    Ok(Redirect::to(next.path()).into_response())
}
