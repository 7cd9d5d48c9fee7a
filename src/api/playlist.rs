use axum::{
    Extension,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::{redirect_to_state, session::CurrentSession},
    error::{Error, Result},
    info,
    management::{Event, Route, Session, WorkflowState},
    server::AppState,
    spotify, success,
    types::PlaylistRequest,
    utils, warning,
};

fn redirect_next(next: Option<Route>, fallback: Route) -> Response {
    Redirect::to(next.unwrap_or(fallback).path()).into_response()
}

fn current_request(session: &Session, step: &'static str) -> Result<PlaylistRequest> {
    session
        .workflow
        .request()
        .cloned()
        .ok_or(Error::OutOfOrder {
            state: session.workflow.state(),
            step,
        })
}

fn current_playlist_id(session: &Session) -> Result<String> {
    session
        .workflow
        .build()
        .playlist_id
        .clone()
        .ok_or(Error::OutOfOrder {
            state: session.workflow.state(),
            step: "track append",
        })
}

/// Creates the empty playlist, resolving the host's user id first when the
/// form left it blank. Each of the two calls goes through the access gate.
pub async fn create_playlist(
    Extension(state): Extension<AppState>,
    current: CurrentSession,
) -> Result<Response> {
    let mut session = current.session.lock().await;
    let token = session.gate(Route::CreatePlaylist)?;
    if !session.workflow.accepts(Route::CreatePlaylist) {
        return Ok(redirect_to_state(&session));
    }

    if session.workflow.state() == WorkflowState::IdentityResolution {
        let user = spotify::user::current_user(&state.config, &token)
            .await
            .inspect_err(|e| warning!("Failed to resolve host identity: {}", e))?;
        info!("Resolved host identity {}", user.id);
        session.advance(Event::IdentityResolved(user.id))?;
    }

    let request = current_request(&session, "playlist creation")?;
    let token = session.gate(Route::CreatePlaylist)?;
    let playlist = spotify::playlist::create(
        &state.config,
        &token,
        &request.host_user_id,
        &request.playlist_name,
    )
    .await
    .inspect_err(|e| warning!("Failed to create playlist: {}", e))?;

    success!("Playlist '{}' created ({})", playlist.name, playlist.id);
    let next = session.advance(Event::PlaylistCreated(playlist.id))?;
    Ok(redirect_next(next, Route::TopTracks))
}

/// Fetches the host's top tracks and keeps their ids as recommendation seeds.
pub async fn get_host_top_tracks(
    Extension(state): Extension<AppState>,
    current: CurrentSession,
) -> Result<Response> {
    let mut session = current.session.lock().await;
    let token = session.gate(Route::TopTracks)?;
    if !session.workflow.accepts(Route::TopTracks) {
        return Ok(redirect_to_state(&session));
    }

    let request = current_request(&session, "top track fetch")?;
    let tracks = spotify::tracks::get_top_tracks(&state.config, &token, request.num_songs)
        .await
        .inspect_err(|e| warning!("Failed to fetch top tracks: {}", e))?;

    let seed_track_ids: Vec<String> = tracks.into_iter().map(|t| t.id).collect();
    info!("Fetched {} top tracks", seed_track_ids.len());

    let next = session.advance(Event::TopTracksFetched(seed_track_ids))?;
    Ok(redirect_next(next, Route::Recommendations))
}

/// Requests recommendations batch by batch, five seeds at a time.
///
/// Batches are sent in order and their track URIs are collected in the same
/// order. The token is checked again before every batch; when it expires
/// midway, the collected URIs are dropped and the step starts over after the
/// refresh. No seeds means no requests and an empty result.
pub async fn get_host_recs(
    Extension(state): Extension<AppState>,
    current: CurrentSession,
) -> Result<Response> {
    let mut session = current.session.lock().await;
    session.gate(Route::Recommendations)?;
    if !session.workflow.accepts(Route::Recommendations) {
        return Ok(redirect_to_state(&session));
    }

    let seed_track_ids = session.workflow.build().seed_track_ids.clone();
    let mut uris: Vec<String> = Vec::new();

    for batch in utils::seed_batches(&seed_track_ids) {
        let token = session.gate(Route::Recommendations)?;
        let tracks = spotify::recommendations::get_recommendations(&state.config, &token, batch)
            .await
            .inspect_err(|e| warning!("Failed to fetch recommendations: {}", e))?;
        uris.extend(tracks.into_iter().map(|t| t.uri));
    }

    info!(
        "Collected {} recommendations from {} seed tracks",
        uris.len(),
        seed_track_ids.len()
    );

    let next = session.advance(Event::RecommendationsFetched(uris))?;
    Ok(redirect_next(next, Route::AddSongs))
}

/// Appends every collected URI to the playlist and links to the result.
///
/// Calling this again after completion appends the same URIs once more.
pub async fn add_songs(
    Extension(state): Extension<AppState>,
    current: CurrentSession,
) -> Result<Response> {
    let mut session = current.session.lock().await;
    let token = session.gate(Route::AddSongs)?;
    if !session.workflow.accepts(Route::AddSongs) {
        return Ok(redirect_to_state(&session));
    }

    let playlist_id = current_playlist_id(&session)?;
    let uris = session.workflow.build().recommended_track_uris.clone();

    spotify::playlist::add_tracks(&state.config, &token, &playlist_id, &uris)
        .await
        .inspect_err(|e| warning!("Failed to add tracks: {}", e))?;

    session.advance(Event::TracksAppended)?;
    success!("Added {} tracks to playlist {}", uris.len(), playlist_id);

    let url = utils::playlist_url(&playlist_id);
    Ok(Html(format!(
        "<h2>Your playlist is ready.</h2><p>{count} tracks added.</p><p><a href='{url}'>{url}</a></p><p><a href='{form}'>Build another</a></p>",
        count = uris.len(),
        url = utils::escape_html(&url),
        form = Route::Form.path()
    ))
    .into_response())
}
