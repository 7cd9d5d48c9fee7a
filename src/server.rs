use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;

use crate::{
    Res, api,
    config::Config,
    info,
    management::{Route, SessionStore},
};

/// State shared by every handler through an `Extension` layer.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(config.session_ttl, config.max_sessions);
        AppState {
            config: Arc::new(config),
            sessions,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(Route::Index.path(), get(api::index))
        .route(Route::Health.path(), get(api::health))
        .route(Route::Login.path(), get(api::login))
        .route(Route::Callback.path(), get(api::callback))
        .route(
            Route::Form.path(),
            get(api::playlist_form).post(api::submit_playlist_form),
        )
        .route(Route::CreatePlaylist.path(), get(api::create_playlist))
        .route(Route::TopTracks.path(), get(api::get_host_top_tracks))
        .route(Route::Recommendations.path(), get(api::get_host_recs))
        .route(Route::AddSongs.path(), get(api::add_songs))
        .route(Route::Refresh.path(), get(api::refresh_token))
        .layer(Extension(state))
}

pub async fn bind(address: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| format!("Failed to parse server address {}: {}", address, e))?;
    let listener = TcpListener::bind(&addr).await?;
    Ok(listener)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Res<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let listener = bind(&state.config.server_address).await?;
    serve(listener, state).await
}
