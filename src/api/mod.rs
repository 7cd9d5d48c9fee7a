//! # API Module
//!
//! HTTP endpoints of the hostmix web server. Each handler is one step of the
//! playlist build: the host logs in with Spotify, fills in the playlist form
//! and is then carried through playlist creation, top track fetch,
//! recommendation fetch and track append by redirects.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Redirects to Spotify's authorization page
//! - [`callback`] - Exchanges the authorization code for a credential
//! - [`refresh_token`] - Renews an expired access token and resumes the step
//!   that needed it
//!
//! ### Playlist workflow
//!
//! - [`playlist_form`] / [`submit_playlist_form`] - Collects name, song count
//!   and host user id
//! - [`create_playlist`] - Resolves the host identity if needed and creates
//!   the playlist
//! - [`get_host_top_tracks`] - Fetches the seed tracks
//! - [`get_host_recs`] - Fetches recommendations in batches of five seeds
//! - [`add_songs`] - Appends the recommendations and links the playlist
//!
//! ### Misc
//!
//! - [`index`] - Landing page
//! - [`health`] - Status and version for monitoring
//!
//! ## Access gate
//!
//! Every workflow handler runs [`Session::gate`](crate::management::Session::gate)
//! before touching Spotify: no credential redirects to `/login`, an expired
//! one records the current route and redirects to `/refresh_token`. A handler
//! called out of order redirects to the route of the current workflow state.

use axum::response::{IntoResponse, Redirect, Response};

use crate::management::Session;

mod callback;
mod form;
mod health;
mod index;
mod login;
mod playlist;
mod refresh;
mod session;

pub use callback::callback;
pub use form::HostForm;
pub use form::playlist_form;
pub use form::submit_playlist_form;
pub use health::health;
pub use index::index;
pub use login::login;
pub use playlist::add_songs;
pub use playlist::create_playlist;
pub use playlist::get_host_recs;
pub use playlist::get_host_top_tracks;
pub use refresh::refresh_token;
pub use session::CurrentSession;
pub use session::session_id;

/// Sends the browser to the step the workflow is actually in.
pub(crate) fn redirect_to_state(session: &Session) -> Response {
    Redirect::to(session.workflow.state().route().path()).into_response()
}
