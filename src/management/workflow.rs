//! The playlist build state machine.
//!
//! Handlers never mutate build data directly. They perform their outbound
//! call, turn the result into an [`Event`] and hand it to
//! [`Workflow::transition`], which is a pure function from the current
//! workflow and the event to the next workflow and the route that drives the
//! following step.

use crate::{
    error::{Error, Result},
    types::{PlaylistBuildState, PlaylistRequest},
};

/// Every route the web server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Health,
    Login,
    Callback,
    Form,
    CreatePlaylist,
    TopTracks,
    Recommendations,
    AddSongs,
    Refresh,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Index => "/",
            Route::Health => "/health",
            Route::Login => "/login",
            Route::Callback => "/callback",
            Route::Form => "/playlist_host_form",
            Route::CreatePlaylist => "/create_playlist",
            Route::TopTracks => "/get_host_top_tracks",
            Route::Recommendations => "/get_host_recs",
            Route::AddSongs => "/add_songs",
            Route::Refresh => "/refresh_token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    AwaitingAuth,
    FormCollection,
    IdentityResolution,
    PlaylistCreation,
    TopTrackFetch,
    RecommendationFetch,
    TrackAppend,
    Done,
}

impl WorkflowState {
    /// Route whose handler performs the work of this state.
    pub fn route(self) -> Route {
        match self {
            WorkflowState::AwaitingAuth => Route::Login,
            WorkflowState::FormCollection => Route::Form,
            WorkflowState::IdentityResolution | WorkflowState::PlaylistCreation => {
                Route::CreatePlaylist
            }
            WorkflowState::TopTrackFetch => Route::TopTracks,
            WorkflowState::RecommendationFetch => Route::Recommendations,
            WorkflowState::TrackAppend | WorkflowState::Done => Route::AddSongs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Authenticated,
    FormSubmitted(PlaylistRequest),
    IdentityResolved(String),
    PlaylistCreated(String),
    TopTracksFetched(Vec<String>),
    RecommendationsFetched(Vec<String>),
    TracksAppended,
    SignedOut,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Authenticated => "authenticated",
            Event::FormSubmitted(_) => "form submission",
            Event::IdentityResolved(_) => "identity resolution",
            Event::PlaylistCreated(_) => "playlist creation",
            Event::TopTracksFetched(_) => "top track fetch",
            Event::RecommendationsFetched(_) => "recommendation fetch",
            Event::TracksAppended => "track append",
            Event::SignedOut => "sign out",
        }
    }
}

/// Result of a transition: the new workflow and the route to redirect to.
///
/// `next` is `None` once the workflow reached [`WorkflowState::Done`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub workflow: Workflow,
    pub next: Option<Route>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    state: WorkflowState,
    request: Option<PlaylistRequest>,
    build: PlaylistBuildState,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Workflow {
            state: WorkflowState::AwaitingAuth,
            request: None,
            build: PlaylistBuildState::default(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn request(&self) -> Option<&PlaylistRequest> {
        self.request.as_ref()
    }

    pub fn build(&self) -> &PlaylistBuildState {
        &self.build
    }

    /// Whether the handler behind `route` may run in the current state.
    pub fn accepts(&self, route: Route) -> bool {
        use WorkflowState::*;

        match route {
            Route::Form => self.state != AwaitingAuth,
            Route::CreatePlaylist => matches!(self.state, IdentityResolution | PlaylistCreation),
            Route::TopTracks => self.state == TopTrackFetch,
            Route::Recommendations => self.state == RecommendationFetch,
            Route::AddSongs => matches!(self.state, TrackAppend | Done),
            _ => true,
        }
    }

    fn moved(self, state: WorkflowState) -> Transition {
        let next = match state {
            WorkflowState::Done => None,
            other => Some(other.route()),
        };
        Transition {
            workflow: Workflow { state, ..self },
            next,
        }
    }

    /// Applies `event` to the workflow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfOrder`] when the event is not valid in the
    /// current state. The workflow is consumed either way; callers keep a
    /// copy when they need to recover from the error.
    pub fn transition(self, event: Event) -> Result<Transition> {
        use WorkflowState::*;

        match (self.state, event) {
            (_, Event::SignedOut) => Ok(Workflow::new().moved(AwaitingAuth)),
            (_, Event::Authenticated) => Ok(Workflow::new().moved(FormCollection)),
            (AwaitingAuth, event) => Err(self.out_of_order(&event)),
            (_, Event::FormSubmitted(request)) => {
                let state = if request.host_user_id.trim().is_empty() {
                    IdentityResolution
                } else {
                    PlaylistCreation
                };
                let workflow = Workflow {
                    state,
                    request: Some(request),
                    build: PlaylistBuildState::default(),
                };
                Ok(workflow.moved(state))
            }
            (IdentityResolution, Event::IdentityResolved(user_id)) => {
                let mut workflow = self;
                if let Some(request) = workflow.request.as_mut() {
                    request.host_user_id = user_id;
                }
                Ok(workflow.moved(PlaylistCreation))
            }
            (PlaylistCreation, Event::PlaylistCreated(playlist_id)) => {
                let mut workflow = self;
                workflow.build.playlist_id = Some(playlist_id);
                Ok(workflow.moved(TopTrackFetch))
            }
            (TopTrackFetch, Event::TopTracksFetched(track_ids)) => {
                let mut workflow = self;
                workflow.build.seed_track_ids = track_ids;
                Ok(workflow.moved(RecommendationFetch))
            }
            (RecommendationFetch, Event::RecommendationsFetched(uris)) => {
                let mut workflow = self;
                workflow.build.recommended_track_uris.extend(uris);
                Ok(workflow.moved(TrackAppend))
            }
            (TrackAppend | Done, Event::TracksAppended) => Ok(self.moved(Done)),
            (_, event) => Err(self.out_of_order(&event)),
        }
    }

    fn out_of_order(&self, event: &Event) -> Error {
        Error::OutOfOrder {
            state: self.state,
            step: event.name(),
        }
    }
}
