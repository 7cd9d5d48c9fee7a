use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    error::{Error, Result},
    management::{Event, Route, TokenManager, Workflow},
    utils,
};

pub const SESSION_COOKIE: &str = "hostmix_session";

/// Everything the server remembers about one browser session.
#[derive(Debug, Default)]
pub struct Session {
    pub tokens: TokenManager,
    pub workflow: Workflow,
    /// `state` sent to the authorize endpoint, checked on callback.
    pub oauth_state: Option<String>,
    /// Route that asked for a refresh; the refresh handler sends the user back there.
    pub resume_to: Option<Route>,
}

impl Session {
    /// Ordered access gate run before every outbound call.
    ///
    /// Checks for a credential first and for expiry second. When the token has
    /// expired, `route` is recorded so the refresh step can resume it.
    pub fn gate(&mut self, route: Route) -> Result<String> {
        match self.tokens.access_token() {
            Err(Error::TokenExpired) => {
                self.resume_to = Some(route);
                Err(Error::TokenExpired)
            }
            other => other,
        }
    }

    /// Feeds `event` to the workflow and returns the route of the next step.
    ///
    /// The workflow is left untouched when the transition is rejected.
    pub fn advance(&mut self, event: Event) -> Result<Option<Route>> {
        let transition = self.workflow.clone().transition(event)?;
        self.workflow = transition.workflow;
        Ok(transition.next)
    }

    /// Drops the credential and resets the workflow.
    ///
    /// Handlers that sign a user out also remove the session from the
    /// [`SessionStore`].
    pub fn sign_out(&mut self) {
        self.tokens.clear();
        self.workflow = Workflow::new();
        self.resume_to = None;
        self.oauth_state = None;
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug)]
struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// Session id → session map shared by all handlers.
///
/// Each session sits behind its own lock, so concurrent requests of one
/// browser are serialized while different browsers never block each other
/// beyond the map lookup.
///
/// Sessions idle for longer than `ttl` are dropped, and the map never holds
/// more than `capacity` sessions: creating one past the limit evicts the
/// least recently seen.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        SessionStore {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Looks up `id` and marks the session as seen.
    ///
    /// An idle session past its TTL is removed and reported as unknown.
    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();

        match sessions.get_mut(id) {
            Some(entry) if now.duration_since(entry.last_seen) <= self.ttl => {
                entry.last_seen = now;
                Some(Arc::clone(&entry.session))
            }
            Some(_) => {
                sessions.remove(id);
                None
            }
            None => None,
        }
    }

    pub async fn create(&self) -> (String, SharedSession) {
        let id = utils::generate_session_id();
        let session: SharedSession = Arc::new(Mutex::new(Session::default()));

        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.ttl);

        while sessions.len() >= self.capacity {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        sessions.insert(
            id.clone(),
            Entry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        (id, session)
    }

    /// Returns the session for `id`, creating a new one when `id` is unknown
    /// or expired.
    ///
    /// The boolean is `true` when a new session was created and the caller
    /// has to hand its id to the browser.
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, SharedSession, bool) {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await {
                return (id.to_string(), session, false);
            }
        }

        let (id, session) = self.create().await;
        (id, session, true)
    }

    /// Forgets the session; its id is unknown from now on.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// `Set-Cookie` value carrying the session id.
pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}
