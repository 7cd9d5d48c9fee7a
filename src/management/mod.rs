mod auth;
mod session;
mod workflow;

pub use auth::TokenManager;
pub use auth::now_timestamp;
pub use session::SESSION_COOKIE;
pub use session::Session;
pub use session::SessionStore;
pub use session::SharedSession;
pub use session::session_cookie;
pub use workflow::Event;
pub use workflow::Route;
pub use workflow::Transition;
pub use workflow::Workflow;
pub use workflow::WorkflowState;
