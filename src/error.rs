use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::{
    management::{Route, WorkflowState},
    utils,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The provider rejected a code exchange or a refresh, or the callback was forged.
    #[error("Authorization failed: {0}")]
    Auth(String),
    #[error("No credential for this session")]
    NotAuthenticated,
    #[error("The access token expired")]
    TokenExpired,
    #[error("Spotify API error {status}: {message}")]
    UpstreamApi { status: u16, message: String },
    #[error("Invalid form input: {0}")]
    Validation(String),
    #[error("Step {step} is not allowed while the workflow is in {state:?}")]
    OutOfOrder {
        state: WorkflowState,
        step: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Error::UpstreamApi {
            status,
            message: message.into(),
        }
    }
}

fn error_page(status: StatusCode, title: &str, detail: &str) -> Response {
    (
        status,
        Html(format!(
            "<h2>{title}</h2><p>{detail}</p><p><a href='{form}'>Back to the playlist form</a></p>",
            detail = utils::escape_html(detail),
            form = Route::Form.path()
        )),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Auth(_) | Error::NotAuthenticated => {
                Redirect::to(Route::Login.path()).into_response()
            }
            Error::TokenExpired => Redirect::to(Route::Refresh.path()).into_response(),
            Error::Validation(msg) => error_page(StatusCode::BAD_REQUEST, "Invalid input", &msg),
            Error::OutOfOrder { .. } => {
                error_page(StatusCode::CONFLICT, "Step out of order", &self.to_string())
            }
            Error::Config(msg) => error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server misconfigured",
                &msg,
            ),
            Error::UpstreamApi { .. } | Error::Http(_) => error_page(
                StatusCode::BAD_GATEWAY,
                "Spotify request failed",
                &self.to_string(),
            ),
        }
    }
}
