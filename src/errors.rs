use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a user action. Every variant ends up as an error notice;
/// none of them is retried.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("could not reach the backend: {0}")]
    Network(#[source] reqwest::Error),
    #[error("backend answered {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("unexpected response from the backend: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: i64 },
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn required(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}

/// Routing-level failure rendered as a plain HTTP error.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
