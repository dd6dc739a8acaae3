// errors.rs
use astra::Response;

use crate::auth::AuthError;
use crate::contracts::StoreError;
use crate::payments::PaymentsError;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, hosted APIs).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Upstream Error: {0}")]
    Upstream(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials(msg) => ServerError::Unauthorized(msg),
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ServerError::NotFound,
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

impl From<PaymentsError> for ServerError {
    fn from(e: PaymentsError) -> Self {
        match e {
            PaymentsError::State(inner) => ServerError::BadRequest(inner.to_string()),
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}
