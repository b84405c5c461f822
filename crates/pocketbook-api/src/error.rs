//! API error types

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Token refresh failed")]
    RefreshFailed(u16),

    #[error("Login failed")]
    LoginFailed,

    /// Non-OK response; `message` is what the backend said, verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(#[from] pocketbook_session::SessionError),
}

impl ApiError {
    /// Whether this error ended the signed-in session.
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized | ApiError::SessionExpired | ApiError::RefreshFailed(_)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid month: {0} (expected YYYY-MM)")]
pub struct InvalidMonth(pub String);
