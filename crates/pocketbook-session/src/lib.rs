//! Pocketbook Session Management
//!
//! - A Session is the access/refresh token pair of the signed-in user
//! - Every mutation is written through to local storage before it returns
//! - Reopening the same storage restores the last session exactly
//! - A refresh token is only usable while an access token is held

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{RefreshUpdate, Session};
pub use store::{SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

pub type Result<T> = std::result::Result<T, SessionError>;
