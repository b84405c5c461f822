//! Session Store
//!
//! Handles token persistence and restoration.
//! Every mutation is persisted before the in-memory copy changes hands.

use parking_lot::RwLock;
use std::sync::Arc;

use pocketbook_storage::Database;

use crate::session::{RefreshUpdate, Session};
use crate::Result;

/// Local storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Local storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

pub struct SessionStore {
    /// In-memory copy of the persisted session
    session: Arc<RwLock<Session>>,
    /// Database for persistence
    db: Database,
}

impl SessionStore {
    /// Restore the session persisted in `db`.
    pub fn load(db: Database) -> Result<Self> {
        let access = db.get_item(ACCESS_TOKEN_KEY)?;
        let refresh = db.get_item(REFRESH_TOKEN_KEY)?;
        let session = Session::new(access, refresh);

        tracing::debug!(
            authenticated = session.is_authenticated(),
            has_refresh_token = session.refresh_token.is_some(),
            "Loaded session"
        );

        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            db,
        })
    }

    /// Store `access` and update the refresh token according to `refresh`.
    ///
    /// A missing or empty access token clears the persisted one. Both keys are
    /// written in one storage transaction while the write lock is held.
    pub fn set_token(&self, access: Option<&str>, refresh: RefreshUpdate) -> Result<()> {
        let mut guard = self.session.write();

        let mut next = guard.clone();
        next.apply(access, &refresh);

        self.db.transaction(|conn| {
            Database::put_in(conn, ACCESS_TOKEN_KEY, next.access_token.as_deref())?;
            if refresh != RefreshUpdate::Keep {
                Database::put_in(conn, REFRESH_TOKEN_KEY, next.refresh_token.as_deref())?;
            }
            Ok(())
        })?;

        *guard = next;
        Ok(())
    }

    /// Replace the access token, leaving the refresh token untouched.
    pub fn set_access_token(&self, access: Option<&str>) -> Result<()> {
        self.set_token(access, RefreshUpdate::Keep)
    }

    /// Forget both tokens.
    pub fn clear(&self) -> Result<()> {
        self.set_token(None, RefreshUpdate::Clear)?;
        tracing::info!("Cleared session tokens");
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.session.read().refresh_token.clone()
    }

    /// The refresh token if it belongs to a valid pair.
    pub fn usable_refresh_token(&self) -> Option<String> {
        self.session.read().usable_refresh_token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            db: self.db.clone(),
        }
    }
}
