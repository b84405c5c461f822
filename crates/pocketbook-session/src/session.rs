//! Session data structure

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to authenticated requests
    pub access_token: Option<String>,
    /// Token exchanged for a new access token once the current one expires
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: normalize(access_token),
            refresh_token: normalize(refresh_token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// The refresh token, but only while it is part of a valid pair.
    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.access_token.as_ref()?;
        self.refresh_token.as_deref()
    }

    /// Apply a token update in memory.
    pub fn apply(&mut self, access: Option<&str>, refresh: &RefreshUpdate) {
        self.access_token = normalize(access.map(str::to_string));
        match refresh {
            RefreshUpdate::Keep => {}
            RefreshUpdate::Set(token) => self.refresh_token = normalize(Some(token.clone())),
            RefreshUpdate::Clear => self.refresh_token = None,
        }
    }
}

/// How a token update treats the stored refresh token.
///
/// The access and refresh tokens are updated independently: `Keep` leaves the
/// current refresh token untouched, while `Set` and `Clear` replace it. An
/// empty `Set` behaves like `Clear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshUpdate {
    Keep,
    Set(String),
    Clear,
}

impl RefreshUpdate {
    /// `Some(token)` replaces the refresh token, `None` keeps it.
    pub fn rotate_or_keep(token: Option<String>) -> Self {
        match token {
            Some(token) => RefreshUpdate::Set(token),
            None => RefreshUpdate::Keep,
        }
    }
}

/// Blank tokens count as absent; anything else is kept byte for byte.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
