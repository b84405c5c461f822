//! Login, logout and session status
use serde::Serialize;
use std::io::{self, BufRead, Write};

use super::CommandResult;
use crate::state::AppState;

const PASSWORD_ENV: &str = "POCKETBOOK_PASSWORD";

#[derive(Debug, Serialize)]
pub struct StatusInfo {
    pub authenticated: bool,
    pub api_base_url: String,
    pub database_path: String,
}

impl StatusInfo {
    fn from_state(state: &AppState) -> Self {
        let config = state.tracker().config();
        Self {
            authenticated: state.tracker().session().is_authenticated(),
            api_base_url: config.api_base_url.clone(),
            database_path: config.database_path.display().to_string(),
        }
    }
}

pub async fn login(state: &AppState, username: &str) -> CommandResult<StatusInfo> {
    let password = match read_password() {
        Ok(password) => password,
        Err(e) => return CommandResult::err(format!("Could not read password: {e}")),
    };

    match state.tracker().login(username, &password).await {
        Ok(_) => CommandResult::ok(StatusInfo::from_state(state)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn logout(state: &AppState) -> CommandResult<StatusInfo> {
    match state.tracker().logout() {
        Ok(()) => CommandResult::ok(StatusInfo::from_state(state)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn status(state: &AppState) -> CommandResult<StatusInfo> {
    CommandResult::ok(StatusInfo::from_state(state))
}

/// `POCKETBOOK_PASSWORD` if set, otherwise one line from stdin.
fn read_password() -> io::Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
