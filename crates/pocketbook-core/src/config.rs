//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::Result;

const CONFIG_FILE: &str = "config.json";
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

pub const ENV_API_URL: &str = "POCKETBOOK_API_URL";
pub const ENV_DATA_DIR: &str = "POCKETBOOK_DATA_DIR";
pub const ENV_TIMEOUT_SECS: &str = "POCKETBOOK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base of the REST API, e.g. `http://127.0.0.1:8000/api`
    pub api_base_url: String,
    /// Path to the database file holding the persisted session
    pub database_path: PathBuf,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
    /// TCP connect timeout
    pub connect_timeout_secs: u64,
}

/// Fields a `config.json` may override. Anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileOverrides {
    api_base_url: Option<String>,
    database_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            database_path: data_dir.join("pocketbook.db"),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Pocketbook"))
            .unwrap_or_else(|| PathBuf::from(".pocketbook"))
    }

    /// Defaults, then `<data dir>/config.json`, then the environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = env(ENV_DATA_DIR)
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::data_dir);

        let mut config = Self::new(data_dir.clone());
        config.apply_file(&data_dir.join(CONFIG_FILE))?;

        if let Some(url) = env(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(secs) = env(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = secs.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got {secs:?}"))
            })?;
        }

        config.validate()?;
        tracing::debug!(
            api = %config.api_base_url,
            database = %config.database_path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let contents = std::fs::read_to_string(path)?;
        let overrides: FileOverrides = serde_json::from_str(&contents).map_err(|e| {
            CoreError::Config(format!("{}: {e}", path.display()))
        })?;

        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url;
        }
        if let Some(database_path) = overrides.database_path {
            self.database_path = database_path;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = overrides.connect_timeout_secs {
            self.connect_timeout_secs = secs;
        }

        tracing::debug!(path = %path.display(), "Applied config file");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(CoreError::Config("timeouts must be at least one second".to_string()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| CoreError::Config(format!("invalid API URL {:?}: {e}", self.api_base_url)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CoreError::Config(format!(
                "unsupported API URL scheme: {other}"
            ))),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
