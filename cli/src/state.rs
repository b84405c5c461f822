//! Application state
use pocketbook_core::{ApiClient, Config, ReqwestTransport, Result, Tracker};

pub struct AppState {
    tracker: Tracker,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let tracker = Tracker::open(config)?;

        Ok(Self { tracker })
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn client(&self) -> &ApiClient<ReqwestTransport> {
        self.tracker.client()
    }
}
