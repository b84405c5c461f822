//! Tracker facade
//!
//! Owns the configuration and the API client built on top of the persisted
//! session. Front ends hold one `Tracker` and go through [`Tracker::client`]
//! for individual endpoints.

use tokio::sync::broadcast;

use pocketbook_api::{
    ApiClient, ApiError, AuthEvent, BudgetFilter, LoginResponse, ReqwestTransport, Transport,
    YearMonth,
};
use pocketbook_session::SessionStore;
use pocketbook_storage::Database;

use crate::config::Config;
use crate::overview::MonthlyOverview;
use crate::Result;

pub struct Tracker<T = ReqwestTransport> {
    config: Config,
    client: ApiClient<T>,
}

impl Tracker<ReqwestTransport> {
    /// Open the database, restore the session and build the HTTP client.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::open(&config.database_path)?;
        let session = SessionStore::load(db)?;
        let transport = ReqwestTransport::new(
            config.base_url()?,
            Some(config.request_timeout()),
            Some(config.connect_timeout()),
        )
        .map_err(ApiError::from)?;

        tracing::info!(
            api = %config.api_base_url,
            authenticated = session.is_authenticated(),
            "Tracker opened"
        );

        Ok(Self::with_client(config, ApiClient::new(transport, session)))
    }
}

impl<T: Transport> Tracker<T> {
    pub fn with_client(config: Config, client: ApiClient<T>) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.client.subscribe()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        Ok(self.client.login(username, password).await?)
    }

    pub fn logout(&self) -> Result<()> {
        Ok(self.client.logout()?)
    }

    /// Summary and budget for `month` side by side.
    ///
    /// A failed budget lookup shows as "no budget" unless it ended the
    /// session. A failed summary is returned as is.
    pub async fn monthly_overview(&self, month: YearMonth) -> Result<MonthlyOverview> {
        let summary = self.client.summary(Some(month)).await?;

        let budget = match self.client.budgets(&BudgetFilter::for_month(month)).await {
            Ok(budgets) => budgets.into_iter().next(),
            Err(e) if e.ends_session() => return Err(e.into()),
            Err(e) => {
                tracing::warn!(month = %month, error = %e, "Budget lookup failed");
                None
            }
        };

        Ok(MonthlyOverview::new(month, summary, budget.as_ref()))
    }
}
