//! Pocketbook Core
//!
//! Wires storage, the persisted session and the API client together behind
//! [`Tracker`], and owns configuration and logging setup.

mod config;
mod error;
mod overview;
mod tracker;

pub use config::Config;
pub use error::CoreError;
pub use overview::MonthlyOverview;
pub use tracker::Tracker;

// Re-export the layers below
pub use pocketbook_api::{
    ApiClient, ApiError, AuthEvent, Budget, BudgetFilter, BudgetInput, Category, CategoryTotal,
    CategoryType, EndReason, InvalidMonth, LoginResponse, NewCategory, ReqwestTransport, Summary,
    Transaction, TransactionFilter, TransactionInput, Transport, YearMonth,
};
pub use pocketbook_session::{RefreshUpdate, Session, SessionError, SessionStore};
pub use pocketbook_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    init_logging_with("info");
}

/// Initialize logging with a fallback filter used when `RUST_LOG` is unset.
pub fn init_logging_with(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
