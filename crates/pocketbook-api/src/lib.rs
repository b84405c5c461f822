//! Pocketbook API client
//!
//! Typed access to the budget tracker REST API:
//! - JSON requests against a fixed base path with a bearer token attached
//! - One transparent refresh-and-retry when the access token has expired
//! - Irrecoverable 401s end the session and notify subscribers
//! - Categories, transactions, budgets and the monthly summary

mod client;
mod endpoints;
mod error;
mod models;
mod query;
mod transport;

pub use client::{ApiClient, AuthEvent, EndReason, LoginResponse};
pub use error::{ApiError, InvalidMonth};
pub use models::{
    Budget, BudgetInput, Category, CategoryTotal, CategoryType, NewCategory, Summary, TokenPair,
    Transaction, TransactionInput, YearMonth,
};
pub use query::{BudgetFilter, TransactionFilter};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

pub type Result<T> = std::result::Result<T, ApiError>;
