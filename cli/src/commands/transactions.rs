//! Transaction commands
use pocketbook_core::{Transaction, TransactionFilter, TransactionInput};
use serde::Serialize;

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: i64,
}

pub async fn list(state: &AppState, filter: TransactionFilter) -> CommandResult<Vec<Transaction>> {
    state.client().transactions(&filter).await.into()
}

pub async fn create(state: &AppState, input: TransactionInput) -> CommandResult<Transaction> {
    state.client().create_transaction(&input).await.into()
}

pub async fn update(
    state: &AppState,
    id: i64,
    input: TransactionInput,
) -> CommandResult<Transaction> {
    state.client().update_transaction(id, &input).await.into()
}

pub async fn delete(state: &AppState, id: i64) -> CommandResult<Deleted> {
    state
        .client()
        .delete_transaction(id)
        .await
        .map(|()| Deleted { id })
        .into()
}
