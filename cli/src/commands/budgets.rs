//! Budget commands
use pocketbook_core::{Budget, BudgetFilter, BudgetInput};

use super::transactions::Deleted;
use super::CommandResult;
use crate::state::AppState;

pub async fn list(state: &AppState, filter: BudgetFilter) -> CommandResult<Vec<Budget>> {
    state.client().budgets(&filter).await.into()
}

pub async fn create(state: &AppState, input: BudgetInput) -> CommandResult<Budget> {
    state.client().create_budget(&input).await.into()
}

pub async fn update(state: &AppState, id: i64, input: BudgetInput) -> CommandResult<Budget> {
    state.client().update_budget(id, &input).await.into()
}

pub async fn delete(state: &AppState, id: i64) -> CommandResult<Deleted> {
    state
        .client()
        .delete_budget(id)
        .await
        .map(|()| Deleted { id })
        .into()
}
