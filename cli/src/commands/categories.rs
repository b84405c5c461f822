//! Category commands
use pocketbook_core::{Category, CategoryType, NewCategory};

use super::CommandResult;
use crate::state::AppState;

pub async fn list(state: &AppState, kind: Option<CategoryType>) -> CommandResult<Vec<Category>> {
    state.client().categories(kind).await.into()
}

pub async fn create(state: &AppState, category: NewCategory) -> CommandResult<Category> {
    state.client().create_category(&category).await.into()
}
