//! Monthly reports
use pocketbook_core::{MonthlyOverview, Summary, YearMonth};

use super::CommandResult;
use crate::state::AppState;

pub async fn summary(state: &AppState, month: Option<YearMonth>) -> CommandResult<Summary> {
    state.client().summary(month).await.into()
}

/// Budget vs actual; the current month unless one is given.
pub async fn overview(
    state: &AppState,
    month: Option<YearMonth>,
) -> CommandResult<MonthlyOverview> {
    let month = month.unwrap_or_else(YearMonth::current);
    state.tracker().monthly_overview(month).await.into()
}
