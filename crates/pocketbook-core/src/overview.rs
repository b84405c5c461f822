//! Budget vs actual for one month

use rust_decimal::Decimal;
use serde::Serialize;

use pocketbook_api::{Budget, Summary, YearMonth};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyOverview {
    pub month: YearMonth,
    pub summary: Summary,
    pub budget: Option<Decimal>,
    /// Total expenses for the month
    pub spent: Decimal,
    /// `budget - spent`; negative once over budget
    pub remaining: Option<Decimal>,
    /// Share of the budget spent, in percent, to two decimal places
    pub percent_used: Option<Decimal>,
    pub over_budget: bool,
}

impl MonthlyOverview {
    pub fn new(month: YearMonth, summary: Summary, budget: Option<&Budget>) -> Self {
        let spent = summary.total_expenses;
        let budget = budget.map(|b| b.amount);

        // Out-of-range results are left absent
        let remaining = budget.and_then(|b| b.checked_sub(spent));
        let percent_used = budget
            .filter(|b| !b.is_zero())
            .and_then(|b| spent.checked_div(b))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|percent| percent.round_dp(2));
        let over_budget = budget.is_some_and(|b| spent > b);

        Self {
            month,
            summary,
            budget,
            spent,
            remaining,
            percent_used,
            over_budget,
        }
    }
}
