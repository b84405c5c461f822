//! List filters and query-string building

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CategoryType, YearMonth};

/// Filters accepted by `GET /transactions/`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub category: Option<i64>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    /// Backend ordering field, e.g. `-date` or `amount`
    pub ordering: Option<String>,
}

impl TransactionFilter {
    /// Every transaction dated within `month`.
    pub fn for_month(month: YearMonth) -> Self {
        let first = month.first_day();
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);

        Self {
            date_from: Some(first),
            date_to: Some(last),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(date) = self.date_from {
            pairs.push(("date_from", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.date_to {
            pairs.push(("date_to", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(amount) = self.min_amount {
            pairs.push(("min_amount", amount.to_string()));
        }
        if let Some(amount) = self.max_amount {
            pairs.push(("max_amount", amount.to_string()));
        }
        if let Some(ordering) = self.ordering.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("ordering", ordering.to_string()));
        }
        pairs
    }
}

/// Filters accepted by `GET /budgets/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl BudgetFilter {
    pub fn for_month(month: YearMonth) -> Self {
        Self {
            year: Some(month.year()),
            month: Some(month.month()),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        pairs
    }
}

pub(crate) fn category_query(kind: Option<CategoryType>) -> Vec<(&'static str, String)> {
    kind.map(|k| vec![("type", k.as_str().to_string())])
        .unwrap_or_default()
}

pub(crate) fn month_query(month: Option<YearMonth>) -> Vec<(&'static str, String)> {
    month
        .map(|m| vec![("month", m.to_string())])
        .unwrap_or_default()
}

/// Append form-urlencoded `pairs` to `path`, or return it unchanged when empty.
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    format!("{path}?{}", serializer.finish())
}
