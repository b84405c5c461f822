//! Typed endpoint operations

use serde::Deserialize;

use crate::client::ApiClient;
use crate::models::{
    Budget, BudgetInput, Category, CategoryType, NewCategory, Summary, Transaction,
    TransactionInput, YearMonth,
};
use crate::query::{category_query, month_query, with_query, BudgetFilter, TransactionFilter};
use crate::transport::Transport;
use crate::Result;

const CATEGORIES: &str = "/categories/";
const TRANSACTIONS: &str = "/transactions/";
const SUMMARY: &str = "/transactions/summary/";
const BUDGETS: &str = "/budgets/";

/// List payloads come either bare or wrapped in a pagination envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paged { results } => results,
        }
    }
}

fn transaction_path(id: i64) -> String {
    format!("{TRANSACTIONS}{id}/")
}

fn budget_path(id: i64) -> String {
    format!("{BUDGETS}{id}/")
}

impl<T: Transport> ApiClient<T> {
    pub async fn categories(&self, kind: Option<CategoryType>) -> Result<Vec<Category>> {
        let endpoint = with_query(CATEGORIES, &category_query(kind));
        let list: ListResponse<Category> = self.get(&endpoint).await?;
        Ok(list.into_vec())
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let created: Category = self
            .post(CATEGORIES, serde_json::to_value(category)?)
            .await?;
        tracing::info!(category_id = created.id, name = %created.name, "Created category");
        Ok(created)
    }

    pub async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let endpoint = with_query(TRANSACTIONS, &filter.query_pairs());
        let list: ListResponse<Transaction> = self.get(&endpoint).await?;
        Ok(list.into_vec())
    }

    pub async fn create_transaction(&self, input: &TransactionInput) -> Result<Transaction> {
        let created: Transaction = self
            .post(TRANSACTIONS, serde_json::to_value(input)?)
            .await?;
        tracing::info!(transaction_id = created.id, "Created transaction");
        Ok(created)
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        input: &TransactionInput,
    ) -> Result<Transaction> {
        let updated: Transaction = self
            .put(&transaction_path(id), serde_json::to_value(input)?)
            .await?;
        tracing::info!(transaction_id = id, "Updated transaction");
        Ok(updated)
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        self.delete(&transaction_path(id)).await?;
        tracing::info!(transaction_id = id, "Deleted transaction");
        Ok(())
    }

    /// Monthly aggregate; `None` lets the backend summarize everything.
    pub async fn summary(&self, month: Option<YearMonth>) -> Result<Summary> {
        self.get(&with_query(SUMMARY, &month_query(month))).await
    }

    pub async fn budgets(&self, filter: &BudgetFilter) -> Result<Vec<Budget>> {
        let endpoint = with_query(BUDGETS, &filter.query_pairs());
        let list: ListResponse<Budget> = self.get(&endpoint).await?;
        Ok(list.into_vec())
    }

    pub async fn create_budget(&self, input: &BudgetInput) -> Result<Budget> {
        let created: Budget = self.post(BUDGETS, serde_json::to_value(input)?).await?;
        tracing::info!(
            budget_id = created.id,
            year = created.year,
            month = created.month,
            "Created budget"
        );
        Ok(created)
    }

    pub async fn update_budget(&self, id: i64, input: &BudgetInput) -> Result<Budget> {
        let updated: Budget = self
            .put(&budget_path(id), serde_json::to_value(input)?)
            .await?;
        tracing::info!(budget_id = id, "Updated budget");
        Ok(updated)
    }

    pub async fn delete_budget(&self, id: i64) -> Result<()> {
        self.delete(&budget_path(id)).await?;
        tracing::info!(budget_id = id, "Deleted budget");
        Ok(())
    }
}
