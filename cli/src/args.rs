//! Command-line parsing

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use pocketbook_core::{
    BudgetFilter, BudgetInput, CategoryType, NewCategory, TransactionFilter, TransactionInput,
    YearMonth,
};

#[derive(Debug, Parser)]
#[command(name = "pocketbook")]
#[command(version, about = "Personal budget tracker", arg_required_else_help = true)]
#[command(after_help = "Dates are YYYY-MM-DD, months are YYYY-MM.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in; the password comes from POCKETBOOK_PASSWORD or stdin
    Login { username: String },
    /// Forget the stored tokens
    Logout,
    /// Show whether a session is held and where
    Status,
    /// List categories, optionally of one type
    Categories {
        /// income or expense
        kind: Option<CategoryType>,
    },
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// List transactions
    Transactions(TransactionFilterArgs),
    Transaction {
        #[command(subcommand)]
        command: TransactionCommand,
    },
    /// List budgets
    Budgets(BudgetFilterArgs),
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },
    /// Income, expenses and balance for a month, or for everything
    Summary { month: Option<YearMonth> },
    /// Budget vs actual, for the current month unless one is given
    Overview { month: Option<YearMonth> },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    Add {
        #[arg(value_parser = non_empty)]
        name: String,
        /// income or expense
        kind: CategoryType,
    },
}

#[derive(Debug, Subcommand)]
pub enum TransactionCommand {
    Add(TransactionArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum BudgetCommand {
    Add(BudgetArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: BudgetArgs,
    },
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct TransactionArgs {
    pub date: NaiveDate,
    /// Category id
    pub category: i64,
    pub amount: Decimal,
    /// Free text; the remaining words are joined with spaces
    pub description: Vec<String>,
}

impl From<TransactionArgs> for TransactionInput {
    fn from(args: TransactionArgs) -> Self {
        Self {
            date: args.date,
            category: args.category,
            amount: args.amount,
            description: args.description.join(" ").trim().to_string(),
        }
    }
}

#[derive(Debug, Args)]
pub struct BudgetArgs {
    pub year: i32,
    #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,
    pub amount: Decimal,
}

impl From<BudgetArgs> for BudgetInput {
    fn from(args: BudgetArgs) -> Self {
        Self {
            year: args.year,
            month: args.month,
            amount: args.amount,
        }
    }
}

#[derive(Debug, Args)]
pub struct TransactionFilterArgs {
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,
    #[arg(long, value_name = "ID")]
    pub category: Option<i64>,
    #[arg(long, value_name = "AMOUNT")]
    pub min: Option<Decimal>,
    #[arg(long, value_name = "AMOUNT")]
    pub max: Option<Decimal>,
    /// Backend ordering field, e.g. `-date`
    #[arg(long, value_name = "FIELD", allow_hyphen_values = true)]
    pub order: Option<String>,
}

impl From<TransactionFilterArgs> for TransactionFilter {
    fn from(args: TransactionFilterArgs) -> Self {
        Self {
            date_from: args.from,
            date_to: args.to,
            category: args.category,
            min_amount: args.min,
            max_amount: args.max,
            ordering: args.order,
        }
    }
}

#[derive(Debug, Args)]
pub struct BudgetFilterArgs {
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

impl From<BudgetFilterArgs> for BudgetFilter {
    fn from(args: BudgetFilterArgs) -> Self {
        Self {
            year: args.year,
            month: args.month,
        }
    }
}

impl CategoryCommand {
    pub fn into_new_category(self) -> NewCategory {
        match self {
            CategoryCommand::Add { name, kind } => NewCategory {
                name: name.trim().to_string(),
                kind,
            },
        }
    }
}

fn non_empty(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(raw.to_string())
    }
}
