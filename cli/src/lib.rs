//! Pocketbook command-line front end
//!
//! Parses one command, runs it against the tracker and prints the outcome as
//! JSON. When the session ends underneath a command the user is told to log
//! in again.

mod args;
mod commands;
mod state;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;

use args::{BudgetCommand, Cli, Command, TransactionCommand};
use commands::CommandResult;
use pocketbook_core::{AuthEvent, EndReason};
use state::AppState;

const RELOGIN_HINT: &str = "Session ended, please run `pocketbook login`";

pub async fn run() -> anyhow::Result<ExitCode> {
    // Exits on its own for --help, --version and usage errors
    let cli = Cli::parse();

    pocketbook_core::init_logging_with("warn");

    let state = AppState::new().context("failed to open the local session store")?;
    let mut events = state.tracker().subscribe();

    tracing::debug!(command = ?cli.command, "Running command");
    let success = execute(&state, cli.command).await?;

    while let Ok(AuthEvent::SessionEnded { reason }) = events.try_recv() {
        if reason != EndReason::LoggedOut {
            eprintln!("{RELOGIN_HINT}");
        }
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn execute(state: &AppState, command: Command) -> anyhow::Result<bool> {
    use commands::{auth, budgets, categories, summary, transactions};

    match command {
        Command::Login { username } => emit(auth::login(state, &username).await),
        Command::Logout => emit(auth::logout(state)),
        Command::Status => emit(auth::status(state)),
        Command::Categories { kind } => emit(categories::list(state, kind).await),
        Command::Category { command } => {
            emit(categories::create(state, command.into_new_category()).await)
        }
        Command::Transactions(filter) => emit(transactions::list(state, filter.into()).await),
        Command::Transaction { command } => match command {
            TransactionCommand::Add(fields) => {
                emit(transactions::create(state, fields.into()).await)
            }
            TransactionCommand::Update { id, fields } => {
                emit(transactions::update(state, id, fields.into()).await)
            }
            TransactionCommand::Delete { id } => emit(transactions::delete(state, id).await),
        },
        Command::Budgets(filter) => emit(budgets::list(state, filter.into()).await),
        Command::Budget { command } => match command {
            BudgetCommand::Add(fields) => emit(budgets::create(state, fields.into()).await),
            BudgetCommand::Update { id, fields } => {
                emit(budgets::update(state, id, fields.into()).await)
            }
            BudgetCommand::Delete { id } => emit(budgets::delete(state, id).await),
        },
        Command::Summary { month } => emit(summary::summary(state, month).await),
        Command::Overview { month } => emit(summary::overview(state, month).await),
    }
}

fn emit<T: Serialize>(result: CommandResult<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}
