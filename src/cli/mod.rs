//! Line-oriented shell that drives a [`BudgetStore`](crate::core::BudgetStore).
//!
//! The shell only translates commands into intents and renders selectors; all
//! budget arithmetic stays inside the store.

mod commands;
mod context;
mod errors;
pub mod output;
mod shell;

pub use context::{CliMode, ShellContext};
pub use errors::{CliError, CommandError};
pub use shell::run_cli;
