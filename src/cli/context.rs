use strsim::levenshtein;
use tracing::warn;

use crate::cli::commands::{self, CommandSpec, COMMANDS};
use crate::cli::errors::{CliError, CommandError};
use crate::cli::output;
use crate::config::{Config, ConfigManager};
use crate::core::{BudgetStore, EditMode};
use crate::currency::format_currency;
use crate::domain::{Expense, ExpenseId, NamedEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Shell session: the store plus the preferences used to render it.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub(crate) store: BudgetStore,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Self {
        let config_manager = ConfigManager::from_env();
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_manager.config_path().display(), "config unreadable: {err}");
                output::warning(format!("Could not read configuration ({err}); using defaults."));
                Config::default()
            }
        };
        Self::with_config(mode, config, config_manager)
    }

    pub fn with_config(mode: CliMode, config: Config, config_manager: ConfigManager) -> Self {
        if mode == CliMode::Script || !config.ui_color_enabled {
            colored::control::set_override(false);
        }
        let store = BudgetStore::new(config.categories.clone());
        Self {
            mode,
            running: true,
            store,
            config,
            config_manager,
        }
    }

    pub fn store(&self) -> &BudgetStore {
        &self.store
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match commands::find(command) {
            Some(spec) => (spec.handler)(self, args),
            None => {
                self.suggest_command(command);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub fn prompt(&self) -> String {
        match self.store.edit_mode() {
            EditMode::Editing(_) => {
                let name = self
                    .store
                    .editing_expense()
                    .map(|expense| expense.name())
                    .unwrap_or("?");
                format!("budget (editing {})> ", name)
            }
            EditMode::Idle if self.store.is_budget_defined() => {
                format!("budget [{} left]> ", self.money(self.store.remaining_budget()))
            }
            EditMode::Idle => "budget> ".to_string(),
        }
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.config.currency, &self.config.locale)
    }

    /// Resolves a 1-based position in the visible list or an id prefix.
    pub(crate) fn resolve_expense(&self, reference: &str) -> Option<ExpenseId> {
        let reference = reference.trim();
        if let Ok(position) = reference.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| self.store.visible_expenses().get(index).map(|e| e.id));
        }
        if reference.len() < 4 {
            return None;
        }
        let needle = reference.to_ascii_lowercase();
        let matches: Vec<&Expense> = self
            .store
            .expenses()
            .iter()
            .filter(|expense| {
                expense.id.to_string().starts_with(&needle)
                    || expense.id.as_uuid().simple().to_string().starts_with(&needle)
            })
            .collect();
        match matches.as_slice() {
            [only] => Some(only.id),
            _ => None,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = COMMANDS
            .iter()
            .map(|spec: &CommandSpec| (levenshtein(spec.name, input), spec.name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 2 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help` for usage details.");
            }
            CommandError::Validation(err) => {
                output::error(format!("{} ({})", err, err.kind()));
            }
            other => output::error(other),
        }
        Ok(())
    }
}
