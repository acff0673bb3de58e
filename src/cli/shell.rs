//! Line editor front end and the stdin script runner.

use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::commands::{self, COMMANDS};
use crate::cli::context::{CliMode, LoopControl, ShellContext};
use crate::cli::errors::{CliError, CommandError};
use crate::cli::output;
use crate::domain::NamedEntity;

const SCRIPT_ENV: &str = "BUDGET_STORE_CLI_SCRIPT";

const CONFIG_KEYS: &[&str] = &["currency", "locale", "color"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode);

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<BudgetHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(BudgetHelper::default()));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Type `help` to list commands. Start with `budget <amount>`.");

    while context.running {
        // Positions and categories shift after every command.
        if let Some(helper) = editor.helper_mut() {
            helper.refresh(context);
        }

        let prompt = context.prompt();
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) if context.store().edit_mode().is_editing() => {
                run_line(context, "cancel")?;
                continue;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed).ok();

        if run_line(context, trimmed)? == LoopControl::Exit {
            break;
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        if !context.running {
            break;
        }
        let line = line?;
        if let Err(err) = parse_command_line(&line) {
            output::warning(format!("line {}: {}", index + 1, err));
            continue;
        }
        if run_line(context, &line)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Runs one line, reporting command failures without ending the session.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&command, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// What the argument under the cursor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentKind {
    Category,
    CategoryOrAll,
    Expense,
    ConfigAction,
    ConfigKey,
    Toggle,
    Free,
}

fn argument_kind(command: &str, previous: &[String]) -> ArgumentKind {
    let Some(spec) = commands::find(command) else {
        return ArgumentKind::Free;
    };
    match (spec.name, previous) {
        ("add" | "update", [_, _]) => ArgumentKind::Category,
        ("filter", []) => ArgumentKind::CategoryOrAll,
        ("edit" | "remove", []) => ArgumentKind::Expense,
        ("config", []) => ArgumentKind::ConfigAction,
        ("config", [action]) if action == "set" => ArgumentKind::ConfigKey,
        ("config", [_, key]) if key == "color" => ArgumentKind::Toggle,
        _ => ArgumentKind::Free,
    }
}

/// Completion and hints fed from the live session.
#[derive(Debug, Default)]
struct BudgetHelper {
    commands: Vec<String>,
    categories: Vec<String>,
    /// `(position, expense name)` for every visible expense.
    expenses: Vec<(String, String)>,
}

impl BudgetHelper {
    fn refresh(&mut self, context: &ShellContext) {
        let store = context.store();
        self.commands = command_words();
        self.categories = store
            .catalog()
            .iter()
            .map(|category| category.id.as_str().to_string())
            .collect();
        self.expenses = store
            .visible_expenses()
            .iter()
            .enumerate()
            .map(|(index, expense)| ((index + 1).to_string(), expense.name().to_string()))
            .collect();
    }

    fn candidates(&self, prefix: &str) -> (usize, Vec<Pair>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();

        let Ok(previous) = split(&prefix[..start]) else {
            return (start, Vec::new());
        };
        let Some((command, args)) = previous.split_first() else {
            return (start, words_matching(&self.commands, &needle));
        };

        let pairs = match argument_kind(&command.to_ascii_lowercase(), args) {
            ArgumentKind::Category => words_matching(&self.categories, &needle),
            ArgumentKind::CategoryOrAll => {
                let mut pairs = words_matching(&self.categories, &needle);
                if "all".starts_with(&needle) {
                    pairs.push(plain("all"));
                }
                pairs
            }
            ArgumentKind::Expense => self
                .expenses
                .iter()
                .filter(|(position, _)| position.starts_with(&needle))
                .map(|(position, name)| Pair {
                    display: format!("{position}  {name}"),
                    replacement: position.clone(),
                })
                .collect(),
            ArgumentKind::ConfigAction => static_matching(&["show", "set"], &needle),
            ArgumentKind::ConfigKey => static_matching(CONFIG_KEYS, &needle),
            ArgumentKind::Toggle => static_matching(&["on", "off"], &needle),
            ArgumentKind::Free => Vec::new(),
        };
        (start, pairs)
    }

    /// Remaining usage text once a complete command word and a space are typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let command = line.strip_suffix(' ')?;
        if command.contains(char::is_whitespace) {
            return None;
        }
        let spec = commands::find(&command.to_ascii_lowercase())?;
        let rest = spec.usage.split_once(' ')?.1;
        Some(rest.to_string())
    }
}

fn command_words() -> Vec<String> {
    let mut words: Vec<String> = COMMANDS
        .iter()
        .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
        .filter(|word| word.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_string)
        .collect();
    words.sort();
    words.dedup();
    words
}

fn plain(word: &str) -> Pair {
    Pair {
        display: word.to_string(),
        replacement: word.to_string(),
    }
}

fn words_matching(words: &[String], needle: &str) -> Vec<Pair> {
    words
        .iter()
        .filter(|word| word.to_ascii_lowercase().starts_with(needle))
        .map(|word| plain(word))
        .collect()
}

fn static_matching(words: &[&str], needle: &str) -> Vec<Pair> {
    words
        .iter()
        .filter(|word| word.starts_with(needle))
        .map(|word| plain(word))
        .collect()
}

impl Helper for BudgetHelper {}

impl Completer for BudgetHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

impl Hinter for BudgetHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for BudgetHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for BudgetHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigManager};
    use crate::core::Intent;
    use crate::domain::DraftExpense;
    use chrono::NaiveDate;

    fn session() -> (ShellContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        let mut ctx = ShellContext::with_config(CliMode::Script, Config::default(), manager);
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        ctx.store.dispatch(Intent::SetBudget(100.0)).unwrap();
        ctx.store
            .dispatch(Intent::AddExpense(DraftExpense::new("Market", 10.0, "food", date)))
            .unwrap();
        ctx.store
            .dispatch(Intent::AddExpense(DraftExpense::new("Cinema", 8.0, "leisure", date)))
            .unwrap();
        (ctx, dir)
    }

    fn helper() -> (BudgetHelper, tempfile::TempDir) {
        let (ctx, dir) = session();
        let mut helper = BudgetHelper::default();
        helper.refresh(&ctx);
        (helper, dir)
    }

    fn replacements(pairs: &[Pair]) -> Vec<&str> {
        pairs.iter().map(|pair| pair.replacement.as_str()).collect()
    }

    #[test]
    fn quoted_names_stay_together() {
        let tokens = parse_command_line(r#"add "Weekly groceries" 54.20 food"#).unwrap();
        assert_eq!(tokens, ["add", "Weekly groceries", "54.20", "food"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"add "Lunch 12 food"#).is_err());
    }

    #[test]
    fn command_word_completes_names_and_aliases() {
        let (helper, _dir) = helper();
        let (start, pairs) = helper.candidates("re");
        assert_eq!(start, 0);
        assert_eq!(replacements(&pairs), ["remove", "reset"]);
        assert_eq!(replacements(&helper.candidates("rm").1), ["rm"]);
    }

    #[test]
    fn category_argument_completes_from_catalog() {
        let (helper, _dir) = helper();
        let (start, pairs) = helper.candidates(r#"add "Bus ticket" 3 h"#);
        assert_eq!(start, 19);
        assert_eq!(replacements(&pairs), ["home", "health"]);

        assert!(helper.candidates("add Bus he").1.is_empty());
    }

    #[test]
    fn filter_offers_all_alongside_categories() {
        let (helper, _dir) = helper();
        let pairs = helper.candidates("filter ").1;
        assert!(replacements(&pairs).contains(&"all"));
        assert!(replacements(&pairs).contains(&"food"));
    }

    #[test]
    fn expense_argument_completes_visible_positions() {
        let (mut ctx, _dir) = session();
        let mut helper = BudgetHelper::default();
        helper.refresh(&ctx);
        let pairs = helper.candidates("edit ").1;
        assert_eq!(replacements(&pairs), ["1", "2"]);
        assert_eq!(pairs[1].display, "2  Cinema");

        ctx.store
            .dispatch(Intent::SetCategoryFilter(Some("leisure".into())))
            .unwrap();
        helper.refresh(&ctx);
        let pairs = helper.candidates("rm ").1;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].display, "1  Cinema");
    }

    #[test]
    fn config_arguments_follow_the_subcommand() {
        let (helper, _dir) = helper();
        assert_eq!(replacements(&helper.candidates("config s").1), ["show", "set"]);
        assert_eq!(replacements(&helper.candidates("config set c").1), ["currency", "color"]);
        assert_eq!(replacements(&helper.candidates("config set color o").1), ["on", "off"]);
    }

    #[test]
    fn usage_hint_appears_after_command_word() {
        let (helper, _dir) = helper();
        assert_eq!(helper.usage_hint("budget ").as_deref(), Some("<amount>"));
        assert_eq!(helper.usage_hint("rm ").as_deref(), Some("<n|id>"));
        assert_eq!(helper.usage_hint("budget 10 "), None);
        assert_eq!(helper.usage_hint("list "), None);
    }

    #[test]
    fn failing_command_keeps_session_running() {
        let (mut ctx, _dir) = session();
        let control = run_line(&mut ctx, "add Laptop 500 food 2025-04-02").unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert!(ctx.running);
        assert_eq!(ctx.store().expenses().len(), 2);

        assert_eq!(run_line(&mut ctx, "exit").unwrap(), LoopControl::Exit);
        assert!(!ctx.running);
    }
}
