//! Command table and handlers. Each handler maps its arguments onto one
//! intent, dispatches it, and renders the result.

use chrono::{Local, NaiveDate};

use crate::cli::context::{LoopControl, ShellContext};
use crate::cli::errors::CommandError;
use crate::cli::output;
use crate::core::{Intent, Outcome};
use crate::currency::format_date;
use crate::domain::{CategoryId, DraftExpense, NamedEntity};

type Handler = fn(&mut ShellContext, &[&str]) -> Result<LoopControl, CommandError>;

pub(crate) struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

pub(crate) const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "budget",
        aliases: &[],
        usage: "budget <amount>",
        summary: "Define the spending budget",
        handler: cmd_budget,
    },
    CommandSpec {
        name: "add",
        aliases: &[],
        usage: "add <name> <amount> <category> [YYYY-MM-DD]",
        summary: "Record an expense (date defaults to today)",
        handler: cmd_add,
    },
    CommandSpec {
        name: "edit",
        aliases: &[],
        usage: "edit <n|id>",
        summary: "Load an expense into the form for editing",
        handler: cmd_edit,
    },
    CommandSpec {
        name: "update",
        aliases: &["save"],
        usage: "update <name|-> [amount|-] [category|-] [date|-]",
        summary: "Save changes to the expense being edited (`-` keeps a field)",
        handler: cmd_update,
    },
    CommandSpec {
        name: "cancel",
        aliases: &[],
        usage: "cancel",
        summary: "Stop editing without saving",
        handler: cmd_cancel,
    },
    CommandSpec {
        name: "remove",
        aliases: &["rm", "delete"],
        usage: "remove <n|id>",
        summary: "Delete an expense",
        handler: cmd_remove,
    },
    CommandSpec {
        name: "filter",
        aliases: &[],
        usage: "filter <category|all>",
        summary: "Show only expenses of one category",
        handler: cmd_filter,
    },
    CommandSpec {
        name: "list",
        aliases: &["ls"],
        usage: "list",
        summary: "List the visible expenses",
        handler: cmd_list,
    },
    CommandSpec {
        name: "summary",
        aliases: &[],
        usage: "summary",
        summary: "Show budget, spent and remaining amounts",
        handler: cmd_summary,
    },
    CommandSpec {
        name: "categories",
        aliases: &[],
        usage: "categories",
        summary: "List the category catalog",
        handler: cmd_categories,
    },
    CommandSpec {
        name: "reset",
        aliases: &[],
        usage: "reset",
        summary: "Clear the budget and every expense",
        handler: cmd_reset,
    },
    CommandSpec {
        name: "config",
        aliases: &[],
        usage: "config [show | set <currency|locale|color> <value>]",
        summary: "Show or change display preferences",
        handler: cmd_config,
    },
    CommandSpec {
        name: "version",
        aliases: &[],
        usage: "version",
        summary: "Print build information",
        handler: cmd_version,
    },
    CommandSpec {
        name: "help",
        aliases: &["?"],
        usage: "help",
        summary: "Show this help",
        handler: cmd_help,
    },
    CommandSpec {
        name: "exit",
        aliases: &["quit"],
        usage: "exit",
        summary: "Leave the shell",
        handler: cmd_exit,
    },
];

pub(crate) fn find(command: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == command || spec.aliases.contains(&command))
}

fn usage(name: &str) -> CommandError {
    let usage = find(name).map_or(name, |spec| spec.usage);
    CommandError::InvalidArguments(format!("Usage: {}", usage))
}

fn keeps(raw: &str) -> bool {
    raw == "-"
}

/// Unparseable input becomes NaN so the store reports it as invalid.
fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_category(ctx: &ShellContext, raw: &str) -> CategoryId {
    ctx.store
        .catalog()
        .resolve(raw)
        .map(|category| category.id.clone())
        .unwrap_or_else(|| CategoryId::new(raw.trim()))
}

/// Builds a draft from positional arguments layered over `base`.
fn read_draft(ctx: &ShellContext, args: &[&str], base: DraftExpense) -> DraftExpense {
    let mut draft = base;
    if let Some(raw) = args.first().filter(|raw| !keeps(raw)) {
        draft.expense_name = raw.to_string();
    }
    if let Some(raw) = args.get(1).filter(|raw| !keeps(raw)) {
        draft.amount = parse_amount(raw);
    }
    if let Some(raw) = args.get(2).filter(|raw| !keeps(raw)) {
        draft.category = parse_category(ctx, raw);
    }
    if let Some(raw) = args.get(3).filter(|raw| !keeps(raw)) {
        draft.date = parse_date(raw);
    }
    draft
}

fn cmd_budget(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [raw] = args else {
        return Err(usage("budget"));
    };
    let amount = parse_amount(raw);
    ctx.store.dispatch(Intent::SetBudget(amount))?;
    output::success(format!("Budget set to {}.", ctx.money(amount)));
    Ok(LoopControl::Continue)
}

fn cmd_add(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    if !(3..=4).contains(&args.len()) {
        return Err(usage("add"));
    }
    let base = DraftExpense {
        date: Some(Local::now().date_naive()),
        ..DraftExpense::default()
    };
    let draft = read_draft(ctx, args, base);
    if let Outcome::ExpenseAdded(id) = ctx.store.dispatch(Intent::AddExpense(draft))? {
        let name = ctx
            .store
            .state()
            .expense(id)
            .map(|expense| expense.expense_name.clone())
            .unwrap_or_default();
        output::success(format!("Expense `{}` recorded ({}).", name, id.short()));
        output::info(format!("Remaining: {}", ctx.money(ctx.store.remaining_budget())));
    }
    Ok(LoopControl::Continue)
}

fn cmd_edit(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [reference] = args else {
        return Err(usage("edit"));
    };
    let id = ctx
        .resolve_expense(reference)
        .ok_or_else(|| CommandError::Message(format!("No expense matches `{}`.", reference)))?;
    ctx.store.dispatch(Intent::BeginEdit(id))?;
    if let Some(expense) = ctx.store.editing_expense() {
        output::info(format!(
            "Editing `{}`: {} in {} on {}.",
            expense.expense_name,
            ctx.money(expense.amount),
            expense.category,
            expense.date
        ));
        output::hint("Use `update` to save changes (`-` keeps a field) or `cancel`.");
    }
    Ok(LoopControl::Continue)
}

fn cmd_update(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    if !(1..=4).contains(&args.len()) {
        return Err(usage("update"));
    }
    let Some(current) = ctx.store.editing_expense() else {
        return Err(CommandError::Message(
            "No expense is being edited. Use `edit <n>` first.".into(),
        ));
    };
    let id = current.id;
    let base = DraftExpense::from(current);
    let draft = read_draft(ctx, args, base);
    ctx.store.dispatch(Intent::UpdateExpense { id, draft })?;
    if let Some(expense) = ctx.store.state().expense(id) {
        output::success(format!("Expense `{}` updated.", expense.expense_name));
    }
    output::info(format!("Remaining: {}", ctx.money(ctx.store.remaining_budget())));
    Ok(LoopControl::Continue)
}

fn cmd_cancel(ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    match ctx.store.dispatch(Intent::CancelEdit)? {
        Outcome::EditCancelled => output::success("Edit cancelled."),
        _ => output::info("Nothing is being edited."),
    }
    Ok(LoopControl::Continue)
}

fn cmd_remove(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [reference] = args else {
        return Err(usage("remove"));
    };
    let id = ctx
        .resolve_expense(reference)
        .ok_or_else(|| CommandError::Message(format!("No expense matches `{}`.", reference)))?;
    if let Outcome::ExpenseRemoved(expense) = ctx.store.dispatch(Intent::RemoveExpense(id))? {
        output::success(format!("Expense `{}` removed.", expense.expense_name));
    }
    Ok(LoopControl::Continue)
}

fn cmd_filter(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [raw] = args else {
        return Err(usage("filter"));
    };
    let category = match raw.to_ascii_lowercase().as_str() {
        "all" | "none" => None,
        _ => {
            let category = ctx.store.catalog().resolve(raw).ok_or_else(|| {
                CommandError::InvalidArguments(format!("Unknown category `{}`.", raw))
            })?;
            Some(category.id.clone())
        }
    };
    ctx.store.dispatch(Intent::SetCategoryFilter(category))?;
    match ctx.store.state().current_category.as_ref() {
        Some(id) => {
            let name = ctx.store.catalog().find(id).map_or(id.as_str(), |c| c.name.as_str());
            output::success(format!("Showing {} expenses.", name));
        }
        None => output::success("Showing all expenses."),
    }
    Ok(LoopControl::Continue)
}

fn cmd_list(ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    let visible = ctx.store.visible_expenses();
    if visible.is_empty() {
        output::info("No expenses.");
        return Ok(LoopControl::Continue);
    }
    output::section("Expenses");
    let editing = ctx.store.state().editing_id;
    for (index, expense) in visible.iter().enumerate() {
        let category = ctx
            .store
            .category_of(expense)
            .map_or(expense.category.as_str(), |c| c.name.as_str());
        let marker = if editing == Some(expense.id) { '*' } else { ' ' };
        output::line(format!(
            "{}{:>3}. {:<24} {:<22} {:>14}  {}  {}",
            marker,
            index + 1,
            expense.expense_name,
            category,
            ctx.money(expense.amount),
            format_date(&ctx.config.locale, expense.date),
            expense.id.short()
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_summary(ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    let store = &ctx.store;
    output::section("Summary");
    output::line(format!("Budget:    {}", ctx.money(store.budget())));
    output::line(format!("Spent:     {}", ctx.money(store.total_spent())));
    output::line(format!("Remaining: {}", ctx.money(store.remaining_budget())));
    output::line(format!("Used:      {:.1}%", store.spent_percentage()));
    Ok(LoopControl::Continue)
}

fn cmd_categories(ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    output::section("Categories");
    for category in ctx.store.catalog().iter() {
        output::line(format!(
            "  {:<16} {:<24} icon: {}",
            category.id,
            category.name(),
            category.icon
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_reset(ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    ctx.store.dispatch(Intent::Reset)?;
    output::success("Budget and expenses cleared.");
    Ok(LoopControl::Continue)
}

fn cmd_config(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            output::line(format!("currency: {}", ctx.config.currency));
            output::line(format!("locale:   {}", ctx.config.locale.language_tag));
            output::line(format!(
                "color:    {}",
                if ctx.config.ui_color_enabled { "on" } else { "off" }
            ));
            output::line(format!(
                "file:     {}",
                ctx.config_manager.config_path().display()
            ));
        }
        ["set", key, value] => {
            ctx.config
                .set(key, value)
                .map_err(CommandError::InvalidArguments)?;
            ctx.config_manager.save(&ctx.config)?;
            if *key == "color" && !ctx.config.ui_color_enabled {
                colored::control::set_override(false);
            }
            output::success(format!("Setting `{}` updated.", key));
        }
        _ => return Err(usage("config")),
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    output::info(format!(
        "budget_store {} ({}, {} build, {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUDGET_STORE_BUILD_HASH"),
        env!("BUDGET_STORE_BUILD_PROFILE"),
        env!("BUDGET_STORE_BUILD_TIMESTAMP")
    ));
    Ok(LoopControl::Continue)
}

fn cmd_help(_ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    output::section("Commands");
    for spec in COMMANDS {
        output::line(format!("  {:<52} {}", spec.usage, spec.summary));
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> Result<LoopControl, CommandError> {
    Ok(LoopControl::Exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::CliMode;
    use crate::config::{Config, ConfigManager};

    fn context() -> (ShellContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        let ctx = ShellContext::with_config(CliMode::Script, Config::default(), manager);
        (ctx, dir)
    }

    #[test]
    fn find_matches_aliases() {
        assert_eq!(find("rm").map(|spec| spec.name), Some("remove"));
        assert_eq!(find("quit").map(|spec| spec.name), Some("exit"));
        assert!(find("frobnicate").is_none());
    }

    #[test]
    fn add_resolves_category_names() {
        let (mut ctx, _dir) = context();
        cmd_budget(&mut ctx, &["100"]).unwrap();
        cmd_add(&mut ctx, &["Lunch", "12.5", "Food", "2024-03-01"]).unwrap();
        let expense = &ctx.store.expenses()[0];
        assert_eq!(expense.category.as_str(), "food");
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn unparseable_amount_is_reported_by_store() {
        let (mut ctx, _dir) = context();
        let err = cmd_budget(&mut ctx, &["lots"]).unwrap_err();
        assert!(matches!(err, CommandError::Validation(ref e) if e.kind() == "invalid-budget"));
    }

    #[test]
    fn update_keeps_fields_marked_with_dash() {
        let (mut ctx, _dir) = context();
        cmd_budget(&mut ctx, &["100"]).unwrap();
        cmd_add(&mut ctx, &["Cinema", "20", "leisure", "2024-03-02"]).unwrap();
        cmd_edit(&mut ctx, &["1"]).unwrap();
        cmd_update(&mut ctx, &["-", "35"]).unwrap();

        let expense = &ctx.store.expenses()[0];
        assert_eq!(expense.expense_name, "Cinema");
        assert_eq!(expense.amount, 35.0);
        assert_eq!(expense.category.as_str(), "leisure");
        assert!(ctx.store.state().editing_id.is_none());
    }

    #[test]
    fn update_without_edit_is_refused() {
        let (mut ctx, _dir) = context();
        cmd_budget(&mut ctx, &["100"]).unwrap();
        assert!(matches!(
            cmd_update(&mut ctx, &["Gym", "10", "health"]),
            Err(CommandError::Message(_))
        ));
    }

    #[test]
    fn filter_rejects_unknown_category() {
        let (mut ctx, _dir) = context();
        assert!(matches!(
            cmd_filter(&mut ctx, &["transport"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(ctx.store.state().current_category.is_none());
    }
}
