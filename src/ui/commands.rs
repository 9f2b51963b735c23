use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Store};
use crate::models::{Category, ExpenseDraft, ValidationError};
use crate::view;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Store) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit MonthSpend", cmd_quit, r);
    register_command!("quit", "Quit MonthSpend", cmd_quit, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 12.50 food lunch)",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (e.g. :a 12.50 food lunch)", cmd_add, r);
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!("del", "Delete selected expense", cmd_delete, r);
    register_command!("categories", "List categories", cmd_categories, r);
    register_command!("c", "List categories", cmd_categories, r);
    register_command!("refresh", "Reload expenses from storage", cmd_refresh, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, store)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split `<amount> <category> [note...]` into a draft.
pub(crate) fn parse_add_args(args: &str) -> Option<ExpenseDraft> {
    let mut parts = args.split_whitespace();
    let amount = parts.next()?;
    let category = parts.next()?;
    let note = parts.collect::<Vec<_>>().join(" ");
    Some(ExpenseDraft::new(amount, category, &note))
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some(draft) = parse_add_args(args) else {
        app.set_status("Usage: :add <amount> <category> [note]");
        return Ok(());
    };

    match store.create(&draft, chrono::Utc::now()) {
        Ok(record) => {
            app.refresh(store)?;
            app.select_id(record.id);
            app.set_status(format!(
                "Added {} {} {}",
                record.category.glyph(),
                record.label(),
                view::format_amount(record.amount, &app.currency_symbol)
            ));
            Ok(())
        }
        Err(e) => match e.downcast_ref::<ValidationError>() {
            Some(invalid) => {
                app.set_status(invalid.to_string());
                Ok(())
            }
            None => Err(e),
        },
    }
}

fn cmd_delete(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    let Some(item) = app.selected().cloned() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let label = format!("{} {}", item.glyph, item.label);
    app.confirm_message = format!("Delete '{label}' ({})?", item.amount);
    app.pending_action = Some(PendingAction::DeleteExpense { id: item.id, label });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    let names: Vec<String> = Category::all()
        .iter()
        .map(|c| format!("{} {}", c.glyph(), c.key()))
        .collect();
    app.set_status(format!("Categories: {}", names.join("  ")));
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.refresh(store)?;
    app.set_status(format!("{} expenses this month", app.list.len()));
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

/// Run the confirmed pending action, if any.
pub(crate) fn confirm_pending(app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if let Some(action) = app.pending_action.take() {
        match action {
            PendingAction::DeleteExpense { id, label } => {
                if store.delete_by_id(id)? {
                    app.set_status(format!("Deleted: {label}"));
                } else {
                    app.set_status(format!("No expense with id {id}"));
                }
                app.refresh(store)?;
            }
        }
    }
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    Ok(())
}

pub(crate) fn cancel_pending(app: &mut App) {
    app.pending_action = None;
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    app.set_status("Cancelled");
}
