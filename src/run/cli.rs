use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::aggregate::{MonthlyAggregator, SystemClock};
use crate::config::Config;
use crate::models::Category;
use crate::ui::app::Store;
use crate::ui::commands::parse_add_args;
use crate::view::{self, ListView};

pub(crate) fn as_cli(args: &[String], store: &mut Store, config: &Config) -> Result<()> {
    let symbol = config.currency_symbol.as_str();
    let rest = args.get(2..).unwrap_or_default();
    match args.get(1).map(String::as_str).unwrap_or("help") {
        "add" | "a" => cli_add(rest, store, symbol),
        "list" | "ls" => cli_list(store, symbol),
        "summary" | "s" => cli_summary(store, symbol),
        "delete" | "rm" => cli_delete(rest, store, symbol),
        "categories" => {
            cli_categories();
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("monthspend {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("MonthSpend — local-only personal expense tracker");
    println!();
    println!("Usage: monthspend [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  add <amount> <category> [note]  Record an expense");
    println!("  list                            List this month's expenses, newest first");
    println!("  summary                         Print this month's total and category breakdown");
    println!("  delete <id>                     Delete an expense (asks for confirmation)");
    println!("    --yes, -y                     Skip the confirmation prompt");
    println!("  categories                      List the available categories");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

fn cli_add(args: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let draft = parse_add_args(&args.join(" "))
        .ok_or_else(|| anyhow::anyhow!("Usage: monthspend add <amount> <category> [note]"))?;
    let record = store.create(&draft, chrono::Utc::now())?;
    println!(
        "Added #{} {} {} {}",
        record.id,
        record.category.glyph(),
        record.label(),
        view::format_amount(record.amount, symbol)
    );
    Ok(())
}

fn cli_list(store: &Store, symbol: &str) -> Result<()> {
    let expenses = MonthlyAggregator::new(store, &SystemClock).current_month_expenses()?;
    match view::list_view(&expenses, symbol) {
        ListView::Empty => println!("{}", view::EMPTY_PLACEHOLDER),
        ListView::Items(items) => {
            println!("{:<15} {:<8} {:<3} {:<24} {:>12}", "ID", "Date", "", "Expense", "Amount");
            println!("{}", "─".repeat(66));
            for item in &items {
                println!(
                    "{:<15} {:<8} {:<2} {:<24} {:>12}",
                    item.id,
                    item.date,
                    item.glyph,
                    crate::ui::util::truncate(&item.label, 24),
                    item.amount
                );
            }
        }
    }
    Ok(())
}

fn cli_summary(store: &Store, symbol: &str) -> Result<()> {
    let snapshot = MonthlyAggregator::new(store, &SystemClock).snapshot()?;

    println!("MonthSpend: {}", snapshot.month_label);
    println!("{}", "─".repeat(40));
    println!("  Total:      {}", view::format_total(snapshot.total, symbol));
    println!("  Expenses:   {}", snapshot.expenses.len());

    if let Some(chart) = view::chart_dataset(&snapshot.by_category) {
        println!();
        println!("By Category:");
        for slice in &chart.slices {
            println!(
                "  {:<20} {:>12} {:>7}%",
                slice.label,
                view::format_amount(slice.value, symbol),
                format!("{:.1}", slice.percent)
            );
        }
        println!("  {:<19} {:>12}", "", view::format_amount(chart.total(), symbol));
    }

    Ok(())
}

fn cli_delete(args: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let skip_prompt = args.iter().any(|a| a == "--yes" || a == "-y");
    let id_arg = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .ok_or_else(|| anyhow::anyhow!("Usage: monthspend delete <id> [--yes]"))?;
    let id: i64 = id_arg
        .parse()
        .with_context(|| format!("Invalid id: {id_arg}"))?;

    let Some(record) = store.get(id)? else {
        println!("No expense with id {id}");
        return Ok(());
    };

    let prompt = format!(
        "Delete {} {} {} ({})?",
        record.category.glyph(),
        record.label(),
        view::format_amount(record.amount, symbol),
        view::short_date(record.date)
    );
    if !skip_prompt && !confirm(&prompt, &mut io::stdin().lock())? {
        println!("Cancelled");
        return Ok(());
    }

    if store.delete_by_id(id)? {
        println!("Deleted #{id}");
    }
    Ok(())
}

fn cli_categories() {
    for c in Category::all() {
        println!("  {} {:<15} {}", c.glyph(), c.key(), c.name());
    }
}

/// Ask a yes/no question; anything but "y"/"yes" is a no.
fn confirm(prompt: &str, input: &mut impl BufRead) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
