//! Display structures built from aggregator output.
//!
//! Nothing here touches the terminal; the TUI and CLI both draw from these.

use chrono::{DateTime, Local, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::models::{Category, ExpenseRecord};

pub(crate) const EMPTY_PLACEHOLDER: &str = "No expenses yet";

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` with `"$"` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    let abs = val.abs().round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

pub(crate) fn format_total(total: Decimal, symbol: &str) -> String {
    format_amount(total, symbol)
}

/// Day of month and abbreviated month in local time, e.g. `"19 Oct"`.
pub(crate) fn short_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%-d %b").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListItem {
    pub(crate) id: i64,
    pub(crate) glyph: &'static str,
    pub(crate) label: String,
    pub(crate) date: String,
    pub(crate) amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListView {
    Empty,
    Items(Vec<ListItem>),
}

impl ListView {
    pub(crate) fn items(&self) -> &[ListItem] {
        match self {
            Self::Empty => &[],
            Self::Items(items) => items,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items().len()
    }
}

/// Most recent first. Records with equal dates keep their stored order.
pub(crate) fn list_view(records: &[ExpenseRecord], symbol: &str) -> ListView {
    if records.is_empty() {
        return ListView::Empty;
    }
    let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    ListView::Items(
        sorted
            .into_iter()
            .map(|r| ListItem {
                id: r.id,
                glyph: r.category.glyph(),
                label: r.label().to_string(),
                date: short_date(r.date),
                amount: format_amount(r.amount, symbol),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChartSlice {
    pub(crate) category: Category,
    /// Glyph plus capitalized name, e.g. `"🍔 Food"`.
    pub(crate) label: String,
    pub(crate) value: Decimal,
    pub(crate) color: (u8, u8, u8),
    /// Share of the chart total, one decimal place.
    pub(crate) percent: Decimal,
}

impl ChartSlice {
    /// Tooltip text: amount and share, e.g. `"$50.00 (71.4%)"`.
    pub(crate) fn annotation(&self, symbol: &str) -> String {
        format!("{} ({:.1}%)", format_amount(self.value, symbol), self.percent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChartDataset {
    pub(crate) slices: Vec<ChartSlice>,
}

impl ChartDataset {
    pub(crate) fn total(&self) -> Decimal {
        sum_capped(self.slices.iter().map(|s| s.value))
    }
}

/// One slice per category present. `None` when there is nothing to chart.
pub(crate) fn chart_dataset(totals: &BTreeMap<Category, Decimal>) -> Option<ChartDataset> {
    if totals.is_empty() {
        return None;
    }
    let sum = sum_capped(totals.values().copied());
    let slices = totals
        .iter()
        .map(|(category, value)| ChartSlice {
            category: *category,
            label: format!("{} {}", category.glyph(), category.name()),
            value: *value,
            color: category.color(),
            percent: percent_of(*value, sum),
        })
        .collect();
    Some(ChartDataset { slices })
}

fn sum_capped(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.checked_add(v).unwrap_or(Decimal::MAX))
}

fn percent_of(value: Decimal, sum: Decimal) -> Decimal {
    if sum.is_zero() {
        return Decimal::ZERO;
    }
    (value / sum * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests;
