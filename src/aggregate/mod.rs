use anyhow::Result;
use chrono::{DateTime, Datelike, Local};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{Category, ExpenseRecord};
use crate::store::{ExpenseStore, SlotBackend};

/// Source of "now". Read on every query, never cached.
pub(crate) trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Everything the dashboard needs, taken from a single read of the store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthSnapshot {
    /// e.g. "October 2026"
    pub(crate) month_label: String,
    pub(crate) expenses: Vec<ExpenseRecord>,
    pub(crate) total: Decimal,
    pub(crate) by_category: BTreeMap<Category, Decimal>,
    /// All-time record count.
    pub(crate) stored_count: usize,
}

/// Current-month views over an [`ExpenseStore`].
pub(crate) struct MonthlyAggregator<'a, B: SlotBackend, C: Clock> {
    store: &'a ExpenseStore<B>,
    clock: &'a C,
}

impl<'a, B: SlotBackend, C: Clock> MonthlyAggregator<'a, B, C> {
    pub(crate) fn new(store: &'a ExpenseStore<B>, clock: &'a C) -> Self {
        Self { store, clock }
    }

    pub(crate) fn current_month_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let now = self.clock.now();
        Ok(filter_month(self.store.list_all()?, &now))
    }

    pub(crate) fn month_total(&self) -> Result<Decimal> {
        Ok(total(&self.current_month_expenses()?))
    }

    pub(crate) fn category_totals(&self) -> Result<BTreeMap<Category, Decimal>> {
        Ok(totals_by_category(&self.current_month_expenses()?))
    }

    pub(crate) fn snapshot(&self) -> Result<MonthSnapshot> {
        let now = self.clock.now();
        let all = self.store.list_all()?;
        let stored_count = all.len();
        let expenses = filter_month(all, &now);
        Ok(MonthSnapshot {
            month_label: now.format("%B %Y").to_string(),
            total: total(&expenses),
            by_category: totals_by_category(&expenses),
            expenses,
            stored_count,
        })
    }
}

/// Whether `record` falls in the local calendar month and year of `now`.
pub(crate) fn in_month(record: &ExpenseRecord, now: &DateTime<Local>) -> bool {
    let local = record.date.with_timezone(&Local);
    local.year() == now.year() && local.month() == now.month()
}

fn filter_month(records: Vec<ExpenseRecord>, now: &DateTime<Local>) -> Vec<ExpenseRecord> {
    records.into_iter().filter(|r| in_month(r, now)).collect()
}

/// Sum of amounts. Saturates at `Decimal::MAX` instead of overflowing.
pub(crate) fn total(records: &[ExpenseRecord]) -> Decimal {
    records
        .iter()
        .fold(Decimal::ZERO, |acc, r| add_amount(acc, r.amount))
}

/// Sum per category. Categories without records are absent.
pub(crate) fn totals_by_category(records: &[ExpenseRecord]) -> BTreeMap<Category, Decimal> {
    let mut totals = BTreeMap::new();
    for r in records {
        let sum = totals.entry(r.category).or_insert(Decimal::ZERO);
        *sum = add_amount(*sum, r.amount);
    }
    totals
}

fn add_amount(acc: Decimal, amount: Decimal) -> Decimal {
    acc.checked_add(amount).unwrap_or_else(|| {
        warn!("Expense total overflowed, capping at the largest amount");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}
