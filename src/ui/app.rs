use anyhow::Result;
use rust_decimal::Decimal;

use crate::aggregate::{Clock, MonthlyAggregator, SystemClock};
use crate::config::Config;
use crate::db::Database;
use crate::store::{ExpenseStore, SlotBackend};
use crate::view::{self, ChartDataset, ListItem, ListView};

pub(crate) type Store = ExpenseStore<Database>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, label: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency_symbol: String,

    // Current month, rebuilt by refresh()
    pub(crate) month_label: String,
    pub(crate) total: Decimal,
    pub(crate) list: ListView,
    pub(crate) chart: Option<ChartDataset>,
    pub(crate) stored_count: usize,

    // Expense list cursor
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency_symbol: config.currency_symbol.clone(),

            month_label: String::new(),
            total: Decimal::ZERO,
            list: ListView::Empty,
            chart: None,
            stored_count: 0,

            expense_index: 0,
            expense_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Recompute total, list and chart for the month containing "now".
    pub(crate) fn refresh<B: SlotBackend>(&mut self, store: &ExpenseStore<B>) -> Result<()> {
        self.refresh_with(store, &SystemClock)
    }

    pub(crate) fn refresh_with<B: SlotBackend, C: Clock>(
        &mut self,
        store: &ExpenseStore<B>,
        clock: &C,
    ) -> Result<()> {
        let snapshot = MonthlyAggregator::new(store, clock).snapshot()?;
        self.month_label = snapshot.month_label;
        self.total = snapshot.total;
        self.list = view::list_view(&snapshot.expenses, &self.currency_symbol);
        self.chart = view::chart_dataset(&snapshot.by_category);
        self.stored_count = snapshot.stored_count;

        let len = self.list.len();
        if self.expense_index >= len {
            self.expense_index = len.saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
        Ok(())
    }

    pub(crate) fn selected(&self) -> Option<&ListItem> {
        self.list.items().get(self.expense_index)
    }

    /// Move the cursor onto the item with `id`, if it is listed.
    pub(crate) fn select_id(&mut self, id: i64) {
        if let Some(pos) = self.list.items().iter().position(|item| item.id == id) {
            self.expense_index = pos;
            let page = self.visible_rows.max(1);
            if pos < self.expense_scroll {
                self.expense_scroll = pos;
            } else if pos >= self.expense_scroll + page {
                self.expense_scroll = pos.saturating_sub(page - 1);
            }
        }
    }

    pub(crate) fn total_display(&self) -> String {
        view::format_total(self.total, &self.currency_symbol)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
