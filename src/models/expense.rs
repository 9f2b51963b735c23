use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::Category;

/// Largest amount a single expense may carry.
///
/// Any amount up to this with 2 decimals stays exact through an `f64`
/// JSON number, and summing them cannot overflow a `Decimal`.
pub const MAX_AMOUNT: u32 = 1_000_000_000;

/// Why a draft could not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid amount: '{0}' is not a number")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("Amount must be at most 1,000,000,000 (got {0})")]
    AmountTooLarge(Decimal),
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),
}

/// Raw, unvalidated input for a new expense.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub amount: String,
    pub category: String,
    pub note: String,
}

impl ExpenseDraft {
    pub fn new(amount: &str, category: &str, note: &str) -> Self {
        Self {
            amount: amount.to_string(),
            category: category.to_string(),
            note: note.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    #[serde(with = "amount_number")]
    pub amount: Decimal,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Validate a draft and build a record stamped with `now`.
    ///
    /// The id is `now` in epoch milliseconds; the store bumps it when it
    /// collides with an existing record.
    pub fn from_draft(draft: &ExpenseDraft, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let raw_amount = draft.amount.trim();
        let amount = Decimal::from_str(raw_amount)
            .map_err(|_| ValidationError::InvalidAmount(raw_amount.to_string()))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(ValidationError::AmountTooLarge(amount));
        }
        let category = Category::parse(&draft.category)
            .ok_or_else(|| ValidationError::UnknownCategory(draft.category.trim().to_string()))?;
        let note = draft.note.trim();
        let millis = now.timestamp_millis();

        Ok(Self {
            id: millis,
            amount,
            category,
            note: (!note.is_empty()).then(|| note.to_string()),
            date: Utc
                .timestamp_millis_opt(millis)
                .single()
                .unwrap_or(now),
        })
    }

    /// The note when present, otherwise the category key.
    pub fn label(&self) -> &str {
        self.note
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(self.category.key())
    }
}

/// Amounts are stored as plain JSON numbers.
mod amount_number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub(super) fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        let f = value
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom("amount out of range"))?;
        s.serialize_f64(f)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let f = f64::deserialize(d)?;
        if !f.is_finite() {
            return Err(D::Error::custom("amount is not a finite number"));
        }
        // f64's Display is the shortest round-tripping form, so 12.3 stays 12.3
        let amount = Decimal::from_str(&f.to_string()).map_err(D::Error::custom)?;
        if amount.abs() > Decimal::from(super::MAX_AMOUNT) {
            return Err(D::Error::custom(format!("amount {amount} is out of range")));
        }
        Ok(amount)
    }
}
