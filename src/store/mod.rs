#[cfg(test)]
mod memory;

#[cfg(test)]
pub(crate) use memory::MemoryBackend;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::models::{ExpenseDraft, ExpenseRecord};

/// Slot holding the JSON array of all expense records.
pub(crate) const EXPENSES_SLOT: &str = "expenses";

/// Slot receiving the raw contents of `EXPENSES_SLOT` when it could not be
/// fully parsed and is about to be overwritten.
pub(crate) const CORRUPT_SLOT: &str = "expenses.corrupt";

/// Named-slot persistence medium.
pub(crate) trait SlotBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>>;
    fn write_slot(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Result of reading the expenses slot.
struct Loaded {
    records: Vec<ExpenseRecord>,
    /// Raw slot text when some of it had to be dropped while parsing.
    damaged: Option<String>,
}

/// Persistent, insertion-ordered collection of expense records.
///
/// Every mutation reads the whole collection, changes it in memory and
/// writes the whole collection back.
pub(crate) struct ExpenseStore<B: SlotBackend> {
    backend: B,
}

impl<B: SlotBackend> ExpenseStore<B> {
    pub(crate) fn new(backend: B) -> Self {
        Self { backend }
    }

    /// All records in insertion order. An absent or unreadable slot yields
    /// an empty list.
    pub(crate) fn list_all(&self) -> Result<Vec<ExpenseRecord>> {
        Ok(self.load()?.records)
    }

    pub(crate) fn get(&self, id: i64) -> Result<Option<ExpenseRecord>> {
        Ok(self.list_all()?.into_iter().find(|r| r.id == id))
    }

    /// Append a record as-is.
    pub(crate) fn add(&mut self, record: ExpenseRecord) -> Result<()> {
        let mut loaded = self.load()?;
        info!(id = record.id, category = %record.category, "Adding expense");
        loaded.records.push(record);
        self.commit(loaded)
    }

    /// Validate `draft`, give it an id no other record has, and append it.
    ///
    /// Validation failures surface as [`crate::models::ValidationError`]
    /// inside the returned error and leave storage untouched.
    pub(crate) fn create(
        &mut self,
        draft: &ExpenseDraft,
        now: DateTime<Utc>,
    ) -> Result<ExpenseRecord> {
        let mut record = ExpenseRecord::from_draft(draft, now)?;
        let mut loaded = self.load()?;

        if let Some(max_id) = loaded.records.iter().map(|r| r.id).max() {
            if record.id <= max_id {
                debug!(requested = record.id, assigned = max_id + 1, "Id taken, bumping");
                record.id = max_id + 1;
            }
        }

        info!(id = record.id, category = %record.category, "Adding expense");
        loaded.records.push(record.clone());
        self.commit(loaded)?;
        Ok(record)
    }

    /// Remove the first record with `id`. Returns whether one was removed;
    /// an unknown id leaves storage untouched.
    pub(crate) fn delete_by_id(&mut self, id: i64) -> Result<bool> {
        let mut loaded = self.load()?;
        let Some(pos) = loaded.records.iter().position(|r| r.id == id) else {
            debug!(id, "Delete of unknown id ignored");
            return Ok(false);
        };
        loaded.records.remove(pos);
        info!(id, "Deleted expense");
        self.commit(loaded)?;
        Ok(true)
    }

    fn load(&self) -> Result<Loaded> {
        let Some(raw) = self.backend.read_slot(EXPENSES_SLOT)? else {
            return Ok(Loaded {
                records: Vec::new(),
                damaged: None,
            });
        };

        let items: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Stored expenses are unreadable, treating as empty: {e}");
                return Ok(Loaded {
                    records: Vec::new(),
                    damaged: Some(raw),
                });
            }
        };

        let total = items.len();
        let records: Vec<ExpenseRecord> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable expense record: {e}");
                    None
                }
            })
            .collect();

        debug!(count = records.len(), "Loaded expenses");
        let damaged = (records.len() != total).then_some(raw);
        Ok(Loaded { records, damaged })
    }

    fn commit(&mut self, loaded: Loaded) -> Result<()> {
        if let Some(raw) = loaded.damaged {
            warn!("Preserving unreadable expense data in slot '{CORRUPT_SLOT}'");
            self.backend.write_slot(CORRUPT_SLOT, &raw)?;
        }
        let json =
            serde_json::to_string(&loaded.records).context("Failed to serialize expenses")?;
        self.backend.write_slot(EXPENSES_SLOT, &json)?;
        debug!(count = loaded.records.len(), "Committed expenses");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests;
