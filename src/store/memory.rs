use anyhow::Result;
use std::collections::HashMap;

use super::SlotBackend;

/// In-memory slot storage for tests.
#[derive(Debug, Default)]
pub(crate) struct MemoryBackend {
    slots: HashMap<String, String>,
    pub(crate) writes: usize,
}

impl MemoryBackend {
    pub(crate) fn with_slot(key: &str, value: &str) -> Self {
        let mut backend = Self::default();
        backend.slots.insert(key.to_string(), value.to_string());
        backend
    }
}

impl SlotBackend for MemoryBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
