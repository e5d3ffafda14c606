//! Persistence contract for recorded entries.

use crate::entry::Entry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt entry data: {0}")]
    Corrupt(String),

    #[error("{0}")]
    Other(String),
}

/// Append-only entry list. No transactions; the last write wins.
pub trait EntryStore {
    /// Record one entry. The newest entry becomes the first in `list_all`.
    fn append(&mut self, entry: Entry) -> Result<(), StoreError>;

    /// All entries, most recent first
    fn list_all(&self) -> Result<Vec<Entry>, StoreError>;
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Vec<Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryStore for MemoryStore {
    fn append(&mut self, entry: Entry) -> Result<(), StoreError> {
        self.entries.insert(0, entry);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Entry>, StoreError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use chrono::NaiveDate;

    #[test]
    fn test_memory_store_newest_first() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut store = MemoryStore::new();
        store
            .append(Entry::new("a", date, EntryKind::Expense, "Kopi", 15_000, "Makanan"))
            .unwrap();
        store
            .append(Entry::new("b", date, EntryKind::Expense, "Ojek", 20_000, "Transport"))
            .unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(all[0].id, "b");
        assert_eq!(all[1].id, "a");
    }
}
