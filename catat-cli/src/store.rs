//! JSON-file entry lists, one file per user and entry kind.

use catat_core::{Entry, EntryKind, EntryStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<user_dir>/expenses.json` or `<user_dir>/income.json`
    pub fn for_kind(user_dir: &Path, kind: EntryKind) -> Self {
        let file = match kind {
            EntryKind::Expense => "expenses.json",
            EntryKind::Income => "income.json",
        };
        Self::new(user_dir.join(file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Entry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let s = fs::read_to_string(&self.path)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&s)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    fn write(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Other(format!("serialize entries: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EntryStore for JsonFileStore {
    fn append(&mut self, entry: Entry) -> Result<(), StoreError> {
        let mut entries = self.read()?;
        entries.insert(0, entry);
        self.write(&entries)
    }

    fn list_all(&self) -> Result<Vec<Entry>, StoreError> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(id: &str, amount: u64) -> Entry {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        Entry::new(id, date, EntryKind::Expense, "Kopi", amount, "Makanan")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::for_kind(dir.path(), EntryKind::Expense);
        assert!(store.list_all().unwrap().is_empty());
        assert!(store.path().ends_with("expenses.json"));
    }

    #[test]
    fn test_append_persists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::for_kind(dir.path(), EntryKind::Expense);
        store.append(entry("a", 10_000)).unwrap();
        store.append(entry("b", 20_000)).unwrap();

        let reopened = JsonFileStore::for_kind(dir.path(), EntryKind::Expense);
        let all = reopened.list_all().unwrap();
        assert_eq!(all.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_kinds_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut expenses = JsonFileStore::for_kind(dir.path(), EntryKind::Expense);
        expenses.append(entry("a", 10_000)).unwrap();
        let income = JsonFileStore::for_kind(dir.path(), EntryKind::Income);
        assert!(income.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.json");
        fs::write(&path, "{not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.list_all(), Err(StoreError::Corrupt(_))));
        assert!(matches!(store.append(entry("a", 1)), Err(StoreError::Corrupt(_))));
    }
}
