//! Build the final record and hand it to the store.

use catat_core::{Entry, EntryKind, EntryStore, Locale, ParsedEntry};
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::error::SubmitError;

/// Attach a fresh id and the given date. The category label is localized here.
pub fn assemble(parsed: &ParsedEntry, kind: EntryKind, locale: &Locale, today: NaiveDate) -> Entry {
    Entry::new(
        Uuid::new_v4().to_string(),
        today,
        kind,
        parsed.description.clone(),
        parsed.amount,
        parsed.category.label(locale),
    )
}

/// Single append, no retries. Store errors come back as `PersistenceFailed`.
pub fn persist(entry: Entry, store: &mut dyn EntryStore) -> Result<Entry, SubmitError> {
    store
        .append(entry.clone())
        .map_err(SubmitError::PersistenceFailed)?;
    info!(id = %entry.id, amount = entry.amount, category = %entry.category, "entry recorded");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catat_core::{Category, KnownCategory, Language, MemoryStore};

    fn parsed() -> ParsedEntry {
        ParsedEntry {
            description: "Makan siang".to_string(),
            amount: 50_000,
            category: Category::Known(KnownCategory::Food),
        }
    }

    #[test]
    fn test_assemble_fresh_ids() {
        let locale = Locale::for_language(Language::Indonesian);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let p = parsed();
        let a = assemble(&p, EntryKind::Expense, &locale, today);
        let b = assemble(&p, EntryKind::Expense, &locale, today);

        assert_ne!(a.id, b.id);
        assert_eq!(a.date, today);
        assert_eq!(a.category, "Makanan");
        assert_eq!(a.amount, 50_000);
        assert_eq!(p, parsed());
    }

    #[test]
    fn test_persist_appends_once() {
        let locale = Locale::for_language(Language::English);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let entry = assemble(&parsed(), EntryKind::Expense, &locale, today);
        let mut store = MemoryStore::new();

        let saved = persist(entry.clone(), &mut store).unwrap();
        assert_eq!(saved, entry);
        assert_eq!(store.list_all().unwrap(), vec![entry]);
    }
}
