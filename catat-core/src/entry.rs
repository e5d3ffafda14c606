//! Entry record types: categories, parsed entries and the assembled record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::locale::{Language, Locale};

/// Canonical categories the keyword rules can assign
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KnownCategory {
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "shopping")]
    Shopping,
    #[serde(rename = "bills")]
    Bills,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "other")]
    Other,
}

impl KnownCategory {
    pub const ALL: [KnownCategory; 8] = [
        KnownCategory::Food,
        KnownCategory::Transport,
        KnownCategory::Shopping,
        KnownCategory::Bills,
        KnownCategory::Entertainment,
        KnownCategory::Health,
        KnownCategory::Income,
        KnownCategory::Other,
    ];

    /// Stable key used in config files (`food`, `transport`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            KnownCategory::Food => "food",
            KnownCategory::Transport => "transport",
            KnownCategory::Shopping => "shopping",
            KnownCategory::Bills => "bills",
            KnownCategory::Entertainment => "entertainment",
            KnownCategory::Health => "health",
            KnownCategory::Income => "income",
            KnownCategory::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// A category as chosen at parse time.
///
/// Rule-based results are `Known`; labels coined by the suggestion service
/// are `AdHoc`. Both collapse to a plain label string at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Known(KnownCategory),
    AdHoc(String),
}

impl Category {
    pub fn label<'a>(&'a self, locale: &Locale) -> &'a str {
        match self {
            Category::Known(k) => locale.category_label(*k),
            Category::AdHoc(s) => s.as_str(),
        }
    }

    /// Resolve a stored label. Known labels in any language map back to `Known`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        for lang in Language::ALL {
            if let Some(k) = Locale::for_language(lang).known_from_label(trimmed) {
                return Category::Known(k);
            }
        }
        Category::AdHoc(trimmed.to_string())
    }

    pub fn is_other(&self) -> bool {
        matches!(self, Category::Known(KnownCategory::Other))
    }
}

impl From<KnownCategory> for Category {
    fn from(k: KnownCategory) -> Self {
        Category::Known(k)
    }
}

/// Which form/list an entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EntryKind {
    #[default]
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

/// Output of the parsing pipeline, before an id and date are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Never empty
    pub description: String,
    /// Smallest currency unit
    pub amount: u64,
    pub category: Category,
}

/// A recorded expense or income entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub kind: EntryKind,
    pub description: String,
    pub amount: u64,
    /// Plain label, localized at creation time
    pub category: String,
}

impl Entry {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        kind: EntryKind,
        description: impl Into<String>,
        amount: u64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind,
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    /// Typed view of the stored label
    pub fn category(&self) -> Category {
        Category::from_label(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let entry = Entry::new("e-001", date, EntryKind::Expense, "Makan siang", 50_000, "Makanan");
        assert!(entry.is_expense());
        assert!(!entry.is_income());
        assert_eq!(entry.category(), Category::Known(KnownCategory::Food));
    }

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("Lainnya"), Category::Known(KnownCategory::Other));
        assert_eq!(Category::from_label("Other"), Category::Known(KnownCategory::Other));
        assert_eq!(
            Category::from_label("Hiburan Digital"),
            Category::AdHoc("Hiburan Digital".to_string())
        );
    }

    #[test]
    fn test_known_category_keys() {
        for k in KnownCategory::ALL {
            assert_eq!(KnownCategory::from_key(k.key()), Some(k));
        }
        assert_eq!(KnownCategory::from_key(" Food "), Some(KnownCategory::Food));
        assert_eq!(KnownCategory::from_key("snacks"), None);
    }

    #[test]
    fn test_entry_json_kind_defaults_to_expense() {
        let json = r#"{"id":"x","date":"2026-01-02","description":"Kopi","amount":15000,"category":"Makanan"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, EntryKind::Expense);
        assert_eq!(entry.amount, 15_000);
    }
}
