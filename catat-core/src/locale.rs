//! Localized labels keyed by two-letter language code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entry::{EntryKind, KnownCategory};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Indonesian, Language::English];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::English => "en",
        }
    }

    /// Name used when talking to the suggestion service
    pub fn name(&self) -> &'static str {
        match self {
            Language::Indonesian => "Indonesian",
            Language::English => "English",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "id" => Some(Language::Indonesian),
            "en" => Some(Language::English),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0} (expected one of: id, en)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Label table for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub language: Language,
}

impl Locale {
    pub fn for_language(language: Language) -> Self {
        Self { language }
    }

    pub fn category_label(&self, category: KnownCategory) -> &'static str {
        match (self.language, category) {
            (Language::Indonesian, KnownCategory::Food) => "Makanan",
            (Language::Indonesian, KnownCategory::Transport) => "Transport",
            (Language::Indonesian, KnownCategory::Shopping) => "Belanja",
            (Language::Indonesian, KnownCategory::Bills) => "Tagihan",
            (Language::Indonesian, KnownCategory::Entertainment) => "Hiburan",
            (Language::Indonesian, KnownCategory::Health) => "Kesehatan",
            (Language::Indonesian, KnownCategory::Income) => "Pemasukan",
            (Language::Indonesian, KnownCategory::Other) => "Lainnya",
            (Language::English, KnownCategory::Food) => "Food",
            (Language::English, KnownCategory::Transport) => "Transport",
            (Language::English, KnownCategory::Shopping) => "Shopping",
            (Language::English, KnownCategory::Bills) => "Bills",
            (Language::English, KnownCategory::Entertainment) => "Entertainment",
            (Language::English, KnownCategory::Health) => "Health",
            (Language::English, KnownCategory::Income) => "Income",
            (Language::English, KnownCategory::Other) => "Other",
        }
    }

    pub fn other_label(&self) -> &'static str {
        self.category_label(KnownCategory::Other)
    }

    /// Case-insensitive reverse lookup of a category label in this language
    pub fn known_from_label(&self, label: &str) -> Option<KnownCategory> {
        let label = label.trim().to_lowercase();
        KnownCategory::ALL
            .into_iter()
            .find(|k| self.category_label(*k).to_lowercase() == label)
    }

    /// Description used when the text before the amount is empty.
    /// The source app shows the English word in both languages.
    pub fn default_description(&self, kind: EntryKind) -> &'static str {
        match kind {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
        }
    }

    /// A valid input to show next to a format error
    pub fn input_example(&self, kind: EntryKind) -> &'static str {
        match (self.language, kind) {
            (Language::Indonesian, EntryKind::Expense) => "Makan siang 50rb",
            (Language::Indonesian, EntryKind::Income) => "Gaji bulanan 5jt",
            (Language::English, EntryKind::Expense) => "Lunch 50k",
            (Language::English, EntryKind::Income) => "Monthly salary 5jt",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}
