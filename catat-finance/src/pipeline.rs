//! Parse → classify → (suggest) → assemble → persist.
//!
//! One submission walks these states:
//!
//! ```text
//! Idle -> Parsing -> ParseFailed
//!                 -> CategoryClassified -> [AwaitingAiSuggestion -> SuggestionApplied | SuggestionFallback | Cancelled]
//!                 -> Assembled -> Persisted | PersistenceFailed
//! ```
//!
//! Only the suggestion call suspends. A rejected or unusable suggestion is
//! never fatal: the keyword result stands and a [`Notice`] is returned.

use std::sync::Arc;

use catat_core::{
    Category, Entry, EntryKind, EntryStore, KnownCategory, Language, Locale, ParsedEntry,
};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::assembler;
use crate::cancel::CancelToken;
use crate::category_rules::RuleSet;
use crate::description::parse_amount_and_description_with;
use crate::error::{ParseFailure, SubmitError};
use crate::gate::FormGate;
use crate::suggestion::{
    CategorySuggester, CategorySuggestionRequest, SuggestionMode, interpret_suggestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Parsing,
    ParseFailed,
    CategoryClassified,
    AwaitingAiSuggestion,
    SuggestionApplied,
    SuggestionFallback,
    Cancelled,
    Assembled,
    Persisted,
    PersistenceFailed,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::ParseFailed
                | SubmissionState::Cancelled
                | SubmissionState::Persisted
                | SubmissionState::PersistenceFailed
        )
    }
}

/// Non-fatal things the caller should tell the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The suggestion service failed; the entry kept its keyword category
    SuggestionFailed { reason: String },
}

/// Everything a parse depends on, passed explicitly
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub locale: Locale,
    pub kind: EntryKind,
    pub existing_categories: Vec<String>,
    pub mode: SuggestionMode,
    pub rules: Arc<RuleSet>,
}

impl ParseOptions {
    pub fn new(language: Language) -> Self {
        Self {
            locale: Locale::for_language(language),
            kind: EntryKind::Expense,
            existing_categories: Vec::new(),
            mode: SuggestionMode::default(),
            rules: Arc::new(RuleSet::default()),
        }
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_existing_categories(mut self, categories: Vec<String>) -> Self {
        self.existing_categories = categories;
        self
    }

    pub fn with_mode(mut self, mode: SuggestionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rules(mut self, rules: Arc<RuleSet>) -> Self {
        self.rules = rules;
        self
    }
}

/// A categorized entry, not yet recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorized {
    pub parsed: ParsedEntry,
    /// What the keyword rules said, before any suggestion
    pub deterministic: KnownCategory,
    pub notices: Vec<Notice>,
    pub trail: Vec<SubmissionState>,
}

/// A recorded entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub entry: Entry,
    pub notices: Vec<Notice>,
    pub trail: Vec<SubmissionState>,
}

#[derive(Debug, Default)]
struct Trail(Vec<SubmissionState>);

impl Trail {
    fn enter(&mut self, state: SubmissionState) {
        debug!(?state, "submission state");
        self.0.push(state);
    }
}

/// Keyword-only parse. Pure: same input, same output.
pub fn parse_deterministic(raw: &str, opts: &ParseOptions) -> Result<ParsedEntry, ParseFailure> {
    let default_label = opts.locale.default_description(opts.kind);
    let Some(found) = parse_amount_and_description_with(raw, default_label)? else {
        return Err(ParseFailure::NoAmountFound {
            example: opts.locale.input_example(opts.kind).to_string(),
        });
    };
    // The keyword table describes spending; income entries start as Income.
    let category = match opts.kind {
        EntryKind::Income => KnownCategory::Income,
        EntryKind::Expense => opts.rules.classify(raw),
    };
    Ok(ParsedEntry {
        description: found.description,
        amount: found.amount,
        category: Category::Known(category),
    })
}

/// Parse `raw` and settle its category, consulting `suggester` per `opts.mode`.
pub async fn parse_and_categorize(
    raw: &str,
    opts: &ParseOptions,
    suggester: Option<&dyn CategorySuggester>,
    cancel: &CancelToken,
) -> Result<Categorized, SubmitError> {
    let mut trail = Trail::default();
    categorize_inner(raw, opts, suggester, cancel, &mut trail).await
}

async fn categorize_inner(
    raw: &str,
    opts: &ParseOptions,
    suggester: Option<&dyn CategorySuggester>,
    cancel: &CancelToken,
    trail: &mut Trail,
) -> Result<Categorized, SubmitError> {
    trail.enter(SubmissionState::Idle);
    trail.enter(SubmissionState::Parsing);

    let mut parsed = match parse_deterministic(raw, opts) {
        Ok(p) => p,
        Err(e) => {
            trail.enter(SubmissionState::ParseFailed);
            return Err(e.into());
        }
    };
    let deterministic = match parsed.category {
        Category::Known(k) => k,
        Category::AdHoc(_) => KnownCategory::Other,
    };
    trail.enter(SubmissionState::CategoryClassified);

    let mut notices = Vec::new();
    if let Some(suggester) = suggester.filter(|_| opts.mode.should_consult(&parsed.category)) {
        trail.enter(SubmissionState::AwaitingAiSuggestion);

        let request = CategorySuggestionRequest {
            description: parsed.description.clone(),
            language: opts.locale.language,
            existing_categories: opts.existing_categories.clone(),
        };

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                trail.enter(SubmissionState::Cancelled);
                return Err(SubmitError::Cancelled);
            }
            reply = suggester.suggest(&request) => reply,
        };

        let outcome = match reply {
            Ok(text) => interpret_suggestion(&text, &request)
                .ok_or_else(|| format!("unusable suggestion: {:?}", text.trim())),
            Err(e) => Err(format!("{e:#}")),
        };

        match outcome {
            Ok(category) => {
                debug!(category = %category.label(&opts.locale), "suggestion applied");
                parsed.category = category;
                trail.enter(SubmissionState::SuggestionApplied);
            }
            Err(reason) => {
                warn!(%reason, fallback = %parsed.category.label(&opts.locale), "category suggestion failed");
                notices.push(Notice::SuggestionFailed { reason });
                trail.enter(SubmissionState::SuggestionFallback);
            }
        }
    }

    Ok(Categorized {
        parsed,
        deterministic,
        notices,
        trail: trail.0.clone(),
    })
}

/// Full submission for one form: gate, categorize, assemble, persist.
pub async fn submit(
    raw: &str,
    opts: &ParseOptions,
    suggester: Option<&dyn CategorySuggester>,
    cancel: &CancelToken,
    gate: &FormGate,
    store: &mut dyn EntryStore,
    today: NaiveDate,
) -> Result<Submitted, SubmitError> {
    let _in_flight = gate.try_begin()?;
    let mut trail = Trail::default();

    let categorized = categorize_inner(raw, opts, suggester, cancel, &mut trail).await?;
    let entry = assembler::assemble(&categorized.parsed, opts.kind, &opts.locale, today);
    trail.enter(SubmissionState::Assembled);

    match assembler::persist(entry, store) {
        Ok(entry) => {
            trail.enter(SubmissionState::Persisted);
            Ok(Submitted {
                entry,
                notices: categorized.notices,
                trail: trail.0,
            })
        }
        Err(e) => {
            trail.enter(SubmissionState::PersistenceFailed);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(SubmissionState::ParseFailed.is_terminal());
        assert!(SubmissionState::Persisted.is_terminal());
        assert!(SubmissionState::PersistenceFailed.is_terminal());
        assert!(!SubmissionState::AwaitingAiSuggestion.is_terminal());
    }

    #[test]
    fn test_deterministic_is_idempotent() {
        let opts = ParseOptions::new(Language::Indonesian);
        let a = parse_deterministic("Kopi pagi 15rb", &opts).unwrap();
        let b = parse_deterministic("Kopi pagi 15rb", &opts).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.category, Category::Known(KnownCategory::Food));
    }

    #[test]
    fn test_no_amount_carries_localized_example() {
        let opts = ParseOptions::new(Language::English);
        let err = parse_deterministic("Beli sesuatu", &opts).unwrap_err();
        assert_eq!(
            err,
            ParseFailure::NoAmountFound {
                example: "Lunch 50k".to_string()
            }
        );
    }

    #[test]
    fn test_income_default_description() {
        let opts = ParseOptions::new(Language::Indonesian).with_kind(EntryKind::Income);
        let p = parse_deterministic("5jt", &opts).unwrap();
        assert_eq!(p.description, "Income");
        assert_eq!(p.amount, 5_000_000);
    }

    #[test]
    fn test_income_is_not_classified_as_spending() {
        let income = ParseOptions::new(Language::Indonesian).with_kind(EntryKind::Income);
        let p = parse_deterministic("Jual baju 300rb", &income).unwrap();
        assert_eq!(p.category, Category::Known(KnownCategory::Income));
        assert_eq!(p.category.label(&Locale::for_language(Language::Indonesian)), "Pemasukan");

        let expense = ParseOptions::new(Language::Indonesian);
        let p = parse_deterministic("Jual baju 300rb", &expense).unwrap();
        assert_eq!(p.category, Category::Known(KnownCategory::Shopping));
    }

    #[test]
    fn test_fullwidth_digit_stays_in_description() {
        let opts = ParseOptions::new(Language::Indonesian);
        let p = parse_deterministic("Kopi \u{ff15} gelas 15rb", &opts).unwrap();
        assert_eq!(p.amount, 15_000);
        assert_eq!(p.description, "Kopi \u{ff15} gelas");
    }
}
