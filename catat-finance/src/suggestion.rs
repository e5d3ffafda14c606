//! Category suggestion service contract.
//!
//! The service is an external generative model. This module owns the prompt
//! it receives and the rules for turning its reply into a [`Category`].

use async_trait::async_trait;
use catat_core::{Category, Language, Locale};
use serde::{Deserialize, Serialize};

/// Longest reply still accepted as a category label
const MAX_LABEL_CHARS: usize = 40;
const MAX_LABEL_WORDS: usize = 3;

/// One question for the suggestion service. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySuggestionRequest {
    pub description: String,
    pub language: Language,
    pub existing_categories: Vec<String>,
}

/// Anything that can propose a category for a description.
#[async_trait]
pub trait CategorySuggester: Send + Sync {
    async fn suggest(&self, request: &CategorySuggestionRequest) -> anyhow::Result<String>;
}

/// When the pipeline consults the suggestion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionMode {
    Off,
    /// Only when the keyword rules fell through to `Other`
    #[default]
    WhenUnmatched,
    Always,
}

impl SuggestionMode {
    pub fn should_consult(&self, deterministic: &Category) -> bool {
        match self {
            SuggestionMode::Off => false,
            SuggestionMode::WhenUnmatched => deterministic.is_other(),
            SuggestionMode::Always => true,
        }
    }
}

/// Prompt pair sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(request: &CategorySuggestionRequest) -> SuggestionPrompt {
    let locale = Locale::for_language(request.language);
    let other = locale.other_label();
    let existing = if request.existing_categories.is_empty() {
        "(none yet)".to_string()
    } else {
        request.existing_categories.join(", ")
    };

    let system = format!(
        "You categorize personal expenses. Answer with the category name only, \
         no punctuation, no explanation. Write it in {lang}.\n\
         Rules:\n\
         1. If one of the existing categories fits the description, answer with it exactly as written.\n\
         2. Otherwise, if the description is specific enough, answer with a new short category of one or two words.\n\
         3. If the description is too vague to categorize, answer \"{other}\".",
        lang = request.language.name(),
    );

    let user = format!(
        "Existing categories: {existing}\nDescription: {desc}",
        desc = request.description.trim(),
    );

    SuggestionPrompt { system, user }
}

/// Turn a raw reply into a category, or `None` if the reply is unusable.
pub fn interpret_suggestion(
    reply: &str,
    request: &CategorySuggestionRequest,
) -> Option<Category> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let label = clean_label(line);
    if label.is_empty()
        || label.chars().count() > MAX_LABEL_CHARS
        || label.split_whitespace().count() > MAX_LABEL_WORDS
    {
        return None;
    }

    let lowered = label.to_lowercase();
    if let Some(existing) = request
        .existing_categories
        .iter()
        .find(|c| c.trim().to_lowercase() == lowered)
    {
        return Some(Category::from_label(existing));
    }

    let locale = Locale::for_language(request.language);
    if let Some(known) = locale.known_from_label(&label) {
        return Some(Category::Known(known));
    }

    Some(Category::AdHoc(label))
}

fn clean_label(line: &str) -> String {
    let line = line
        .trim_start_matches(['-', '*', '•'])
        .trim();
    let line = line
        .strip_prefix("Category:")
        .or_else(|| line.strip_prefix("Kategori:"))
        .unwrap_or(line)
        .trim();
    line.trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '!' | '*') || c.is_whitespace())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
