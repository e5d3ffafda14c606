//! Description extraction: the text in front of the amount.

use crate::amount::extract_amount;
use crate::error::ParseFailure;

/// Default label used by [`parse_amount_and_description`]
pub const DEFAULT_DESCRIPTION: &str = "Expense";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountAndDescription {
    pub amount: u64,
    pub description: String,
    /// Byte offset of the amount inside the raw input
    pub amount_start: usize,
}

/// Text before `amount_start`, trimmed, defaulted and capitalized.
pub fn extract_description(raw: &str, amount_start: usize, default_label: &str) -> String {
    let before = raw.get(..amount_start).unwrap_or("").trim();
    let text = if before.is_empty() { default_label } else { before };
    capitalize_first(text)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deterministic amount + description pass with the English default label.
///
/// Returns `None` when no amount can be derived.
pub fn parse_amount_and_description(raw: &str) -> Option<AmountAndDescription> {
    parse_amount_and_description_with(raw, DEFAULT_DESCRIPTION).ok().flatten()
}

/// Same as [`parse_amount_and_description`], with a caller-supplied default
/// label and the overflow case reported instead of folded into `None`.
pub fn parse_amount_and_description_with(
    raw: &str,
    default_label: &str,
) -> Result<Option<AmountAndDescription>, ParseFailure> {
    let Some(m) = extract_amount(raw)? else {
        return Ok(None);
    };
    Ok(Some(AmountAndDescription {
        amount: m.amount,
        description: extract_description(raw, m.start, default_label),
        amount_start: m.start,
    }))
}
