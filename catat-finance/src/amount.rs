//! Amount extraction from free text like "Makan siang 50rb".
//!
//! The first run of digits wins, optionally followed by a magnitude token:
//! `rb` / `k` (thousand) or `jt` (million), case-insensitive. Later numbers
//! in the same string are ignored and thousands separators are not
//! understood ("50.000" reads as 50).

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseFailure;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII digits and ASCII-only case folding: `u64::from_str` rejects other
    // decimal digits, and the Kelvin sign must not fold to `k`.
    Regex::new(r"(?P<digits>[0-9]+)(?:\s*(?P<suffix>(?i-u:rb|k|jt)))?")
        .expect("amount pattern compiles")
});

/// Magnitude token following the digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Unit,
    Thousand,
    Million,
}

impl Magnitude {
    pub fn multiplier(&self) -> u64 {
        match self {
            Magnitude::Unit => 1,
            Magnitude::Thousand => 1_000,
            Magnitude::Million => 1_000_000,
        }
    }

    fn from_token(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "rb" | "k" => Magnitude::Thousand,
            "jt" => Magnitude::Million,
            _ => Magnitude::Unit,
        }
    }
}

/// Where the amount was found and what it is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountMatch {
    pub amount: u64,
    pub magnitude: Magnitude,
    /// Byte offset where the digits start
    pub start: usize,
    /// Byte offset just past the digits or the magnitude token
    pub end: usize,
}

/// Find the first amount in `raw`.
///
/// Returns `Ok(None)` when there are no digits at all and
/// `Err(ParseFailure::AmountTooLarge)` when the value does not fit in a u64.
pub fn extract_amount(raw: &str) -> Result<Option<AmountMatch>, ParseFailure> {
    let Some(caps) = AMOUNT_RE.captures(raw) else {
        return Ok(None);
    };
    let digits = &caps["digits"];
    let start = caps.name("digits").map(|m| m.start()).unwrap_or(0);
    let mut end = start + digits.len();

    // A token glued to more letters ("15 kopi", "2 kg") is a word, not a suffix.
    let mut magnitude = Magnitude::Unit;
    if let Some(suffix) = caps.name("suffix") {
        let next = raw[suffix.end()..].chars().next();
        if !next.is_some_and(|c| c.is_alphanumeric()) {
            magnitude = Magnitude::from_token(suffix.as_str());
            end = suffix.end();
        }
    }

    let value: u64 = digits.parse().map_err(|_| ParseFailure::AmountTooLarge)?;
    let amount = value
        .checked_mul(magnitude.multiplier())
        .ok_or(ParseFailure::AmountTooLarge)?;

    Ok(Some(AmountMatch {
        amount,
        magnitude,
        start,
        end,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: &str) -> Option<u64> {
        extract_amount(raw).unwrap().map(|m| m.amount)
    }

    #[test]
    fn test_thousand_suffixes() {
        assert_eq!(amount("Makan siang 50rb"), Some(50_000));
        assert_eq!(amount("Transport 20k ke kantor"), Some(20_000));
        assert_eq!(amount("parkir 5 RB"), Some(5_000));
        assert_eq!(amount("snack 7K"), Some(7_000));
    }

    #[test]
    fn test_million_suffix() {
        assert_eq!(amount("Gaji 5jt"), Some(5_000_000));
        assert_eq!(amount("laptop 12 JT"), Some(12_000_000));
    }

    #[test]
    fn test_no_suffix_used_as_is() {
        assert_eq!(amount("100000"), Some(100_000));
        assert_eq!(amount("bayar listrik 350000 bulan ini"), Some(350_000));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(amount("Beli sesuatu"), None);
        assert_eq!(amount(""), None);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(amount("2 kopi 30rb"), Some(2));
        assert_eq!(amount("50.000"), Some(50));
    }

    #[test]
    fn test_non_ascii_digits_are_skipped() {
        assert_eq!(extract_amount("Makan \u{665}\u{660}rb"), Ok(None));

        let m = extract_amount("Kopi \u{ff15} gelas 15rb").unwrap().unwrap();
        assert_eq!(m.amount, 15_000);
        assert_eq!(m.magnitude, Magnitude::Thousand);
    }

    #[test]
    fn test_kelvin_sign_is_not_thousand() {
        let m = extract_amount("Parkir 20\u{212A}").unwrap().unwrap();
        assert_eq!(m.amount, 20);
        assert_eq!(m.magnitude, Magnitude::Unit);
    }

    #[test]
    fn test_token_inside_word_is_not_a_suffix() {
        assert_eq!(amount("15 kopi"), Some(15));
        assert_eq!(amount("beras 2 kg"), Some(2));
        assert_eq!(amount("50rbu"), Some(50));
    }

    #[test]
    fn test_match_offsets() {
        let m = extract_amount("Kopi pagi 15rb").unwrap().unwrap();
        assert_eq!(m.start, 10);
        assert_eq!(m.end, 14);
        assert_eq!(m.magnitude, Magnitude::Thousand);
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(
            extract_amount("99999999999999999999999"),
            Err(ParseFailure::AmountTooLarge)
        );
        assert_eq!(
            extract_amount("18446744073709551615jt"),
            Err(ParseFailure::AmountTooLarge)
        );
    }
}
