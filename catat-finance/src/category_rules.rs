//! Deterministic keyword rules mapping free text to a KnownCategory.
//!
//! Rules are evaluated in order and the first match wins, so a string that
//! hits two keyword sets lands in whichever rule comes first. No match
//! falls through to `Other`.

use catat_core::KnownCategory;
use serde::{Deserialize, Serialize};

/// One keyword set and the category it assigns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: KnownCategory,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: KnownCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lowered.contains(k.as_str()))
    }
}

/// Ordered rule table. Read-only once built; share it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                category: r.category,
                keywords: r.keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify the whole raw input, not just the description.
    pub fn classify(&self, raw: &str) -> KnownCategory {
        let lowered = raw.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(|r| r.category)
            .unwrap_or(KnownCategory::Other)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(vec![
            // Food & drinks
            CategoryRule::new(
                KnownCategory::Food,
                &[
                    "makan", "kopi", "minum", "sarapan", "nasi", "resto", "jajan",
                    "snack", "bakso", "warung", "lunch", "dinner", "breakfast",
                    "coffee", "food",
                ],
            ),
            // Getting around
            CategoryRule::new(
                KnownCategory::Transport,
                &[
                    "transport", "ojek", "gojek", "grab", "bensin", "parkir",
                    "kereta", "krl", "busway", "taksi", "taxi", "fuel", "toll",
                ],
            ),
            // Shopping
            CategoryRule::new(
                KnownCategory::Shopping,
                &["belanja", "beli", "baju", "sepatu", "shopping", "shopee", "tokopedia"],
            ),
            // Recurring bills
            CategoryRule::new(
                KnownCategory::Bills,
                &["listrik", "pulsa", "tagihan", "internet", "wifi", "pdam", "kos", "sewa", "rent"],
            ),
            CategoryRule::new(
                KnownCategory::Entertainment,
                &["bioskop", "nonton", "film", "konser", "game", "movie"],
            ),
            CategoryRule::new(
                KnownCategory::Health,
                &["obat", "dokter", "apotek", "klinik", "rumah sakit", "doctor", "pharmacy"],
            ),
            CategoryRule::new(
                KnownCategory::Income,
                &["gaji", "salary", "bonus", "thr", "freelance", "honor"],
            ),
        ])
    }
}

/// Classify with the built-in table
pub fn categorize(raw: &str) -> KnownCategory {
    RuleSet::default().classify(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_makan_is_food() {
        assert_eq!(categorize("Makan siang 50rb"), KnownCategory::Food);
    }

    #[test]
    fn test_kopi_is_food() {
        assert_eq!(categorize("Kopi pagi 15rb"), KnownCategory::Food);
    }

    #[test]
    fn test_transport() {
        assert_eq!(categorize("Transport 20k ke kantor"), KnownCategory::Transport);
        assert_eq!(categorize("GOJEK 12rb"), KnownCategory::Transport);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(categorize("100000"), KnownCategory::Other);
        assert_eq!(categorize("Langganan Netflix 150rb"), KnownCategory::Other);
    }

    #[test]
    fn test_first_rule_wins() {
        // "beli" (shopping) and "makan" (food) both match; food is evaluated first.
        assert_eq!(categorize("beli makan 30rb"), KnownCategory::Food);

        let reversed = RuleSet::new(vec![
            CategoryRule::new(KnownCategory::Shopping, &["beli"]),
            CategoryRule::new(KnownCategory::Food, &["makan"]),
        ]);
        assert_eq!(reversed.classify("beli makan 30rb"), KnownCategory::Shopping);
    }

    #[test]
    fn test_custom_table_keywords_normalized() {
        let rules = RuleSet::new(vec![CategoryRule {
            category: KnownCategory::Bills,
            keywords: vec!["  NETFLIX ".to_string(), String::new()],
        }]);
        assert_eq!(rules.classify("Langganan Netflix 150rb"), KnownCategory::Bills);
        assert_eq!(rules.classify("kopi"), KnownCategory::Other);
    }

    #[test]
    fn test_empty_table_always_other() {
        let rules = RuleSet::new(Vec::new());
        assert_eq!(rules.classify("Makan siang 50rb"), KnownCategory::Other);
    }
}
