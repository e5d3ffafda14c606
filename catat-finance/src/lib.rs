//! catat-finance: free-text entry parsing, keyword categories, the category
//! suggestion contract and entry assembly

pub mod amount;
pub mod assembler;
pub mod cancel;
pub mod category_rules;
pub mod description;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod suggestion;

pub use amount::{AmountMatch, Magnitude, extract_amount};
pub use cancel::CancelToken;
pub use category_rules::{CategoryRule, RuleSet, categorize};
pub use description::{AmountAndDescription, parse_amount_and_description, parse_amount_and_description_with};
pub use error::{ParseFailure, SubmitError};
pub use gate::{FormGate, InFlight};
pub use pipeline::{
    Categorized, Notice, ParseOptions, SubmissionState, Submitted, parse_and_categorize,
    parse_deterministic, submit,
};
pub use suggestion::{
    CategorySuggester, CategorySuggestionRequest, SuggestionMode, SuggestionPrompt, build_prompt,
    interpret_suggestion,
};
