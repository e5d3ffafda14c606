use catat_core::StoreError;
use thiserror::Error;

/// Input could not be turned into an entry. Nothing is recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no amount found; try something like \"{example}\"")]
    NoAmountFound { example: String },

    #[error("amount is too large")]
    AmountTooLarge,
}

/// Why a submission did not end in a recorded entry
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// The same form already has a submission in flight
    #[error("a submission for this form is already in progress")]
    Busy,

    /// The caller went away before the category suggestion resolved
    #[error("submission cancelled")]
    Cancelled,

    /// The store rejected the entry; the input should be kept for a retry
    #[error("could not save entry: {0}")]
    PersistenceFailed(#[source] StoreError),
}

impl SubmitError {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, SubmitError::Parse(_))
    }
}
