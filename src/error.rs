// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SummaryError>;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document store error: {0}")]
    Backend(String),

    #[error("Sentiment oracle error: {0}")]
    Oracle(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        SummaryError::Serialization(err.to_string())
    }
}

/// Non-fatal result of a summary flow.
///
/// `NotFound` and `Empty` are reported to the caller rather than raised; only
/// `Ready` carries a summary, so a caller never observes a partially built one.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    NotFound(String),
    Empty(String),
}

impl<T> Outcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_ready() {
        let outcome: Outcome<u32> = Outcome::Ready(7);
        assert!(outcome.is_ready());
        assert_eq!(outcome.ready(), Some(7));
    }

    #[test]
    fn test_outcome_not_ready() {
        let outcome: Outcome<u32> = Outcome::Empty("no reviews".to_string());
        assert!(!outcome.is_ready());
        assert_eq!(outcome.ready(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let converted: SummaryError = err.into();
        assert!(matches!(converted, SummaryError::Serialization(_)));
    }
}
