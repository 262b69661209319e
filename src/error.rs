// ============================================
// src/error.rs
// Error types shared by the wheel, the rotator and the stores
// ============================================

use thiserror::Error;

use crate::language::Language;

/// Setup defects of the letter wheel. These are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error("the wheel has no letters")]
    EmptyLetterSet,
    #[error("letter '{0}' appears more than once on the wheel")]
    DuplicateLetter(char),
    #[error("'{0}' is not a lowercase ASCII letter")]
    InvalidLetter(char),
    #[error("extra turn range {min}..={max} is empty")]
    InvalidTurnRange { min: u32, max: u32 },
}

/// Failures of `QuestionRotator::next_question`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("no questions available for {0}")]
    EmptyPool(Language),
}

/// Failures of the key-value store. In-memory state stays authoritative.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage quota exceeded while writing '{0}'")]
    QuotaExceeded(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode stored value: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stored custom-question payload that could not be parsed.
#[derive(Debug, Error)]
pub enum SaveDataError {
    #[error("stored questions are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Why a question edit or language switch was refused.
///
/// These are ordinary user-input outcomes, so they are returned as values
/// and the caller branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the question is empty")]
    Empty,
    #[error("the question is longer than {max} characters")]
    TooLong { max: usize },
    #[error("the question already exists")]
    Duplicate,
    #[error("there is no custom question at index {0}")]
    IndexOutOfRange(usize),
    #[error("at least {min} questions must remain")]
    BelowMinimum { min: usize },
    #[error("language {0} is not supported")]
    UnsupportedLanguage(Language),
}

/// A config file that exists but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is malformed: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
