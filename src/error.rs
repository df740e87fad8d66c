//! Error types shared by every subsystem
//!
//! Clamped indices are not errors: recall reports them through
//! [`crate::permutation::Recall::clamped`] instead.

use std::fmt;

/// Errors raised by the rhythm engine
#[derive(Debug)]
pub enum PatternError {
    /// Malformed input: empty sequence, non-positive duration, leading rest, bad flag
    InvalidInput(String),
    /// Operation requested before anything was built (names what is missing)
    Unbuilt(String),
    /// Integer arithmetic left the representable range
    Overflow(String),
    /// Distinct permutation count exceeds the configured limit
    TooManyPermutations { count: u64, limit: u64 },
    /// Command text could not be parsed
    Parse(String),
    /// Configuration could not be read or written
    Config(String),
    /// File system error
    Io(std::io::Error),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PatternError::Unbuilt(what) => write!(f, "No {} received yet", what),
            PatternError::Overflow(msg) => write!(f, "Arithmetic overflow: {}", msg),
            PatternError::TooManyPermutations { count, limit } => write!(
                f,
                "{} distinct permutations exceed the limit of {}",
                count, limit
            ),
            PatternError::Parse(msg) => write!(f, "Parse error: {}", msg),
            PatternError::Config(msg) => write!(f, "Config error: {}", msg),
            PatternError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PatternError {}

impl From<std::io::Error> for PatternError {
    fn from(e: std::io::Error) -> Self {
        PatternError::Io(e)
    }
}

/// Result type for engine operations
pub type PatternResult<T> = Result<T, PatternError>;

impl PatternError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PatternError::InvalidInput(msg.into())
    }

    pub(crate) fn unbuilt(what: impl Into<String>) -> Self {
        PatternError::Unbuilt(what.into())
    }

    /// True for the "nothing received yet" condition
    pub fn is_unbuilt(&self) -> bool {
        matches!(self, PatternError::Unbuilt(_))
    }
}
