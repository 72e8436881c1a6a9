use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// A line that must follow a grammar (it already passed a pre-filter) does not.
    #[error("line does not match the {pattern} grammar: {line:?}")]
    GrammarMismatch { pattern: &'static str, line: String },

    /// The steady-window heuristics could not find their threshold indices.
    #[error("cannot determine a steady window: {0}")]
    MissingWindowAnchor(&'static str),

    #[error("malformed number {token:?}")]
    NumericParse {
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("malformed count {token:?}")]
    CountParse {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid counter pattern")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
