//! Parsing and steady-state reduction of authenticated-storage benchmark logs.
//!
//! Two log families are handled:
//! 1. periodic-sample logs of the authenticated-storage benchmark (`asb`), where
//!    summary lines are interleaved with size/percentile statistics lines;
//! 2. end-to-end metric logs of a full node (`e2e`), where every line starts with
//!    a millisecond timestamp and carries one metric group.
//!
//! Both produce plain numeric columns, cut down to the steady part of the run.

macro_rules! regex {
    ($pattern:expr) => {{
        use regex::Regex;
        use std::sync::OnceLock;

        static REGEX: OnceLock<Regex> = OnceLock::new();
        REGEX.get_or_init(|| Regex::new($pattern).unwrap())
    }};
}

pub mod asb;
pub mod e2e;
pub mod error;
pub mod maybe;
pub mod number;
pub mod stats;

pub use error::{ParseError, Result};
pub use maybe::{maybe, maybe_value};
pub use number::parse_number;
