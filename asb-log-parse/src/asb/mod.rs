//! Periodic-sample logs of the authenticated-storage benchmark.

pub mod data;
pub mod parser;
pub mod percentile;
pub mod record;

pub use data::{AsbData, SizeStats, WindowPolicy};
pub use parser::{load_rows, parse_rows, AsbParser};
pub use record::{AsbRow, PercentileVector, StatSnapshot, Summary, TrackedMetric};
