//! End-to-end metric logs: one metric group per line, keyed by a leading
//! millisecond timestamp.

pub mod counter;
pub mod data;
pub mod records;

pub use counter::{CounterPattern, CounterRegistry};
pub use data::{build_table, E2eData, SteadyWindow, TimeBreakdown};
pub use records::EventRecords;
