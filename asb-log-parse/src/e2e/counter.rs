use regex::Regex;

use crate::error::Result;

// Columns of an event table built from `CounterRegistry::standard`.
pub const TIMESTAMP: usize = 0;
pub const GOOD_TPS: usize = 1;
pub const STORAGE_GET: usize = 2;
pub const STORAGE_SET: usize = 3;
pub const STORAGE_COMMIT: usize = 4;
pub const BACKEND_GET: usize = 5;
pub const BACKEND_SET: usize = 6;
pub const BACKEND_COMMIT: usize = 7;
pub const EPOCH_EXECUTION: usize = 8;
pub const DEBUG_MARKER: usize = 9;

/// One named counter inside a `<ts>, <group>, Group, {...}` metric line.
#[derive(Debug, Clone)]
pub struct CounterPattern {
    group: String,
    name: String,
    meter: String,
    regex: Regex,
}

impl CounterPattern {
    pub fn new(group: &str, name: &str) -> Result<Self> { Self::with_meter(group, name, "count") }

    pub fn with_meter(group: &str, name: &str, meter: &str) -> Result<Self> {
        let regex = Regex::new(&format!(
            r"(?m)^\d*, {}, Group, \{{.*{}\.{}: (\d+),",
            regex::escape(group),
            regex::escape(name),
            regex::escape(meter)
        ))?;
        Ok(Self {
            group: group.to_string(),
            name: name.to_string(),
            meter: meter.to_string(),
            regex,
        })
    }

    pub fn label(&self) -> String { format!("{}.{}.{}", self.group, self.name, self.meter) }

    /// Counter value in `record`, zero when the record does not carry it.
    pub fn extract(&self, record: &str) -> f64 {
        self.regex
            .captures(record)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

/// Ordered set of counters making up the columns of an event table.
///
/// The last registered counter is the marker that announces the start of the
/// measured phase.
#[derive(Debug, Clone)]
pub struct CounterRegistry {
    patterns: Vec<CounterPattern>,
}

impl CounterRegistry {
    pub fn new(patterns: Vec<CounterPattern>) -> Self { Self { patterns } }

    /// Counters emitted by the benchmarked node, in column order.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(vec![
            CounterPattern::new("system_metrics", "good_tps")?,
            CounterPattern::new("timer", "storage::get")?,
            CounterPattern::new("timer", "storage::set")?,
            CounterPattern::new("timer", "storage::commit")?,
            CounterPattern::new("timer", "backend::get")?,
            CounterPattern::new("timer", "backend::set")?,
            CounterPattern::new("timer", "backend::commit")?,
            CounterPattern::new("timer", "consensus::handle_epoch_execution")?,
            CounterPattern::new("debug", "debug")?,
        ]))
    }

    pub fn len(&self) -> usize { self.patterns.len() }

    pub fn is_empty(&self) -> bool { self.patterns.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &CounterPattern> + '_ { self.patterns.iter() }

    /// `[timestamp, counter_1, ..., counter_n]` for one grouped record.
    pub fn extract_row(&self, timestamp: u64, record: &str) -> Vec<f64> {
        std::iter::once(timestamp as f64)
            .chain(self.patterns.iter().map(|p| p.extract(record)))
            .collect()
    }
}
