use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::e2e::counter::{
    CounterRegistry, BACKEND_COMMIT, BACKEND_GET, BACKEND_SET, EPOCH_EXECUTION, GOOD_TPS,
    STORAGE_COMMIT, STORAGE_GET, STORAGE_SET, TIMESTAMP,
};
use crate::e2e::records::EventRecords;
use crate::error::{ParseError, Result};
use crate::stats::first_difference;

/// Trimming applied around the measured phase, in log milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyWindow {
    /// Skipped after the marker counter first fires.
    pub skip_after_marker_ms: f64,
    /// Dropped before the last record.
    pub trim_tail_ms: f64,
}

impl Default for SteadyWindow {
    fn default() -> Self {
        Self {
            skip_after_marker_ms: 10_000.0,
            trim_tail_ms: 10_000.0,
        }
    }
}

impl SteadyWindow {
    /// Inclusive row range of the steady phase.
    ///
    /// `marker` is the column of the counter that turns non-zero when the
    /// measured phase begins.
    pub fn locate(&self, timestamps: &[f64], marker: &[f64]) -> Result<RangeInclusive<usize>> {
        if timestamps.len() != marker.len() {
            return Err(ParseError::MissingWindowAnchor(
                "marker column does not match the timestamps",
            ));
        }
        let last = *timestamps
            .last()
            .ok_or(ParseError::MissingWindowAnchor("empty event table"))?;

        // records repeating a timestamp belong to the start-up burst
        let duplicate_prefix = first_difference(timestamps)
            .iter()
            .rposition(|dt| *dt < 1.0)
            .map_or(0, |i| i + 1);

        let mark = marker
            .iter()
            .position(|v| *v >= 1.0)
            .ok_or(ParseError::MissingWindowAnchor("marker counter never fired"))?;
        let start = timestamps
            .iter()
            .position(|t| *t > timestamps[mark] + self.skip_after_marker_ms)
            .ok_or(ParseError::MissingWindowAnchor("run ends during the warm-up period"))?;
        let end = timestamps
            .iter()
            .rposition(|t| *t < last - self.trim_tail_ms)
            .ok_or(ParseError::MissingWindowAnchor("run shorter than the cool-down period"))?;

        debug!(duplicate_prefix, mark, start, end, "steady window");
        if start > end {
            return Err(ParseError::MissingWindowAnchor(
                "warm-up and cool-down periods overlap",
            ));
        }
        Ok(start..=end)
    }
}

/// Group, extract and tabulate a whole end-to-end log, one row per timestamp.
pub fn build_table<R: BufRead>(reader: R, registry: &CounterRegistry) -> Result<Vec<Vec<f64>>> {
    EventRecords::new(reader)
        .map(|record| record.map(|(timestamp, blob)| registry.extract_row(timestamp, &blob)))
        .collect()
}

/// Per-transaction time split, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBreakdown {
    pub execution: f64,
    pub authenticated: f64,
    pub backend: f64,
}

/// Steady phase of an end-to-end run, re-based to zero at its first row and
/// with timestamps in seconds.
#[derive(Debug, Clone)]
pub struct E2eData {
    columns: Vec<Vec<f64>>,
}

impl E2eData {
    /// Window a raw event table. The last column is the phase marker.
    pub fn from_rows(rows: &[Vec<f64>], window: &SteadyWindow) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if width < 2 {
            return Err(ParseError::MissingWindowAnchor("empty event table"));
        }
        if rows.iter().any(|r| r.len() != width) {
            return Err(ParseError::MissingWindowAnchor("ragged event table"));
        }
        let column = |c: usize| -> Vec<f64> { rows.iter().map(|r| r[c]).collect() };
        let range = window.locate(&column(TIMESTAMP), &column(width - 1))?;

        let base = &rows[*range.start()];
        let mut columns: Vec<Vec<f64>> = (0..width)
            .map(|c| rows[range.clone()].iter().map(|r| r[c] - base[c]).collect())
            .collect();
        for t in columns[TIMESTAMP].iter_mut() {
            *t /= 1e3;
        }
        Ok(Self { columns })
    }

    pub fn load<R: BufRead>(
        reader: R,
        registry: &CounterRegistry,
        window: &SteadyWindow,
    ) -> Result<Self> {
        let rows = build_table(reader, registry)?;
        debug!(records = rows.len(), "event table built");
        Self::from_rows(&rows, window)
    }

    pub fn open(path: &Path, registry: &CounterRegistry, window: &SteadyWindow) -> Result<Self> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file), registry, window)
    }

    pub fn len(&self) -> usize { self.columns[TIMESTAMP].len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Seconds since the start of the window.
    pub fn timestamp(&self) -> &[f64] { &self.columns[TIMESTAMP] }

    /// Cumulative value of counter column `col`, re-based to the window.
    pub fn column(&self, col: usize) -> &[f64] { &self.columns[col] }

    /// Total increase over the window divided by its duration.
    pub fn mean(&self, col: usize) -> f64 {
        let last = |c: &[f64]| c.last().copied().unwrap_or(f64::NAN);
        last(self.column(col)) / last(self.timestamp())
    }

    pub fn mean_sum(&self, cols: &[usize]) -> f64 { cols.iter().map(|c| self.mean(*c)).sum() }

    /// Per-interval rate of `col`; one element shorter than the window.
    pub fn rate(&self, col: usize) -> Vec<f64> {
        first_difference(self.column(col))
            .into_iter()
            .zip(first_difference(self.timestamp()))
            .map(|(dv, dt)| dv / dt)
            .collect()
    }

    pub fn goodput(&self) -> &[f64] { self.column(GOOD_TPS) }

    pub fn tps(&self) -> Vec<f64> { self.rate(GOOD_TPS) }

    pub fn mean_tps(&self) -> f64 { self.mean(GOOD_TPS) }

    pub fn breakdown(&self) -> TimeBreakdown {
        let tps = self.mean_tps();
        let per_tx = |v: f64| v / 1e3 / tps;
        let all = per_tx(self.mean(EPOCH_EXECUTION));
        let auth = per_tx(self.mean_sum(&[STORAGE_GET, STORAGE_SET, STORAGE_COMMIT]));
        let backend = per_tx(self.mean_sum(&[BACKEND_GET, BACKEND_SET, BACKEND_COMMIT]));
        TimeBreakdown {
            execution: all - auth,
            authenticated: (auth - backend).max(0.0),
            backend,
        }
    }
}
