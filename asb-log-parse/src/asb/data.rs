use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::asb::record::{AsbRow, PercentileVector, PERCENTILE_COUNT};
use crate::stats::nan_mean;

/// How the warm-up part of a run is cut away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Keep samples whose epoch is at least half of the largest epoch seen.
    EpochFraction,
    /// Drop a fixed number of leading samples.
    DropPrefix(usize),
    /// Keep everything.
    Full,
}

impl WindowPolicy {
    pub const WARM_PREFIX: usize = 10;

    /// Workloads that start from an already-warm state only lose a short prefix.
    pub fn for_workload(already_warm: bool) -> Self {
        match already_warm {
            true => WindowPolicy::DropPrefix(Self::WARM_PREFIX),
            false => WindowPolicy::EpochFraction,
        }
    }

    fn apply(self, rows: &[AsbRow], epoch_threshold: f64) -> Vec<AsbRow> {
        match self {
            WindowPolicy::EpochFraction => rows
                .iter()
                .filter(|r| r.epoch() >= epoch_threshold)
                .copied()
                .collect(),
            WindowPolicy::DropPrefix(n) => rows.iter().skip(n).copied().collect(),
            WindowPolicy::Full => rows.to_vec(),
        }
    }
}

/// Size statistics taken from a statistics-only companion log.
#[derive(Debug, Clone, Serialize)]
pub struct SizeStats {
    pub read_count: Vec<f64>,
    pub read_size: Vec<f64>,
    pub write_count: Vec<f64>,
    pub write_size: Vec<f64>,
    pub read_percentiles: Vec<PercentileVector>,
    pub write_percentiles: Vec<PercentileVector>,
}

impl SizeStats {
    fn from_rows(rows: &[AsbRow]) -> Self {
        Self {
            read_count: rows.iter().map(|r| r.read.count_value()).collect(),
            read_size: rows.iter().map(|r| r.read.average).collect(),
            write_count: rows.iter().map(|r| r.write.count_value()).collect(),
            write_size: rows.iter().map(|r| r.write.average).collect(),
            read_percentiles: rows.iter().map(|r| r.read.percentiles).collect(),
            write_percentiles: rows.iter().map(|r| r.write.percentiles).collect(),
        }
    }
}

/// Steady-state view of one authenticated-storage run.
#[derive(Debug, Clone, Serialize)]
pub struct AsbData {
    epoch: Vec<f64>,
    timer: Vec<f64>,
    tps: Vec<f64>,
    rempty: Vec<f64>,
    ra: Vec<f64>,
    wa: Vec<f64>,
    latency: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sizes: Option<SizeStats>,
}

impl AsbData {
    /// Window `time` (and `stat`, when given) and derive the named series.
    ///
    /// The epoch threshold always comes from `time`; the companion table is cut
    /// with the same policy and threshold but otherwise independently.
    pub fn new(time: &[AsbRow], stat: Option<&[AsbRow]>, policy: WindowPolicy) -> Self {
        let max_epoch = time
            .iter()
            .map(AsbRow::epoch)
            .fold(f64::NEG_INFINITY, f64::max);
        let threshold = max_epoch / 2.0;

        let rows = policy.apply(time, threshold);
        debug!(
            ?policy,
            threshold,
            kept = rows.len(),
            total = time.len(),
            "windowed timing rows"
        );

        let column = |f: fn(&AsbRow) -> f64| -> Vec<f64> { rows.iter().map(f).collect() };
        let timer = column(|r| r.summary.elapsed);
        let latency = std::iter::once(0.0)
            .chain(timer.iter().copied())
            .tuple_windows()
            .map(|(prev, next)| next - prev)
            .collect();

        let sizes = stat.map(|stat| {
            let stat_rows = policy.apply(stat, threshold);
            debug!(kept = stat_rows.len(), total = stat.len(), "windowed statistics rows");
            SizeStats::from_rows(&stat_rows)
        });

        Self {
            epoch: column(|r| r.summary.epoch),
            tps: column(|r| r.summary.ops),
            rempty: column(|r| r.summary.empty_reads),
            ra: column(|r| r.summary.read_amp),
            wa: column(|r| r.summary.write_amp),
            timer,
            latency,
            sizes,
        }
    }

    pub fn epoch(&self) -> &[f64] { &self.epoch }

    /// Cumulative elapsed seconds.
    pub fn elapsed(&self) -> &[f64] { &self.timer }

    /// Operations per sample.
    pub fn throughput(&self) -> &[f64] { &self.tps }

    pub fn empty_reads(&self) -> &[f64] { &self.rempty }

    pub fn read_amp(&self) -> &[f64] { &self.ra }

    pub fn write_amp(&self) -> &[f64] { &self.wa }

    /// Seconds spent on each sample.
    pub fn latency(&self) -> &[f64] { &self.latency }

    pub fn len(&self) -> usize { self.epoch.len() }

    pub fn is_empty(&self) -> bool { self.epoch.is_empty() }

    /// Absent when the run was loaded without its statistics log.
    pub fn sizes(&self) -> Option<&SizeStats> { self.sizes.as_ref() }

    /// Backend bytes per read, counting empty reads as zero-sized.
    pub fn effective_read_size(&self) -> Option<Vec<f64>> {
        let sizes = self.sizes.as_ref()?;
        Some(
            sizes
                .read_size
                .iter()
                .zip(&sizes.read_count)
                .zip(&self.rempty)
                .map(|((rs, rn), rempty)| rs * (1.0 - rempty / (rn + rempty)))
                .collect(),
        )
    }

    pub fn read_percentile_profile(&self) -> Option<PercentileVector> {
        self.sizes
            .as_ref()
            .map(|s| percentile_profile(&s.read_percentiles))
    }

    pub fn write_percentile_profile(&self) -> Option<PercentileVector> {
        self.sizes
            .as_ref()
            .map(|s| percentile_profile(&s.write_percentiles))
    }
}

/// NaN-aware mean of every percentile point across samples.
fn percentile_profile(matrix: &[PercentileVector]) -> PercentileVector {
    let mut out = [f64::NAN; PERCENTILE_COUNT];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = nan_mean(matrix.iter().map(|row| row[i]));
    }
    out
}
