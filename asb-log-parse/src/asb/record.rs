use serde::Serialize;

/// Percentile points reported by a statistics line, in log order.
pub const PERCENTILE_COUNT: usize = 12;
pub const PERCENTILES: [u32; PERCENTILE_COUNT] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 98, 99];

pub type PercentileVector = [f64; PERCENTILE_COUNT];

// Column layout of `AsbRow::to_array`.
pub const EPOCH: usize = 0;
pub const ELAPSED: usize = 1;
pub const OPS: usize = 2;
pub const EMPTY_READS: usize = 3;
pub const READ_AMP: usize = 4;
pub const WRITE_AMP: usize = 5;
pub const READ_COUNT: usize = 6;
pub const READ_AVG: usize = 7;
pub const WRITE_COUNT: usize = 8;
pub const WRITE_AVG: usize = 9;
pub const READ_PERCENTILES: usize = 10;
pub const WRITE_PERCENTILES: usize = READ_PERCENTILES + PERCENTILE_COUNT;
pub const ROW_WIDTH: usize = WRITE_PERCENTILES + PERCENTILE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedMetric {
    NonEmptyRead,
    Write,
}

impl TrackedMetric {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Non-empty read size" => Some(TrackedMetric::NonEmptyRead),
            "Write size" => Some(TrackedMetric::Write),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrackedMetric::NonEmptyRead => "Non-empty read size",
            TrackedMetric::Write => "Write size",
        }
    }
}

/// Last statistics seen for one metric. `count == None` means the metric was
/// not observed since the previous summary line.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatSnapshot {
    pub count: Option<u64>,
    pub average: f64,
    pub percentiles: PercentileVector,
}

impl StatSnapshot {
    pub const UNOBSERVED: StatSnapshot = StatSnapshot {
        count: None,
        average: f64::NAN,
        percentiles: [f64::NAN; PERCENTILE_COUNT],
    };

    pub fn is_observed(&self) -> bool { self.count.is_some() }

    pub fn count_value(&self) -> f64 { self.count.map_or(f64::NAN, |c| c as f64) }
}

impl Default for StatSnapshot {
    fn default() -> Self { Self::UNOBSERVED }
}

/// The two accumulator slots filled by statistics lines and drained by the
/// next summary line.
#[derive(Debug, Default)]
pub struct PendingStats {
    read: StatSnapshot,
    write: StatSnapshot,
}

impl PendingStats {
    pub fn observe(&mut self, metric: TrackedMetric, snapshot: StatSnapshot) {
        match metric {
            TrackedMetric::NonEmptyRead => self.read = snapshot,
            TrackedMetric::Write => self.write = snapshot,
        }
    }

    /// Hand out both slots and leave both unobserved.
    pub fn take(&mut self) -> (StatSnapshot, StatSnapshot) {
        let PendingStats { read, write } = std::mem::take(self);
        (read, write)
    }
}

/// Fields of one throughput/amplification summary line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub epoch: f64,
    pub elapsed: f64,
    pub ops: f64,
    pub empty_reads: f64,
    pub read_amp: f64,
    pub write_amp: f64,
}

/// One emitted sample: a summary line plus the statistics collected before it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AsbRow {
    pub summary: Summary,
    pub read: StatSnapshot,
    pub write: StatSnapshot,
}

impl AsbRow {
    pub fn epoch(&self) -> f64 { self.summary.epoch }

    pub fn to_array(&self) -> [f64; ROW_WIDTH] {
        let s = &self.summary;
        let mut out = [f64::NAN; ROW_WIDTH];
        out[EPOCH] = s.epoch;
        out[ELAPSED] = s.elapsed;
        out[OPS] = s.ops;
        out[EMPTY_READS] = s.empty_reads;
        out[READ_AMP] = s.read_amp;
        out[WRITE_AMP] = s.write_amp;
        out[READ_COUNT] = self.read.count_value();
        out[READ_AVG] = self.read.average;
        out[WRITE_COUNT] = self.write.count_value();
        out[WRITE_AVG] = self.write.average;
        out[READ_PERCENTILES..WRITE_PERCENTILES].copy_from_slice(&self.read.percentiles);
        out[WRITE_PERCENTILES..ROW_WIDTH].copy_from_slice(&self.write.percentiles);
        out
    }
}
