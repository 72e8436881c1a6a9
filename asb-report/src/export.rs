use anyhow::{Context, Result};
use asb_log_parse::asb::{AsbData, PercentileVector};
use asb_log_parse::e2e::{CounterRegistry, E2eData, TimeBreakdown};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Serialize)]
struct AsbExport<'a> {
    #[serde(flatten)]
    data: &'a AsbData,
    effective_read_size: Option<Vec<f64>>,
    read_percentile_profile: Option<PercentileVector>,
    write_percentile_profile: Option<PercentileVector>,
}

#[derive(Serialize)]
struct E2eExport<'a> {
    timestamp: &'a [f64],
    goodput: &'a [f64],
    tps: Vec<f64>,
    mean_tps: f64,
    breakdown: TimeBreakdown,
    counters: BTreeMap<String, &'a [f64]>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("write JSON to {}", path.display()))
}

pub fn write_asb(path: &Path, data: &AsbData) -> Result<()> {
    write_json(
        path,
        &AsbExport {
            data,
            effective_read_size: data.effective_read_size(),
            read_percentile_profile: data.read_percentile_profile(),
            write_percentile_profile: data.write_percentile_profile(),
        },
    )
}

pub fn write_e2e(path: &Path, data: &E2eData, registry: &CounterRegistry) -> Result<()> {
    let counters = registry
        .iter()
        .enumerate()
        .map(|(i, counter)| (counter.label(), data.column(i + 1)))
        .collect();
    write_json(
        path,
        &E2eExport {
            timestamp: data.timestamp(),
            goodput: data.goodput(),
            tps: data.tps(),
            mean_tps: data.mean_tps(),
            breakdown: data.breakdown(),
            counters,
        },
    )
}
