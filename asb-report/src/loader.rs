use anyhow::{Context, Result};
use asb_log_parse::asb::{load_rows, parse_rows, AsbData, AsbRow, WindowPolicy};
use asb_log_parse::e2e::{CounterRegistry, E2eData, SteadyWindow};
use asb_log_parse::{maybe, maybe_value, stats};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use crate::config::is_warm_workload;
use crate::io_utils::{read_archived, resolve_log, LogSource};
use crate::paths::{AsbRun, E2eRun};

fn read_rows(path: &Path) -> Result<Vec<AsbRow>> {
    match resolve_log(path)? {
        LogSource::Plain(p) => load_rows(&p).with_context(|| format!("parse {}", p.display())),
        LogSource::Archive { archive, member } => {
            let bytes = read_archived(&archive, &member)?;
            parse_rows(Cursor::new(bytes))
                .with_context(|| format!("parse {} in {}", member, archive.display()))
        }
    }
}

pub fn load_asb(base: &Path, run: &AsbRun, only_time: bool) -> Result<AsbData> {
    let time = read_rows(&run.time_log(base))?;
    let stat = match only_time {
        true => None,
        false => Some(read_rows(&run.stat_log(base))?),
    };
    let policy = WindowPolicy::for_workload(is_warm_workload(&run.keys));
    Ok(AsbData::new(&time, stat.as_deref(), policy))
}

pub fn load_e2e(base: &Path, run: &E2eRun, registry: &CounterRegistry) -> Result<E2eData> {
    let window = SteadyWindow::default();
    match resolve_log(&run.metrics_log(base))? {
        LogSource::Plain(p) => E2eData::open(&p, registry, &window)
            .with_context(|| format!("load {}", p.display())),
        LogSource::Archive { archive, member } => {
            let bytes = read_archived(&archive, &member)?;
            E2eData::load(Cursor::new(bytes), registry, &window)
                .with_context(|| format!("load {} in {}", member, archive.display()))
        }
    }
}

/// Window means of one authenticated-storage run.
#[derive(Debug, Clone, Copy)]
pub struct AsbSummary {
    pub tps: Option<f64>,
    pub ra: Option<f64>,
    pub wa: Option<f64>,
}

/// One cell of a sweep: `None` when the run could not be loaded.
#[derive(Debug, Clone)]
pub struct SweepCell<T> {
    pub authdb: String,
    pub workload: String,
    pub value: Option<T>,
}

fn for_each_run<T: Send>(
    pairs: &[(String, String)],
    load: impl Fn(&str, &str) -> Option<T> + Sync,
) -> Vec<SweepCell<T>> {
    let processed = AtomicUsize::new(0);
    let total = pairs.len();
    pairs
        .par_iter()
        .map(|(authdb, workload)| {
            let value = load(authdb, workload);
            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 10 == 0 || done == total {
                info!("processed {}/{} runs...", done, total);
            }
            SweepCell {
                authdb: authdb.clone(),
                workload: workload.clone(),
                value,
            }
        })
        .collect()
}

pub fn sweep_asb(base: &Path, folder: &str, pairs: &[(String, String)]) -> Vec<SweepCell<AsbSummary>> {
    for_each_run(pairs, |authdb, keys| {
        let run = AsbRun::new(authdb, keys, folder);
        let data = maybe(|| load_asb(base, &run, true))?;
        let mean_of = |series: &[f64]| Some(stats::mean(series)).filter(|v| !v.is_nan());
        Some(AsbSummary {
            tps: mean_of(data.throughput()),
            ra: mean_of(data.read_amp()),
            wa: mean_of(data.write_amp()),
        })
    })
}

pub fn sweep_e2e(
    base: &Path,
    folder: &str,
    erc20: bool,
    pairs: &[(String, String)],
    registry: &CounterRegistry,
) -> Vec<SweepCell<f64>> {
    for_each_run(pairs, |authdb, size| {
        let run = E2eRun {
            authdb: authdb.to_string(),
            size: size.to_string(),
            erc20,
            folder: folder.to_string(),
        };
        maybe_value(|| load_e2e(base, &run, registry).map(|d| d.mean_tps()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn summary_line(epoch: u32, time: f64) -> String {
        format!(
            "{:>6}: {:>9.3} s > {:>10} ops, {:>9.3} us/op, {:>7} empty reads > \
             Read amp {:>7.3}, Write amp {:>7.3} > \n",
            epoch, time, 20_000, 50.0, 100, 2.0, 4.0
        )
    }

    #[test]
    fn test_sweep_isolates_failures() {
        let base = std::env::temp_dir().join(format!("asb-report-sweep-{}", std::process::id()));
        let run = AsbRun::new("lvmt", "1m", "osdi23");
        let time_log = run.time_log(&base);
        fs::create_dir_all(time_log.parent().unwrap()).unwrap();
        let text: String = (0..40).map(|e| summary_line(e, e as f64 * 0.5)).collect();
        fs::write(&time_log, text).unwrap();

        let pairs = vec![
            ("lvmt".to_string(), "1m".to_string()),
            ("mpt".to_string(), "1m".to_string()),
        ];
        let cells = sweep_asb(&base, "osdi23", &pairs);
        let lvmt = cells.iter().find(|c| c.authdb == "lvmt").unwrap();
        let mpt = cells.iter().find(|c| c.authdb == "mpt").unwrap();
        let summary = lvmt.value.unwrap();
        assert_eq!(summary.tps, Some(20_000.0));
        assert_eq!(summary.ra, Some(2.0));
        assert!(mpt.value.is_none());

        let data = load_asb(&base, &run, true).unwrap();
        assert_eq!(data.epoch()[0], 20.0);
        assert!(load_asb(&base, &run, false).is_err());

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_load_runs_from_archives() {
        let base = std::env::temp_dir().join(format!("asb-report-archived-{}", std::process::id()));

        // both logs of an authenticated-storage run inside the folder archive
        let staging = base.join("staging").join("osdi23");
        fs::create_dir_all(&staging).unwrap();
        let run = AsbRun::new("rain", "real", "osdi23");
        let time: String = (0..30).map(|e| summary_line(e, e as f64)).collect();
        fs::write(staging.join("time_rain_real.log"), &time).unwrap();
        fs::write(staging.join("stat_rain_real.log"), &time).unwrap();
        fs::create_dir_all(base.join("paper_experiment")).unwrap();
        sevenz_rust::compress_to_path(&staging, base.join("paper_experiment").join("osdi23.7z"))
            .unwrap();

        let data = load_asb(&base, &run, false).unwrap();
        // warm workload: the first ten samples are dropped
        assert_eq!(data.len(), 20);
        assert_eq!(data.epoch()[0], 10.0);
        assert_eq!(data.sizes().unwrap().read_count.len(), 20);

        // an end-to-end log archived on its own
        let e2e = E2eRun {
            authdb: "rain".to_string(),
            size: "1m".to_string(),
            erc20: false,
            folder: "osdi23".to_string(),
        };
        let log = e2e.metrics_log(&base);
        fs::create_dir_all(log.parent().unwrap()).unwrap();
        let mut text = String::new();
        for i in 0..=60u64 {
            let ts = 1_650_000_000_000 + i * 1000;
            text.push_str(&format!(
                "{ts}, system_metrics, Group, {{good_tps.count: {},}}\n",
                50 * i
            ));
            if i >= 5 {
                text.push_str(&format!("{ts}, debug, Group, {{debug.count: 1,}}\n"));
            }
        }
        fs::write(&log, text).unwrap();
        let archive = log.with_file_name("less-sender-native-rain-1m.log.7z");
        sevenz_rust::compress_to_path(&log, &archive).unwrap();
        fs::remove_file(&log).unwrap();

        let registry = CounterRegistry::standard().unwrap();
        let data = load_e2e(&base, &e2e, &registry).unwrap();
        assert_eq!(data.len(), 34);
        assert_eq!(data.mean_tps(), 50.0);

        fs::remove_dir_all(&base).unwrap();
    }
}
