mod args;
mod config;
mod export;
mod io_utils;
mod loader;
mod paths;
mod report;
mod stats;

use anyhow::{anyhow, Result};
use asb_log_parse::e2e::CounterRegistry;
use asb_log_parse::parse_number;
use clap::Parser;
use std::cmp::Ordering;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use args::{Args, AsbArgs, Command, E2eArgs, SweepArgs};
use config::{asb_authdbs, asb_workloads, e2e_authdbs, e2e_sizes};
use io_utils::scan_runs;
use loader::{load_asb, load_e2e, sweep_asb, sweep_e2e};
use paths::{AsbRun, E2eRun};
use report::{asb_table, e2e_table, grid_table, percentile_table, print_e2e_summary, Format};

fn configure_workers() -> Result<()> {
    let Ok(override_workers) = std::env::var("ASB_WORKERS") else {
        return Ok(());
    };
    let n = override_workers
        .parse::<usize>()
        .map_err(|e| anyhow!("invalid ASB_WORKERS {:?}: {}", override_workers, e))?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(n.max(1))
        .build_global()
        .map_err(|e| anyhow!("failed to configure worker pool: {}", e))
}

fn run_asb(base: &Path, a: AsbArgs) -> Result<()> {
    let run = AsbRun {
        low_mem: a.low_mem,
        high_mem: a.high_mem,
        ..AsbRun::new(&a.authdb, &a.keys, &a.folder)
    };
    let data = load_asb(base, &run, a.only_time)?;
    println!("{} samples in the steady window", data.len());
    asb_table(&data).printstd();
    if let Some(table) = percentile_table(&data) {
        table.printstd();
    }
    if let Some(path) = a.json {
        export::write_asb(&path, &data)?;
    }
    Ok(())
}

fn run_e2e(base: &Path, a: E2eArgs, registry: &CounterRegistry) -> Result<()> {
    let run = E2eRun {
        authdb: a.authdb,
        size: a.size,
        erc20: a.erc20,
        folder: a.folder,
    };
    let data = load_e2e(base, &run, registry)?;
    print_e2e_summary(&data);
    e2e_table(&data, registry).printstd();
    if let Some(path) = a.json {
        export::write_e2e(&path, &data, registry)?;
    }
    Ok(())
}

/// Workload tags that are not sizes ("real", "fresh") sort first.
fn compare_workloads(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn to_owned(list: &[&str]) -> Vec<String> { list.iter().map(|s| s.to_string()).collect() }

fn run_e2e_sweep(base: &Path, s: SweepArgs, registry: &CounterRegistry) {
    let authdbs = to_owned(e2e_authdbs());
    let sizes = to_owned(e2e_sizes());
    let pairs: Vec<(String, String)> = authdbs
        .iter()
        .flat_map(|a| sizes.iter().map(move |k| (a.clone(), k.clone())))
        .collect();
    let cells = sweep_e2e(base, &s.folder, s.erc20, &pairs, registry);
    println!("Mean throughput (x1000 tx/s)");
    grid_table(&cells, &sizes, &authdbs, |v| Some(v / 1000.0), Format::Fixed2).printstd();
}

fn run_sweep(base: &Path, s: SweepArgs) -> Result<()> {
    let pairs: Vec<(String, String)> = if s.discover {
        scan_runs(&base.join("paper_experiment").join(&s.folder))?
    } else {
        asb_authdbs()
            .iter()
            .flat_map(|a| asb_workloads().iter().map(move |k| (a.to_string(), k.to_string())))
            .collect()
    };
    if pairs.is_empty() {
        return Err(anyhow!("no runs found in folder {}", s.folder));
    }

    let mut authdbs: Vec<String> = pairs.iter().map(|(a, _)| a.clone()).collect();
    authdbs.sort();
    authdbs.dedup();
    let mut workloads: Vec<String> = pairs.iter().map(|(_, k)| k.clone()).collect();
    workloads.sort_by(|a, b| compare_workloads(a, b));
    workloads.dedup();

    let cells = sweep_asb(base, &s.folder, &pairs);
    println!("Throughput (x1000 ops per sample)");
    grid_table(&cells, &workloads, &authdbs, |v| v.tps.map(|t| t / 1000.0), Format::Fixed2)
        .printstd();
    println!("Read amplification");
    grid_table(&cells, &workloads, &authdbs, |v| v.ra, Format::Fixed2).printstd();
    println!("Write amplification");
    grid_table(&cells, &workloads, &authdbs, |v| v.wa, Format::Fixed2).printstd();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let profile_enabled = std::env::var("ASB_PROFILE")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let t0 = Instant::now();

    let Args {
        base_dir,
        e2e_dir,
        command,
    } = Args::parse();
    configure_workers()?;
    let registry = CounterRegistry::standard()?;

    match command {
        Command::Asb(a) => run_asb(&base_dir, a)?,
        Command::E2e(a) => run_e2e(&e2e_dir, a, &registry)?,
        Command::Sweep(s) if s.e2e => run_e2e_sweep(&e2e_dir, s, &registry),
        Command::Sweep(s) => run_sweep(&base_dir, s)?,
    }

    if profile_enabled {
        eprintln!("[profile] total main: {:.3}s", t0.elapsed().as_secs_f64());
    }
    Ok(())
}
