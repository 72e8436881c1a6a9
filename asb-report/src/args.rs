use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Reduce authenticated-storage benchmark logs to steady-state series")]
pub struct Args {
    /// Root of the authenticated-storage benchmark output (holds paper_experiment/)
    #[arg(long = "base-dir", env = "ASB_PATH", default_value = ".")]
    pub base_dir: PathBuf,

    /// Root of the end-to-end experiment output (holds experiment_data/)
    #[arg(long = "e2e-dir", env = "ASB_E2E_PATH", default_value = ".")]
    pub e2e_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize one authenticated-storage run
    Asb(AsbArgs),
    /// Summarize one end-to-end run
    E2e(E2eArgs),
    /// Load every configured run in parallel and print one table per metric
    Sweep(SweepArgs),
}

#[derive(clap::Args, Debug)]
pub struct AsbArgs {
    /// Authenticated storage identifier, e.g. lvmt, rain, mpt
    #[arg(short = 'a', long)]
    pub authdb: String,

    /// Workload size tag, e.g. real, fresh, 1m, 100m
    #[arg(short = 'k', long)]
    pub keys: String,

    #[arg(long, default_value = "osdi23")]
    pub folder: String,

    #[arg(long)]
    pub low_mem: bool,

    /// Memory budget of a high-memory run (0 for the default run)
    #[arg(long, default_value_t = 0)]
    pub high_mem: u32,

    /// Skip the statistics log
    #[arg(long)]
    pub only_time: bool,

    /// Also write the windowed series as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct E2eArgs {
    #[arg(short = 'a', long)]
    pub authdb: String,

    /// Number of initialized keys, e.g. 1m, 5m
    #[arg(short = 's', long)]
    pub size: String,

    /// ERC20 transfers instead of native transfers
    #[arg(long)]
    pub erc20: bool,

    #[arg(long, default_value = "osdi23")]
    pub folder: String,

    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SweepArgs {
    #[arg(long, default_value = "osdi23")]
    pub folder: String,

    /// Sweep end-to-end runs instead of authenticated-storage runs
    #[arg(long)]
    pub e2e: bool,

    /// With --e2e: ERC20 transfers instead of native transfers
    #[arg(long)]
    pub erc20: bool,

    /// Take the run list from the timing logs present in the folder
    #[arg(long)]
    pub discover: bool,
}
