use asb_log_parse::asb::record::PERCENTILES;
use asb_log_parse::asb::AsbData;
use asb_log_parse::e2e::{CounterRegistry, E2eData};
use prettytable::{Cell, Row, Table};
use std::collections::HashMap;

use crate::config::label;
use crate::loader::SweepCell;
use crate::stats::{summarize, SeriesSummary};

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Fixed2,
    /// Integers without decimals, everything else with two.
    Auto,
}

fn format_value(v: f64, fmt: Format) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    match fmt {
        Format::Fixed2 => format!("{:.2}", v),
        Format::Auto => {
            if (v - v.round()).abs() < 1e-9 {
                format!("{}", v as i64)
            } else {
                format!("{:.2}", v)
            }
        }
    }
}

/// One row per series over the steady window.
fn summary_table() -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(
        ["series", "mean", "min", "median", "max", "samples", "missing"]
            .into_iter()
            .map(Cell::new)
            .collect(),
    ));
    table
}

fn summary_row(name: &str, series: &[f64], fmt: Format) -> Row {
    let SeriesSummary {
        mean,
        min,
        median,
        max,
        observed,
        missing,
    } = summarize(series);
    let mut cells = vec![Cell::new(name)];
    cells.extend(
        [mean, min, median, max]
            .into_iter()
            .map(|v| Cell::new(&format_value(v, fmt))),
    );
    cells.push(Cell::new(&observed.to_string()));
    cells.push(Cell::new(&missing.to_string()));
    Row::new(cells)
}

pub fn asb_table(data: &AsbData) -> Table {
    let mut table = summary_table();
    for (name, series, fmt) in [
        ("ops per sample", data.throughput(), Format::Auto),
        ("sample latency (s)", data.latency(), Format::Fixed2),
        ("empty reads", data.empty_reads(), Format::Auto),
        ("read amplification", data.read_amp(), Format::Fixed2),
        ("write amplification", data.write_amp(), Format::Fixed2),
    ] {
        table.add_row(summary_row(name, series, fmt));
    }

    if let Some(sizes) = data.sizes() {
        for (name, series) in [
            ("non-empty read count", &sizes.read_count),
            ("non-empty read size", &sizes.read_size),
            ("write count", &sizes.write_count),
            ("write size", &sizes.write_size),
        ] {
            table.add_row(summary_row(name, series, Format::Auto));
        }
    }
    if let Some(read_size) = data.effective_read_size() {
        table.add_row(summary_row("backend bytes per read", &read_size, Format::Fixed2));
    }
    table
}

/// Mean size distribution over the window; `None` without statistics.
pub fn percentile_table(data: &AsbData) -> Option<Table> {
    let read = data.read_percentile_profile()?;
    let write = data.write_percentile_profile()?;

    let mut table = Table::new();
    let mut titles = vec![Cell::new("size (bytes)")];
    titles.extend(PERCENTILES.iter().map(|p| Cell::new(&format!("P{}", p))));
    table.set_titles(Row::new(titles));

    for (name, profile) in [("non-empty read", read), ("write", write)] {
        let mut cells = vec![Cell::new(name)];
        cells.extend(
            profile
                .iter()
                .map(|v| Cell::new(&format_value(*v, Format::Fixed2))),
        );
        table.add_row(Row::new(cells));
    }
    Some(table)
}

pub fn e2e_table(data: &E2eData, registry: &CounterRegistry) -> Table {
    let mut table = summary_table();
    table.add_row(summary_row("tps", &data.tps(), Format::Fixed2));
    for (i, counter) in registry.iter().enumerate() {
        let name = format!("rate of {}", counter.label());
        table.add_row(summary_row(&name, &data.rate(i + 1), Format::Fixed2));
    }
    table
}

pub fn print_e2e_summary(data: &E2eData) {
    let duration = data.timestamp().last().copied().unwrap_or(0.0);
    println!("Steady window is {:.2} seconds ({} records)", duration, data.len());
    println!("Mean throughput is {:.2} tx/s", data.mean_tps());
    let b = data.breakdown();
    println!(
        "Time per tx (us): execution engine {:.2}, authenticated structure {:.2}, backend {:.2}",
        b.execution, b.authenticated, b.backend
    );
}

/// Workloads as rows, storage systems as columns; unloadable runs print as `-`.
pub fn grid_table<T>(
    cells: &[SweepCell<T>],
    workloads: &[String],
    authdbs: &[String],
    value: impl Fn(&T) -> Option<f64>,
    fmt: Format,
) -> Table {
    let index: HashMap<(&str, &str), Option<f64>> = cells
        .iter()
        .map(|c| {
            (
                (c.authdb.as_str(), c.workload.as_str()),
                c.value.as_ref().and_then(&value),
            )
        })
        .collect();

    let mut table = Table::new();
    let mut titles = vec![Cell::new("workload")];
    titles.extend(authdbs.iter().map(|a| Cell::new(&label(a))));
    table.set_titles(Row::new(titles));

    for workload in workloads {
        let mut row = vec![Cell::new(workload)];
        for authdb in authdbs {
            let text = match index.get(&(authdb.as_str(), workload.as_str())) {
                Some(Some(v)) => format_value(*v, fmt),
                _ => "-".to_string(),
            };
            row.push(Cell::new(&text));
        }
        table.add_row(Row::new(row));
    }
    table
}
