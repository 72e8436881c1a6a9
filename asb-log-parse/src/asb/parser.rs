use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tracing::trace;

use crate::asb::percentile::{extract_percentiles, has_percentile_header};
use crate::asb::record::{AsbRow, PendingStats, StatSnapshot, Summary, TrackedMetric};
use crate::error::{ParseError, Result};
use crate::number::parse_number;

/// What a single log line is, as far as the sample parser cares.
#[derive(Debug)]
pub enum LineKind<'a> {
    Summary(Summary),
    Statistics {
        count: u64,
        average: f64,
        metric: &'a str,
    },
    Unrecognized,
}

pub fn classify_line(line: &str) -> Result<LineKind<'_>> {
    let summary = regex!(concat!(
        r"^([ \d]{6,}): ([ .\d]{7,}) s > ([ \d,]{7,}) ops, [ .\d]{7,} us/op, ",
        r"([ ,\d]{5,}) empty reads > Read amp ([ ,.\d]{6,}), Write amp ([ ,.\d]{6,}) > .*"
    ));
    if let Some(caps) = summary.captures(line) {
        let field = |i: usize| parse_number(&caps[i]);
        return Ok(LineKind::Summary(Summary {
            epoch: field(1)?,
            elapsed: field(2)?,
            ops: field(3)?,
            empty_reads: field(4)?,
            read_amp: field(5)?,
            write_amp: field(6)?,
        }));
    }

    if !has_percentile_header(line) {
        return Ok(LineKind::Unrecognized);
    }

    let caps = regex!(r"^.*> Cnt\s*(\d+), Avg\s*(\d+[kmg]?|none)\. (.*)$")
        .captures(line)
        .ok_or_else(|| ParseError::GrammarMismatch {
            pattern: "statistics",
            line: line.to_string(),
        })?;
    let metric = caps.get(3).map_or("", |m| m.as_str().trim_end());
    Ok(LineKind::Statistics {
        count: caps[1]
            .parse::<u64>()
            .map_err(|source| ParseError::CountParse {
                token: caps[1].to_string(),
                source,
            })?,
        average: parse_number(&caps[2])?,
        metric,
    })
}

/// Pull-driven parser over a periodic-sample log.
///
/// Statistics lines fill the pending slots; every summary line emits one row
/// with whatever the slots hold and clears them.
pub struct AsbParser<R> {
    lines: Lines<R>,
    pending: PendingStats,
}

impl<R: BufRead> AsbParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: PendingStats::default(),
        }
    }

    fn feed(&mut self, line: &str) -> Result<Option<AsbRow>> {
        match classify_line(line)? {
            LineKind::Summary(summary) => {
                let (read, write) = self.pending.take();
                Ok(Some(AsbRow {
                    summary,
                    read,
                    write,
                }))
            }
            LineKind::Statistics {
                count,
                average,
                metric,
            } => {
                match TrackedMetric::from_name(metric) {
                    Some(tracked) => {
                        let snapshot = StatSnapshot {
                            count: Some(count),
                            average,
                            percentiles: extract_percentiles(line)?,
                        };
                        self.pending.observe(tracked, snapshot);
                    }
                    None => trace!(metric, "untracked statistics line"),
                }
                Ok(None)
            }
            LineKind::Unrecognized => Ok(None),
        }
    }
}

impl<R: BufRead> Iterator for AsbParser<R> {
    type Item = Result<AsbRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            match self.feed(&line) {
                Ok(Some(row)) => return Some(Ok(row)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Parse a whole log into rows, stopping at the first error.
pub fn parse_rows<R: BufRead>(reader: R) -> Result<Vec<AsbRow>> { AsbParser::new(reader).collect() }

pub fn load_rows(path: &Path) -> Result<Vec<AsbRow>> {
    let file = File::open(path)?;
    parse_rows(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn summary_line(epoch: u32, time: f64, ops: u32, empty: u32, ra: f64, wa: f64) -> String {
        format!(
            "{:>6}: {:>9.3} s > {:>10} ops, {:>9.3} us/op, {:>7} empty reads > \
             Read amp {:>7.3}, Write amp {:>7.3} > epoch done",
            epoch, time, ops, 12.5, empty, ra, wa
        )
    }

    fn stat_line(name: &str, count: u32, avg: &str) -> String {
        format!(
            "  10: 32  20: 40  30: 48  40: 56  50: 64  60: 72  70: 80  80: 96  \
             90: 128  95: 256  98: 1k  99: 2k > Cnt {:>6}, Avg {:>4}. {}",
            count, avg, name
        )
    }

    fn parse(text: &str) -> Vec<AsbRow> { parse_rows(Cursor::new(text.to_string())).unwrap() }

    #[test]
    fn test_summary_grammar() {
        let line = summary_line(1, 2.5, 100, 3, 1.2, 0.9);
        let LineKind::Summary(s) = classify_line(&line).unwrap() else {
            panic!("not a summary line: {line}");
        };
        assert_eq!(
            s,
            Summary {
                epoch: 1.0,
                elapsed: 2.5,
                ops: 100.0,
                empty_reads: 3.0,
                read_amp: 1.2,
                write_amp: 0.9,
            }
        );
    }

    #[test]
    fn test_summary_thousands_separator() {
        let line = "   120:    35.125 s >  1,250,000 ops,     0.750 us/op,  12,345 empty reads > \
                    Read amp   2.500, Write amp   4.250 > ...";
        let LineKind::Summary(s) = classify_line(line).unwrap() else {
            panic!("not a summary line");
        };
        assert_eq!(s.epoch, 120.0);
        assert_eq!(s.ops, 1_250_000.0);
        assert_eq!(s.empty_reads, 12_345.0);
        assert_eq!(s.write_amp, 4.25);
    }

    #[test]
    fn test_unrecognized_only() {
        let text = "starting benchmark\nloading 1000000 keys\n\n[stat] flushing\n";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_write_stat_then_summary() {
        let text = [
            stat_line("Write size", 5, "120"),
            summary_line(1, 2.5, 100, 3, 1.2, 0.9),
            summary_line(2, 5.0, 100, 3, 1.2, 0.9),
        ]
        .join("\n");
        let rows = parse(&text);
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.summary.epoch, 1.0);
        assert_eq!(first.summary.elapsed, 2.5);
        assert_eq!(first.summary.ops, 100.0);
        assert_eq!(first.write.count, Some(5));
        assert_eq!(first.write.average, 120.0);
        assert_eq!(first.write.percentiles[10], 1000.0);
        assert_eq!(first.read.count, None);
        assert!(first.read.average.is_nan());

        let second = &rows[1];
        assert!(!second.read.is_observed() && !second.write.is_observed());
        assert!(second.write.average.is_nan());
        assert!(second.write.percentiles.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_stats_after_summary_go_to_next_row() {
        let text = [
            summary_line(1, 2.5, 100, 3, 1.2, 0.9),
            stat_line("Non-empty read size", 7, "64"),
            stat_line("Write size", 9, "2k"),
            summary_line(2, 5.0, 100, 3, 1.2, 0.9),
        ]
        .join("\n");
        let rows = parse(&text);
        assert!(!rows[0].read.is_observed());
        assert_eq!(rows[1].read.count, Some(7));
        assert_eq!(rows[1].read.average, 64.0);
        assert_eq!(rows[1].write.average, 2000.0);
    }

    #[test]
    fn test_none_average_and_untracked_metric() {
        let text = [
            stat_line("Non-empty read size", 0, "none"),
            stat_line("Empty read size", 42, "8"),
            summary_line(1, 2.5, 100, 3, 1.2, 0.9),
        ]
        .join("\n");
        let rows = parse(&text);
        assert_eq!(rows[0].read.count, Some(0));
        assert!(rows[0].read.average.is_nan());
        assert!(!rows[0].write.is_observed());
    }

    #[test]
    fn test_count_is_exact() {
        let text = [
            stat_line("Write size", 0, "1"),
            summary_line(1, 2.5, 100, 3, 1.2, 0.9),
        ]
        .join("\n")
        .replace("Cnt      0", "Cnt 9007199254740993");
        let rows = parse(&text);
        assert_eq!(rows[0].write.count, Some(9_007_199_254_740_993));

        let overflow = stat_line("Write size", 0, "1").replace("Cnt      0", "Cnt 99999999999999999999");
        assert!(matches!(
            classify_line(&overflow),
            Err(ParseError::CountParse { .. })
        ));
    }

    #[test]
    fn test_broken_statistics_line_fails() {
        let text = "10: 1 20: 2 95: 3 without a count\n";
        let err = parse_rows(Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::GrammarMismatch {
                pattern: "statistics",
                ..
            }
        ));
    }

    #[test]
    fn test_reparse_is_identical() {
        let text = [
            stat_line("Write size", 5, "120"),
            summary_line(1, 2.5, 100, 3, 1.2, 0.9),
            stat_line("Non-empty read size", 7, "none"),
            summary_line(2, 5.0, 200, 4, 1.1, 0.8),
        ]
        .join("\n");
        let first: Vec<_> = parse(&text).iter().map(|r| format!("{:?}", r.to_array())).collect();
        let second: Vec<_> = parse(&text).iter().map(|r| format!("{:?}", r.to_array())).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iterator_is_lazy() {
        let text = [
            summary_line(1, 2.5, 100, 3, 1.2, 0.9),
            "10: 1 20: 2 95: 3 broken".to_string(),
        ]
        .join("\n");
        let mut parser = AsbParser::new(Cursor::new(text));
        assert!(parser.next().unwrap().is_ok());
        assert!(parser.next().unwrap().is_err());
    }
}
