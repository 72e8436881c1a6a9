use crate::asb::record::{PercentileVector, PERCENTILE_COUNT};
use crate::error::{ParseError, Result};
use crate::number::parse_number;

/// Cheap test for a statistics line: the `10:`, `20:` and `95:` labels in order.
pub fn has_percentile_header(line: &str) -> bool { regex!(r"10:.*20:.*95:").is_match(line) }

/// Extract the twelve `<label>: <value>` pairs of a statistics line.
///
/// Values may use the `k`/`m`/`g` shorthand, thousands separators, or be
/// `none` (NaN). The line must carry all twelve labels in order, otherwise it
/// is a grammar mismatch.
pub fn extract_percentiles(line: &str) -> Result<PercentileVector> {
    let caps = regex!(concat!(
        r"10:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+20:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+30:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+40:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+50:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+60:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+70:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+80:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+90:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+95:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+98:\s*(none|\d[\d,.]*[kmg]?)",
        r"[\s,]+99:\s*(none|\d[\d,.]*[kmg]?)",
    ))
    .captures(line)
    .ok_or_else(|| ParseError::GrammarMismatch {
        pattern: "percentile",
        line: line.to_string(),
    })?;

    let mut out = [f64::NAN; PERCENTILE_COUNT];
    for (slot, value) in out.iter_mut().zip(caps.iter().skip(1)) {
        // every group is mandatory once the whole pattern matched
        if let Some(value) = value {
            // a value directly followed by the `,` separator keeps it in the capture
            *slot = parse_number(value.as_str().trim_end_matches(','))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "  10: 32  20: 40  30: 48  40: 56  50: 64  60: 72  70: 80  80: 96  \
                        90: 128  95: 256  98: 1k  99: 2.5k > Cnt 1520, Avg 120. Write size";

    #[test]
    fn test_header_prefilter() {
        assert!(has_percentile_header(LINE));
        assert!(has_percentile_header("10: x 20: y 95: z"));
        assert!(!has_percentile_header("95: 1 20: 2 10: 3"));
        assert!(!has_percentile_header("     1:     2.500 s > ops"));
    }

    #[test]
    fn test_extract() {
        let values = extract_percentiles(LINE).unwrap();
        assert_eq!(
            values,
            [32.0, 40.0, 48.0, 56.0, 64.0, 72.0, 80.0, 96.0, 128.0, 256.0, 1000.0, 2500.0]
        );
    }

    #[test]
    fn test_extract_none_and_commas() {
        let line = "10: none, 20: none, 30: none, 40: none, 50: 1, 60: 1, 70: 2, 80: 2, \
                    90: 3, 95: 4, 98: 5, 99: 6m";
        let values = extract_percentiles(line).unwrap();
        assert!(values[..4].iter().all(|v| v.is_nan()));
        assert_eq!(values[4], 1.0);
        assert_eq!(values[11], 6e6);
    }

    #[test]
    fn test_extract_thousands_separators() {
        let line = "10: 32  20: 40  30: 48  40: 56  50: 64  60: 72  70: 80  80: 96  \
                    90: 128  95: 256  98: 1,024  99: 2,048";
        let values = extract_percentiles(line).unwrap();
        assert_eq!(values[9], 256.0);
        assert_eq!(values[10], 1024.0);
        assert_eq!(values[11], 2048.0);

        let packed = "10: 1,20: 2,30: 3,40: 4,50: 5,60: 6,70: 7,80: 8,90: 9,95: 1,000,98: 2k,99: 3";
        let values = extract_percentiles(packed).unwrap();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[9], 1000.0);
        assert_eq!(values[10], 2000.0);
    }

    #[test]
    fn test_missing_label_is_grammar_mismatch() {
        let line = "10: 1 20: 2 30: 3 40: 4 50: 5 60: 6 70: 7 80: 8 90: 9 95: 10 99: 11";
        assert!(has_percentile_header(line));
        assert!(matches!(
            extract_percentiles(line),
            Err(ParseError::GrammarMismatch { pattern: "percentile", .. })
        ));
    }
}
