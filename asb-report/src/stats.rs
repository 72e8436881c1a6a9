use asb_log_parse::stats::nan_mean;

/// Shape of one windowed series.
///
/// `missing` counts the samples without a value (statistics that were not
/// printed for that sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub mean: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
    pub observed: usize,
    pub missing: usize,
}

pub fn summarize(series: &[f64]) -> SeriesSummary {
    let mut observed: Vec<f64> = series.iter().copied().filter(|v| !v.is_nan()).collect();
    observed.sort_by(f64::total_cmp);

    let min = observed.first().copied().unwrap_or(f64::NAN);
    let max = observed.last().copied().unwrap_or(f64::NAN);
    let median = match observed.len() {
        0 => f64::NAN,
        n if n % 2 == 1 => observed[n / 2],
        n => (observed[n / 2 - 1] + observed[n / 2]) / 2.0,
    };

    SeriesSummary {
        mean: nan_mean(series.iter().copied()),
        min,
        median,
        max,
        observed: observed.len(),
        missing: series.len() - observed.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_skips_unobserved() {
        let s = summarize(&[3.0, f64::NAN, 1.0, 2.0, 10.0]);
        assert_eq!(s.observed, 4);
        assert_eq!(s.missing, 1);
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.median, 2.5);
        assert_eq!((s.min, s.max), (1.0, 10.0));
    }

    #[test]
    fn test_summarize_odd_window() {
        let s = summarize(&[5.0, 1.0, 3.0]);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.mean, 3.0);
    }

    #[test]
    fn test_summarize_nothing_observed() {
        let s = summarize(&[f64::NAN, f64::NAN]);
        assert_eq!(s.observed, 0);
        assert_eq!(s.missing, 2);
        assert!(s.mean.is_nan() && s.median.is_nan() && s.max.is_nan());
        assert_eq!(summarize(&[]).missing, 0);
    }
}
