use itertools::Itertools;

/// Consecutive differences, one element shorter than the input.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .tuple_windows()
        .map(|(prev, next)| next - prev)
        .collect()
}

/// Plain arithmetic mean. A single NaN makes the result NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean over the non-NaN values; NaN when there are none.
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, cnt) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, cnt), v| (sum + v, cnt + 1));
    match cnt {
        0 => f64::NAN,
        _ => sum / cnt as f64,
    }
}
