use std::fmt::Display;

use tracing::warn;

/// Run one independent load and turn any failure into an absent data point.
///
/// The error is logged and dropped here, at the call site of a batch, so that a
/// single broken run does not abort the others.
pub fn maybe<T, E: Display>(load: impl FnOnce() -> Result<T, E>) -> Option<T> {
    match load() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "load failed, data point dropped");
            None
        }
    }
}

/// Like [`maybe`], but a NaN result is absent as well.
pub fn maybe_value<E: Display>(load: impl FnOnce() -> Result<f64, E>) -> Option<f64> {
    maybe(load).filter(|v| !v.is_nan())
}
