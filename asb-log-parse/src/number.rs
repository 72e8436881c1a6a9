use crate::error::{ParseError, Result};

/// Parse a numeric token as it appears in benchmark logs.
///
/// `3k`, `2.5m` and `1g` are scaled by 1e3, 1e6 and 1e9, the literal `none` is
/// NaN, and anything else is a decimal with optional thousands separators and
/// padding (`" 1,234 "`).
pub fn parse_number(token: &str) -> Result<f64> {
    let trimmed = token.trim();
    let scale = match trimmed.chars().last() {
        Some('k') => Some(1e3),
        Some('m') => Some(1e6),
        Some('g') => Some(1e9),
        _ => None,
    };
    if let Some(scale) = scale {
        let head = &trimmed[..trimmed.len() - 1];
        return Ok(parse_plain(head)? * scale);
    }
    if trimmed == "none" {
        return Ok(f64::NAN);
    }
    parse_plain(trimmed)
}

fn parse_plain(token: &str) -> Result<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().map_err(|source| ParseError::NumericParse {
        token: token.to_string(),
        source,
    })
}
