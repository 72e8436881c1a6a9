pub fn e2e_authdbs() -> &'static [&'static str] {
    &["raw", "lvmt", "lvmt64", "lvmt16", "rain", "lmpts", "mpt"]
}

pub fn e2e_sizes() -> &'static [&'static str] { &["1m", "3m", "5m"] }

pub fn asb_authdbs() -> &'static [&'static str] {
    &["lvmt", "lvmt64", "lvmt16", "rain", "mpt", "lvmt1"]
}

pub fn asb_workloads() -> &'static [&'static str] { &["real", "fresh", "1m", "10m", "100m"] }

/// The `real` workload replays a trace on an already-populated store.
pub fn is_warm_workload(keys: &str) -> bool { keys == "real" }

pub fn label(authdb: &str) -> String {
    match authdb {
        "lmpts" => "LMPTs".to_string(),
        "lvmt" => "LVMT-r".to_string(),
        other => other.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(label("lvmt"), "LVMT-r");
        assert_eq!(label("lmpts"), "LMPTs");
        assert_eq!(label("lvmt64"), "LVMT64");
    }
}
