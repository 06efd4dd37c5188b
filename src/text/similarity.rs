//! Fuzzy string comparison used for committed-prefix alignment.

/// Case-insensitive normalized similarity between two sentences, in 0.0..=1.0.
///
/// 1.0 means identical (ignoring case); 0.0 means entirely different or
/// either side empty. The 0.65 acceptance threshold lives in configuration,
/// not here — it is a tunable heuristic, not a contract.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}
