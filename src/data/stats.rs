use std::collections::BTreeMap;

use super::model::HouseRecord;

/// Mean sale price per neighborhood, highest first.  Equal averages are
/// ordered by name.
pub fn average_price_by_neighborhood(records: &[HouseRecord]) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry(r.neighborhood.as_str()).or_default();
        entry.0 += r.sale_price as u64;
        entry.1 += 1;
    }
    let mut out: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(name, (sum, n))| (name.to_string(), sum as f64 / n as f64))
        .collect();
    // BTreeMap order is by name, and the sort is stable
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

/// The `n` most recently built listings; ties keep dataset order.
pub fn newest_listings(records: &[HouseRecord], n: usize) -> Vec<HouseRecord> {
    let mut sorted: Vec<&HouseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.year_built.cmp(&a.year_built));
    sorted.into_iter().take(n).cloned().collect()
}
