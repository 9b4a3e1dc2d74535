//! Per-name draw statistics, derived from the ledger on every read.

use crate::types::{DrawRecord, StatsEntry, NO_DATA_NAME};
use std::collections::HashMap;

/// Count draws per name and sort by count, most drawn first.
///
/// Names with equal counts keep the order in which they first appear in the
/// ledger. Percentages are relative to the full ledger length.
pub fn compute_stats(ledger: &[DrawRecord]) -> Vec<StatsEntry> {
    // name -> (first index, count)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, record) in ledger.iter().enumerate() {
        tally.entry(record.name.as_str()).or_insert((i, 0)).1 += 1;
    }

    let mut rows: Vec<(&str, usize, usize)> = tally
        .into_iter()
        .map(|(name, (first, count))| (name, first, count))
        .collect();
    rows.sort_unstable_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));

    let total = ledger.len();
    rows.into_iter()
        .map(|(name, _, count)| StatsEntry {
            name: name.to_string(),
            count,
            percentage: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// The most drawn name, or a `<no-data>` placeholder.
pub fn top_entry(stats: &[StatsEntry]) -> StatsEntry {
    stats.first().cloned().unwrap_or_else(|| StatsEntry {
        name: NO_DATA_NAME.to_string(),
        count: 0,
        percentage: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ledger(names: &[&str]) -> Vec<DrawRecord> {
        names.iter().map(|n| DrawRecord::new(*n, "t")).collect()
    }

    #[test]
    fn test_counts_and_percentages() {
        let stats = compute_stats(&ledger(&["A", "B", "A", "C", "A", "B"]));
        let summary: Vec<_> = stats.iter().map(|e| (e.name.as_str(), e.count)).collect();
        assert_eq!(summary, [("A", 3), ("B", 2), ("C", 1)]);
        assert!((stats[0].percentage - 50.0).abs() < 1e-9);
        assert!((stats[2].percentage - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_follow_first_appearance() {
        let stats = compute_stats(&ledger(&["Z", "M", "A", "M", "Z", "A"]));
        let names: Vec<_> = stats.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Z", "M", "A"]);
    }

    #[test]
    fn test_empty_ledger() {
        let stats = compute_stats(&[]);
        assert!(stats.is_empty());
        let top = top_entry(&stats);
        assert_eq!(top.name, NO_DATA_NAME);
        assert_eq!(top.count, 0);
    }

    #[test]
    fn test_top_entry_is_first() {
        let stats = compute_stats(&ledger(&["B", "A", "A"]));
        assert_eq!(top_entry(&stats).name, "A");
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_ledger_len(names in prop::collection::vec("[a-e]", 0..200)) {
            let records: Vec<DrawRecord> =
                names.iter().map(|n| DrawRecord::new(n.as_str(), "t")).collect();
            let stats = compute_stats(&records);

            prop_assert_eq!(stats.iter().map(|e| e.count).sum::<usize>(), records.len());
            prop_assert!(stats.windows(2).all(|w| w[0].count >= w[1].count));
            if !records.is_empty() {
                let pct: f64 = stats.iter().map(|e| e.percentage).sum();
                prop_assert!((pct - 100.0).abs() < 1e-6);
            }
        }
    }
}
