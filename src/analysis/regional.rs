//! Ranking of per-keyword regional interest breakdowns
//!
//! Each keyword is ranked independently; there is no cross-keyword
//! normalization. Entries with non-positive interest never appear in the
//! output.

use crate::models::RegionalEntry;

/// Ranks regional entries descending by interest, truncated to top N
#[derive(Debug, Clone, Copy)]
pub struct RegionalRanker {
    top_n: usize,
}

impl RegionalRanker {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Rank one keyword's regional entries
    #[must_use]
    pub fn rank(&self, entries: &[RegionalEntry]) -> Vec<RegionalEntry> {
        let mut ranked: Vec<RegionalEntry> = entries
            .iter()
            .filter(|e| e.interest > 0.0)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| b.interest.total_cmp(&a.interest));
        ranked.truncate(self.top_n);
        ranked
    }
}
