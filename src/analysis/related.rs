//! Ranking of related-topic and related-query result sets
//!
//! Keeps the top N entries by provider-assigned score. The sort is stable
//! so provider order is preserved on ties. Missing input yields empty
//! lists, never an error.

use crate::models::{RelatedEntry, RelatedSet};

/// Trims related result sets to the top N by score
#[derive(Debug, Clone, Copy)]
pub struct RelatedRanker {
    top_n: usize,
}

impl RelatedRanker {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Rank both lists of a related set
    #[must_use]
    pub fn rank(&self, set: RelatedSet) -> RelatedSet {
        RelatedSet {
            top: self.rank_entries(set.top),
            rising: self.rank_entries(set.rising),
        }
    }

    fn rank_entries(&self, mut entries: Vec<RelatedEntry>) -> Vec<RelatedEntry> {
        entries.sort_by_key(|e| std::cmp::Reverse(e.value()));
        entries.truncate(self.top_n);
        entries
    }
}
