/// Counters collected while searching for layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStatistics {
    /// Engine invocations (more than one when composing)
    pub engine_runs: u64,
    /// Group placements attempted
    pub nodes_visited: u64,
    /// Groups whose units disagreed on the shared extent
    pub incompatible_runs: u64,
    /// Groups rejected because a unit would start on a forbidden anchor
    pub forbidden_anchors: u64,
    /// Row extensions skipped because the next unit is punctuation
    pub punctuation_skips: u64,
    /// Finished options dropped as duplicates
    pub duplicates: u64,
    /// Finished options dropped by surface pruning
    pub pruned: u64,
    /// Options returned
    pub emitted: u64,
}

impl SearchStatistics {
    /// Branches that ended without producing an option
    pub fn dead_branches(&self) -> u64 {
        self.incompatible_runs + self.forbidden_anchors
    }

    /// Options that reached finalization, kept or not
    pub fn finished(&self) -> u64 {
        self.emitted + self.duplicates + self.pruned
    }

    /// Add another search's counters to these
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.engine_runs += other.engine_runs;
        self.nodes_visited += other.nodes_visited;
        self.incompatible_runs += other.incompatible_runs;
        self.forbidden_anchors += other.forbidden_anchors;
        self.punctuation_skips += other.punctuation_skips;
        self.duplicates += other.duplicates;
        self.pruned += other.pruned;
        self.emitted += other.emitted;
    }

    /// Like [`SearchStatistics::merge`], but leaves `emitted` alone. For
    /// searches whose options are not returned directly (sub-parts, parallel
    /// branches that are merged again).
    pub fn merge_work(&mut self, other: &SearchStatistics) {
        self.merge(&SearchStatistics {
            emitted: 0,
            ..*other
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchStatistics {
        SearchStatistics {
            engine_runs: 1,
            nodes_visited: 12,
            incompatible_runs: 3,
            forbidden_anchors: 1,
            punctuation_skips: 2,
            duplicates: 1,
            pruned: 2,
            emitted: 4,
        }
    }

    #[test]
    fn test_derived_counts() {
        let stats = sample();
        assert_eq!(stats.dead_branches(), 4);
        assert_eq!(stats.finished(), 7);
    }

    #[test]
    fn test_merge_work_leaves_emitted() {
        let mut total = SearchStatistics::default();
        total.merge(&sample());
        total.merge_work(&sample());
        assert_eq!(total.engine_runs, 2);
        assert_eq!(total.nodes_visited, 24);
        assert_eq!(total.pruned, 4);
        assert_eq!(total.emitted, 4);
    }
}
