//! Deduplication and surface pruning of finished options

use std::collections::HashSet;

use crate::options::SurfacePruning;
use crate::stats::SearchStatistics;

use super::{LayoutOption, Signature};

/// What happened to an offered option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offer {
    Kept,
    Duplicate,
    Pruned,
}

/// Result set under construction
#[derive(Debug)]
pub(crate) struct OptionCollector {
    pruning: SurfacePruning,
    seen: HashSet<Signature>,
    entries: Vec<(LayoutOption, Signature)>,
    min_surface: f64,
}

impl OptionCollector {
    pub(crate) fn new(pruning: SurfacePruning) -> Self {
        Self {
            pruning,
            seen: HashSet::new(),
            entries: Vec::new(),
            min_surface: f64::INFINITY,
        }
    }

    /// Smallest surface offered so far, kept or not
    pub(crate) fn min_surface(&self) -> f64 {
        self.min_surface
    }

    pub(crate) fn offer(&mut self, option: LayoutOption, signature: Signature) -> Offer {
        self.min_surface = self.min_surface.min(option.surface());

        if self.seen.contains(&signature) {
            return Offer::Duplicate;
        }
        if !self.within_bound(&option) {
            return Offer::Pruned;
        }

        self.seen.insert(signature.clone());
        self.entries.push((option, signature));
        Offer::Kept
    }

    /// Offer an option and count the outcome
    pub(crate) fn offer_counted(
        &mut self,
        option: LayoutOption,
        signature: Signature,
        stats: &mut SearchStatistics,
    ) {
        match self.offer(option, signature) {
            Offer::Kept => stats.emitted += 1,
            Offer::Duplicate => stats.duplicates += 1,
            Offer::Pruned => stats.pruned += 1,
        }
    }

    fn within_bound(&self, option: &LayoutOption) -> bool {
        match self.pruning.factor {
            Some(factor) => option.surface() / self.min_surface < factor,
            None => true,
        }
    }

    /// Collected options in discovery order, re-filtered against the final
    /// minimum surface when the policy asks for it
    pub(crate) fn finish(self, stats: &mut SearchStatistics) -> Vec<(LayoutOption, Signature)> {
        let mut entries = self.entries;
        if self.pruning.recheck_final {
            if let Some(factor) = self.pruning.factor {
                let before = entries.len();
                let min_surface = self.min_surface;
                entries.retain(|(option, _)| option.surface() / min_surface < factor);
                let removed = (before - entries.len()) as u64;
                stats.pruned += removed;
                stats.emitted -= removed.min(stats.emitted);
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::Placement;
    use crate::types::{Point, Size, Unit, UnitKind};

    fn option(width: f64, height: f64) -> LayoutOption {
        let unit = Unit::token(UnitKind::WordGlyph, "jan", Size::new(width, height)).unwrap();
        let placement = Placement {
            unit: Arc::new(unit),
            size: Size::new(width, height),
            position: Point::ORIGIN,
        };
        LayoutOption::new(Size::new(width, height), vec![placement])
    }

    fn offer(collector: &mut OptionCollector, width: f64, height: f64) -> Offer {
        let option = option(width, height);
        let signature = option.signature();
        collector.offer(option, signature)
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let mut collector = OptionCollector::new(SurfacePruning::default());
        assert_eq!(offer(&mut collector, 2.0, 1.0), Offer::Kept);
        assert_eq!(offer(&mut collector, 2.0, 1.0), Offer::Duplicate);
        assert_eq!(offer(&mut collector, 1.0, 2.0), Offer::Kept);
    }

    #[test]
    fn test_surface_bound_uses_running_minimum() {
        let mut collector = OptionCollector::new(SurfacePruning::default());
        assert_eq!(offer(&mut collector, 4.0, 1.0), Offer::Kept);
        // 2x the minimum is not strictly below the factor
        assert_eq!(offer(&mut collector, 8.0, 1.0), Offer::Pruned);
        assert_eq!(offer(&mut collector, 1.0, 1.0), Offer::Kept);
        // the early 4x1 option stays: the bound only applies on arrival
        assert_eq!(collector.min_surface(), 1.0);

        let mut stats = SearchStatistics::default();
        assert_eq!(collector.finish(&mut stats).len(), 2);
    }

    #[test]
    fn test_recheck_final_reapplies_bound() {
        let pruning = SurfacePruning {
            recheck_final: true,
            ..SurfacePruning::default()
        };
        let mut collector = OptionCollector::new(pruning);
        let mut stats = SearchStatistics::default();
        for (w, h) in [(4.0, 1.0), (1.0, 1.0)] {
            let option = option(w, h);
            let signature = option.signature();
            collector.offer_counted(option, signature, &mut stats);
        }
        assert_eq!(stats.emitted, 2);

        let entries = collector.finish(&mut stats);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.surface(), 1.0);
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.pruned, 1);
    }

    #[test]
    fn test_disabled_pruning_keeps_everything_unique() {
        let mut collector = OptionCollector::new(SurfacePruning::disabled());
        assert_eq!(offer(&mut collector, 1.0, 1.0), Offer::Kept);
        assert_eq!(offer(&mut collector, 100.0, 1.0), Offer::Kept);
        assert_eq!(offer(&mut collector, 100.0, 1.0), Offer::Duplicate);
    }
}
