//! Container layout search
//!
//! Enumerates every tiling of an ordered unit sequence into rows and
//! columns. Starting from the first unit alone, each step appends the next
//! run of units either to the right of the container (a row extension) or
//! below it (a column extension), rescaling the run to fit flush.

use std::sync::Arc;

use crate::options::LayoutOptions;
use crate::stats::SearchStatistics;
use crate::types::*;

use super::budget::Budget;
use super::collector::OptionCollector;
use super::signature::UnitKey;
use super::state::LayoutState;
use super::{Extension, LayoutOption, LayoutSet, Placement, Signature};

/// One branch of the search: place `units[index..index + length]` as a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    extension: Extension,
    index: usize,
    length: usize,
}

/// Branches from a state whose first unplaced unit is `index`: for every
/// run length, the row extension then the column extension. Row extensions
/// are skipped when the next unit is punctuation.
fn next_steps(units: &[Arc<Unit>], index: usize) -> impl Iterator<Item = Step> + use<> {
    let row_allowed = !units[index].kind().is_punctuation();
    let remaining = units.len() - index;
    (1..=remaining).flat_map(move |length| {
        let row = row_allowed.then_some(Step {
            extension: Extension::Row,
            index,
            length,
        });
        let column = Step {
            extension: Extension::Column,
            index,
            length,
        };
        row.into_iter().chain(std::iter::once(column))
    })
}

fn punctuation_skips(units: &[Arc<Unit>], index: usize) -> u64 {
    if units[index].kind().is_punctuation() {
        (units.len() - index) as u64
    } else {
        0
    }
}

/// Depth-first search over one unit sequence
struct Search<'a> {
    units: &'a [Arc<Unit>],
    keys: &'a [Arc<UnitKey>],
    collector: OptionCollector,
    stats: SearchStatistics,
}

impl<'a> Search<'a> {
    fn new(units: &'a [Arc<Unit>], keys: &'a [Arc<UnitKey>], options: &LayoutOptions) -> Self {
        Self {
            units,
            keys,
            collector: OptionCollector::new(options.pruning),
            stats: SearchStatistics::default(),
        }
    }

    /// Try every next group from `state`
    fn branch(&mut self, state: &LayoutState, index: usize, budget: &mut Budget) {
        self.stats.punctuation_skips += punctuation_skips(self.units, index);
        for step in next_steps(self.units, index) {
            if budget.is_exhausted() {
                return;
            }
            self.extend(state, step, budget);
        }
    }

    fn extend(&mut self, state: &LayoutState, step: Step, budget: &mut Budget) {
        if !budget.tick() {
            return;
        }
        self.stats.nodes_visited += 1;

        let grow = step.extension.growth_axis();
        let fixed = grow.other();
        let run = &self.units[step.index..step.index + step.length];

        // every unit in the run must be as deep as the first along the growth axis
        let depth = run[0].base_size().along(grow);
        if run
            .iter()
            .any(|unit| !approx_eq(unit.base_size().along(grow), depth))
        {
            log::trace!(
                "incompatible run {}..{}",
                step.index,
                step.index + step.length
            );
            self.stats.incompatible_runs += 1;
            return;
        }

        // the run spans the container's current extent on the fixed axis
        let span: f64 = run.iter().map(|unit| unit.base_size().along(fixed)).sum();
        let scale = state.size().along(fixed) / span;

        let mut next = state.clone();
        let mut anchor = Point::ORIGIN.offset(grow, state.size().along(grow));
        for (offset, unit) in run.iter().enumerate() {
            if step.extension == Extension::Column && next.is_forbidden(anchor) {
                log::trace!("unit {} would start on a forbidden anchor", step.index + offset);
                self.stats.forbidden_anchors += 1;
                return;
            }
            let size = unit.base_size().scaled(scale);
            next.place(step.index + offset, size, anchor);
            anchor = anchor.offset(fixed, size.along(fixed));
        }
        next.grow(grow, depth * scale);

        let next_index = step.index + step.length;
        if next_index == self.units.len() {
            self.finish(&next);
        } else {
            self.branch(&next, next_index, budget);
        }
    }

    /// Turn a state holding every unit into a normalized option and offer it
    fn finish(&mut self, state: &LayoutState) {
        let placements = state
            .placements_in_order()
            .into_iter()
            .map(|placed| Placement {
                unit: Arc::clone(&self.units[placed.index]),
                size: placed.size,
                position: placed.position,
            })
            .collect();
        let option = LayoutOption::new(state.size(), placements).normalized();
        let signature = Signature::with_keys(&option, self.keys);
        self.collector
            .offer_counted(option, signature, &mut self.stats);
    }

    fn into_parts(self) -> (OptionCollector, SearchStatistics) {
        (self.collector, self.stats)
    }
}

/// Lays out flat unit sequences
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    /// Create an engine after validating the search policy in `options`
    pub fn new(options: LayoutOptions) -> Result<Self> {
        options.validate_search()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Every valid, normalized, deduplicated tiling of `units`.
    ///
    /// Fails with [`LayoutError::NoUnits`] for an empty slice and
    /// [`LayoutError::InvalidSize`] for a unit without a positive size.
    pub fn layout(&self, units: &[Unit]) -> Result<LayoutSet> {
        let mut budget = Budget::new(&self.options.budget);
        self.layout_within(units, &mut budget)
    }

    /// [`LayoutEngine::layout`] spending from a caller-owned budget
    pub(crate) fn layout_within(&self, units: &[Unit], budget: &mut Budget) -> Result<LayoutSet> {
        if units.is_empty() {
            return Err(LayoutError::NoUnits);
        }
        for (i, unit) in units.iter().enumerate() {
            unit.base_size().validate(format!("unit {}", i))?;
        }

        let units: Vec<Arc<Unit>> = units.iter().cloned().map(Arc::new).collect();
        let mut stats = SearchStatistics {
            engine_runs: 1,
            ..SearchStatistics::default()
        };

        if units.len() == 1 {
            let set = single_unit(&units[0], stats);
            return Ok(set);
        }

        let keys: Vec<Arc<UnitKey>> = units
            .iter()
            .map(|unit| Arc::new(UnitKey::of(unit)))
            .collect();
        let initial = LayoutState::start(units[0].base_size());

        let (collector, search_stats) = if self.options.parallel {
            self.search_parallel(&units, &keys, &initial, budget)
        } else {
            let mut search = Search::new(&units, &keys, &self.options);
            search.branch(&initial, 1, budget);
            search.into_parts()
        };
        stats.merge(&search_stats);

        let min_surface = collector.min_surface();
        let entries = collector.finish(&mut stats);
        let complete = !budget.is_exhausted();

        log::debug!(
            "laid out {} units: {} options, {} nodes, {} dead branches, {} duplicates, {} pruned, min surface {}",
            units.len(),
            entries.len(),
            stats.nodes_visited,
            stats.dead_branches(),
            stats.duplicates,
            stats.pruned,
            min_surface
        );
        if !complete {
            log::warn!(
                "search budget exhausted after {} nodes, returning {} options",
                stats.nodes_visited,
                entries.len()
            );
        }

        Ok(LayoutSet::new(entries, complete, stats))
    }

    /// Run the top-level branches on the rayon pool, each with its own
    /// collector and share of the node budget, then merge in branch order.
    #[cfg(feature = "parallel")]
    fn search_parallel(
        &self,
        units: &[Arc<Unit>],
        keys: &[Arc<UnitKey>],
        initial: &LayoutState,
        budget: &mut Budget,
    ) -> (OptionCollector, SearchStatistics) {
        use rayon::prelude::*;

        let steps: Vec<Step> = next_steps(units, 1).collect();
        let shares = budget.split(steps.len());

        let branches: Vec<(OptionCollector, SearchStatistics, Budget)> = steps
            .into_par_iter()
            .zip(shares)
            .map(|(step, mut share)| {
                let mut search = Search::new(units, keys, &self.options);
                search.extend(initial, step, &mut share);
                let (collector, stats) = search.into_parts();
                (collector, stats, share)
            })
            .collect();

        let mut merged = OptionCollector::new(self.options.pruning);
        let mut stats = SearchStatistics {
            punctuation_skips: punctuation_skips(units, 1),
            ..SearchStatistics::default()
        };
        let mut spent = Vec::with_capacity(branches.len());
        for (collector, mut branch_stats, share) in branches {
            let entries = collector.finish(&mut branch_stats);
            stats.merge_work(&branch_stats);
            for (option, signature) in entries {
                merged.offer_counted(option, signature, &mut stats);
            }
            spent.push(share);
        }
        budget.absorb(spent);

        (merged, stats)
    }

    #[cfg(not(feature = "parallel"))]
    fn search_parallel(
        &self,
        units: &[Arc<Unit>],
        keys: &[Arc<UnitKey>],
        initial: &LayoutState,
        budget: &mut Budget,
    ) -> (OptionCollector, SearchStatistics) {
        log::warn!("parallel search requested but the `parallel` feature is disabled");
        let mut search = Search::new(units, keys, &self.options);
        search.branch(initial, 1, budget);
        search.into_parts()
    }
}

/// A lone unit is its own container, at its own size
fn single_unit(unit: &Arc<Unit>, mut stats: SearchStatistics) -> LayoutSet {
    let size = unit.base_size();
    let option = LayoutOption::new(
        size,
        vec![Placement {
            unit: Arc::clone(unit),
            size,
            position: Point::ORIGIN,
        }],
    );
    let signature = option.signature();
    stats.emitted += 1;
    LayoutSet::new(vec![(option, signature)], true, stats)
}

/// Lay out `units` with the default options
pub fn layout(units: &[Unit]) -> Result<LayoutSet> {
    LayoutEngine::default().layout(units)
}
