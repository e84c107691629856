//! Compound layout of nested sentence parts
//!
//! Every part is laid out on its own first: leaves by sizing their tokens and
//! running the engine, internal parts by composing their children. Each of a
//! part's options then becomes a single opaque unit at the parent level, and
//! the parent is laid out once for every combination of child options.

use crate::layout::{Budget, LayoutEngine, LayoutSet, OptionCollector};
use crate::options::{LayoutOptions, SurfacePruning};
use crate::sizer::{SizeTables, UnitSizer};
use crate::stats::SearchStatistics;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural role of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PartRole {
    /// Subject, verb or object phrase, prepositional phrase, ...
    #[default]
    Normal,
    /// Punctuation; its layouts are never placed alone to the right
    Punctuation,
    /// A proper name written as syllables in a cartouche
    ProperName,
}

/// Contents of a part
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PartBody {
    /// A leaf: tokens to size and lay out
    Tokens(Vec<String>),
    /// An internal node: sub-parts to lay out first
    Parts(Vec<Part>),
}

/// A node of a structured sentence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Part {
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: PartRole,
    /// Token drawn around or before the part (`li`, `e`, `pi`, `cartouche`, ...)
    #[cfg_attr(feature = "serde", serde(default))]
    pub separator: Option<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub body: PartBody,
}

impl Part {
    /// A leaf of word glyphs
    pub fn words<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            role: PartRole::Normal,
            separator: None,
            body: PartBody::Tokens(tokens.into_iter().map(Into::into).collect()),
        }
    }

    /// A leaf of punctuation marks
    pub fn punctuation<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            role: PartRole::Punctuation,
            ..Self::words(tokens)
        }
    }

    /// A proper name in a cartouche, given as syllables
    pub fn name<I, T>(syllables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            role: PartRole::ProperName,
            separator: Some("cartouche".to_string()),
            ..Self::words(syllables)
        }
    }

    /// An internal node
    pub fn group(parts: Vec<Part>) -> Self {
        Self {
            role: PartRole::Normal,
            separator: None,
            body: PartBody::Parts(parts),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_role(mut self, role: PartRole) -> Self {
        self.role = role;
        self
    }

    /// Unit kind the part's layouts take at the parent level
    pub fn unit_kind(&self) -> UnitKind {
        match self.role {
            PartRole::Punctuation => UnitKind::Punctuation,
            PartRole::Normal | PartRole::ProperName => UnitKind::Container,
        }
    }

    /// Unit kind of the tokens of a leaf
    pub fn token_kind(&self) -> UnitKind {
        match self.role {
            PartRole::ProperName => UnitKind::SyllableGlyph,
            PartRole::Normal | PartRole::Punctuation => UnitKind::WordGlyph,
        }
    }
}

/// Lays out part trees
#[derive(Debug, Clone)]
pub struct Composer<S = SizeTables> {
    engine: LayoutEngine,
    sizer: S,
}

impl Composer<SizeTables> {
    /// Composer sizing tokens with the tables in `options`
    pub fn new(options: LayoutOptions) -> Result<Self> {
        options.validate_sizes()?;
        let sizer = options.sizes.clone();
        Self::with_sizer(options, sizer)
    }
}

impl Default for Composer<SizeTables> {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            sizer: SizeTables::default(),
        }
    }
}

impl<S: UnitSizer> Composer<S> {
    /// Composer sizing tokens with `sizer`. The size tables in `options`
    /// are neither used nor validated.
    pub fn with_sizer(options: LayoutOptions, sizer: S) -> Result<Self> {
        Ok(Self {
            engine: LayoutEngine::new(options)?,
            sizer,
        })
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Every layout of a single part
    pub fn compose(&self, part: &Part) -> Result<LayoutSet> {
        let mut budget = Budget::new(&self.engine.options().budget);
        self.compose_within(part, &mut budget)
    }

    /// Every layout of a sentence made of `parts`
    pub fn compose_sentence(&self, parts: &[Part]) -> Result<LayoutSet> {
        let mut budget = Budget::new(&self.engine.options().budget);
        self.sentence(parts, &mut budget)
    }

    fn compose_within(&self, part: &Part, budget: &mut Budget) -> Result<LayoutSet> {
        match &part.body {
            PartBody::Tokens(tokens) => self.leaf(part, tokens, budget),
            PartBody::Parts(parts) => self.sentence(parts, budget),
        }
    }

    fn leaf(&self, part: &Part, tokens: &[String], budget: &mut Budget) -> Result<LayoutSet> {
        if tokens.is_empty() {
            log::warn!("empty part to lay out");
            return Err(LayoutError::NoUnits);
        }

        let kind = part.token_kind();
        let units = tokens
            .iter()
            .map(|token| Unit::token(kind, token.as_str(), self.sizer.size_of(token, kind)))
            .collect::<Result<Vec<_>>>()?;

        self.engine.layout_within(&units, budget)
    }

    fn sentence(&self, parts: &[Part], budget: &mut Budget) -> Result<LayoutSet> {
        if parts.is_empty() {
            log::warn!("empty text to lay out");
            return Err(LayoutError::NoUnits);
        }

        let mut stats = SearchStatistics::default();
        let mut candidates = Vec::with_capacity(parts.len());
        for part in parts {
            let set = self.compose_within(part, budget)?;
            stats.merge_work(set.statistics());

            let kind = part.unit_kind();
            let units = set
                .into_options()
                .into_iter()
                .map(|option| Unit::nested(kind, option, part.separator.clone()))
                .collect::<Result<Vec<_>>>()?;
            candidates.push(units);
        }

        let combinations = candidates
            .iter()
            .fold(1usize, |total, units| total.saturating_mul(units.len()));
        log::debug!(
            "composing {} parts over {} option combinations",
            parts.len(),
            combinations
        );

        let mut product = Product {
            engine: &self.engine,
            candidates: &candidates,
            merged: OptionCollector::new(SurfacePruning::disabled()),
            stats,
        };
        let mut chosen = Vec::with_capacity(candidates.len());
        product.walk(&mut chosen, budget)?;

        let Product {
            merged, mut stats, ..
        } = product;
        let entries = merged.finish(&mut stats);
        Ok(LayoutSet::new(entries, !budget.is_exhausted(), stats))
    }
}

/// Cartesian product over the candidate units of every part
struct Product<'a> {
    engine: &'a LayoutEngine,
    candidates: &'a [Vec<Unit>],
    merged: OptionCollector,
    stats: SearchStatistics,
}

impl Product<'_> {
    fn walk(&mut self, chosen: &mut Vec<Unit>, budget: &mut Budget) -> Result<()> {
        let depth = chosen.len();
        if depth == self.candidates.len() {
            let set = self.engine.layout_within(chosen, budget)?;
            self.stats.merge_work(set.statistics());
            for (option, signature) in set.into_entries() {
                self.merged
                    .offer_counted(option, signature, &mut self.stats);
            }
            return Ok(());
        }

        for unit in &self.candidates[depth] {
            if budget.is_exhausted() {
                break;
            }
            chosen.push(unit.clone());
            self.walk(chosen, budget)?;
            chosen.pop();
        }
        Ok(())
    }
}

/// Compose a sentence on the blocking pool
pub async fn compose_layout(parts: Vec<Part>, options: LayoutOptions) -> Result<LayoutSet> {
    options.validate()?;

    tokio::task::spawn_blocking(move || Composer::new(options)?.compose_sentence(&parts)).await?
}
