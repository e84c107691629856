//! Base sizes for tokens
//!
//! The layout engine only needs a base size per token. Sizes come from an
//! injected [`UnitSizer`]; [`SizeTables`] is the table-driven default.

use crate::constants::*;
use crate::types::{Size, UnitKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps a token of a given kind to its base size.
///
/// Implementations must be pure: the same `(token, kind)` always gives the
/// same, strictly positive size.
pub trait UnitSizer {
    fn size_of(&self, token: &str, kind: UnitKind) -> Size;
}

impl<F> UnitSizer for F
where
    F: Fn(&str, UnitKind) -> Size,
{
    fn size_of(&self, token: &str, kind: UnitKind) -> Size {
        self(token, kind)
    }
}

/// Tokens that share a base size
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeClass {
    pub size: Size,
    pub tokens: Vec<String>,
}

impl SizeClass {
    pub fn new(size: impl Into<Size>, tokens: &[&str]) -> Self {
        Self {
            size: size.into(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Ordered size classes with a fallback. The first class listing a token wins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeTable {
    pub classes: Vec<SizeClass>,
    pub fallback: Size,
}

impl SizeTable {
    pub fn lookup(&self, token: &str) -> Size {
        self.classes
            .iter()
            .find(|class| class.tokens.iter().any(|t| t == token))
            .map(|class| class.size)
            .unwrap_or(self.fallback)
    }

    fn sizes(&self) -> impl Iterator<Item = Size> + '_ {
        self.classes
            .iter()
            .map(|class| class.size)
            .chain(std::iter::once(self.fallback))
    }
}

/// Size tables for word glyphs and cartouche syllables
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeTables {
    pub words: SizeTable,
    pub syllables: SizeTable,
}

impl Default for SizeTables {
    fn default() -> Self {
        Self {
            words: SizeTable {
                classes: vec![
                    SizeClass::new(SINGLE_PUNCTUATION_SIZE, SINGLE_PUNCTUATION),
                    SizeClass::new(PUNCTUATION_SIZE, PUNCTUATION),
                    SizeClass::new(LARGE_PUNCTUATION_SIZE, LARGE_PUNCTUATION),
                    SizeClass::new(SMALL_MODIFIER_SIZE, SMALL_MODIFIERS),
                    SizeClass::new(NARROW_MODIFIER_SIZE, NARROW_MODIFIERS),
                ],
                fallback: REGULAR_SIZE.into(),
            },
            syllables: SizeTable {
                classes: vec![SizeClass::new(NARROW_SYLLABLE_SIZE, NARROW_SYLLABLES)],
                fallback: REGULAR_SIZE.into(),
            },
        }
    }
}

impl SizeTables {
    /// Every size in both tables, including fallbacks
    pub fn all_sizes(&self) -> impl Iterator<Item = Size> + '_ {
        self.words.sizes().chain(self.syllables.sizes())
    }
}

impl UnitSizer for SizeTables {
    fn size_of(&self, token: &str, kind: UnitKind) -> Size {
        match kind {
            UnitKind::SyllableGlyph => self.syllables.lookup(token),
            UnitKind::WordGlyph | UnitKind::Punctuation | UnitKind::Container => {
                self.words.lookup(token)
            }
        }
    }
}
