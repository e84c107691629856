//! Canonical signatures for deduplication
//!
//! A signature captures the geometry of a normalized option (container size,
//! then every placement's size and position in input order) together with
//! the identity of each placed unit. Coordinates are quantized so that
//! results of identical arithmetic compare equal; the hash set still
//! compares signatures structurally on collision.

use std::sync::Arc;

use crate::constants::SIGNATURE_QUANTUM;
use crate::types::{Point, Size, Unit, UnitContent, UnitKind};

use super::LayoutOption;

/// Identity of a placed unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum UnitKey {
    Token(UnitKind, String),
    Nested {
        kind: UnitKind,
        separator: Option<String>,
        layout: Arc<Signature>,
    },
}

impl UnitKey {
    pub(crate) fn of(unit: &Unit) -> Self {
        match unit.content() {
            UnitContent::Token(token) => UnitKey::Token(unit.kind(), token.clone()),
            UnitContent::Nested { option, separator } => UnitKey::Nested {
                kind: unit.kind(),
                separator: separator.clone(),
                layout: Arc::new(option.signature()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PlacementKey {
    unit: Arc<UnitKey>,
    rect: [i64; 4],
}

/// Structural fingerprint of a layout option
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    size: [i64; 2],
    placements: Vec<PlacementKey>,
}

impl Signature {
    /// Signature of an option, deriving unit keys from its placements
    pub(crate) fn of(option: &LayoutOption) -> Self {
        let keys: Vec<Arc<UnitKey>> = option
            .placements()
            .iter()
            .map(|placement| Arc::new(UnitKey::of(&placement.unit)))
            .collect();
        Self::with_keys(option, &keys)
    }

    /// Signature of an option whose placement `i` holds the unit keyed by `keys[i]`
    pub(crate) fn with_keys(option: &LayoutOption, keys: &[Arc<UnitKey>]) -> Self {
        debug_assert_eq!(option.placements().len(), keys.len());
        let placements = option
            .placements()
            .iter()
            .zip(keys)
            .map(|(placement, key)| PlacementKey {
                unit: Arc::clone(key),
                rect: quantize_rect(placement.position, placement.size),
            })
            .collect();
        Self {
            size: quantize_size(option.size()),
            placements,
        }
    }

    /// Number of placements covered
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

fn quantize(value: f64) -> i64 {
    (value / SIGNATURE_QUANTUM).round() as i64
}

fn quantize_size(size: Size) -> [i64; 2] {
    [quantize(size.width), quantize(size.height)]
}

fn quantize_rect(position: Point, size: Size) -> [i64; 4] {
    [
        quantize(position.x),
        quantize(position.y),
        quantize(size.width),
        quantize(size.height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Placement;

    fn option(token: &str, positions: &[(f64, f64)]) -> LayoutOption {
        let unit = Arc::new(Unit::token(UnitKind::WordGlyph, token, Size::new(1.0, 1.0)).unwrap());
        let placements = positions
            .iter()
            .map(|&(x, y)| Placement {
                unit: Arc::clone(&unit),
                size: Size::new(1.0, 1.0),
                position: Point::new(x, y),
            })
            .collect();
        LayoutOption::new(Size::new(2.0, 1.0), placements)
    }

    #[test]
    fn test_equal_geometry_equal_signature() {
        let a = option("jan", &[(0.0, 0.0), (1.0, 0.0)]);
        let b = option("jan", &[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_geometry_and_units_are_distinguished() {
        let a = option("jan", &[(0.0, 0.0), (1.0, 0.0)]);
        let moved = option("jan", &[(1.0, 0.0), (0.0, 0.0)]);
        let other_word = option("soweli", &[(0.0, 0.0), (1.0, 0.0)]);
        assert_ne!(a.signature(), moved.signature());
        assert_ne!(a.signature(), other_word.signature());
    }

    #[test]
    fn test_rounding_noise_is_ignored() {
        let a = option("jan", &[(0.0, 0.0), (1.0, 0.0)]);
        let b = option("jan", &[(0.0, 0.0), (0.1 + 0.2 + 0.7, 0.0)]);
        assert_eq!(a.signature(), b.signature());
    }
}
