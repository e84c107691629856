//! Layout data types
//!
//! These types describe finished layouts: where every unit ended up inside
//! its container, and the derived scalars callers rank options by.

use std::sync::Arc;

use crate::constants::ANCHOR_TOLERANCE;
use crate::stats::SearchStatistics;
use crate::types::{Axis, Point, Size, Unit};

use super::Signature;

/// How a group of units is appended to the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Appended to the right; the group is stacked top to bottom and
    /// the container grows in width
    Row,
    /// Appended below; the group is laid out left to right and
    /// the container grows in height
    Column,
}

impl Extension {
    /// The container axis this extension grows
    pub fn growth_axis(self) -> Axis {
        match self {
            Extension::Row => Axis::Horizontal,
            Extension::Column => Axis::Vertical,
        }
    }
}

/// Final position of a unit inside a container
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// The unit that was placed
    pub unit: Arc<Unit>,
    /// Size after scaling to fit its row or column
    pub size: Size,
    /// Top-left corner in the container's frame
    pub position: Point,
}

impl Placement {
    /// Bottom-right corner
    pub fn end(&self) -> Point {
        self.position.corner(self.size)
    }

    /// Whether the interiors of two placements intersect
    pub fn overlaps(&self, other: &Placement) -> bool {
        let (a_end, b_end) = (self.end(), other.end());
        let width = a_end.x.min(b_end.x) - self.position.x.max(other.position.x);
        let height = a_end.y.min(b_end.y) - self.position.y.max(other.position.y);
        width > ANCHOR_TOLERANCE && height > ANCHOR_TOLERANCE
    }
}

/// A complete tiling of every input unit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOption {
    size: Size,
    ratio: f64,
    normed_ratio: f64,
    surface: f64,
    placements: Vec<Placement>,
}

impl LayoutOption {
    pub(crate) fn new(size: Size, placements: Vec<Placement>) -> Self {
        let ratio = size.width / size.height;
        let normed_ratio = if ratio > 1.0 { 1.0 / ratio } else { ratio };
        Self {
            size,
            ratio,
            normed_ratio,
            surface: size.area(),
            placements,
        }
    }

    /// Container size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width divided by height
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// [`LayoutOption::ratio`] folded into `(0, 1]`
    pub fn normed_ratio(&self) -> f64 {
        self.normed_ratio
    }

    /// Container area
    pub fn surface(&self) -> f64 {
        self.surface
    }

    /// Placements in input order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The factor [`LayoutOption::normalized`] divides by: the larger
    /// dimension of the smallest placed unit
    pub fn normalization_scale(&self) -> f64 {
        self.placements
            .iter()
            .map(|placement| placement.size.major())
            .fold(f64::INFINITY, f64::min)
    }

    /// This option rescaled so its smallest unit has a major extent of 1
    pub fn normalized(&self) -> LayoutOption {
        let scale = self.normalization_scale();
        if !scale.is_finite() || scale <= 0.0 {
            return self.clone();
        }
        // divide, so the reference unit lands on exactly 1
        let shrink = |size: Size| Size::new(size.width / scale, size.height / scale);
        let placements = self
            .placements
            .iter()
            .map(|placement| Placement {
                unit: Arc::clone(&placement.unit),
                size: shrink(placement.size),
                position: Point::new(placement.position.x / scale, placement.position.y / scale),
            })
            .collect();
        LayoutOption::new(shrink(self.size), placements)
    }

    /// Canonical, scale-independent identity of this option
    pub fn signature(&self) -> Signature {
        Signature::of(self)
    }
}

/// Every option produced by one engine or composer call
#[derive(Debug, Clone, Default)]
pub struct LayoutSet {
    options: Vec<LayoutOption>,
    signatures: Vec<Signature>,
    complete: bool,
    stats: SearchStatistics,
}

impl LayoutSet {
    pub(crate) fn new(
        entries: Vec<(LayoutOption, Signature)>,
        complete: bool,
        stats: SearchStatistics,
    ) -> Self {
        let (options, signatures) = entries.into_iter().unzip();
        Self {
            options,
            signatures,
            complete,
            stats,
        }
    }

    /// Options in discovery order
    pub fn options(&self) -> &[LayoutOption] {
        &self.options
    }

    pub fn into_options(self) -> Vec<LayoutOption> {
        self.options
    }

    /// Signatures, parallel to [`LayoutSet::options`]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (LayoutOption, Signature)> {
        self.options.into_iter().zip(self.signatures)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayoutOption> {
        self.options.iter()
    }

    /// False when the search budget ran out before every branch was explored
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }

    /// Smallest surface among the returned options
    pub fn min_surface(&self) -> Option<f64> {
        self.options
            .iter()
            .map(LayoutOption::surface)
            .min_by(f64::total_cmp)
    }
}

impl IntoIterator for LayoutSet {
    type Item = LayoutOption;
    type IntoIter = std::vec::IntoIter<LayoutOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

impl<'a> IntoIterator for &'a LayoutSet {
    type Item = &'a LayoutOption;
    type IntoIter = std::slice::Iter<'a, LayoutOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitKind;

    fn placement(x: f64, y: f64, w: f64, h: f64) -> Placement {
        let unit = Unit::token(UnitKind::WordGlyph, "jan", Size::new(1.0, 1.0)).unwrap();
        Placement {
            unit: Arc::new(unit),
            size: Size::new(w, h),
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_derived_scalars() {
        let option = LayoutOption::new(Size::new(2.0, 4.0), vec![placement(0.0, 0.0, 2.0, 4.0)]);
        assert_eq!(option.ratio(), 0.5);
        assert_eq!(option.normed_ratio(), 0.5);
        assert_eq!(option.surface(), 8.0);

        let wide = LayoutOption::new(Size::new(4.0, 2.0), vec![placement(0.0, 0.0, 4.0, 2.0)]);
        assert_eq!(wide.ratio(), 2.0);
        assert_eq!(wide.normed_ratio(), 0.5);
    }

    #[test]
    fn test_normalize_by_smallest_major_extent() {
        let option = LayoutOption::new(
            Size::new(1.0, 1.5),
            vec![
                placement(0.0, 0.0, 1.0, 1.0),
                placement(0.0, 1.0, 0.5, 0.5),
                placement(0.5, 1.0, 0.5, 0.5),
            ],
        );
        let normalized = option.normalized();
        assert_eq!(normalized.size(), Size::new(2.0, 3.0));
        assert_eq!(normalized.surface(), 6.0);
        assert_eq!(normalized.placements()[2].position, Point::new(1.0, 2.0));
        assert_eq!(normalized.placements()[2].size, Size::new(1.0, 1.0));
        assert_eq!(normalized.normalized(), normalized);
    }

    #[test]
    fn test_overlap_detection() {
        let a = placement(0.0, 0.0, 1.0, 1.0);
        let b = placement(1.0, 0.0, 1.0, 1.0);
        let c = placement(0.5, 0.5, 1.0, 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
