//! In-progress layout state
//!
//! Every search branch needs its own view of the placements made so far.
//! Instead of deep-copying that view per branch, placements and forbidden
//! anchors live in persistent lists: extending a state pushes a new head
//! node and shares the whole tail with its parent and siblings.

use std::sync::Arc;

use crate::types::{Axis, Point, Size};

#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>,
}

/// Immutable singly linked list with shared tails
#[derive(Debug)]
pub(crate) struct PersistentList<T> {
    head: Option<Arc<Node<T>>>,
    len: usize,
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> PersistentList<T> {
    pub(crate) fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub(crate) fn push(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Arc::new(Node { value, next }));
        self.len += 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Newest element first
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

pub(crate) struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

/// A unit placed during the search, by index into the unit slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlacedUnit {
    pub index: usize,
    pub size: Size,
    pub position: Point,
}

/// Partial layout of a prefix of the units
#[derive(Debug, Clone)]
pub struct LayoutState {
    placements: PersistentList<PlacedUnit>,
    forbidden: PersistentList<Point>,
    size: Size,
}

impl LayoutState {
    /// State holding only the first unit at its base size
    pub(crate) fn start(first: Size) -> Self {
        let mut state = Self {
            placements: PersistentList::new(),
            forbidden: PersistentList::new(),
            size: first,
        };
        state.place(0, first, Point::ORIGIN);
        state
    }

    /// Current container size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of units placed so far
    pub fn placed(&self) -> usize {
        self.placements.len()
    }

    /// Whether a new unit may not start at `anchor`
    pub fn is_forbidden(&self, anchor: Point) -> bool {
        self.forbidden.iter().any(|forbidden| forbidden.approx_eq(&anchor))
    }

    /// Number of registered forbidden anchors
    pub fn forbidden_count(&self) -> usize {
        self.forbidden.len()
    }

    /// Record a placement and forbid its lower-right corner as a future anchor
    pub(crate) fn place(&mut self, index: usize, size: Size, position: Point) {
        self.placements.push(PlacedUnit {
            index,
            size,
            position,
        });
        self.forbidden.push(position.corner(size));
    }

    /// Extend the container along one axis
    pub(crate) fn grow(&mut self, axis: Axis, delta: f64) {
        self.size = self.size.with_along(axis, self.size.along(axis) + delta);
    }

    /// Placements in the order they were made
    pub(crate) fn placements_in_order(&self) -> Vec<PlacedUnit> {
        let mut placements: Vec<PlacedUnit> = self.placements.iter().copied().collect();
        placements.reverse();
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branches_share_parent_state() {
        let parent = LayoutState::start(Size::new(1.0, 1.0));

        let mut right = parent.clone();
        right.place(1, Size::new(1.0, 1.0), Point::new(1.0, 0.0));
        right.grow(Axis::Horizontal, 1.0);

        let mut down = parent.clone();
        down.place(1, Size::new(1.0, 1.0), Point::new(0.0, 1.0));
        down.grow(Axis::Vertical, 1.0);

        assert_eq!(parent.placed(), 1);
        assert_eq!(parent.size(), Size::new(1.0, 1.0));
        assert_eq!(right.size(), Size::new(2.0, 1.0));
        assert_eq!(down.size(), Size::new(1.0, 2.0));
        assert_eq!(right.placements_in_order()[1].position, Point::new(1.0, 0.0));
        assert_eq!(down.placements_in_order()[1].position, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_forbidden_anchors_only_grow() {
        let mut state = LayoutState::start(Size::new(1.0, 1.0));
        assert!(state.is_forbidden(Point::new(1.0, 1.0)));
        assert!(!state.is_forbidden(Point::new(1.0, 0.0)));

        state.place(1, Size::new(1.0, 1.0), Point::new(1.0, 0.0));
        assert_eq!(state.forbidden_count(), 2);
        assert!(state.is_forbidden(Point::new(1.0, 1.0)));
        assert!(state.is_forbidden(Point::new(2.0, 1.0)));
    }

    #[test]
    fn test_anchor_comparison_tolerates_rounding() {
        let state = LayoutState::start(Size::new(0.1 + 0.2, 1.0));
        assert!(state.is_forbidden(Point::new(0.3, 1.0)));
    }
}
