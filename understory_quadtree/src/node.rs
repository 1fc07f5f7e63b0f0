// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

/// Children of an internal node, in `[NW, NE, SW, SE]` order.
///
/// With `y` growing downwards, "north" is the half with smaller `y`.
pub(crate) type Children<T> = Box<[Option<Node<T>>; 4]>;

/// Outcome of a [`QuadTree::visit`](crate::QuadTree::visit) callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Descend into the node's children.
    Continue,
    /// Skip the node's children.
    Prune,
}

/// All records stored at one exact position.
#[derive(Clone, Debug)]
pub struct Leaf<T> {
    point: Point,
    records: SmallVec<[T; 1]>,
}

impl<T> Leaf<T> {
    pub(crate) fn new(point: Point, record: T) -> Self {
        let mut records = SmallVec::new();
        records.push(record);
        Self { point, records }
    }

    pub(crate) fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub(crate) fn remove(&mut self, record: &T) -> bool
    where
        T: PartialEq,
    {
        match self.records.iter().position(|r| r == record) {
            Some(i) => {
                self.records.remove(i);
                true
            }
            None => false,
        }
    }

    /// The shared position of every record in this leaf.
    #[must_use]
    pub fn point(&self) -> Point {
        self.point
    }

    /// Records at this position, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of records at this position. Never zero for a leaf in a tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the leaf holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Call `f` on every record and return how many were visited.
    pub fn for_each(&self, mut f: impl FnMut(&T)) -> usize {
        for record in &self.records {
            f(record);
        }
        self.records.len()
    }
}

/// A node of a [`QuadTree`](crate::QuadTree).
#[derive(Clone, Debug)]
pub enum Node<T> {
    /// Records sharing one position.
    Leaf(Leaf<T>),
    /// Up to four non-empty quadrants.
    Internal(Children<T>),
}

impl<T> Node<T> {
    /// Returns `true` for a leaf node.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The leaf payload, if this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf<T>> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Internal(_) => None,
        }
    }

    /// The four quadrant slots, if this is an internal node.
    #[must_use]
    pub fn children(&self) -> Option<&[Option<Self>; 4]> {
        match self {
            Self::Leaf(_) => None,
            Self::Internal(children) => Some(children),
        }
    }

    /// Number of records in this subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Leaf(leaf) => leaf.len(),
            Self::Internal(children) => children.iter().flatten().map(Self::len).sum(),
        }
    }

    /// Returns `true` if the subtree holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f` on every record in this subtree and return how many were visited.
    pub fn for_each(&self, mut f: impl FnMut(&T)) -> usize {
        self.for_each_dyn(&mut f)
    }

    fn for_each_dyn(&self, f: &mut dyn FnMut(&T)) -> usize {
        match self {
            Self::Leaf(leaf) => leaf.for_each(f),
            Self::Internal(children) => children.iter().flatten().map(|c| c.for_each_dyn(f)).sum(),
        }
    }

    /// Collect every record in this subtree.
    #[must_use]
    pub fn records(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    pub(crate) fn collect_into<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Self::Leaf(leaf) => out.extend(leaf.records()),
            Self::Internal(children) => {
                for child in children.iter().flatten() {
                    child.collect_into(out);
                }
            }
        }
    }

    /// The first leaf reached by a depth-first, quadrant-order descent.
    #[must_use]
    pub fn first_leaf(&self) -> Option<&Leaf<T>> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Internal(children) => children.iter().flatten().find_map(Self::first_leaf),
        }
    }

    /// The first record of [`Node::first_leaf`].
    #[must_use]
    pub fn first_record(&self) -> Option<&T> {
        self.first_leaf().and_then(|leaf| leaf.records().first())
    }

    /// A representative record chosen by a random descent.
    ///
    /// At each internal node the quadrants are tried in a shuffled order; at
    /// the leaf one of its records is picked uniformly.
    pub fn random_record<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        match self {
            Self::Leaf(leaf) => {
                if leaf.is_empty() {
                    None
                } else {
                    leaf.records().get(rng.random_range(0..leaf.len()))
                }
            }
            Self::Internal(children) => {
                let mut order = [0_usize, 1, 2, 3];
                order.shuffle(&mut *rng);
                order
                    .iter()
                    .find_map(|&i| children[i].as_ref().and_then(|c| c.random_record(&mut *rng)))
            }
        }
    }
}

pub(crate) fn empty_children<T>() -> Children<T> {
    Box::new([None, None, None, None])
}

/// Point where `bounds` divides into quadrants.
///
/// A midpoint that rounds onto the low edge (bounds one ulp wide) is moved to
/// the high edge, so two distinct coordinates always end up apart.
fn split_point(bounds: Rect) -> Point {
    let c = bounds.center();
    Point::new(
        if c.x > bounds.x0 { c.x } else { bounds.x1 },
        if c.y > bounds.y0 { c.y } else { bounds.y1 },
    )
}

/// Quadrant index of `p` within `bounds`: `(bottom << 1) | right`.
pub(crate) fn quadrant_of(bounds: Rect, p: Point) -> usize {
    let c = split_point(bounds);
    (usize::from(p.y >= c.y) << 1) | usize::from(p.x >= c.x)
}

/// Bounds of quadrant `i` within `bounds`.
pub(crate) fn quadrant_bounds(bounds: Rect, i: usize) -> Rect {
    let c = split_point(bounds);
    match i {
        0 => Rect::new(bounds.x0, bounds.y0, c.x, c.y),
        1 => Rect::new(c.x, bounds.y0, bounds.x1, c.y),
        2 => Rect::new(bounds.x0, c.y, c.x, bounds.y1),
        _ => Rect::new(c.x, c.y, bounds.x1, bounds.y1),
    }
}
