// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::accessor::{Accessor, QuadTreeError};
use crate::node::{Children, Leaf, Node, Traversal, empty_children, quadrant_bounds, quadrant_of};

/// A point quadtree over records of type `T`.
///
/// The tree owns its records. Positions are read once, at insertion, through
/// the tree's [`Accessor`]; records must not change position while indexed.
///
/// The extent starts as a unit square anchored at the first point (rounded
/// down to whole units) and doubles toward each point that falls outside it,
/// so quadrant bounds stay exactly representable.
#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    accessor: Accessor<T>,
    extent: Option<Rect>,
    root: Option<Node<T>>,
    len: usize,
}

/// Structural snapshot of a [`QuadTree`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadTreeDebugInfo {
    /// Number of records.
    pub len: usize,
    /// Number of leaf nodes (distinct positions).
    pub leaves: usize,
    /// Number of internal nodes.
    pub internal_nodes: usize,
    /// Depth of the deepest node; the root has depth 0.
    pub depth: usize,
    /// Current extent, if any point was ever added.
    pub extent: Option<Rect>,
}

impl<T> QuadTree<T> {
    /// Create an empty tree.
    pub fn new(accessor: Accessor<T>) -> Self {
        Self {
            accessor,
            extent: None,
            root: None,
            len: 0,
        }
    }

    /// Create a tree holding `records`.
    ///
    /// Fails without building anything if any record has a non-finite position.
    pub fn build(
        accessor: Accessor<T>,
        records: impl IntoIterator<Item = T>,
    ) -> Result<Self, QuadTreeError> {
        let mut tree = Self::new(accessor);
        tree.add_all(records)?;
        Ok(tree)
    }

    /// The accessor used to position records.
    #[must_use]
    pub fn accessor(&self) -> &Accessor<T> {
        &self.accessor
    }

    /// Number of records in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bounds covered by the root node.
    ///
    /// The extent only grows; removing records does not shrink it.
    #[must_use]
    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    /// The root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_ref()
    }

    /// Every record, in quadrant order.
    #[must_use]
    pub fn data(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = &self.root {
            root.collect_into(&mut out);
        }
        out
    }

    /// Remove every record and reset the extent.
    pub fn clear(&mut self) {
        self.root = None;
        self.extent = None;
        self.len = 0;
    }

    /// Insert one record.
    ///
    /// Fails without changing the tree if the position is non-finite or too
    /// far out for the extent to cover.
    pub fn add(&mut self, record: T) -> Result<(), QuadTreeError> {
        let p = self.accessor.point(&record)?;
        self.cover(p)?;
        self.insert(p, record);
        self.len += 1;
        Ok(())
    }

    /// Insert many records and return how many were added.
    ///
    /// The insertion is atomic: positions are validated up front and nothing
    /// is inserted if any of them is non-finite or out of range.
    pub fn add_all(&mut self, records: impl IntoIterator<Item = T>) -> Result<usize, QuadTreeError> {
        let mut staged = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match self.accessor.point(&record) {
                Ok(p) => staged.push((p, record)),
                Err(_) => {
                    let (x, y) = (self.accessor.x(&record), self.accessor.y(&record));
                    return Err(QuadTreeError::InvalidRecord { index, x, y });
                }
            }
        }
        let mut extent = self.extent;
        for (p, _) in &staged {
            extent = Some(grown(extent, *p).ok_or(QuadTreeError::OutOfRange { x: p.x, y: p.y })?);
        }
        for (p, _) in &staged {
            self.cover(*p)?;
        }

        let added = staged.len();
        for (p, record) in staged {
            self.insert(p, record);
        }
        self.len += added;
        Ok(added)
    }

    /// Remove one record equal to `record`. Returns `true` if one was found.
    ///
    /// Internal nodes left with a single leaf child are collapsed into it.
    pub fn remove(&mut self, record: &T) -> bool
    where
        T: PartialEq,
    {
        let Ok(p) = self.accessor.point(record) else {
            return false;
        };
        let (Some(bounds), Some(root)) = (self.extent, self.root.take()) else {
            return false;
        };
        let (root, removed) = remove_from(root, bounds, p, record);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Remove each of `records` and return how many were found.
    pub fn remove_all<'a>(&mut self, records: impl IntoIterator<Item = &'a T>) -> usize
    where
        T: PartialEq + 'a,
    {
        records.into_iter().filter(|r| self.remove(r)).count()
    }

    /// Returns `true` if a record equal to `record` is indexed at its position.
    #[must_use]
    pub fn contains(&self, record: &T) -> bool
    where
        T: PartialEq,
    {
        self.accessor
            .point(record)
            .ok()
            .and_then(|p| self.leaf_at(p))
            .is_some_and(|leaf| leaf.records().contains(record))
    }

    /// The leaf stored exactly at `p`, if any.
    #[must_use]
    pub fn leaf_at(&self, p: Point) -> Option<&Leaf<T>> {
        let mut bounds = self.extent?;
        let mut node = self.root.as_ref()?;
        loop {
            match node {
                Node::Leaf(leaf) => return (leaf.point() == p).then_some(leaf),
                Node::Internal(children) => {
                    let i = quadrant_of(bounds, p);
                    node = children[i].as_ref()?;
                    bounds = quadrant_bounds(bounds, i);
                }
            }
        }
    }

    /// Walk the tree in pre-order, children in `[NW, NE, SW, SE]` order.
    ///
    /// `f` receives each node with its bounds and decides whether to descend.
    pub fn visit(&self, mut f: impl FnMut(&Node<T>, Rect) -> Traversal) {
        let (Some(root), Some(bounds)) = (self.root.as_ref(), self.extent) else {
            return;
        };
        let mut stack = vec![(root, bounds)];
        while let Some((node, bounds)) = stack.pop() {
            if f(node, bounds) == Traversal::Prune {
                continue;
            }
            if let Node::Internal(children) = node {
                stack.extend(
                    children
                        .iter()
                        .enumerate()
                        .rev()
                        .filter_map(|(i, c)| c.as_ref().map(|c| (c, quadrant_bounds(bounds, i)))),
                );
            }
        }
    }

    /// Structural counters for diagnostics and tests.
    #[must_use]
    pub fn debug_info(&self) -> QuadTreeDebugInfo {
        let mut info = QuadTreeDebugInfo {
            len: self.len,
            leaves: 0,
            internal_nodes: 0,
            depth: 0,
            extent: self.extent,
        };
        let Some(root) = &self.root else {
            return info;
        };
        let mut stack = vec![(root, 0_usize)];
        while let Some((node, depth)) = stack.pop() {
            info.depth = info.depth.max(depth);
            match node {
                Node::Leaf(_) => info.leaves += 1,
                Node::Internal(children) => {
                    info.internal_nodes += 1;
                    stack.extend(children.iter().flatten().map(|c| (c, depth + 1)));
                }
            }
        }
        info
    }

    fn cover(&mut self, p: Point) -> Result<(), QuadTreeError> {
        let target = grown(self.extent, p).ok_or(QuadTreeError::OutOfRange { x: p.x, y: p.y })?;
        if let Some(ext) = self.extent {
            for (_, i) in doublings(ext, p) {
                // The old extent becomes quadrant `i` of the grown one.
                if matches!(self.root, Some(Node::Internal(_))) {
                    let mut children = empty_children();
                    children[i] = self.root.take();
                    self.root = Some(Node::Internal(children));
                }
            }
        }
        self.extent = Some(target);
        Ok(())
    }

    fn insert(&mut self, p: Point, record: T) {
        let Some(bounds) = self.extent else {
            return;
        };
        self.root = Some(match self.root.take() {
            None => Node::Leaf(Leaf::new(p, record)),
            Some(root) => insert_into(root, bounds, p, record),
        });
    }
}

/// Largest coordinate magnitude an extent may reach.
///
/// Any two coordinates within it sum to a finite value, so quadrant midpoints
/// stay finite.
const MAX_COORDINATE: f64 = f64::MAX / 2.0;

fn in_range(r: Rect) -> bool {
    [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.abs() <= MAX_COORDINATE)
}

fn covers(ext: Rect, p: Point) -> bool {
    ext.x0 <= p.x && p.x < ext.x1 && ext.y0 <= p.y && p.y < ext.y1
}

/// Successive doublings of `ext` toward `p`, each paired with the quadrant
/// the previous extent occupies in it.
///
/// Stops once `p` is covered or after yielding an extent that is out of range.
fn doublings(ext: Rect, p: Point) -> impl Iterator<Item = (Rect, usize)> {
    let mut ext = ext;
    let mut z = if ext.width() > 0.0 { ext.width() } else { 1.0 };
    core::iter::from_fn(move || {
        if covers(ext, p) || !in_range(ext) {
            return None;
        }
        let i = (usize::from(p.y < ext.y0) << 1) | usize::from(p.x < ext.x0);
        z *= 2.0;
        ext = match i {
            0 => Rect::new(ext.x0, ext.y0, ext.x0 + z, ext.y0 + z),
            1 => Rect::new(ext.x1 - z, ext.y0, ext.x1, ext.y0 + z),
            2 => Rect::new(ext.x0, ext.y1 - z, ext.x0 + z, ext.y1),
            _ => Rect::new(ext.x1 - z, ext.y1 - z, ext.x1, ext.y1),
        };
        Some((ext, i))
    })
}

/// The extent after growing `extent` to cover `p`, or `None` if it would leave
/// the accepted range.
fn grown(extent: Option<Rect>, p: Point) -> Option<Rect> {
    let ext = match extent {
        Some(ext) => doublings(ext, p).last().map_or(ext, |(e, _)| e),
        None => {
            let (x0, y0) = (p.x.floor(), p.y.floor());
            Rect::new(x0, y0, x0 + 1.0, y0 + 1.0)
        }
    };
    (in_range(ext) && covers(ext, p)).then_some(ext)
}

fn insert_into<T>(node: Node<T>, bounds: Rect, p: Point, record: T) -> Node<T> {
    match node {
        Node::Internal(mut children) => {
            let i = quadrant_of(bounds, p);
            children[i] = Some(match children[i].take() {
                None => Node::Leaf(Leaf::new(p, record)),
                Some(child) => insert_into(child, quadrant_bounds(bounds, i), p, record),
            });
            Node::Internal(children)
        }
        Node::Leaf(mut leaf) if leaf.point() == p => {
            leaf.push(record);
            Node::Leaf(leaf)
        }
        Node::Leaf(leaf) => split(leaf, bounds, p, record),
    }
}

/// Replace `existing` by internal nodes until it and `p` land in different quadrants.
fn split<T>(existing: Leaf<T>, bounds: Rect, p: Point, record: T) -> Node<T> {
    let mut children = empty_children();
    let i = quadrant_of(bounds, p);
    let j = quadrant_of(bounds, existing.point());
    if i == j {
        children[i] = Some(split(existing, quadrant_bounds(bounds, i), p, record));
    } else {
        children[i] = Some(Node::Leaf(Leaf::new(p, record)));
        children[j] = Some(Node::Leaf(existing));
    }
    Node::Internal(children)
}

fn remove_from<T: PartialEq>(
    node: Node<T>,
    bounds: Rect,
    p: Point,
    record: &T,
) -> (Option<Node<T>>, bool) {
    match node {
        Node::Leaf(mut leaf) => {
            if leaf.point() != p || !leaf.remove(record) {
                (Some(Node::Leaf(leaf)), false)
            } else if leaf.is_empty() {
                (None, true)
            } else {
                (Some(Node::Leaf(leaf)), true)
            }
        }
        Node::Internal(mut children) => {
            let i = quadrant_of(bounds, p);
            let Some(child) = children[i].take() else {
                return (Some(Node::Internal(children)), false);
            };
            let (child, removed) = remove_from(child, quadrant_bounds(bounds, i), p, record);
            children[i] = child;
            if removed {
                (collapse(children), true)
            } else {
                (Some(Node::Internal(children)), false)
            }
        }
    }
}

/// Drop an empty internal node, or replace it by its only child when that child is a leaf.
fn collapse<T>(mut children: Children<T>) -> Option<Node<T>> {
    let mut occupied = 0;
    let mut last = 0;
    for (i, child) in children.iter().enumerate() {
        if child.is_some() {
            occupied += 1;
            last = i;
        }
    }
    match occupied {
        0 => None,
        1 if children[last].as_ref().is_some_and(Node::is_leaf) => children[last].take(),
        _ => Some(Node::Internal(children)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(points: &[(f64, f64)]) -> QuadTree<(f64, f64)> {
        let accessor = Accessor::new(|p: &(f64, f64)| p.0, |p: &(f64, f64)| p.1);
        QuadTree::build(accessor, points.iter().copied()).unwrap()
    }

    #[test]
    fn first_point_gets_unit_extent() {
        let t = tree_of(&[(10.4, 20.9)]);
        assert_eq!(t.extent(), Some(Rect::new(10.0, 20.0, 11.0, 21.0)));
        assert!(t.root().unwrap().is_leaf());
    }

    #[test]
    fn extent_doubles_toward_new_points() {
        let mut t = tree_of(&[(10.0, 10.0)]);
        t.add((13.0, 10.0)).unwrap();
        assert_eq!(t.extent(), Some(Rect::new(10.0, 10.0, 14.0, 14.0)));
        t.add((5.0, 5.0)).unwrap();
        let ext = t.extent().unwrap();
        assert!(ext.x0 <= 5.0 && ext.y0 <= 5.0 && ext.x1 > 13.0);
        assert_eq!(ext.width(), ext.height());
    }

    #[test]
    fn coincident_records_share_a_leaf() {
        let t = tree_of(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        let info = t.debug_info();
        assert_eq!(info.len, 3);
        assert_eq!(info.leaves, 1);
        assert_eq!(info.internal_nodes, 0);
        assert_eq!(t.leaf_at(Point::new(1.0, 1.0)).unwrap().len(), 3);
    }

    #[test]
    fn remove_collapses_single_leaf_parents() {
        let mut t = tree_of(&[(1.0, 1.0), (1.2, 1.2), (60.0, 60.0)]);
        assert!(t.debug_info().depth > 1);
        assert!(t.remove(&(1.2, 1.2)));
        assert!(t.remove(&(60.0, 60.0)));
        let info = t.debug_info();
        assert_eq!(info.len, 1);
        assert_eq!(info.leaves, 1);
        assert_eq!(info.internal_nodes, 0);
        assert!(!t.remove(&(60.0, 60.0)));
        assert!(t.contains(&(1.0, 1.0)));
    }

    #[test]
    fn huge_coordinates_are_rejected_without_changes() {
        let mut t = tree_of(&[(1.0, 1.0), (2.0, 2.0)]);
        let before = t.debug_info();
        let err = t.add((1e308, 1e308)).unwrap_err();
        assert_eq!(err, QuadTreeError::OutOfRange { x: 1e308, y: 1e308 });
        assert_eq!(t.debug_info(), before);

        let err = t.add_all([(3.0, 3.0), (1e308, 1e308), (4.0, 4.0)]).unwrap_err();
        assert!(matches!(err, QuadTreeError::OutOfRange { .. }));
        assert_eq!(t.debug_info(), before);
        assert!(!t.contains(&(3.0, 3.0)));

        let accessor = Accessor::new(|p: &(f64, f64)| p.0, |p: &(f64, f64)| p.1);
        let built = QuadTree::build(accessor, [(1.0, 1.0), (1e308, 1e308), (2.0, 2.0)]);
        assert!(matches!(built, Err(QuadTreeError::OutOfRange { .. })));
    }

    #[test]
    fn large_finite_coordinates_within_range_are_indexed() {
        let far: f64 = 1e300;
        let next = far.next_up();
        let t = tree_of(&[(0.0, 0.0), (far, 0.0), (next, 0.0), (-far, -far)]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.debug_info().leaves, 4);
        assert!(t.contains(&(far, 0.0)));
        assert!(t.contains(&(next, 0.0)));
        assert!(t.contains(&(-far, -far)));
    }

    #[test]
    fn adjacent_floats_get_separate_leaves() {
        let a = 0.1_f64;
        let t = tree_of(&[(a, 0.5), (a.next_up(), 0.5), (a.next_down(), 0.5)]);
        assert_eq!(t.debug_info().leaves, 3);
        assert_eq!(t.leaf_at(Point::new(a.next_up(), 0.5)).unwrap().len(), 1);
    }

    #[test]
    fn add_all_is_atomic() {
        let mut t = tree_of(&[(1.0, 1.0)]);
        let err = t.add_all([(2.0, 2.0), (f64::NAN, 0.0)]).unwrap_err();
        assert!(matches!(err, QuadTreeError::InvalidRecord { index: 1, .. }));
        assert_eq!(t.len(), 1);
        assert!(!t.contains(&(2.0, 2.0)));
    }
}
