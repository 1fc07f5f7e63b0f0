// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Quadtree: a point quadtree over caller-owned records.
//!
//! Records are positioned by an [`Accessor`], a pair of functions that read an
//! `x` and a `y` coordinate from each record. Coordinates are usually the
//! record's position in a normalized `[0, 100]` space, but any finite values
//! up to about half of `f64::MAX` in magnitude are accepted; the tree grows
//! its extent by doubling until it covers every inserted point, and rejects a
//! point it cannot cover with [`QuadTreeError::OutOfRange`].
//!
//! The tree focuses on the queries an interactive plot needs:
//! - [`QuadTree::find_all`]: every record within a radius of a point.
//! - [`QuadTree::find_by_tester`]: every record accepted by a [`Tester`], with
//!   whole subtrees skipped or bulk-accepted by area tests.
//! - [`QuadTree::visit`]: a pre-order walk with per-node pruning, used for
//!   culling and level-of-detail rendering.
//!
//! Several records may share the exact same position; they are stored in a
//! single [`Leaf`] and always travel together.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_quadtree::{Accessor, QuadTree};
//!
//! let accessor = Accessor::new(|p: &(f64, f64)| p.0, |p: &(f64, f64)| p.1);
//! let tree = QuadTree::build(accessor, [(10.0, 10.0), (12.0, 11.0), (80.0, 80.0)]).unwrap();
//!
//! let near = tree.find_all(11.0, 10.0, 3.0);
//! assert_eq!(near.len(), 2);
//! ```
//!
//! ## Level-of-detail traversal
//!
//! ```rust
//! use understory_quadtree::{Accessor, QuadTree, Traversal};
//!
//! let accessor = Accessor::new(|p: &(f64, f64)| p.0, |p: &(f64, f64)| p.1);
//! let tree = QuadTree::build(accessor, (0..100).map(|i| (f64::from(i), f64::from(i)))).unwrap();
//!
//! // Count subtrees smaller than 10 units as a single representative.
//! let mut drawn = 0;
//! tree.visit(|node, bounds| {
//!     if bounds.width() < 10.0 || node.is_leaf() {
//!         drawn += 1;
//!         Traversal::Prune
//!     } else {
//!         Traversal::Continue
//!     }
//! });
//! assert!(drawn < 100);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod accessor;
mod node;
mod query;
mod tree;

pub use accessor::{Accessor, QuadTreeError};
pub use node::{Leaf, Node, Traversal};
pub use query::{CircleTester, Tester, has_overlap, overlaps};
pub use tree::{QuadTree, QuadTreeDebugInfo};
