// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Level-of-detail traversal of a point index onto a surface.

use understory_quadtree::{Node, QuadTree, Traversal};
use understory_view2d::Viewport;

use crate::surface::Surface;
use crate::symbol::SymbolRenderer;

/// Counters from one layer pass.
///
/// `rendered` counts symbol draws. With [`TreePass::collect_stats`] set,
/// `aggregated` and `hidden` are filled in as well and the three add up to
/// `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderStats {
    /// Records drawn, including one representative per aggregated subtree.
    pub rendered: usize,
    /// Records represented by another record of the same subtree.
    pub aggregated: usize,
    /// Records in subtrees outside the visible region.
    pub hidden: usize,
    /// Records in the index.
    pub total: usize,
}

/// Options for [`render_tree`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TreePass {
    /// Draw a single representative for subtrees whose on-screen footprint
    /// is below this many pixels. `None` draws every visible record.
    pub aggregation_threshold: Option<f64>,
    /// Count hidden and aggregated records. Costs a subtree walk per pruned node.
    pub collect_stats: bool,
}

/// Draws the visible records of `tree` with `renderer`, then flushes it.
///
/// Subtrees outside the viewport are pruned. When aggregation is enabled,
/// a subtree whose footprint is below the threshold is drawn as its first
/// record.
pub fn render_tree<T>(
    tree: &QuadTree<T>,
    surface: &mut dyn Surface,
    renderer: &mut dyn SymbolRenderer<T>,
    viewport: &Viewport,
    pass: TreePass,
) -> RenderStats {
    let visible = viewport.visible_bounds_predicate();
    let aggregate = pass
        .aggregation_threshold
        .map(|th| viewport.aggregation_predicate(th));
    let mut stats = RenderStats {
        total: tree.len(),
        ..RenderStats::default()
    };

    tree.visit(|node, bounds| {
        if !visible(bounds) {
            if pass.collect_stats {
                stats.hidden += node.len();
            }
            return Traversal::Prune;
        }
        if aggregate.is_some_and(|agg| agg(bounds)) {
            if let Some(leaf) = node.first_leaf()
                && let Some(record) = leaf.records().first()
            {
                renderer.render(surface, viewport.normalized_to_pixel(leaf.point()), record);
                stats.rendered += 1;
                if pass.collect_stats {
                    stats.aggregated += node.len() - 1;
                }
            }
            return Traversal::Prune;
        }
        if let Node::Leaf(leaf) = node {
            let at = viewport.normalized_to_pixel(leaf.point());
            stats.rendered += leaf.for_each(|record| renderer.render(surface, at, record));
        }
        Traversal::Continue
    });

    renderer.done(surface);
    stats
}
