// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::{Point, Rect, Shape, Size};
use peniko::Color;
use understory_lasso::Lasso;
use understory_quadtree::{Accessor, QuadTree};
use understory_timing::TimerSlots;
use understory_view2d::{
    LinearScale, NORMALIZED_RANGE, TransformDelta, Viewport, ViewportDebugInfo, ZoomTransform,
};

use crate::error::ScatterError;
use crate::options::{Modifiers, ScatterplotOptions};
use crate::reason::{GesturePhase, RenderAction, RenderReason, TimerCommand, transition};
use crate::render::{RenderStats, TreePass, render_tree};
use crate::surface::{DoubleBuffer, Surface};
use crate::symbol::{CircleSymbol, RenderMode, Symbol};

/// Stroke width of the lasso outline and its end markers.
const LASSO_STROKE_WIDTH: f64 = 5.0;

/// Tolerance used when flattening marker circles into paths.
const MARKER_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Pending {
    Redraw,
    Tooltip,
}

type SelectionListener<T> = Box<dyn FnMut(&[&T])>;
type TooltipHandler<T> = Box<dyn FnMut(&[&T], Point)>;
type AxisRenderer = Box<dyn FnMut(&LinearScale, &LinearScale)>;
type WindowListener = Box<dyn FnMut(Rect)>;

/// An interactive scatterplot over a set of records.
///
/// Records are positioned through the configured domain scales into
/// normalized space and indexed once. Two surfaces hold the drawing: the
/// front one shows the data points, the back one shows the selection and the
/// lasso overlay. Pan steps shift the existing data raster instead of
/// re-traversing the index; a full-quality redraw follows once movement has
/// been quiet for [`ScatterplotOptions::zoom_delay`].
///
/// The widget is driven entirely by the host: input handlers take pixel
/// positions relative to the surface, and deferred work fires from
/// [`Scatterplot::tick`]. Timestamps are caller-defined and monotonic,
/// milliseconds by convention.
pub struct Scatterplot<T, S> {
    options: ScatterplotOptions,
    tree: QuadTree<T>,
    selection: QuadTree<T>,
    viewport: Viewport,
    buffers: DoubleBuffer<S>,
    layout_size: Size,
    phase: GesturePhase,
    lasso: Lasso,
    timers: TimerSlots<Pending>,
    tooltip_at: Option<Point>,
    tooltip_shown: bool,
    now: u64,
    symbol: Box<dyn Symbol<T>>,
    on_selection: Option<SelectionListener<T>>,
    on_tooltip: Option<TooltipHandler<T>>,
    on_axes: Option<AxisRenderer>,
    on_window: Option<WindowListener>,
    full_redraws: usize,
    incremental_redraws: usize,
    selection_redraws: usize,
    last_stats: RenderStats,
}

impl<T, S> fmt::Debug for Scatterplot<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scatterplot")
            .field("len", &self.tree.len())
            .field("selected", &self.selection.len())
            .field("phase", &self.phase)
            .field("layout_size", &self.layout_size)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl<T, S> Scatterplot<T, S>
where
    T: Clone + Eq + Hash,
    S: Surface,
{
    /// Creates a scatterplot of `records`.
    ///
    /// `x` and `y` read domain values, which the option scales map into
    /// normalized space. The layout size starts as the size of the first
    /// surface. Nothing is drawn until the first [`Scatterplot::render`].
    ///
    /// Fails on invalid options or when any record maps to a non-finite
    /// position.
    pub fn new(
        records: impl IntoIterator<Item = T>,
        x: impl Fn(&T) -> f64 + 'static,
        y: impl Fn(&T) -> f64 + 'static,
        surfaces: [S; 2],
        options: ScatterplotOptions,
    ) -> Result<Self, ScatterError> {
        options.validate()?;
        let to_x = options.x_scale.with_range(NORMALIZED_RANGE);
        let to_y = options.y_scale.with_range(NORMALIZED_RANGE);
        let accessor = Accessor::new(move |r| to_x.map(x(r)), move |r| to_y.map(y(r)));
        let selection = QuadTree::new(accessor.clone());
        let tree = QuadTree::build(accessor, records)?;

        let [front, back] = surfaces;
        let layout_size = front.size();
        let mut viewport = Viewport::new(options.margin.inset(layout_size));
        viewport.set_scale_extent(options.scale_extent.0, options.scale_extent.1);
        tracing::debug!(records = tree.len(), "scatterplot created");

        Ok(Self {
            options,
            tree,
            selection,
            viewport,
            buffers: DoubleBuffer::new(front, back),
            layout_size,
            phase: GesturePhase::Unrendered,
            lasso: Lasso::new(),
            timers: TimerSlots::new(),
            tooltip_at: None,
            tooltip_shown: false,
            now: 0,
            symbol: Box::new(CircleSymbol::default()),
            on_selection: None,
            on_tooltip: None,
            on_axes: None,
            on_window: None,
            full_redraws: 0,
            incremental_redraws: 0,
            selection_redraws: 0,
            last_stats: RenderStats::default(),
        })
    }

    /// The options the plot was created with.
    #[must_use]
    pub fn options(&self) -> &ScatterplotOptions {
        &self.options
    }

    /// The primary index, in normalized space.
    #[must_use]
    pub fn tree(&self) -> &QuadTree<T> {
        &self.tree
    }

    /// The selection index, in normalized space.
    #[must_use]
    pub fn selection_tree(&self) -> &QuadTree<T> {
        &self.selection
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The data and selection layers.
    #[must_use]
    pub fn surfaces(&self) -> &DoubleBuffer<S> {
        &self.buffers
    }

    /// The lasso gesture state.
    #[must_use]
    pub fn lasso(&self) -> &Lasso {
        &self.lasso
    }

    /// What the layers currently show.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Counters from the most recent data layer pass.
    #[must_use]
    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Records the laid-out size of the surfaces.
    ///
    /// The next render notices the mismatch, resizes both surfaces and
    /// redraws from scratch.
    pub fn set_layout_size(&mut self, size: Size) {
        self.layout_size = size;
    }

    /// Forces a full relayout and redraw.
    pub fn resized(&mut self) {
        self.redraw(RenderReason::Dirty, None);
    }

    /// Redraws what `reason` requires at host time `now` (milliseconds).
    ///
    /// `delta` is the pixel step applied by a pan and is only used by
    /// [`RenderReason::PerformTranslate`]. If the surfaces do not match the
    /// layout size they are resized first and the reason is upgraded to
    /// [`RenderReason::Dirty`]. A deferred redraw scheduled by this call is
    /// due `zoom_delay` after `now`.
    pub fn render(&mut self, reason: RenderReason, delta: Option<TransformDelta>, now: u64) {
        self.now = self.now.max(now);
        self.redraw(reason, delta);
    }

    fn redraw(&mut self, reason: RenderReason, delta: Option<TransformDelta>) {
        let mut reason = reason;
        if self.buffers.size() != self.layout_size {
            self.buffers.resize(self.layout_size);
            reason = RenderReason::Dirty;
        }

        let step = transition(self.phase, reason);
        tracing::trace!(?reason, phase = ?self.phase, action = ?step.action, "render");

        match step.timer {
            TimerCommand::Keep => {}
            TimerCommand::Cancel => {
                self.timers.cancel(Pending::Redraw);
            }
            TimerCommand::Reschedule => {
                self.timers
                    .schedule_after(Pending::Redraw, self.now, self.options.zoom_delay);
            }
        }

        match step.action {
            RenderAction::FullRedraw { relayout } => {
                if relayout {
                    self.viewport
                        .set_plot_bounds(self.options.margin.inset(self.layout_size));
                }
                self.draw_axes();
                self.draw_data();
                self.draw_selection();
                self.full_redraws += 1;
            }
            RenderAction::SelectionOnly => {
                self.draw_selection();
                self.selection_redraws += 1;
            }
            RenderAction::IncrementalTranslate => {
                self.transform_data(delta.unwrap_or_default());
                self.draw_selection();
                self.draw_axes();
                self.incremental_redraws += 1;
            }
        }
        self.phase = step.next;
    }

    /// The current selection, in index order.
    #[must_use]
    pub fn selection(&self) -> Vec<&T> {
        self.selection.data()
    }

    /// Replaces the selection with `records`.
    ///
    /// Records not in the primary index are ignored and duplicates count
    /// once. Records that stay selected are left in place. When the result
    /// differs from the current selection, the selection listener is called
    /// and the selection layer is redrawn. Returns whether anything changed.
    pub fn set_selection(&mut self, records: &[T]) -> bool {
        if records.is_empty() {
            return self.clear_selection();
        }
        let requested = self.admit(records);
        let wanted: HashSet<&T> = requested.iter().copied().collect();
        let (stale, added) = {
            let current: HashSet<&T> = self.selection.data().into_iter().collect();
            let stale: Vec<T> = current
                .iter()
                .filter(|r| !wanted.contains(*r))
                .map(|r| (*r).clone())
                .collect();
            let added: Vec<T> = requested
                .iter()
                .filter(|r| !current.contains(*r))
                .map(|r| (*r).clone())
                .collect();
            (stale, added)
        };
        if stale.is_empty() && added.is_empty() {
            return false;
        }
        self.selection.remove_all(&stale);
        self.insert_selected(added);
        self.selection_changed();
        true
    }

    /// Adds `records` to the selection.
    ///
    /// Returns whether anything was added.
    pub fn add_to_selection(&mut self, records: &[T]) -> bool {
        let added: Vec<T> = self
            .admit(records)
            .into_iter()
            .filter(|r| !self.selection.contains(r))
            .cloned()
            .collect();
        if added.is_empty() {
            return false;
        }
        self.insert_selected(added);
        self.selection_changed();
        true
    }

    /// Removes `records` from the selection.
    ///
    /// Returns whether anything was removed.
    pub fn remove_from_selection(&mut self, records: &[T]) -> bool {
        if self.selection.remove_all(records) == 0 {
            return false;
        }
        self.selection_changed();
        true
    }

    /// Empties the selection.
    ///
    /// The selection index is always rebuilt; listeners and the redraw only
    /// run if something was selected.
    pub fn clear_selection(&mut self) -> bool {
        let was_empty = self.selection.is_empty();
        self.selection = QuadTree::new(self.tree.accessor().clone());
        if was_empty {
            return false;
        }
        self.selection_changed();
        true
    }

    /// Starts a zoom gesture.
    pub fn on_zoom_start(&mut self) {
        self.viewport.begin_gesture();
    }

    /// Applies a zoom step.
    ///
    /// The transform is clamped to the scale extent. The window listener
    /// sees the new visible domain, then the mid-gesture render runs.
    pub fn on_zoom(&mut self, transform: ZoomTransform, now: u64) {
        self.now = now;
        let (change, delta) = self.viewport.set_transform(transform);
        let Some(reason) = RenderReason::perform(change) else {
            return;
        };
        let window = self.visible_domain();
        if let Some(listener) = self.on_window.as_mut() {
            listener(window);
        }
        self.redraw(reason, Some(delta));
    }

    /// Ends a zoom gesture and redraws at full quality if the view moved.
    pub fn on_zoom_end(&mut self, now: u64) {
        self.now = now;
        if let Some(reason) = RenderReason::after(self.viewport.end_gesture()) {
            self.redraw(reason, None);
        }
    }

    /// Starts a lasso at pixel position `at` and clears the selection.
    pub fn on_drag_start(&mut self, at: Point) {
        self.lasso.start(at);
        self.clear_selection();
    }

    /// Extends the lasso and selects everything inside its hull.
    ///
    /// The selection layer is redrawn on every step so the overlay follows
    /// the pointer.
    pub fn on_drag(&mut self, at: Point) {
        if !self.lasso.drag(at) {
            return;
        }
        let (sx, sy) = self.viewport.scales();
        let changed = match self.lasso.tester(|px| sx.invert(px), |py| sy.invert(py)) {
            Some(tester) => {
                let hits: Vec<T> = self
                    .tree
                    .find_by_tester(&tester)
                    .into_iter()
                    .cloned()
                    .collect();
                self.set_selection(&hits)
            }
            None => false,
        };
        if !changed {
            self.redraw(RenderReason::SelectionChanged, None);
        }
    }

    /// Finishes the lasso and removes its overlay.
    pub fn on_drag_end(&mut self) {
        self.lasso.end();
        self.redraw(RenderReason::SelectionChanged, None);
    }

    /// Handles a click at pixel position `at`.
    ///
    /// `button` follows the DOM convention: `0` is the primary button. A
    /// primary click selects every record within the click radius; any other
    /// button clears the selection.
    pub fn on_click(&mut self, at: Point, button: u8) {
        if button > 0 {
            self.clear_selection();
            return;
        }
        let hits = self.pick(at);
        self.set_selection(&hits);
    }

    /// Restarts the tooltip debounce at pixel position `at`.
    ///
    /// A tooltip that is shown or about to be shown is hidden first.
    pub fn on_mouse_move(&mut self, at: Point, now: u64) {
        self.now = now;
        if self.tooltip_shown || self.timers.is_pending(Pending::Tooltip) {
            self.on_mouse_leave();
        }
        self.tooltip_at = Some(at);
        self.timers
            .schedule_after(Pending::Tooltip, now, self.options.tooltip_delay);
    }

    /// Cancels a pending tooltip and hides the current one.
    pub fn on_mouse_leave(&mut self) {
        self.timers.cancel(Pending::Tooltip);
        self.tooltip_at = None;
        self.tooltip_shown = false;
        if let Some(handler) = self.on_tooltip.as_mut() {
            handler(&[], Point::ZERO);
        }
    }

    /// Fires every timer due at `now`.
    pub fn tick(&mut self, now: u64) {
        self.now = self.now.max(now);
        while let Some((pending, _)) = self.timers.pop_due(now) {
            match pending {
                Pending::Redraw => self.redraw(RenderReason::AfterTranslate, None),
                Pending::Tooltip => self.show_tooltip(),
            }
        }
    }

    /// The earliest time [`Scatterplot::tick`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Cancels pending timers, ends gestures and drops every callback.
    pub fn destroy(&mut self) {
        self.timers.clear();
        self.lasso.clear();
        self.viewport.end_gesture();
        self.tooltip_at = None;
        self.tooltip_shown = false;
        self.on_selection = None;
        self.on_tooltip = None;
        self.on_axes = None;
        self.on_window = None;
    }

    /// Called with the new selection whenever it changes.
    pub fn set_selection_listener(&mut self, listener: impl FnMut(&[&T]) + 'static) {
        self.on_selection = Some(Box::new(listener));
    }

    /// Called with the records under the pointer and the pointer position.
    ///
    /// An empty record list means the tooltip should be hidden.
    pub fn set_tooltip_handler(&mut self, handler: impl FnMut(&[&T], Point) + 'static) {
        self.on_tooltip = Some(Box::new(handler));
    }

    /// Called with the transformed x and y domain scales whenever axes are drawn.
    pub fn set_axis_renderer(&mut self, renderer: impl FnMut(&LinearScale, &LinearScale) + 'static) {
        self.on_axes = Some(Box::new(renderer));
    }

    /// Called with the visible domain rectangle after every zoom step.
    pub fn set_window_listener(&mut self, listener: impl FnMut(Rect) + 'static) {
        self.on_window = Some(Box::new(listener));
    }

    /// Replaces the point symbol. Takes effect on the next redraw.
    pub fn set_symbol(&mut self, symbol: impl Symbol<T> + 'static) {
        self.symbol = Box::new(symbol);
    }

    /// Returns `true` if a pointer-down should start a lasso rather than a pan.
    #[must_use]
    pub fn is_select_event(&self, button: u8, modifiers: Modifiers) -> bool {
        button == 0 && modifiers.intersects(self.options.select_modifiers)
    }

    /// The x and y domain scales under the current transform, with pixel ranges.
    #[must_use]
    pub fn axis_scales(&self) -> (LinearScale, LinearScale) {
        let b = self.viewport.plot_bounds();
        let x = self.options.x_scale.with_range((b.x0, b.x1));
        let y = self.options.y_scale.with_range((b.y1, b.y0));
        (self.viewport.rescale_x(&x), self.viewport.rescale_y(&y))
    }

    /// The visible region in domain units.
    #[must_use]
    pub fn visible_domain(&self) -> Rect {
        let (x, y) = self.axis_scales();
        let (x0, x1) = x.domain();
        let (y0, y1) = y.domain();
        Rect::new(x0, y0, x1, y1).abs()
    }

    /// Snapshot of the widget state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ScatterplotDebugInfo {
        ScatterplotDebugInfo {
            phase: self.phase,
            redraw_deadline: self.timers.deadline(Pending::Redraw),
            tooltip_deadline: self.timers.deadline(Pending::Tooltip),
            full_redraws: self.full_redraws,
            incremental_redraws: self.incremental_redraws,
            selection_redraws: self.selection_redraws,
            last_stats: self.last_stats,
            len: self.tree.len(),
            selected: self.selection.len(),
            viewport: self.viewport.debug_info(),
        }
    }

    /// Deduplicates `records` and drops those not in the primary index.
    fn admit<'r>(&self, records: &'r [T]) -> Vec<&'r T> {
        let mut seen = HashSet::with_capacity(records.len());
        let admitted: Vec<&T> = records
            .iter()
            .filter(|r| seen.insert(*r) && self.tree.contains(r))
            .collect();
        let skipped = seen.len() - admitted.len();
        if skipped > 0 {
            tracing::debug!(skipped, "ignoring selection entries missing from the dataset");
        }
        admitted
    }

    fn insert_selected(&mut self, records: Vec<T>) {
        if let Err(err) = self.selection.add_all(records) {
            tracing::debug!(%err, "selection entries could not be indexed");
        }
    }

    fn selection_changed(&mut self) {
        let selected = self.selection.data();
        tracing::debug!(selected = selected.len(), "selection changed");
        if let Some(listener) = self.on_selection.as_mut() {
            listener(&selected);
        }
        self.redraw(RenderReason::SelectionChanged, None);
    }

    fn pick(&self, at: Point) -> Vec<T> {
        let p = self.viewport.pixel_to_normalized(at);
        let radius = self.viewport.normalized_radius(self.options.click_radius);
        self.tree
            .find_all(p.x, p.y, radius)
            .into_iter()
            .cloned()
            .collect()
    }

    fn show_tooltip(&mut self) {
        let Some(at) = self.tooltip_at else {
            return;
        };
        let p = self.viewport.pixel_to_normalized(at);
        let radius = self.viewport.normalized_radius(self.options.click_radius);
        let hits = self.tree.find_all(p.x, p.y, radius);
        self.tooltip_shown = !hits.is_empty();
        if let Some(handler) = self.on_tooltip.as_mut() {
            handler(&hits, at);
        }
    }

    fn draw_axes(&mut self) {
        let (x, y) = self.axis_scales();
        if let Some(renderer) = self.on_axes.as_mut() {
            renderer(&x, &y);
        }
    }

    fn draw_data(&mut self) {
        let Self {
            options,
            tree,
            viewport,
            buffers,
            symbol,
            last_stats,
            ..
        } = self;
        let surface = buffers.front_mut();
        surface.clear();
        surface.push_clip(viewport.plot_bounds());
        let mut renderer = symbol.renderer(RenderMode::Normal);
        let stats = render_tree(
            tree,
            surface,
            renderer.as_mut(),
            viewport,
            TreePass {
                aggregation_threshold: Some(options.aggregation_threshold),
                collect_stats: options.collect_stats,
            },
        );
        surface.pop_clip();
        tracing::debug!(
            rendered = stats.rendered,
            aggregated = stats.aggregated,
            hidden = stats.hidden,
            total = stats.total,
            "data layer drawn"
        );
        *last_stats = stats;
    }

    fn draw_selection(&mut self) {
        let Self {
            selection,
            viewport,
            buffers,
            symbol,
            lasso,
            ..
        } = self;
        let surface = buffers.back_mut();
        surface.clear();
        surface.push_clip(viewport.plot_bounds());
        let mut renderer = symbol.renderer(RenderMode::Selected);
        render_tree(
            selection,
            surface,
            renderer.as_mut(),
            viewport,
            TreePass::default(),
        );
        surface.pop_clip();

        if let Some(outline) = lasso.outline() {
            surface.fill_path(&outline.path, Color::from_rgba8(0, 0, 0, 51));
            surface.stroke_path(&outline.path, LASSO_STROKE_WIDTH, Color::BLACK);
            for marker in [outline.start, outline.end] {
                let path = marker.to_path(MARKER_TOLERANCE);
                surface.stroke_path(&path, LASSO_STROKE_WIDTH, Color::BLACK);
            }
        }
    }

    /// Shifts the data raster by `delta` into the back surface and swaps roles.
    fn transform_data(&mut self, delta: TransformDelta) {
        let bounds = self.viewport.plot_bounds();
        let dst = Rect::from_origin_size(
            (bounds.x0 + delta.x, bounds.y0 + delta.y),
            (bounds.width() * delta.k, bounds.height() * delta.k),
        );
        let (front, back) = self.buffers.split_mut();
        back.clear();
        back.push_clip(bounds);
        back.blit(front, bounds, dst);
        back.pop_clip();
        self.buffers.swap();
    }
}

/// Debug snapshot of a [`Scatterplot`].
#[derive(Clone, Copy, Debug)]
pub struct ScatterplotDebugInfo {
    /// What the layers currently show.
    pub phase: GesturePhase,
    /// When the deferred full-quality redraw fires, if pending.
    pub redraw_deadline: Option<u64>,
    /// When the tooltip fires, if pending.
    pub tooltip_deadline: Option<u64>,
    /// Full redraws performed.
    pub full_redraws: usize,
    /// Raster-shift redraws performed.
    pub incremental_redraws: usize,
    /// Selection-only redraws performed.
    pub selection_redraws: usize,
    /// Counters from the most recent data layer pass.
    pub last_stats: RenderStats,
    /// Records in the primary index.
    pub len: usize,
    /// Records in the selection.
    pub selected: usize,
    /// Viewport state.
    pub viewport: ViewportDebugInfo,
}
