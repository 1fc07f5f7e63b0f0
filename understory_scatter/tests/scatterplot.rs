// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event-level behavior of the scatterplot widget.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_scatter::{
    GesturePhase, Modifiers, RecordingSurface, RenderReason, Scatterplot, ScatterplotOptions,
    Surface, SurfaceOp,
};
use understory_view2d::{TransformDelta, ZoomTransform};

type Rec = (u32, u32);
type Plot = Scatterplot<Rec, RecordingSurface>;

const SIZE: Size = Size::new(150.0, 130.0);

fn plot_with(records: &[Rec], options: ScatterplotOptions) -> Plot {
    let mut plot = Scatterplot::new(
        records.iter().copied(),
        |r: &Rec| f64::from(r.0),
        |r: &Rec| f64::from(r.1),
        [RecordingSurface::new(1, SIZE), RecordingSurface::new(2, SIZE)],
        options,
    )
    .unwrap();
    plot.resized();
    plot
}

fn plot(records: &[Rec]) -> Plot {
    plot_with(records, ScatterplotOptions::default())
}

fn grid() -> Vec<Rec> {
    let mut out = Vec::new();
    for x in (0..=100).step_by(10) {
        for y in (0..=100).step_by(10) {
            out.push((x, y));
        }
    }
    out
}

#[test]
fn translate_burst_coalesces_into_one_trailing_redraw() {
    let mut p = plot(&[(50, 50), (10, 20)]);
    assert_eq!(p.debug_info().full_redraws, 1);

    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(5.0, 0.0, 1.0), 0);
    p.on_zoom(ZoomTransform::new(10.0, 0.0, 1.0), 100);
    p.on_zoom(ZoomTransform::new(15.0, 0.0, 1.0), 200);

    let info = p.debug_info();
    assert_eq!(info.incremental_redraws, 3);
    assert_eq!(info.full_redraws, 1);
    assert_eq!(info.phase, GesturePhase::Translating);
    assert_eq!(info.redraw_deadline, Some(500));

    p.tick(499);
    assert_eq!(p.debug_info().full_redraws, 1);

    p.tick(500);
    let info = p.debug_info();
    assert_eq!(info.full_redraws, 2);
    assert_eq!(info.phase, GesturePhase::Settled);
    assert_eq!(info.redraw_deadline, None);

    p.tick(10_000);
    assert_eq!(p.debug_info().full_redraws, 2);
}

#[test]
fn direct_translate_renders_schedule_from_host_time() {
    let mut p = plot(&[(50, 50), (10, 20)]);
    let step = TransformDelta {
        x: 5.0,
        y: 0.0,
        k: 1.0,
    };
    p.render(RenderReason::PerformTranslate, Some(step), 10_000);
    p.render(RenderReason::PerformTranslate, Some(step), 10_100);
    p.render(RenderReason::PerformTranslate, Some(step), 10_200);

    let info = p.debug_info();
    assert_eq!(info.incremental_redraws, 3);
    assert_eq!(info.redraw_deadline, Some(10_500));

    p.tick(10_001);
    p.tick(10_499);
    assert_eq!(p.debug_info().full_redraws, 1);

    p.tick(10_500);
    p.tick(11_000);
    let info = p.debug_info();
    assert_eq!(info.full_redraws, 2);
    assert_eq!(info.phase, GesturePhase::Settled);
}

#[test]
fn pan_step_shifts_raster_and_swaps_layers() {
    let mut p = plot(&[(50, 50)]);
    assert_eq!(p.surfaces().front().id(), 1);

    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(5.0, -3.0, 1.0), 0);

    let front = p.surfaces().front();
    assert_eq!(front.id(), 2);
    let plot_area = Rect::new(40.0, 10.0, 140.0, 110.0);
    assert_eq!(
        front.visible_ops(),
        &[
            SurfaceOp::PushClip(plot_area),
            SurfaceOp::Blit {
                source: 1,
                src_rect: plot_area,
                dst_rect: Rect::new(45.0, 7.0, 145.0, 107.0),
            },
            SurfaceOp::PopClip,
        ]
    );
}

#[test]
fn gesture_end_redraws_and_cancels_pending_redraw() {
    let mut p = plot(&[(50, 50)]);
    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(5.0, 0.0, 1.0), 0);
    p.on_zoom_end(50);
    let info = p.debug_info();
    assert_eq!(info.full_redraws, 2);
    assert_eq!(info.redraw_deadline, None);
    assert_eq!(info.phase, GesturePhase::Settled);
}

#[test]
fn scale_steps_always_redraw_in_full() {
    let mut p = plot(&[(50, 50)]);
    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(5.0, 0.0, 1.0), 0);
    p.on_zoom(ZoomTransform::new(5.0, 0.0, 2.0), 10);
    let info = p.debug_info();
    assert_eq!(info.incremental_redraws, 1);
    assert_eq!(info.full_redraws, 2);
    assert_eq!(info.redraw_deadline, None);
}

#[test]
fn zoom_is_clamped_to_scale_extent() {
    let mut p = plot(&[(50, 50)]);
    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(0.0, 0.0, 10.0), 0);
    assert!((p.viewport().transform().k - 4.0).abs() < 1e-12);
}

#[test]
fn window_listener_sees_visible_domain() {
    let windows = Rc::new(RefCell::new(Vec::new()));
    let mut p = plot(&[(50, 50)]);
    let sink = windows.clone();
    p.set_window_listener(move |r| sink.borrow_mut().push(r));

    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(10.0, 0.0, 1.0), 0);
    // No movement, no notification.
    p.on_zoom(ZoomTransform::new(10.0, 0.0, 1.0), 1);

    let windows = windows.borrow();
    assert_eq!(windows.len(), 1);
    let w = windows[0];
    assert!((w.x0 + 10.0).abs() < 1e-9);
    assert!((w.x1 - 90.0).abs() < 1e-9);
    assert!(w.y0.abs() < 1e-9);
    assert!((w.y1 - 100.0).abs() < 1e-9);
}

#[test]
fn resize_forces_full_relayout() {
    let mut p = plot(&[(50, 50)]);
    let before = p.debug_info();
    p.set_layout_size(Size::new(200.0, 150.0));
    p.render(RenderReason::SelectionChanged, None, 0);

    let after = p.debug_info();
    assert_eq!(after.full_redraws, before.full_redraws + 1);
    assert_eq!(after.selection_redraws, before.selection_redraws);
    assert_eq!(p.surfaces().front().size(), Size::new(200.0, 150.0));
    assert_eq!(p.surfaces().back().size(), Size::new(200.0, 150.0));
    assert_eq!(
        p.viewport().plot_bounds(),
        Rect::new(40.0, 10.0, 190.0, 130.0)
    );
}

#[test]
fn selection_updates_are_diffs() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut p = plot(&[(10, 10), (20, 20), (30, 30)]);
    let sink = calls.clone();
    p.set_selection_listener(move |sel| sink.borrow_mut().push(sel.len()));

    assert!(p.set_selection(&[(10, 10), (20, 20)]));
    let redraws = p.debug_info().selection_redraws;

    // Same set, different order, with a duplicate.
    assert!(!p.set_selection(&[(20, 20), (10, 10), (20, 20)]));
    assert_eq!(p.debug_info().selection_redraws, redraws);

    // Records outside the dataset are ignored.
    assert!(p.set_selection(&[(20, 20), (99, 99)]));
    assert_eq!(p.selection(), [&(20, 20)]);

    assert!(p.add_to_selection(&[(30, 30), (20, 20)]));
    assert!(!p.add_to_selection(&[(30, 30)]));
    assert_eq!(p.selection().len(), 2);

    assert!(!p.remove_from_selection(&[(10, 10)]));
    assert!(p.remove_from_selection(&[(30, 30)]));

    assert!(p.clear_selection());
    assert!(!p.clear_selection());
    assert!(p.selection().is_empty());

    assert_eq!(*calls.borrow(), [2, 1, 2, 1, 0]);
}

#[test]
fn stats_cover_every_record() {
    let options = ScatterplotOptions {
        collect_stats: true,
        ..ScatterplotOptions::default()
    };
    let mut p = plot_with(&grid(), options);
    let stats = p.last_stats();
    assert_eq!(stats.total, 121);
    assert_eq!(stats.rendered + stats.aggregated + stats.hidden, stats.total);

    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(-100.0, -50.0, 2.0), 0);
    let stats = p.last_stats();
    assert!(stats.hidden > 0);
    assert_eq!(stats.rendered + stats.aggregated + stats.hidden, stats.total);
}

#[test]
fn clicks_select_and_secondary_button_clears() {
    let mut p = plot(&[(50, 50), (10, 20)]);
    p.on_click(Point::new(90.0, 60.0), 0);
    assert_eq!(p.selection(), [&(50, 50)]);

    // Empty space clears through the replacement diff.
    p.on_click(Point::new(130.0, 15.0), 0);
    assert!(p.selection().is_empty());

    p.on_click(Point::new(50.0, 90.0), 0);
    assert_eq!(p.selection(), [&(10, 20)]);
    p.on_click(Point::new(90.0, 60.0), 2);
    assert!(p.selection().is_empty());
}

#[test]
fn click_radius_stays_constant_in_pixels() {
    let mut p = plot(&[(50, 50)]);
    // 8 px away at identity zoom.
    p.on_click(Point::new(98.0, 60.0), 0);
    assert_eq!(p.selection().len(), 1);

    // At 2x, (50, 50) sits at pixel (180, 120); 8 px is still inside.
    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(0.0, 0.0, 2.0), 0);
    p.on_click(Point::new(0.0, 0.0), 2);
    p.on_click(Point::new(188.0, 120.0), 0);
    assert_eq!(p.selection().len(), 1);
    p.on_click(Point::new(192.0, 120.0), 0);
    assert!(p.selection().is_empty());
}

#[test]
fn lasso_selects_live_and_clears_overlay_on_end() {
    let mut p = plot(&[(50, 50), (10, 20)]);
    p.set_selection(&[(10, 20)]);

    p.on_drag_start(Point::new(60.0, 40.0));
    assert!(p.selection().is_empty());
    assert!(p.lasso().is_drawing());

    p.on_drag(Point::new(120.0, 40.0));
    assert!(p.selection().is_empty());
    p.on_drag(Point::new(120.0, 90.0));
    assert_eq!(p.selection(), [&(50, 50)]);

    let before = p.debug_info().selection_redraws;
    p.on_drag(Point::new(60.0, 90.0));
    assert_eq!(p.selection(), [&(50, 50)]);
    assert_eq!(p.debug_info().selection_redraws, before + 1);
    assert!(
        p.surfaces()
            .back()
            .visible_ops()
            .iter()
            .any(|op| matches!(op, SurfaceOp::Stroke { .. }))
    );

    p.on_drag_end();
    assert!(!p.lasso().is_drawing());
    assert_eq!(p.selection(), [&(50, 50)]);
    assert!(
        !p.surfaces()
            .back()
            .visible_ops()
            .iter()
            .any(|op| matches!(op, SurfaceOp::Stroke { .. }))
    );
}

#[test]
fn drag_without_start_is_ignored() {
    let mut p = plot(&[(50, 50)]);
    let before = p.debug_info();
    p.on_drag(Point::new(10.0, 10.0));
    let after = p.debug_info();
    assert_eq!(after.selection_redraws, before.selection_redraws);
    assert!(p.lasso().points().is_empty());
}

#[test]
fn tooltip_is_debounced() {
    let shown = Rc::new(RefCell::new(Vec::new()));
    let mut p = plot(&[(50, 50)]);
    let sink = shown.clone();
    p.set_tooltip_handler(move |records, _at| sink.borrow_mut().push(records.len()));

    let at = Point::new(90.0, 60.0);
    p.on_mouse_move(at, 0);
    p.tick(499);
    assert!(shown.borrow().is_empty());

    // Moving again restarts the delay and hides first.
    p.on_mouse_move(at, 400);
    assert_eq!(*shown.borrow(), [0]);
    p.tick(500);
    assert_eq!(*shown.borrow(), [0]);
    assert_eq!(p.next_deadline(), Some(900));

    p.tick(900);
    assert_eq!(*shown.borrow(), [0, 1]);

    p.on_mouse_move(at, 1000);
    assert_eq!(*shown.borrow(), [0, 1, 0]);
    p.on_mouse_leave();
    assert_eq!(*shown.borrow(), [0, 1, 0, 0]);
    assert_eq!(p.next_deadline(), None);
    p.tick(5000);
    assert_eq!(shown.borrow().len(), 4);
}

#[test]
fn destroy_cancels_timers_and_detaches_callbacks() {
    let calls = Rc::new(RefCell::new(0));
    let mut p = plot(&[(50, 50)]);
    let sink = calls.clone();
    p.set_selection_listener(move |_| *sink.borrow_mut() += 1);

    p.on_mouse_move(Point::new(90.0, 60.0), 0);
    p.on_zoom_start();
    p.on_zoom(ZoomTransform::new(5.0, 0.0, 1.0), 0);
    p.on_drag_start(Point::new(10.0, 10.0));
    assert!(p.next_deadline().is_some());

    p.destroy();
    assert_eq!(p.next_deadline(), None);
    assert!(!p.lasso().is_drawing());
    assert_eq!(p.viewport().gesture_start(), None);

    p.on_click(Point::new(90.0, 60.0), 0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn select_gesture_needs_primary_button_and_modifier() {
    let p = plot(&[]);
    assert!(p.is_select_event(0, Modifiers::CTRL));
    assert!(p.is_select_event(0, Modifiers::ALT | Modifiers::SHIFT));
    assert!(!p.is_select_event(0, Modifiers::SHIFT));
    assert!(!p.is_select_event(1, Modifiers::CTRL));
}

#[test]
fn non_finite_records_fail_construction() {
    let result = Scatterplot::new(
        vec![(1.0_f64, 2.0_f64), (f64::NAN, 0.0)]
            .into_iter()
            .map(|(x, y)| (x.to_bits(), y.to_bits())),
        |r: &(u64, u64)| f64::from_bits(r.0),
        |r: &(u64, u64)| f64::from_bits(r.1),
        [RecordingSurface::new(1, SIZE), RecordingSurface::new(2, SIZE)],
        ScatterplotOptions::default(),
    );
    assert!(matches!(
        result,
        Err(understory_scatter::ScatterError::Index(_))
    ));
}

#[test]
fn records_beyond_the_index_range_fail_construction() {
    let result = Scatterplot::new(
        vec![(1.0_f64, 2.0_f64), (9e307, 9e307), (3.0, 4.0)]
            .into_iter()
            .map(|(x, y)| (x.to_bits(), y.to_bits())),
        |r: &(u64, u64)| f64::from_bits(r.0),
        |r: &(u64, u64)| f64::from_bits(r.1),
        [RecordingSurface::new(1, SIZE), RecordingSurface::new(2, SIZE)],
        ScatterplotOptions::default(),
    );
    assert!(matches!(
        result,
        Err(understory_scatter::ScatterError::Index(
            understory_quadtree::QuadTreeError::OutOfRange { .. }
        ))
    ));
}
