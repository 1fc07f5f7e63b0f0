// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scatter: a headless interactive scatterplot core.
//!
//! [`Scatterplot`] ties together the point index from
//! [`understory_quadtree`], the lasso from [`understory_lasso`] and the
//! viewport from [`understory_view2d`]. It draws into two host-provided
//! [`Surface`]s: a data layer and a selection layer stacked above it.
//!
//! Redraws are driven by a [`RenderReason`]. Each reason is run through a
//! small decision table ([`transition`]) that picks the cheapest correct
//! drawing work:
//! - Selection changes redraw only the selection layer.
//! - Pan steps shift the existing data raster and defer a full-quality
//!   redraw until movement has settled.
//! - Everything else traverses the index, pruning subtrees outside the view
//!   and drawing tiny subtrees as a single representative point.
//!
//! The host forwards input events (zoom, drag, click, pointer motion) and
//! calls [`Scatterplot::tick`] so deferred work can fire; nothing here owns
//! an event loop or a clock.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_scatter::{RecordingSurface, Scatterplot, ScatterplotOptions};
//!
//! let size = Size::new(150.0, 130.0);
//! let mut plot = Scatterplot::new(
//!     vec![(10_u32, 20_u32), (50, 50), (90, 75)],
//!     |r: &(u32, u32)| f64::from(r.0),
//!     |r: &(u32, u32)| f64::from(r.1),
//!     [RecordingSurface::new(0, size), RecordingSurface::new(1, size)],
//!     ScatterplotOptions::default(),
//! )
//! .unwrap();
//! plot.resized();
//! assert_eq!(plot.last_stats().rendered, 3);
//!
//! // The default margins put domain (50, 50) at pixel (90, 60).
//! plot.on_click(Point::new(90.0, 60.0), 0);
//! assert_eq!(plot.selection(), [&(50, 50)]);
//!
//! // Any other button clears.
//! plot.on_click(Point::new(90.0, 60.0), 2);
//! assert!(plot.selection().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod options;
mod reason;
mod render;
mod scatterplot;
mod surface;
mod symbol;

pub use error::{Axis, ScatterError};
pub use options::{Margin, Modifiers, ScatterplotOptions};
pub use reason::{GesturePhase, RenderAction, RenderReason, TimerCommand, Transition, transition};
pub use render::{RenderStats, TreePass, render_tree};
pub use scatterplot::{Scatterplot, ScatterplotDebugInfo};
pub use surface::{DoubleBuffer, RecordingSurface, Surface, SurfaceOp};
pub use symbol::{CircleSymbol, RenderMode, Symbol, SymbolRenderer};
