// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster targets and the data/selection double buffer.

use alloc::vec::Vec;

use kurbo::{BezPath, Rect, Size};
use peniko::Color;

/// A 2D raster target the scatterplot draws into.
///
/// This is the narrow slice of a canvas API the renderer needs. Coordinates
/// are device pixels.
pub trait Surface {
    /// Current backing-store size.
    fn size(&self) -> Size;

    /// Resizes the backing store. Contents are undefined afterwards.
    fn resize(&mut self, size: Size);

    /// Erases the whole surface.
    fn clear(&mut self);

    /// Restricts drawing to `rect` until the matching [`Surface::pop_clip`].
    fn push_clip(&mut self, rect: Rect);

    /// Removes the innermost clip.
    fn pop_clip(&mut self);

    /// Fills `path` with a solid color.
    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Strokes `path` with a solid color.
    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color);

    /// Copies the `src_rect` region of `src` into `dst_rect`, scaling as needed.
    fn blit(&mut self, src: &Self, src_rect: Rect, dst_rect: Rect)
    where
        Self: Sized;
}

/// Two surfaces with swappable roles.
///
/// The front surface holds the data layer; the back surface holds the
/// selection layer and is stacked above it by the host. [`DoubleBuffer::swap`]
/// is the only way to exchange the roles.
#[derive(Clone, Debug)]
pub struct DoubleBuffer<S> {
    layers: [S; 2],
    front: usize,
}

impl<S> DoubleBuffer<S> {
    /// Creates a buffer with `front` as the data layer and `back` as the selection layer.
    pub fn new(front: S, back: S) -> Self {
        Self {
            layers: [front, back],
            front: 0,
        }
    }

    /// The data layer.
    #[must_use]
    pub fn front(&self) -> &S {
        &self.layers[self.front]
    }

    /// The selection layer.
    #[must_use]
    pub fn back(&self) -> &S {
        &self.layers[1 - self.front]
    }

    /// The data layer, mutably.
    pub fn front_mut(&mut self) -> &mut S {
        &mut self.layers[self.front]
    }

    /// The selection layer, mutably.
    pub fn back_mut(&mut self) -> &mut S {
        &mut self.layers[1 - self.front]
    }

    /// Both layers at once, as `(front, back)`.
    pub fn split_mut(&mut self) -> (&mut S, &mut S) {
        let [a, b] = &mut self.layers;
        if self.front == 0 { (a, b) } else { (b, a) }
    }

    /// Exchanges the roles of the two surfaces.
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    /// Index of the surface currently acting as the data layer.
    #[must_use]
    pub fn front_index(&self) -> usize {
        self.front
    }
}

impl<S: Surface> DoubleBuffer<S> {
    /// Backing-store size of the data layer.
    #[must_use]
    pub fn size(&self) -> Size {
        self.front().size()
    }

    /// Resizes both layers.
    pub fn resize(&mut self, size: Size) {
        for layer in &mut self.layers {
            layer.resize(size);
        }
    }
}

/// An operation recorded by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// The backing store was resized.
    Resize(Size),
    /// The surface was erased.
    Clear,
    /// A clip was pushed.
    PushClip(Rect),
    /// A clip was popped.
    PopClip,
    /// A path was filled.
    Fill {
        /// Filled path.
        path: BezPath,
        /// Fill color.
        color: Color,
    },
    /// A path was stroked.
    Stroke {
        /// Stroked path.
        path: BezPath,
        /// Stroke width.
        width: f64,
        /// Stroke color.
        color: Color,
    },
    /// Pixels were copied from another surface.
    Blit {
        /// Id of the source surface.
        source: u32,
        /// Source region.
        src_rect: Rect,
        /// Destination region.
        dst_rect: Rect,
    },
}

/// A [`Surface`] that records operations instead of rasterizing.
///
/// Intended for tests and debugging that want to assert on what was drawn
/// where. Each surface carries an id so blits can be traced to their source.
/// [`Surface::clear`] drops everything recorded before it, so the log only
/// describes the current contents.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    id: u32,
    size: Size,
    clip_depth: usize,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Creates an empty recording surface.
    #[must_use]
    pub fn new(id: u32, size: Size) -> Self {
        Self {
            id,
            size,
            clip_depth: 0,
            ops: Vec::new(),
        }
    }

    /// The id given at construction.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Recorded operations, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Recorded operations without the leading [`SurfaceOp::Clear`].
    #[must_use]
    pub fn visible_ops(&self) -> &[SurfaceOp] {
        match self.ops.split_first() {
            Some((SurfaceOp::Clear, rest)) => rest,
            _ => &self.ops,
        }
    }

    /// Forgets recorded operations.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of clips currently pushed.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.ops.push(SurfaceOp::Resize(size));
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(SurfaceOp::Clear);
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.ops.push(SurfaceOp::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.ops.push(SurfaceOp::PopClip);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.ops.push(SurfaceOp::Fill {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color) {
        self.ops.push(SurfaceOp::Stroke {
            path: path.clone(),
            width,
            color,
        });
    }

    fn blit(&mut self, src: &Self, src_rect: Rect, dst_rect: Rect) {
        self.ops.push(SurfaceOp::Blit {
            source: src.id,
            src_rect,
            dst_rect,
        });
    }
}
