// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render reasons and the redraw decision table.

use understory_view2d::TransformChange;

/// Why a redraw was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderReason {
    /// Layout changed: recompute pixel ranges, then redraw everything.
    Dirty,
    /// Only the selection layer is stale.
    SelectionChanged,
    /// A pan step in the middle of a gesture.
    PerformTranslate,
    /// A zoom step in the middle of a gesture.
    PerformScale,
    /// A combined pan and zoom step in the middle of a gesture.
    PerformScaleAndTranslate,
    /// A pan gesture settled.
    AfterTranslate,
    /// A zoom gesture settled.
    AfterScale,
    /// A combined pan and zoom gesture settled.
    AfterScaleAndTranslate,
}

impl RenderReason {
    /// The mid-gesture reason for a transform step, or `None` if nothing moved.
    #[must_use]
    pub fn perform(change: TransformChange) -> Option<Self> {
        match change {
            TransformChange::None => None,
            TransformChange::Translate => Some(Self::PerformTranslate),
            TransformChange::Scale => Some(Self::PerformScale),
            TransformChange::ScaleAndTranslate => Some(Self::PerformScaleAndTranslate),
        }
    }

    /// The settle reason for a whole gesture, or `None` if nothing moved.
    #[must_use]
    pub fn after(change: TransformChange) -> Option<Self> {
        match change {
            TransformChange::None => None,
            TransformChange::Translate => Some(Self::AfterTranslate),
            TransformChange::Scale => Some(Self::AfterScale),
            TransformChange::ScaleAndTranslate => Some(Self::AfterScaleAndTranslate),
        }
    }
}

/// What the layers currently show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Nothing has been drawn since construction.
    #[default]
    Unrendered,
    /// The data layer is a full-quality rendering of the current transform.
    Settled,
    /// The data layer is a shifted copy; a trailing full redraw is pending.
    Translating,
}

/// The drawing work a redraw performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderAction {
    /// Axes, data layer and selection layer.
    FullRedraw {
        /// Recompute pixel ranges from the current layout first.
        relayout: bool,
    },
    /// Selection layer only.
    SelectionOnly,
    /// Shift the existing data raster, then redraw selection and axes.
    IncrementalTranslate,
}

/// What happens to the deferred full-quality redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerCommand {
    /// Leave it as it is.
    Keep,
    /// Drop it.
    Cancel,
    /// Restart it from now.
    Reschedule,
}

/// One row of the decision table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Drawing work to do.
    pub action: RenderAction,
    /// Effect on the deferred redraw.
    pub timer: TimerCommand,
    /// Phase after the redraw.
    pub next: GesturePhase,
}

/// Decides how to service `reason` given what the layers currently show.
///
/// Scale steps always redraw in full; only pure translation takes the
/// raster-copy path.
#[must_use]
pub fn transition(phase: GesturePhase, reason: RenderReason) -> Transition {
    use RenderReason as R;

    let full = |relayout| Transition {
        action: RenderAction::FullRedraw { relayout },
        timer: TimerCommand::Cancel,
        next: GesturePhase::Settled,
    };
    match (phase, reason) {
        (GesturePhase::Unrendered, _) | (_, R::Dirty) => full(true),
        (_, R::SelectionChanged) => Transition {
            action: RenderAction::SelectionOnly,
            timer: TimerCommand::Keep,
            next: phase,
        },
        (_, R::PerformTranslate) => Transition {
            action: RenderAction::IncrementalTranslate,
            timer: TimerCommand::Reschedule,
            next: GesturePhase::Translating,
        },
        (
            _,
            R::PerformScale
            | R::PerformScaleAndTranslate
            | R::AfterTranslate
            | R::AfterScale
            | R::AfterScaleAndTranslate,
        ) => full(false),
    }
}
