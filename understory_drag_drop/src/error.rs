// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error kinds for drop-target configuration and containment evaluation.
//!
//! Drag and drop has no I/O, so the taxonomy is small:
//!
//! - [`ConfigError`] is raised when a [`Target`](crate::Target) is built with
//!   an unusable overlap threshold.
//! - [`GeometryError`] is raised when a [`Geometry`](crate::Geometry) provider
//!   reports a size that cannot take part in an overlap ratio.
//! - [`DragError`] is what the progress and drop operations return.
//!
//! Everything else (moving an idle source, releasing with no drag in flight)
//! is a state-machine no-op rather than an error.

use thiserror::Error;

/// A drop target was configured with values the containment policy cannot use.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The overlap threshold is NaN or lies outside `[0, 1]`.
    #[error("overlap threshold {0} is outside the range [0, 1]")]
    ThresholdOutOfRange(f64),
}

/// Measured geometry could not be used for containment.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// A coordinate or extent was NaN or infinite.
    #[error("geometry is not finite: {axis} = {value}")]
    NonFinite {
        /// Which measurement was bad (`"left"`, `"top"`, `"width"` or `"height"`).
        axis: &'static str,
        /// The reported value.
        value: f64,
    },
    /// A width or height was negative.
    #[error("geometry has a negative extent: {axis} = {value}")]
    Negative {
        /// Which extent was bad (`"width"` or `"height"`).
        axis: &'static str,
        /// The reported value.
        value: f64,
    },
    /// The dragged rectangle has zero area, so no overlap ratio exists.
    #[error("dragged rectangle has zero area")]
    EmptyArea,
}

/// Error returned by [`Source::drag_to`](crate::Source::drag_to),
/// [`Source::drop_at`](crate::Source::drop_at) and the session routing calls.
///
/// The state machine always runs to completion before one of these is
/// returned; the error reports the first target that could not be evaluated.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum DragError {
    /// Containment for a target could not be evaluated.
    #[error("containment evaluation failed for {target:?}: {source}")]
    Geometry {
        /// The target whose evaluation failed.
        target: crate::TargetId,
        /// What was wrong with the geometry.
        #[source]
        source: GeometryError,
    },
}

impl DragError {
    /// The geometry problem behind this error.
    #[must_use]
    pub fn geometry(&self) -> GeometryError {
        match self {
            Self::Geometry { source, .. } => *source,
        }
    }
}
