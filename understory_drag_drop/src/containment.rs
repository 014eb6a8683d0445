// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Containment policy: decide whether a dragged source is "over" a target.
//!
//! Two interchangeable policies are provided:
//!
//! - [`Containment::Point`]: the pointer position must lie inside the target's
//!   bounds. See [`contains_point`] and [`EdgeMode`] for edge handling.
//! - [`Containment::Overlap`] (the default): the fraction of the drag handle's
//!   area that intersects the target must reach a [`Threshold`]. See
//!   [`overlap_ratio`].
//!
//! All functions here are pure; targets feed them freshly measured bounds on
//! every evaluation.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_drag_drop::containment::{overlap_ratio, Threshold};
//!
//! let handle = Rect::new(0.0, 0.0, 10.0, 10.0);
//! let zone = Rect::new(5.0, 0.0, 15.0, 10.0);
//!
//! let ratio = overlap_ratio(handle, zone).unwrap();
//! assert_eq!(ratio, 0.5);
//! assert!(Threshold::new(0.5).unwrap().is_met(ratio));
//! assert!(!Threshold::new(0.51).unwrap().is_met(ratio));
//! ```

use kurbo::{Point, Rect};

use crate::error::{ConfigError, GeometryError};

/// How [`contains_point`] treats points lying exactly on a target's edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeMode {
    /// Left and right edges count as inside, top and bottom edges do not.
    ///
    /// This matches long-standing behavior that existing integrations rely on.
    #[default]
    Legacy,
    /// Every edge counts as inside.
    Inclusive,
}

/// Minimum fraction of the handle's area that must overlap a target.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Half the handle must be over the target.
    pub const DEFAULT: Self = Self(0.5);

    /// Create a threshold, rejecting NaN and values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::ThresholdOutOfRange(value))
        }
    }

    /// Parse a threshold from text, as markup attributes usually carry it.
    ///
    /// The longest leading numeric prefix is used (`"0.7px"` parses as `0.7`).
    /// Text with no numeric prefix falls back to [`Threshold::DEFAULT`]; a
    /// number outside `[0, 1]` is still an error.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        match leading_float(text) {
            Some(value) if !value.is_nan() => Self::new(value),
            _ => Ok(Self::DEFAULT),
        }
    }

    /// The threshold as a fraction.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether an overlap `ratio` satisfies this threshold.
    #[must_use]
    pub fn is_met(self, ratio: f64) -> bool {
        ratio >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scan the numeric prefix of `text` the way `parseFloat` does: optional
/// sign, then either `Infinity` or a decimal literal with an optional exponent.
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let digits = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };
    let int = digits(end);
    end += int;
    let mut frac = 0;
    if bytes.get(end) == Some(&b'.') {
        frac = digits(end + 1);
        if frac > 0 {
            end += 1 + frac;
        }
    }
    if int + frac == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = digits(exp);
        if n > 0 {
            end = exp + n;
        }
    }
    text[..end].parse().ok()
}

/// What a target is evaluated against on each drag-progress notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Probe {
    /// Current pointer position.
    pub point: Point,
    /// Current bounds of the drag handle, if they could be measured.
    pub handle: Result<Rect, GeometryError>,
}

/// Containment policy for a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Containment {
    /// The pointer must be inside the target.
    Point(EdgeMode),
    /// The handle must overlap the target by at least the threshold.
    Overlap(Threshold),
}

impl Default for Containment {
    fn default() -> Self {
        Self::Overlap(Threshold::DEFAULT)
    }
}

impl Containment {
    /// Evaluate this policy for a target with bounds `target`.
    pub fn evaluate(&self, target: Rect, probe: &Probe) -> Result<bool, GeometryError> {
        match *self {
            Self::Point(edges) => Ok(contains_point(target, probe.point, edges)),
            Self::Overlap(threshold) => overlaps(probe.handle?, target, threshold),
        }
    }
}

/// Whether `point` lies inside `rect` under the given edge rule.
#[must_use]
pub fn contains_point(rect: Rect, point: Point, edges: EdgeMode) -> bool {
    let Point { x, y } = point;
    if x < rect.x0 || x > rect.x1 {
        return false;
    }
    match edges {
        EdgeMode::Legacy => rect.y0 < y && y < rect.y1,
        EdgeMode::Inclusive => rect.y0 <= y && y <= rect.y1,
    }
}

/// Fraction of `moving`'s area covered by `target`.
///
/// Returns `0.0` when the rectangles do not overlap on either axis (touching
/// edges do not overlap). Fails with [`GeometryError::EmptyArea`] when
/// `moving` has no area, since no ratio exists.
pub fn overlap_ratio(moving: Rect, target: Rect) -> Result<f64, GeometryError> {
    let area = moving.width() * moving.height();
    if area <= 0.0 {
        return Err(GeometryError::EmptyArea);
    }
    Ok(match intersection_extent(moving, target) {
        Some((w, h)) => (w * h) / area,
        None => 0.0,
    })
}

/// Whether `moving` overlaps `target` by at least `threshold`.
///
/// Any non-overlapping pair is outside, even with a zero threshold.
pub fn overlaps(moving: Rect, target: Rect, threshold: Threshold) -> Result<bool, GeometryError> {
    let ratio = overlap_ratio(moving, target)?;
    Ok(intersection_extent(moving, target).is_some() && threshold.is_met(ratio))
}

fn intersection_extent(a: Rect, b: Rect) -> Option<(f64, f64)> {
    let w = a.x1.min(b.x1) - a.x0.max(b.x0);
    let h = a.y1.min(b.y1) - a.y0.max(b.y0);
    (w > 0.0 && h > 0.0).then_some((w, h))
}
