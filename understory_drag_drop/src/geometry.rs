// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing geometry and visual-node traits.
//!
//! The drag/drop core never talks to a rendering toolkit directly. Hosts
//! implement [`Geometry`] to report where a node is and how big it is, and
//! [`Surface`] to clone, insert, position and remove the temporary proxy used
//! as a drag [`Handle`](crate::Handle).
//!
//! Node identifiers are small `Copy` values owned by the host (an entity id,
//! an index into a widget arena, a DOM node key, ...).

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect, Vec2};

use crate::error::GeometryError;

/// Position of a visual node in document space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    /// Distance from the document's left edge.
    pub left: f64,
    /// Distance from the document's top edge.
    pub top: f64,
}

impl Offset {
    /// Create an offset.
    #[must_use]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Apply a partial update, keeping this offset's value for omitted axes.
    #[must_use]
    pub fn with(self, update: OffsetUpdate) -> Self {
        Self {
            left: update.left.unwrap_or(self.left),
            top: update.top.unwrap_or(self.top),
        }
    }
}

impl From<Point> for Offset {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Offset> for Point {
    fn from(o: Offset) -> Self {
        Self::new(o.left, o.top)
    }
}

/// A partially specified offset or offset delta.
///
/// Used by [`Handle::move_to`](crate::Handle::move_to), where an omitted axis
/// keeps its previous value, and by [`Handle::move_by`](crate::Handle::move_by),
/// where an omitted axis counts as zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OffsetUpdate {
    /// New left edge (or horizontal delta).
    pub left: Option<f64>,
    /// New top edge (or vertical delta).
    pub top: Option<f64>,
}

impl OffsetUpdate {
    /// Update only the horizontal axis.
    #[must_use]
    pub const fn left(left: f64) -> Self {
        Self {
            left: Some(left),
            top: None,
        }
    }

    /// Update only the vertical axis.
    #[must_use]
    pub const fn top(top: f64) -> Self {
        Self {
            left: None,
            top: Some(top),
        }
    }
}

impl From<Offset> for OffsetUpdate {
    fn from(o: Offset) -> Self {
        Self {
            left: Some(o.left),
            top: Some(o.top),
        }
    }
}

impl From<Vec2> for OffsetUpdate {
    fn from(v: Vec2) -> Self {
        Self {
            left: Some(v.x),
            top: Some(v.y),
        }
    }
}

/// Bounds required of host node identifiers.
pub trait NodeKey: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> NodeKey for T {}

/// Measures host nodes.
///
/// Implementations must report *current* geometry: the core queries it on
/// every evaluation and never caches it across pointer moves, because
/// scrolling or layout may have changed it.
pub trait Geometry {
    /// Host node identifier.
    type Node: NodeKey;

    /// Document-space position of `node`.
    fn offset(&self, node: Self::Node) -> Offset;

    /// Width of `node`.
    fn width(&self, node: Self::Node) -> f64;

    /// Height of `node`.
    fn height(&self, node: Self::Node) -> f64;

    /// Validated bounds of `node` at its measured offset.
    fn bounds(&self, node: Self::Node) -> Result<Rect, GeometryError> {
        checked_rect(self.offset(node), self.width(node), self.height(node))
    }
}

/// Visual node operations needed to show a drag handle.
pub trait Surface: Geometry {
    /// Create a detached copy of `node`.
    fn clone_node(&mut self, node: Self::Node) -> Self::Node;

    /// Insert `node` at the document root.
    fn append_to_root(&mut self, node: Self::Node);

    /// Remove `node` from the document.
    fn remove_node(&mut self, node: Self::Node);

    /// Position `node` absolutely at `offset`.
    fn set_absolute_position(&mut self, node: Self::Node, offset: Offset);

    /// Set the rendering opacity of `node`.
    fn set_opacity(&mut self, node: Self::Node, opacity: f64);

    /// Tag `node` with a style class. Hosts without class-based styling can
    /// ignore this.
    fn add_class(&mut self, node: Self::Node, class: &'static str) {
        let _ = (node, class);
    }
}

/// Build a rectangle from an offset and size, rejecting values that cannot
/// take part in containment.
pub fn checked_rect(offset: Offset, width: f64, height: f64) -> Result<Rect, GeometryError> {
    for (axis, value) in [
        ("left", offset.left),
        ("top", offset.top),
        ("width", width),
        ("height", height),
    ] {
        if !value.is_finite() {
            return Err(GeometryError::NonFinite { axis, value });
        }
    }
    if width < 0.0 {
        return Err(GeometryError::Negative {
            axis: "width",
            value: width,
        });
    }
    if height < 0.0 {
        return Err(GeometryError::Negative {
            axis: "height",
            value: height,
        });
    }
    Ok(Rect::from_origin_size(
        Point::from(offset),
        (width, height),
    ))
}
