// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag handle: the temporary visual proxy shown while a source is dragged.
//!
//! A [`Handle`] wraps a node the host has already cloned and tracks the
//! offset it was last placed at. It carries no data and emits no events;
//! the owning [`Source`](crate::Source) attaches it when the drag starts,
//! moves it by pointer deltas, and detaches it when the drag ends.
//!
//! ## Minimal example
//!
//! ```
//! # use understory_drag_drop::{Geometry, Handle, Offset, OffsetUpdate, Surface};
//! # #[derive(Default)] struct Doc { pos: Option<Offset>, attached: bool }
//! # impl Geometry for Doc {
//! #     type Node = u32;
//! #     fn offset(&self, _: u32) -> Offset { Offset::default() }
//! #     fn width(&self, _: u32) -> f64 { 10.0 }
//! #     fn height(&self, _: u32) -> f64 { 10.0 }
//! # }
//! # impl Surface for Doc {
//! #     fn clone_node(&mut self, n: u32) -> u32 { n + 100 }
//! #     fn append_to_root(&mut self, _: u32) { self.attached = true; }
//! #     fn remove_node(&mut self, _: u32) { self.attached = false; }
//! #     fn set_absolute_position(&mut self, _: u32, o: Offset) { self.pos = Some(o); }
//! #     fn set_opacity(&mut self, _: u32, _: f64) {}
//! # }
//! let mut doc = Doc::default();
//! let mut handle = Handle::new(7, Offset::new(10.0, 10.0));
//! handle.attach(&mut doc);
//!
//! handle.move_by(&mut doc, OffsetUpdate::left(5.0));
//! assert_eq!(handle.offset(), Offset::new(15.0, 10.0));
//! assert_eq!(doc.pos, Some(Offset::new(15.0, 10.0)));
//!
//! handle.detach(&mut doc);
//! handle.detach(&mut doc); // idempotent
//! assert!(!doc.attached);
//! ```

use kurbo::Rect;

use crate::error::GeometryError;
use crate::geometry::{Geometry, NodeKey, Offset, OffsetUpdate, Surface, checked_rect};

/// A visual proxy for a node being dragged.
#[derive(Clone, Debug, PartialEq)]
pub struct Handle<N> {
    node: N,
    offset: Offset,
    attached: bool,
}

impl<N: Copy> Handle<N> {
    /// Style class applied to every handle node on [`attach`](Self::attach).
    pub const CLASS_NAME: &'static str = "understory-drag-handle";

    /// Opacity applied to every handle node on [`attach`](Self::attach).
    pub const OPACITY: f64 = 0.5;

    /// Wrap an already-cloned `node`, to be shown at `offset`.
    #[must_use]
    pub fn new(node: N, offset: Offset) -> Self {
        Self {
            node,
            offset,
            attached: false,
        }
    }

    /// Wrap `node` at its currently measured offset.
    #[must_use]
    pub fn measure<G>(geometry: &G, node: N) -> Self
    where
        G: Geometry<Node = N> + ?Sized,
    {
        Self::new(node, geometry.offset(node))
    }

    /// The proxy node.
    #[must_use]
    pub fn node(&self) -> N {
        self.node
    }

    /// The offset the handle was last placed at.
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Whether the proxy is currently inserted in the document.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Insert the proxy at the document root and place it at its offset.
    ///
    /// The node is tagged with [`CLASS_NAME`](Self::CLASS_NAME), positioned
    /// absolutely, and rendered at [`OPACITY`](Self::OPACITY).
    pub fn attach<S>(&mut self, surface: &mut S)
    where
        S: Surface<Node = N> + ?Sized,
    {
        if !self.attached {
            surface.append_to_root(self.node);
            surface.add_class(self.node, Self::CLASS_NAME);
            surface.set_opacity(self.node, Self::OPACITY);
            self.attached = true;
        }
        surface.set_absolute_position(self.node, self.offset);
    }

    /// Place the handle at `offset`; omitted axes keep their current value.
    pub fn move_to<S>(&mut self, surface: &mut S, offset: impl Into<OffsetUpdate>)
    where
        S: Surface<Node = N> + ?Sized,
    {
        self.offset = self.offset.with(offset.into());
        surface.set_absolute_position(self.node, self.offset);
    }

    /// Move the handle by `delta`; omitted axes move by zero.
    pub fn move_by<S>(&mut self, surface: &mut S, delta: impl Into<OffsetUpdate>)
    where
        S: Surface<Node = N> + ?Sized,
    {
        let delta = delta.into();
        let to = Offset::new(
            self.offset.left + delta.left.unwrap_or(0.0),
            self.offset.top + delta.top.unwrap_or(0.0),
        );
        self.move_to(surface, to);
    }

    /// Remove the proxy from the document. Calling this more than once is a no-op.
    pub fn detach<S>(&mut self, surface: &mut S)
    where
        S: Surface<Node = N> + ?Sized,
    {
        if self.attached {
            surface.remove_node(self.node);
            self.attached = false;
        }
    }

    /// Bounds of the handle: its own offset with the proxy node's measured size.
    pub fn bounds<G>(&self, geometry: &G) -> Result<Rect, GeometryError>
    where
        G: Geometry<Node = N> + ?Sized,
    {
        checked_rect(
            self.offset,
            geometry.width(self.node),
            geometry.height(self.node),
        )
    }
}

/// Strategy for building the handle shown when a source starts dragging.
///
/// Override this per source to customize the visual proxy without touching
/// the drag state machine.
pub trait HandleFactory<N: NodeKey> {
    /// Build a (detached) handle for the source node `node`.
    fn make_handle(&self, surface: &mut dyn Surface<Node = N>, node: N) -> Handle<N>;
}

/// Default handle factory: clone the source node and place the clone at the
/// source's current offset.
#[derive(Copy, Clone, Debug, Default)]
pub struct CloneNode;

impl<N: NodeKey> HandleFactory<N> for CloneNode {
    fn make_handle(&self, surface: &mut dyn Surface<Node = N>, node: N) -> Handle<N> {
        let offset = surface.offset(node);
        Handle::new(surface.clone_node(node), offset)
    }
}

impl<N, F> HandleFactory<N> for F
where
    N: NodeKey,
    F: Fn(&mut dyn Surface<Node = N>, N) -> Handle<N>,
{
    fn make_handle(&self, surface: &mut dyn Surface<Node = N>, node: N) -> Handle<N> {
        self(surface, node)
    }
}
