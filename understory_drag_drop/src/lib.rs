// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_drop --heading-base-level=0

//! Understory Drag & Drop: pointer drag sources, drop targets, and containment.
//!
//! This crate turns a stream of pointer events into drag-and-drop notifications.
//! It is split into small pieces that can be used together or on their own:
//!
//! - [`handle`]: the temporary visual proxy shown while dragging
//! - [`containment`]: pure point-in-rect and overlap-threshold policies
//! - [`target`]: per-source enter/over/leave/drop state for one drop zone
//! - [`source`]: the idle/dragging state machine for one draggable node
//! - [`board`]: a registry that owns sources and targets and wires them up by id
//! - [`session`]: routes pointer down/move/up to the single source being dragged
//! - [`listener`]: typed observer traits and an [`EventLog`] recorder
//!
//! The crate does not assume any UI framework. Hosts describe their nodes
//! through the [`Geometry`] and [`Surface`] traits, install pointer listeners
//! through [`PointerCapture`], and pick their own node identifier type.
//!
//! ## Drag lifecycle
//!
//! 1) Pointer-down on a source's node makes it the session's current source.
//! 2) The first move creates and attaches the handle and fires `dragstart`.
//!    Every move fires `drag` and re-evaluates each target observing the
//!    source, firing `dragenter`, `dragover` and `dragleave` as it goes.
//! 3) Pointer-up re-evaluates at the release point, fires `drop` on each target
//!    the source is over, fires `dragend`, and removes the handle.
//!
//! ## Example
//!
//! ```rust
//! # use understory_drag_drop::{Geometry, Offset, Surface};
//! # /// Node 1 is a 10×10 card at the origin, node 2 a 100×100 zone at x = 200.
//! # struct Page;
//! # impl Geometry for Page {
//! #     type Node = u32;
//! #     fn offset(&self, n: u32) -> Offset { if n == 2 { Offset::new(200.0, 0.0) } else { Offset::default() } }
//! #     fn width(&self, n: u32) -> f64 { if n == 2 { 100.0 } else { 10.0 } }
//! #     fn height(&self, n: u32) -> f64 { self.width(n) }
//! # }
//! # impl Surface for Page {
//! #     fn clone_node(&mut self, _: u32) -> u32 { 3 }
//! #     fn append_to_root(&mut self, _: u32) {}
//! #     fn remove_node(&mut self, _: u32) {}
//! #     fn set_absolute_position(&mut self, _: u32, _: Offset) {}
//! #     fn set_opacity(&mut self, _: u32, _: f64) {}
//! # }
//! use kurbo::Point;
//! use understory_drag_drop::{Board, DragEvent, DragSession, EventLog};
//!
//! let mut page = Page;
//! let mut board: Board<u32> = Board::new();
//! let card = board.add_source(1);
//! let zone = board.add_target(2);
//! board.listen(zone, card);
//!
//! let log = EventLog::new();
//! board.source_mut(card).unwrap().add_listener(log.clone());
//! board.target_mut(zone).unwrap().add_listener(log.clone());
//!
//! let mut session = DragSession::new(());
//! session.pointer_down_on(&mut board, &mut page, 1, Point::new(5.0, 5.0)).unwrap();
//! session.pointer_move(&mut board, &mut page, Point::new(5.0, 5.0)).unwrap();
//! session.pointer_move(&mut board, &mut page, Point::new(250.0, 50.0)).unwrap();
//! session.pointer_up(&mut board, &mut page, Point::new(250.0, 50.0)).unwrap();
//!
//! let events = log.events();
//! assert_eq!(events.first(), Some(&DragEvent::DragStart(card)));
//! assert!(events.contains(&DragEvent::Enter(zone, card)));
//! assert!(events.contains(&DragEvent::Drop(zone, card)));
//! assert_eq!(events.last(), Some(&DragEvent::DragEnd(card)));
//! ```
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with the standard library.
//! - `libm`: build Kurbo's floating point support via `libm` for `no_std`.
//! - `tracing`: emit `tracing` events for drag lifecycle and session changes.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::warn!($($arg)*);
    };
}

pub mod board;
pub mod containment;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod listener;
pub mod session;
pub mod source;
pub mod target;

pub use board::Board;
pub use containment::{Containment, EdgeMode, Probe, Threshold};
pub use error::{ConfigError, DragError, GeometryError};
pub use geometry::{Geometry, NodeKey, Offset, OffsetUpdate, Surface};
pub use handle::{CloneNode, Handle, HandleFactory};
pub use listener::{DragEvent, EventLog, ListenerKey, SourceListener, TargetListener};
pub use session::{DownOutcome, DragSession, PointerCapture, ReentryPolicy, SessionConfig};
pub use source::{Source, SourceId};
pub use target::{Target, TargetId, Transition};
