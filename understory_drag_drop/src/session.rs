// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session: route raw pointer events to the one source being dragged.
//!
//! A [`DragSession`] is created by the pointer-event adapter and lives as
//! long as it does. It holds a single "current source" slot, so at most one
//! source drags at a time, and a [`PointerCapture`] used to install the
//! document-level move/up listeners only while a drag is in flight.
//!
//! ## Usage
//!
//! 1) On pointer-down over a node, call [`DragSession::pointer_down_on`]
//!    (or [`DragSession::pointer_down`] if you already know the source).
//! 2) Forward every pointer-move to [`DragSession::pointer_move`].
//! 3) Forward the pointer-up to [`DragSession::pointer_up`].
//!
//! Capture is installed on the down that starts a drag and released exactly
//! once on the matching up. Moves and ups with no current source are ignored.
//!
//! A down that arrives while a drag is current is handled per
//! [`ReentryPolicy`]: ignored by default, or used to finish the previous
//! drag and start a new one.

use kurbo::Point;

use crate::board::Board;
use crate::error::DragError;
use crate::geometry::{NodeKey, Surface};
use crate::source::SourceId;

/// Installs and removes the document-level pointer listeners.
pub trait PointerCapture {
    /// Start delivering document-level move/up events to the session.
    fn capture(&mut self);

    /// Stop delivering document-level move/up events.
    fn release(&mut self);
}

/// For hosts that always deliver move/up events.
impl PointerCapture for () {
    fn capture(&mut self) {}
    fn release(&mut self) {}
}

/// What to do with a pointer-down while another drag is current.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReentryPolicy {
    /// Keep the current drag and ignore the new down.
    #[default]
    Ignore,
    /// Drop the current drag at the new down's position, then start the new one.
    EndPrevious,
}

/// Session configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Handling of a down during an active drag.
    pub reentry: ReentryPolicy,
}

/// Result of [`DragSession::pointer_down`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DownOutcome {
    /// The source became current and capture was installed.
    Started(SourceId),
    /// Another drag is current; nothing changed.
    Ignored,
    /// The previous drag was finished and `current` became current.
    Replaced {
        /// The source whose drag was finished.
        previous: SourceId,
        /// The newly current source.
        current: SourceId,
    },
    /// The down did not hit a known source.
    Missed,
}

/// The single active drag slot plus its pointer capture.
#[derive(Debug, Default)]
pub struct DragSession<C: PointerCapture = ()> {
    capture: C,
    config: SessionConfig,
    current: Option<SourceId>,
}

impl<C: PointerCapture> DragSession<C> {
    /// Create a session using `capture` and the default configuration.
    pub fn new(capture: C) -> Self {
        Self::with_config(capture, SessionConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(capture: C, config: SessionConfig) -> Self {
        Self {
            capture,
            config,
            current: None,
        }
    }

    /// The source currently being routed to, if any.
    #[must_use]
    pub fn current(&self) -> Option<SourceId> {
        self.current
    }

    /// Returns `true` between a routed down and its up.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// The capture adapter.
    #[must_use]
    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// The capture adapter, mutably.
    pub fn capture_mut(&mut self) -> &mut C {
        &mut self.capture
    }

    /// Pointer-down on `source`.
    ///
    /// The source only starts dragging (and shows its handle) on the first
    /// subsequent move. Errors can only come from finishing a previous drag
    /// under [`ReentryPolicy::EndPrevious`]; the new source is current either way.
    pub fn pointer_down<N, D, S>(
        &mut self,
        board: &mut Board<N, D>,
        surface: &mut S,
        source: SourceId,
        point: Point,
    ) -> Result<DownOutcome, DragError>
    where
        N: NodeKey,
        S: Surface<Node = N>,
    {
        if board.source(source).is_none() {
            return Ok(DownOutcome::Missed);
        }
        let Some(previous) = self.current else {
            self.start(source);
            return Ok(DownOutcome::Started(source));
        };
        match self.config.reentry {
            ReentryPolicy::Ignore => {
                warn!(current = ?previous, ignored = ?source, "pointer-down during an active drag");
                Ok(DownOutcome::Ignored)
            }
            ReentryPolicy::EndPrevious => {
                debug!(previous = ?previous, current = ?source, "replacing active drag");
                let result = self.finish(board, surface, previous, point);
                self.start(source);
                result.map(|()| DownOutcome::Replaced {
                    previous,
                    current: source,
                })
            }
        }
    }

    /// Pointer-down on `node`; downs on nodes that back no source are [`DownOutcome::Missed`].
    pub fn pointer_down_on<N, D, S>(
        &mut self,
        board: &mut Board<N, D>,
        surface: &mut S,
        node: N,
        point: Point,
    ) -> Result<DownOutcome, DragError>
    where
        N: NodeKey,
        S: Surface<Node = N>,
    {
        match board.source_for_node(node) {
            Some(source) => self.pointer_down(board, surface, source, point),
            None => Ok(DownOutcome::Missed),
        }
    }

    /// Pointer-move; forwarded to the current source, ignored otherwise.
    pub fn pointer_move<N, D, S>(
        &mut self,
        board: &mut Board<N, D>,
        surface: &mut S,
        point: Point,
    ) -> Result<(), DragError>
    where
        N: NodeKey,
        S: Surface<Node = N>,
    {
        match self.current {
            Some(source) => board.drag_to(surface, source, point),
            None => Ok(()),
        }
    }

    /// Pointer-up; finishes the current drag and releases capture.
    ///
    /// An up with no current source does nothing, so capture is never
    /// released twice.
    pub fn pointer_up<N, D, S>(
        &mut self,
        board: &mut Board<N, D>,
        surface: &mut S,
        point: Point,
    ) -> Result<(), DragError>
    where
        N: NodeKey,
        S: Surface<Node = N>,
    {
        match self.current {
            Some(source) => self.finish(board, surface, source, point),
            None => Ok(()),
        }
    }

    /// Tear the session down, finishing any drag at its last pointer position.
    ///
    /// Call this before dropping the adapter that owns the session.
    pub fn end<N, D, S>(&mut self, board: &mut Board<N, D>, surface: &mut S) -> Result<(), DragError>
    where
        N: NodeKey,
        S: Surface<Node = N>,
    {
        let Some(source) = self.current else {
            return Ok(());
        };
        match board.source(source).and_then(|s| s.last_point()) {
            Some(point) => self.finish(board, surface, source, point),
            None => {
                self.stop();
                Ok(())
            }
        }
    }

    fn start(&mut self, source: SourceId) {
        debug!(source = ?source, "capturing pointer");
        self.current = Some(source);
        self.capture.capture();
    }

    fn finish<N, D, S>(
        &mut self,
        board: &mut Board<N, D>,
        surface: &mut S,
        source: SourceId,
        point: Point,
    ) -> Result<(), DragError>
    where
        N: NodeKey,
        S: Surface<Node = N>,
    {
        let result = board.drop_at(surface, source, point);
        self.stop();
        result
    }

    fn stop(&mut self) {
        if self.current.take().is_some() {
            debug!("releasing pointer");
            self.capture.release();
        }
    }
}
