// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Board: owns the sources and targets of one surface and wires them up.
//!
//! Sources and targets refer to each other only by id. The board hands out
//! those ids, keeps the target list a source's progress is evaluated against,
//! and maps pointer-down nodes back to sources.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;

use crate::containment::Containment;
use crate::error::{ConfigError, DragError};
use crate::geometry::{NodeKey, Surface};
use crate::source::{Source, SourceId};
use crate::target::{Target, TargetId};

/// Registry of the sources and targets on one surface.
#[derive(Debug)]
pub struct Board<N: NodeKey, D = ()> {
    sources: Vec<Source<N, D>>,
    targets: Vec<Target<N>>,
    by_node: HashMap<N, SourceId>,
}

impl<N: NodeKey, D> Default for Board<N, D> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            targets: Vec::new(),
            by_node: HashMap::new(),
        }
    }
}

impl<N: NodeKey, D> Board<N, D> {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `node` draggable with an empty payload.
    ///
    /// # Panics
    ///
    /// Panics if the board already holds more than `u32::MAX` sources.
    pub fn add_source(&mut self, node: N) -> SourceId
    where
        D: Default,
    {
        self.add_source_with_data(node, D::default())
    }

    /// Make `node` draggable, carrying `data`.
    ///
    /// If `node` already backs a source, pointer-downs on it are routed to the
    /// new one.
    ///
    /// # Panics
    ///
    /// Panics if the board already holds more than `u32::MAX` sources.
    pub fn add_source_with_data(&mut self, node: N, data: D) -> SourceId {
        let id = SourceId::new(next_id(self.sources.len()));
        self.sources.push(Source::new(id, node, data));
        self.by_node.insert(node, id);
        id
    }

    /// Make `node` a drop zone with the default overlap policy.
    pub fn add_target(&mut self, node: N) -> TargetId {
        self.add_target_with_containment(node, Containment::default())
    }

    /// Make `node` a drop zone with an explicit policy.
    ///
    /// # Panics
    ///
    /// Panics if the board already holds more than `u32::MAX` targets.
    pub fn add_target_with_containment(&mut self, node: N, containment: Containment) -> TargetId {
        let id = TargetId::new(next_id(self.targets.len()));
        self.targets
            .push(Target::with_containment(id, node, containment));
        id
    }

    /// Make `node` an overlap drop zone, validating `threshold`.
    ///
    /// # Panics
    ///
    /// Panics if the board already holds more than `u32::MAX` targets.
    pub fn add_target_with_threshold(
        &mut self,
        node: N,
        threshold: f64,
    ) -> Result<TargetId, ConfigError> {
        let id = TargetId::new(next_id(self.targets.len()));
        self.targets.push(Target::with_threshold(id, node, threshold)?);
        Ok(id)
    }

    /// Have `target` observe `source`.
    ///
    /// Returns `false` if either id is unknown or the target already observes
    /// the source.
    pub fn listen(&mut self, target: TargetId, source: SourceId) -> bool {
        if self.source(source).is_none() {
            return false;
        }
        self.target_mut(target).is_some_and(|t| t.listen(source))
    }

    /// Have `target` stop observing `source`.
    ///
    /// During a drag, the source stops listing the target among its current
    /// targets on its next move or release, and no drop reaches it.
    pub fn unlisten(&mut self, target: TargetId, source: SourceId) -> bool {
        self.target_mut(target).is_some_and(|t| t.unlisten(source))
    }

    /// Look up a source.
    #[must_use]
    pub fn source(&self, id: SourceId) -> Option<&Source<N, D>> {
        self.sources.get(id.get() as usize)
    }

    /// Look up a source mutably (to add listeners or swap its handle factory).
    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut Source<N, D>> {
        self.sources.get_mut(id.get() as usize)
    }

    /// Look up a target.
    #[must_use]
    pub fn target(&self, id: TargetId) -> Option<&Target<N>> {
        self.targets.get(id.get() as usize)
    }

    /// Look up a target mutably.
    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut Target<N>> {
        self.targets.get_mut(id.get() as usize)
    }

    /// The source backed by `node`, if any.
    #[must_use]
    pub fn source_for_node(&self, node: N) -> Option<SourceId> {
        self.by_node.get(&node).copied()
    }

    /// All sources, in id order.
    pub fn sources(&self) -> impl Iterator<Item = &Source<N, D>> {
        self.sources.iter()
    }

    /// All targets, in id order.
    pub fn targets(&self) -> impl Iterator<Item = &Target<N>> {
        self.targets.iter()
    }

    /// Sources currently dragging.
    pub fn dragging(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources
            .iter()
            .filter(|s| s.is_dragging())
            .map(Source::id)
    }

    /// Drive [`Source::drag_to`] for `source` against this board's targets.
    ///
    /// Unknown ids are ignored.
    pub fn drag_to<S>(&mut self, surface: &mut S, source: SourceId, point: Point) -> Result<(), DragError>
    where
        S: Surface<Node = N>,
    {
        match self.sources.get_mut(source.get() as usize) {
            Some(s) => s.drag_to(surface, &mut self.targets, point),
            None => Ok(()),
        }
    }

    /// Drive [`Source::drop_at`] for `source` against this board's targets.
    ///
    /// Unknown ids are ignored.
    pub fn drop_at<S>(&mut self, surface: &mut S, source: SourceId, point: Point) -> Result<(), DragError>
    where
        S: Surface<Node = N>,
    {
        match self.sources.get_mut(source.get() as usize) {
            Some(s) => s.drop_at(surface, &mut self.targets, point),
            None => Ok(()),
        }
    }
}

/// Id for the entry about to be pushed onto a list of `len` entries.
///
/// Ids index the lists directly, so they must never repeat.
fn next_id(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(id) => id,
        Err(_) => panic!("board id space exhausted: {len} entries"),
    }
}
