// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop targets: per-source enter/over/leave/drop state machines.
//!
//! A [`Target`] wraps one drop-zone node. It observes any number of sources
//! (by [`SourceId`], never by reference) and, for each, tracks whether that
//! source is currently over it. State is scoped per observed source, so one
//! target can react to several sources independently.
//!
//! Each drag-progress notification from an observed source re-evaluates the
//! target's [`Containment`] policy against freshly measured bounds:
//!
//! | was    | now      | notifications          | [`Transition`] |
//! |--------|----------|------------------------|----------------|
//! | out    | in       | `dragenter`, `dragover` | `Entered`      |
//! | in     | in       | `dragover`              | `Over`         |
//! | in     | out      | `dragleave`             | `Left`         |
//! | out    | out      | (none)                  | `Outside`      |
//!
//! When the source is released while over the target, the target emits
//! `drop` and returns to inactive without a `dragleave`.

use alloc::boxed::Box;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::containment::{Containment, EdgeMode, Probe, Threshold, contains_point, overlaps};
use crate::error::{ConfigError, DragError, GeometryError};
use crate::geometry::{Geometry, NodeKey};
use crate::listener::{ListenerKey, Listeners, TargetListener};
use crate::source::SourceId;

/// Identifier of a [`Target`] within a [`Board`](crate::Board).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u32);

impl TargetId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Result of re-evaluating a target for one source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The source was and still is outside.
    Outside,
    /// The source just moved over the target.
    Entered,
    /// The source was and still is over the target.
    Over,
    /// The source just moved off the target.
    Left,
}

impl Transition {
    /// Whether the source is over the target after this transition.
    #[must_use]
    pub fn is_over(self) -> bool {
        matches!(self, Self::Entered | Self::Over)
    }
}

/// A drop zone.
pub struct Target<N> {
    id: TargetId,
    node: N,
    containment: Containment,
    observed: SmallVec<[SourceId; 2]>,
    active: SmallVec<[SourceId; 2]>,
    listeners: Listeners<dyn TargetListener>,
}

impl<N: core::fmt::Debug> core::fmt::Debug for Target<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Target")
            .field("id", &self.id)
            .field("node", &self.node)
            .field("containment", &self.containment)
            .field("observed", &self.observed)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<N: NodeKey> Target<N> {
    /// Create a target using the default overlap policy (half the handle).
    #[must_use]
    pub fn new(id: TargetId, node: N) -> Self {
        Self::with_containment(id, node, Containment::default())
    }

    /// Create a target with an explicit containment policy.
    #[must_use]
    pub fn with_containment(id: TargetId, node: N, containment: Containment) -> Self {
        Self {
            id,
            node,
            containment,
            observed: SmallVec::new(),
            active: SmallVec::new(),
            listeners: Listeners::default(),
        }
    }

    /// Create an overlap target, validating `threshold`.
    pub fn with_threshold(id: TargetId, node: N, threshold: f64) -> Result<Self, ConfigError> {
        let threshold = Threshold::new(threshold)?;
        Ok(Self::with_containment(
            id,
            node,
            Containment::Overlap(threshold),
        ))
    }

    /// This target's identifier.
    #[must_use]
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// The drop-zone node.
    #[must_use]
    pub fn node(&self) -> N {
        self.node
    }

    /// The containment policy.
    #[must_use]
    pub fn containment(&self) -> Containment {
        self.containment
    }

    /// Replace the containment policy. Takes effect on the next evaluation.
    pub fn set_containment(&mut self, containment: Containment) {
        self.containment = containment;
    }

    /// Start observing `source`. Returns `false` if it was already observed.
    pub fn listen(&mut self, source: SourceId) -> bool {
        if self.observed.contains(&source) {
            return false;
        }
        self.observed.push(source);
        true
    }

    /// Stop observing `source`, forgetting whether it was over this target.
    ///
    /// No `dragleave` is emitted. Returns `false` if it was not observed.
    pub fn unlisten(&mut self, source: SourceId) -> bool {
        self.active.retain(|s| *s != source);
        let before = self.observed.len();
        self.observed.retain(|s| *s != source);
        before != self.observed.len()
    }

    /// Whether this target observes `source`.
    #[must_use]
    pub fn is_listening_to(&self, source: SourceId) -> bool {
        self.observed.contains(&source)
    }

    /// Whether `source` is currently over this target.
    #[must_use]
    pub fn is_active_for(&self, source: SourceId) -> bool {
        self.active.contains(&source)
    }

    /// Sources currently over this target.
    #[must_use]
    pub fn active_sources(&self) -> &[SourceId] {
        &self.active
    }

    /// Register a listener for this target's notifications.
    pub fn add_listener(&mut self, listener: impl TargetListener + 'static) -> ListenerKey {
        self.listeners.add(Box::new(listener))
    }

    /// Unregister a listener.
    pub fn remove_listener(&mut self, key: ListenerKey) -> Option<Box<dyn TargetListener>> {
        self.listeners.remove(key)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether `point` lies inside this target's current bounds.
    ///
    /// Uses the target's edge rule when it has a point policy, and
    /// [`EdgeMode::default`] otherwise.
    pub fn contains_point<G>(&self, geometry: &G, point: Point) -> Result<bool, GeometryError>
    where
        G: Geometry<Node = N> + ?Sized,
    {
        let edges = match self.containment {
            Containment::Point(edges) => edges,
            Containment::Overlap(_) => EdgeMode::default(),
        };
        Ok(contains_point(geometry.bounds(self.node)?, point, edges))
    }

    /// Whether a moving rectangle overlaps this target's current bounds by at
    /// least its threshold.
    ///
    /// Uses the target's threshold when it has an overlap policy, and
    /// [`Threshold::DEFAULT`] otherwise.
    pub fn contains<G>(&self, geometry: &G, moving: Rect) -> Result<bool, GeometryError>
    where
        G: Geometry<Node = N> + ?Sized,
    {
        let threshold = match self.containment {
            Containment::Overlap(threshold) => threshold,
            Containment::Point(_) => Threshold::DEFAULT,
        };
        overlaps(moving, geometry.bounds(self.node)?, threshold)
    }

    /// Re-evaluate containment for `source` and emit the matching notifications.
    ///
    /// If the geometry cannot be evaluated the source is treated as outside:
    /// an active source gets a `dragleave`, and the error is returned.
    pub fn update<G>(
        &mut self,
        geometry: &G,
        source: SourceId,
        probe: &Probe,
    ) -> Result<Transition, DragError>
    where
        G: Geometry<Node = N> + ?Sized,
    {
        let inside = geometry
            .bounds(self.node)
            .and_then(|bounds| self.containment.evaluate(bounds, probe));
        let was_active = self.is_active_for(source);
        let id = self.id;

        match inside {
            Ok(true) => {
                if !was_active {
                    self.active.push(source);
                    trace!(drop_target = ?id, source = ?source, "dragenter");
                    for l in self.listeners.iter_mut() {
                        l.on_enter(id, source);
                    }
                }
                for l in self.listeners.iter_mut() {
                    l.on_over(id, source);
                }
                Ok(if was_active {
                    Transition::Over
                } else {
                    Transition::Entered
                })
            }
            Ok(false) => {
                if was_active {
                    self.leave(source);
                    Ok(Transition::Left)
                } else {
                    Ok(Transition::Outside)
                }
            }
            Err(error) => {
                warn!(drop_target = ?id, source = ?source, %error, "containment evaluation failed");
                if was_active {
                    self.leave(source);
                }
                Err(DragError::Geometry { target: id, source: error })
            }
        }
    }

    /// Complete a drop from `source`.
    ///
    /// If the source is over this target, emits `drop` and resets to inactive,
    /// returning `true`. Otherwise does nothing.
    pub fn drop_from(&mut self, source: SourceId) -> bool {
        if !self.is_active_for(source) {
            return false;
        }
        let id = self.id;
        for l in self.listeners.iter_mut() {
            l.on_drop(id, source);
        }
        self.active.retain(|s| *s != source);
        true
    }

    fn leave(&mut self, source: SourceId) {
        let id = self.id;
        self.active.retain(|s| *s != source);
        trace!(drop_target = ?id, source = ?source, "dragleave");
        for l in self.listeners.iter_mut() {
            l.on_leave(id, source);
        }
    }
}
