// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sources: the idle/dragging state machine behind one draggable node.
//!
//! ## Usage
//!
//! 1) Feed pointer moves to [`Source::drag_to`]. The first call creates and
//!    attaches a [`Handle`], emits `dragstart`, and records the pointer as the
//!    baseline without moving the handle.
//! 2) Each later call moves the handle by the pointer delta since the previous
//!    call, emits `drag`, and lets every observing [`Target`] re-evaluate.
//! 3) Finish with [`Source::drop_at`]: one last evaluation at the release
//!    point, `drop` on every target the source is over, `dragend`, then the
//!    handle is detached and [`Source::current_targets`] is cleared.
//!
//! Usually a [`DragSession`](crate::DragSession) drives these calls from raw
//! pointer events, but they can be called directly.
//!
//! ## Minimal example
//!
//! ```
//! # use understory_drag_drop::{Geometry, Offset, Surface};
//! # struct Doc;
//! # impl Geometry for Doc {
//! #     type Node = u32;
//! #     fn offset(&self, n: u32) -> Offset { if n == 2 { Offset::new(50.0, 0.0) } else { Offset::default() } }
//! #     fn width(&self, n: u32) -> f64 { if n == 2 { 100.0 } else { 10.0 } }
//! #     fn height(&self, n: u32) -> f64 { if n == 2 { 100.0 } else { 10.0 } }
//! # }
//! # impl Surface for Doc {
//! #     fn clone_node(&mut self, n: u32) -> u32 { n }
//! #     fn append_to_root(&mut self, _: u32) {}
//! #     fn remove_node(&mut self, _: u32) {}
//! #     fn set_absolute_position(&mut self, _: u32, _: Offset) {}
//! #     fn set_opacity(&mut self, _: u32, _: f64) {}
//! # }
//! use kurbo::Point;
//! use understory_drag_drop::{Source, SourceId, Target, TargetId};
//!
//! let mut doc = Doc;
//! let mut source = Source::new(SourceId::new(0), 1_u32, ());
//! let mut zone = Target::new(TargetId::new(0), 2_u32);
//! zone.listen(source.id());
//! let mut targets = [zone];
//!
//! source.drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0)).unwrap();
//! assert!(source.is_dragging());
//! assert!(source.current_targets().is_empty());
//!
//! // Move the 10×10 handle fully inside the zone.
//! source.drag_to(&mut doc, &mut targets, Point::new(65.0, 5.0)).unwrap();
//! assert_eq!(source.current_targets(), &[TargetId::new(0)]);
//!
//! source.drop_at(&mut doc, &mut targets, Point::new(65.0, 5.0)).unwrap();
//! assert!(!source.is_dragging());
//! assert!(source.current_targets().is_empty());
//! ```

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::containment::Probe;
use crate::error::DragError;
use crate::geometry::{Geometry, NodeKey, Surface};
use crate::handle::{CloneNode, Handle, HandleFactory};
use crate::listener::{ListenerKey, Listeners, SourceListener};
use crate::target::{Target, TargetId};

/// Identifier of a [`Source`] within a [`Board`](crate::Board).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
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

#[derive(Debug)]
enum Phase<N> {
    Idle,
    Dragging { handle: Handle<N>, last: Point },
}

/// A draggable node and its drag lifecycle.
///
/// `D` is an opaque payload for the host; the drag machinery never reads it.
pub struct Source<N: NodeKey, D = ()> {
    id: SourceId,
    node: N,
    data: D,
    phase: Phase<N>,
    current_targets: SmallVec<[TargetId; 4]>,
    factory: Box<dyn HandleFactory<N>>,
    listeners: Listeners<dyn SourceListener<N, D>>,
}

impl<N: NodeKey, D: fmt::Debug> fmt::Debug for Source<N, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.id)
            .field("node", &self.node)
            .field("data", &self.data)
            .field("phase", &self.phase)
            .field("current_targets", &self.current_targets)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<N: NodeKey, D> Source<N, D> {
    /// Wrap `node` with a payload, using the [`CloneNode`] handle factory.
    #[must_use]
    pub fn new(id: SourceId, node: N, data: D) -> Self {
        Self {
            id,
            node,
            data,
            phase: Phase::Idle,
            current_targets: SmallVec::new(),
            factory: Box::new(CloneNode),
            listeners: Listeners::default(),
        }
    }

    /// Use `factory` to build this source's handle on the next drag.
    #[must_use]
    pub fn with_handle_factory(mut self, factory: impl HandleFactory<N> + 'static) -> Self {
        self.set_handle_factory(factory);
        self
    }

    /// Use `factory` to build this source's handle on the next drag.
    pub fn set_handle_factory(&mut self, factory: impl HandleFactory<N> + 'static) {
        self.factory = Box::new(factory);
    }

    /// This source's identifier.
    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The draggable node.
    #[must_use]
    pub fn node(&self) -> N {
        self.node
    }

    /// The host payload.
    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The host payload, mutably.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Returns `true` while a drag is in progress (exactly when a handle is attached).
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The handle, while dragging.
    #[must_use]
    pub fn handle(&self) -> Option<&Handle<N>> {
        match &self.phase {
            Phase::Dragging { handle, .. } => Some(handle),
            Phase::Idle => None,
        }
    }

    /// The last pointer position seen while dragging.
    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        match self.phase {
            Phase::Dragging { last, .. } => Some(last),
            Phase::Idle => None,
        }
    }

    /// Targets this source is currently over, each listed once.
    #[must_use]
    pub fn current_targets(&self) -> &[TargetId] {
        &self.current_targets
    }

    /// Register a listener for this source's notifications.
    pub fn add_listener(&mut self, listener: impl SourceListener<N, D> + 'static) -> ListenerKey {
        self.listeners.add(Box::new(listener))
    }

    /// Unregister a listener.
    pub fn remove_listener(&mut self, key: ListenerKey) -> Option<Box<dyn SourceListener<N, D>>> {
        self.listeners.remove(key)
    }

    /// Number of registered listeners.
    ///
    /// Listeners are detached while they are being notified, so this reports
    /// `0` when called from inside a [`SourceListener`] method.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Move the drag to `point`, starting it if the source is idle.
    ///
    /// `targets` may contain targets that do not observe this source; they
    /// are skipped. If a target's geometry cannot be evaluated it is treated
    /// as not containing the source, the rest are still evaluated, and the
    /// first such error is returned.
    pub fn drag_to<S>(
        &mut self,
        surface: &mut S,
        targets: &mut [Target<N>],
        point: Point,
    ) -> Result<(), DragError>
    where
        S: Surface<Node = N>,
    {
        if let Phase::Idle = self.phase {
            let mut handle = self.factory.make_handle(&mut *surface, self.node);
            handle.attach(surface);
            self.phase = Phase::Dragging {
                handle,
                last: point,
            };
            debug!(source = ?self.id, x = point.x, y = point.y, "dragstart");
            self.emit(|l, s| l.on_drag_start(s));
        }
        self.progress(surface, targets, point)
    }

    /// Release the drag at `point`. Does nothing if the source is idle.
    ///
    /// The drop always completes: even if a target's geometry fails during the
    /// final evaluation, `drop` and `dragend` still fire, the handle is
    /// detached, and the error is returned afterwards.
    pub fn drop_at<S>(
        &mut self,
        surface: &mut S,
        targets: &mut [Target<N>],
        point: Point,
    ) -> Result<(), DragError>
    where
        S: Surface<Node = N>,
    {
        if !self.is_dragging() {
            return Ok(());
        }

        let result = self.progress(surface, targets, point);

        let dropped = self.current_targets.clone();
        for &target_id in &dropped {
            if let Some(target) = targets.iter_mut().find(|t| t.id() == target_id) {
                target.drop_from(self.id);
            }
            self.emit(|l, s| l.on_drop(s, target_id));
        }

        debug!(source = ?self.id, dropped = dropped.len(), "dragend");
        self.emit(|l, s| l.on_drag_end(s));

        if let Phase::Dragging { mut handle, .. } = core::mem::replace(&mut self.phase, Phase::Idle)
        {
            handle.detach(surface);
        }
        // Cleared only after `dragend` so its listeners can still see the targets.
        self.current_targets.clear();

        result
    }

    fn progress<S>(
        &mut self,
        surface: &mut S,
        targets: &mut [Target<N>],
        point: Point,
    ) -> Result<(), DragError>
    where
        S: Surface<Node = N>,
    {
        let probe = {
            let Phase::Dragging { handle, last } = &mut self.phase else {
                return Ok(());
            };
            let delta = point - *last;
            if delta != Vec2::ZERO {
                handle.move_by(surface, delta);
            }
            *last = point;
            Probe {
                point,
                handle: handle.bounds(&*surface),
            }
        };

        self.emit(|l, s| l.on_drag(s, point));
        self.update_targets(&*surface, targets, &probe)
    }

    fn update_targets<G>(
        &mut self,
        geometry: &G,
        targets: &mut [Target<N>],
        probe: &Probe,
    ) -> Result<(), DragError>
    where
        G: Geometry<Node = N>,
    {
        let id = self.id;
        let mut first_error = None;
        for target in targets.iter_mut().filter(|t| t.is_listening_to(id)) {
            match target.update(geometry, id, probe) {
                Ok(transition) if transition.is_over() => self.insert_current(target.id()),
                Ok(_) => self.remove_current(target.id()),
                Err(error) => {
                    self.remove_current(target.id());
                    first_error.get_or_insert(error);
                }
            }
        }
        // Drop entries for targets that stopped observing this source or are
        // not in `targets` at all; they can no longer receive a drop.
        self.current_targets.retain(|t| {
            targets
                .iter()
                .any(|target| target.id() == *t && target.is_active_for(id))
        });
        first_error.map_or(Ok(()), Err)
    }

    fn insert_current(&mut self, target: TargetId) {
        if !self.current_targets.contains(&target) {
            self.current_targets.push(target);
        }
    }

    fn remove_current(&mut self, target: TargetId) {
        self.current_targets.retain(|t| *t != target);
    }

    fn emit(&mut self, mut f: impl FnMut(&mut dyn SourceListener<N, D>, &Self)) {
        let mut listeners = core::mem::take(&mut self.listeners);
        for l in listeners.iter_mut() {
            f(l, self);
        }
        self.listeners = listeners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Offset, OffsetUpdate};
    use crate::listener::{DragEvent, EventLog};
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// Node 1 is the source (10×10 at the origin); its clones count up from 100.
    /// Nodes 10.. are 100×100 zones laid out every 200 units along x.
    #[derive(Default)]
    struct Doc {
        next_clone: u32,
        attached: Vec<u32>,
        moves: Vec<Offset>,
    }

    impl Geometry for Doc {
        type Node = u32;
        fn offset(&self, node: u32) -> Offset {
            if (10..100).contains(&node) {
                Offset::new(f64::from(node - 10) * 200.0, 0.0)
            } else {
                Offset::default()
            }
        }
        fn width(&self, node: u32) -> f64 {
            if (10..100).contains(&node) { 100.0 } else { 10.0 }
        }
        fn height(&self, node: u32) -> f64 {
            self.width(node)
        }
    }

    impl Surface for Doc {
        fn clone_node(&mut self, _: u32) -> u32 {
            self.next_clone += 1;
            99 + self.next_clone
        }
        fn append_to_root(&mut self, node: u32) {
            self.attached.push(node);
        }
        fn remove_node(&mut self, node: u32) {
            self.attached.retain(|n| *n != node);
        }
        fn set_absolute_position(&mut self, _: u32, offset: Offset) {
            self.moves.push(offset);
        }
        fn set_opacity(&mut self, _: u32, _: f64) {}
    }

    fn setup(zones: u32) -> (Source<u32>, Vec<Target<u32>>, EventLog) {
        let log = EventLog::new();
        let mut source = Source::new(SourceId::new(0), 1, ());
        source.add_listener(log.clone());
        let targets = (0..zones)
            .map(|i| {
                let mut t = Target::new(TargetId::new(i), 10 + i);
                t.listen(source.id());
                t.add_listener(log.clone());
                t
            })
            .collect();
        (source, targets, log)
    }

    fn handle_offset(source: &Source<u32>) -> Offset {
        source.handle().unwrap().offset()
    }

    #[test]
    fn first_move_only_sets_baseline() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(0);
        source
            .drag_to(&mut doc, &mut targets, Point::new(100.0, 100.0))
            .unwrap();
        assert!(source.is_dragging());
        assert_eq!(handle_offset(&source), Offset::new(0.0, 0.0));
        assert_eq!(doc.attached, [100]);
        assert_eq!(
            log.take(),
            [
                DragEvent::DragStart(source.id()),
                DragEvent::Drag(source.id(), Point::new(100.0, 100.0)),
            ]
        );
    }

    #[test]
    fn handle_moves_by_delta() {
        let mut doc = Doc::default();
        let (mut source, mut targets, _log) = setup(0);
        source
            .drag_to(&mut doc, &mut targets, Point::new(100.0, 100.0))
            .unwrap();
        source
            .drag_to(&mut doc, &mut targets, Point::new(130.0, 115.0))
            .unwrap();
        assert_eq!(handle_offset(&source), Offset::new(30.0, 15.0));
    }

    #[test]
    fn consecutive_deltas_are_not_cumulative() {
        let mut doc = Doc::default();
        let (mut source, mut targets, _log) = setup(0);
        source
            .drag_to(&mut doc, &mut targets, Point::new(100.0, 100.0))
            .unwrap();
        source
            .drag_to(&mut doc, &mut targets, Point::new(110.0, 100.0))
            .unwrap();
        let after_first = handle_offset(&source);
        source
            .drag_to(&mut doc, &mut targets, Point::new(110.0, 130.0))
            .unwrap();
        let after_second = handle_offset(&source);
        assert_eq!(after_first, Offset::new(10.0, 0.0));
        assert_eq!(
            (
                after_second.left - after_first.left,
                after_second.top - after_first.top
            ),
            (0.0, 30.0)
        );
    }

    #[test]
    fn zero_delta_does_not_reposition() {
        let mut doc = Doc::default();
        let (mut source, mut targets, _log) = setup(0);
        source
            .drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0))
            .unwrap();
        let positioned = doc.moves.len();
        source
            .drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0))
            .unwrap();
        assert_eq!(doc.moves.len(), positioned);
    }

    #[test]
    fn drop_while_idle_is_a_no_op() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(1);
        source
            .drop_at(&mut doc, &mut targets, Point::new(1.0, 1.0))
            .unwrap();
        assert!(log.is_empty());
        assert!(!source.is_dragging());
    }

    #[test]
    fn drop_twice_fires_dragend_once() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(1);
        source
            .drag_to(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        source
            .drop_at(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        source
            .drop_at(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        let ends = log
            .events()
            .iter()
            .filter(|e| matches!(e, DragEvent::DragEnd(_)))
            .count();
        assert_eq!(ends, 1);
        assert!(doc.attached.is_empty());
    }

    #[test]
    fn full_drag_over_one_zone() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(2);
        let s = source.id();
        let (a, b) = (targets[0].id(), targets[1].id());

        // The source starts out inside zone A and stays there.
        source
            .drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0))
            .unwrap();
        source
            .drag_to(&mut doc, &mut targets, Point::new(45.0, 45.0))
            .unwrap();
        assert_eq!(source.current_targets(), &[a]);
        source
            .drop_at(&mut doc, &mut targets, Point::new(45.0, 45.0))
            .unwrap();

        assert_eq!(
            log.take(),
            vec![
                DragEvent::DragStart(s),
                DragEvent::Drag(s, Point::new(5.0, 5.0)),
                DragEvent::Enter(a, s),
                DragEvent::Over(a, s),
                DragEvent::Drag(s, Point::new(45.0, 45.0)),
                DragEvent::Over(a, s),
                DragEvent::Drag(s, Point::new(45.0, 45.0)),
                DragEvent::Over(a, s),
                DragEvent::Drop(a, s),
                DragEvent::DragEnd(s),
            ]
        );
        assert!(!targets[0].is_active_for(s));
        assert!(!targets[1].is_active_for(s));
        assert!(!log.events().contains(&DragEvent::Drop(b, s)));
    }

    #[test]
    fn release_point_is_evaluated_even_without_a_move_there() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(2);
        let s = source.id();
        let b = targets[1].id();
        source
            .drag_to(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        log.take();
        // Jump straight from the origin onto zone B and release.
        source
            .drop_at(&mut doc, &mut targets, Point::new(220.0, 20.0))
            .unwrap();
        let events = log.take();
        assert!(events.contains(&DragEvent::Enter(b, s)));
        assert!(events.contains(&DragEvent::Drop(b, s)));
    }

    #[test]
    fn dragend_listeners_see_current_targets() {
        struct SeenAtEnd(alloc::rc::Rc<core::cell::RefCell<Vec<TargetId>>>);
        impl SourceListener<u32, ()> for SeenAtEnd {
            fn on_drag_end(&mut self, source: &Source<u32, ()>) {
                self.0.borrow_mut().extend_from_slice(source.current_targets());
                assert!(source.is_dragging());
            }
        }

        let mut doc = Doc::default();
        let (mut source, mut targets, _log) = setup(1);
        let seen = alloc::rc::Rc::default();
        source.add_listener(SeenAtEnd(alloc::rc::Rc::clone(&seen)));
        source
            .drag_to(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        source
            .drop_at(&mut doc, &mut targets, Point::new(10.0, 10.0))
            .unwrap();
        assert_eq!(*seen.borrow(), [targets[0].id()]);
        assert!(source.current_targets().is_empty());
    }

    #[test]
    fn custom_handle_factory_is_used() {
        let mut doc = Doc::default();
        let (source, mut targets, _log) = setup(0);
        let mut source = source.with_handle_factory(
            |surface: &mut dyn Surface<Node = u32>, _node: u32| {
                let mut h = Handle::new(surface.clone_node(1), Offset::new(500.0, 500.0));
                h.move_to(surface, OffsetUpdate::top(600.0));
                h
            },
        );
        source
            .drag_to(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(handle_offset(&source), Offset::new(500.0, 600.0));
    }

    #[test]
    fn unobserved_targets_are_ignored() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(1);
        targets[0].unlisten(source.id());
        source
            .drag_to(&mut doc, &mut targets, Point::new(0.0, 0.0))
            .unwrap();
        source
            .drag_to(&mut doc, &mut targets, Point::new(20.0, 20.0))
            .unwrap();
        assert!(source.current_targets().is_empty());
        assert!(
            !log
                .events()
                .iter()
                .any(|e| matches!(e, DragEvent::Enter(..)))
        );
    }

    #[derive(Debug, PartialEq)]
    enum Seen {
        Drop(TargetId, Vec<TargetId>),
        End(Vec<TargetId>),
        Listeners(usize),
    }

    /// Records source-side drops and `dragend` with the targets visible at the time.
    struct Recorder(Rc<RefCell<Vec<Seen>>>);

    impl SourceListener<u32, ()> for Recorder {
        fn on_drag_start(&mut self, source: &Source<u32>) {
            self.0
                .borrow_mut()
                .push(Seen::Listeners(source.listener_count()));
        }

        fn on_drop(&mut self, source: &Source<u32>, target: TargetId) {
            self.0
                .borrow_mut()
                .push(Seen::Drop(target, source.current_targets().to_vec()));
        }

        fn on_drag_end(&mut self, source: &Source<u32>) {
            self.0
                .borrow_mut()
                .push(Seen::End(source.current_targets().to_vec()));
        }
    }

    fn recorded(source: &mut Source<u32>) -> Rc<RefCell<Vec<Seen>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        source.add_listener(Recorder(Rc::clone(&seen)));
        seen
    }

    #[test]
    fn source_drop_fires_once_per_current_target_before_dragend() {
        let mut doc = Doc::default();
        let (mut source, mut targets, _log) = setup(2);
        let seen = recorded(&mut source);
        let a = targets[0].id();

        source
            .drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0))
            .unwrap();
        source
            .drag_to(&mut doc, &mut targets, Point::new(25.0, 25.0))
            .unwrap();
        source
            .drop_at(&mut doc, &mut targets, Point::new(25.0, 25.0))
            .unwrap();

        assert_eq!(
            *seen.borrow(),
            [
                Seen::Listeners(0),
                Seen::Drop(a, vec![a]),
                Seen::End(vec![a]),
            ]
        );
        assert_eq!(source.listener_count(), 2);
    }

    #[test]
    fn unlistening_mid_drag_forgets_the_target() {
        let mut doc = Doc::default();
        let (mut source, mut targets, log) = setup(1);
        let seen = recorded(&mut source);
        let (s, a) = (source.id(), targets[0].id());

        source
            .drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0))
            .unwrap();
        assert_eq!(source.current_targets(), [a]);

        targets[0].unlisten(s);
        source
            .drag_to(&mut doc, &mut targets, Point::new(6.0, 6.0))
            .unwrap();
        assert!(source.current_targets().is_empty());

        source
            .drop_at(&mut doc, &mut targets, Point::new(6.0, 6.0))
            .unwrap();
        assert_eq!(*seen.borrow(), [Seen::Listeners(0), Seen::End(vec![])]);
        assert!(!log.events().contains(&DragEvent::Drop(a, s)));
    }

    #[test]
    fn targets_missing_from_the_slice_are_forgotten() {
        let mut doc = Doc::default();
        let (mut source, mut targets, _log) = setup(1);
        source
            .drag_to(&mut doc, &mut targets, Point::new(5.0, 5.0))
            .unwrap();
        assert_eq!(source.current_targets().len(), 1);

        source
            .drag_to(&mut doc, &mut [], Point::new(6.0, 6.0))
            .unwrap();
        assert!(source.current_targets().is_empty());
    }
}
