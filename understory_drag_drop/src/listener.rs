// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed observer interfaces for sources and targets.
//!
//! Notifications are delivered synchronously, in registration order, while
//! the emitting state machine runs. There is no bubbling.
//!
//! - [`SourceListener`] observes one [`Source`]: `dragstart`, `drag`, `drop`
//!   (once per target dropped on), `dragend`.
//! - [`TargetListener`] observes one [`Target`](crate::Target): `dragenter`,
//!   `dragover`, `dragleave`, `drop`.
//!
//! Every method has an empty default, so listeners implement only what they
//! care about. [`EventLog`] records everything into a shared, ordered list.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Point;

use crate::geometry::NodeKey;
use crate::source::{Source, SourceId};
use crate::target::TargetId;

/// Observer for a single [`Source`].
///
/// The `&Source` passed to each method reflects the drag state at that
/// point. Its listener list is detached for the duration of the call, so
/// [`Source::listener_count`] reads `0` there.
#[allow(unused_variables, reason = "default methods ignore their arguments")]
pub trait SourceListener<N: NodeKey, D> {
    /// The source created its handle and started dragging.
    fn on_drag_start(&mut self, source: &Source<N, D>) {}

    /// The pointer moved (or was released) at `point` while dragging.
    fn on_drag(&mut self, source: &Source<N, D>, point: Point) {}

    /// The source was dropped on `target`.
    fn on_drop(&mut self, source: &Source<N, D>, target: TargetId) {}

    /// The drag finished.
    ///
    /// [`Source::current_targets`] still reports the targets the source was
    /// dropped on; it is cleared after every listener has run.
    fn on_drag_end(&mut self, source: &Source<N, D>) {}
}

/// Observer for a single [`Target`](crate::Target).
#[allow(unused_variables, reason = "default methods ignore their arguments")]
pub trait TargetListener {
    /// `source` moved over `target` after being outside it.
    fn on_enter(&mut self, target: TargetId, source: SourceId) {}

    /// `source` is over `target`. Follows every enter, and repeats on each move.
    fn on_over(&mut self, target: TargetId, source: SourceId) {}

    /// `source` moved off `target`.
    fn on_leave(&mut self, target: TargetId, source: SourceId) {}

    /// `source` was released over `target`.
    fn on_drop(&mut self, target: TargetId, source: SourceId) {}
}

/// Key returned when registering a listener; pass it back to remove it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(u32);

/// Registration-ordered listener storage shared by sources and targets.
pub(crate) struct Listeners<L: ?Sized> {
    next: u32,
    entries: Vec<(ListenerKey, Box<L>)>,
}

impl<L: ?Sized> Default for Listeners<L> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }
}

impl<L: ?Sized> Listeners<L> {
    pub(crate) fn add(&mut self, listener: Box<L>) -> ListenerKey {
        let key = ListenerKey(self.next);
        self.next += 1;
        self.entries.push((key, listener));
        key
    }

    pub(crate) fn remove(&mut self, key: ListenerKey) -> Option<Box<L>> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        self.entries.iter_mut().map(|(_, l)| &mut **l)
    }
}

/// One recorded notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragEvent {
    /// `dragstart` from a source.
    DragStart(SourceId),
    /// `drag` from a source at a pointer position.
    Drag(SourceId, Point),
    /// `dragend` from a source.
    DragEnd(SourceId),
    /// `dragenter` on a target.
    Enter(TargetId, SourceId),
    /// `dragover` on a target.
    Over(TargetId, SourceId),
    /// `dragleave` on a target.
    Leave(TargetId, SourceId),
    /// `drop` on a target.
    Drop(TargetId, SourceId),
}

/// Records notifications from any number of sources and targets, in order.
///
/// Clones share the same log, so keep one clone and register the others:
///
/// ```
/// use understory_drag_drop::listener::{EventLog, TargetListener};
/// use understory_drag_drop::{SourceId, TargetId};
///
/// let log = EventLog::new();
/// let mut listener = log.clone();
/// listener.on_enter(TargetId::new(1), SourceId::new(0));
/// assert_eq!(log.len(), 1);
/// ```
///
/// Drops are recorded from the target side only, so registering the same
/// log on a source and its targets yields one [`DragEvent::Drop`] per target.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<DragEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DragEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<DragEvent> {
        core::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: DragEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl<N: NodeKey, D> SourceListener<N, D> for EventLog {
    fn on_drag_start(&mut self, source: &Source<N, D>) {
        self.push(DragEvent::DragStart(source.id()));
    }

    fn on_drag(&mut self, source: &Source<N, D>, point: Point) {
        self.push(DragEvent::Drag(source.id(), point));
    }

    fn on_drag_end(&mut self, source: &Source<N, D>) {
        self.push(DragEvent::DragEnd(source.id()));
    }
}

impl TargetListener for EventLog {
    fn on_enter(&mut self, target: TargetId, source: SourceId) {
        self.push(DragEvent::Enter(target, source));
    }

    fn on_over(&mut self, target: TargetId, source: SourceId) {
        self.push(DragEvent::Over(target, source));
    }

    fn on_leave(&mut self, target: TargetId, source: SourceId) {
        self.push(DragEvent::Leave(target, source));
    }

    fn on_drop(&mut self, target: TargetId, source: SourceId) {
        self.push(DragEvent::Drop(target, source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_keep_registration_order_and_remove_by_key() {
        let mut ls: Listeners<dyn TargetListener> = Listeners::default();
        let a = EventLog::new();
        let b = EventLog::new();
        let ka = ls.add(Box::new(a.clone()));
        let _kb = ls.add(Box::new(b.clone()));
        assert_eq!(ls.len(), 2);

        for l in ls.iter_mut() {
            l.on_over(TargetId::new(1), SourceId::new(2));
        }
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);

        assert!(ls.remove(ka).is_some());
        assert!(ls.remove(ka).is_none());
        for l in ls.iter_mut() {
            l.on_leave(TargetId::new(1), SourceId::new(2));
        }
        assert_eq!(a.len(), 1);
        assert_eq!(
            b.take(),
            [
                DragEvent::Over(TargetId::new(1), SourceId::new(2)),
                DragEvent::Leave(TargetId::new(1), SourceId::new(2)),
            ]
        );
        assert!(b.is_empty());
    }
}
