//! Scoped drag listener registry.
//!
//! A [`DragSurface`] stands in for the element tree of a retained-mode UI:
//! visual elements register a hit rectangle plus [`DragOptions`] and get a
//! [`DragBinding`] back. The binding owns the subscription. Dropping it
//! detaches the listener and cancels any gesture routed to it, so callbacks
//! never run against a torn-down element.
//!
//! Pointer events enter through [`DragSurface::pointer_down`],
//! [`DragSurface::pointer_move`], and [`DragSurface::pointer_up`]. Only one
//! gesture is routed at a time. The surface is single-threaded and never
//! holds its own borrow while user callbacks run, so callbacks may freely
//! touch other bindings.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::drag::{DragOptions, DragSession, DragTracker};
use crate::error::DragError;
use crate::geom::{ScreenPoint, ScreenRect};

/// Stable identity of an attached drag handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

struct Slot {
    id: HandleId,
    generation: u64,
    hit: ScreenRect,
    frame: ScreenRect,
    tracker: Rc<RefCell<DragTracker>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveGesture {
    id: HandleId,
    generation: u64,
}

// A reattach made while the old tracker is dispatching. The session moves
// from `from` to `to` once the dispatch returns.
struct Handoff {
    from: Rc<RefCell<DragTracker>>,
    to: Rc<RefCell<DragTracker>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Finish {
    End(ScreenPoint),
    Cancel,
}

#[derive(Default)]
struct SurfaceInner {
    slots: Vec<Slot>,
    next_id: u64,
    next_generation: u64,
    active: Option<ActiveGesture>,
    handoff: Option<Handoff>,
    deferred: Option<(Rc<RefCell<DragTracker>>, Finish)>,
}

impl SurfaceInner {
    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn position(&self, id: HandleId, generation: u64) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.id == id && slot.generation == generation)
    }

    fn is_active(&self, id: HandleId, generation: u64) -> bool {
        self.active == Some(ActiveGesture { id, generation })
    }

    fn awaits_handoff(&self, tracker: &Rc<RefCell<DragTracker>>) -> bool {
        self.handoff
            .as_ref()
            .is_some_and(|handoff| Rc::ptr_eq(&handoff.to, tracker))
    }
}

fn apply_finish(tracker: &mut DragTracker, finish: Finish) -> Option<ScreenPoint> {
    match finish {
        Finish::End(pointer) => tracker.end(pointer),
        Finish::Cancel => {
            tracker.cancel();
            None
        }
    }
}

/// Registry of drag handles sharing one pointer.
#[derive(Clone, Default)]
pub struct DragSurface {
    inner: Rc<RefCell<SurfaceInner>>,
}

impl DragSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener grabbing pointer-downs inside `hit`.
    ///
    /// Tick positions are reported relative to `frame.min`. Handles attached
    /// later sit on top of earlier ones for hit testing.
    pub fn attach(&self, hit: ScreenRect, frame: ScreenRect, options: DragOptions) -> DragBinding {
        let mut inner = self.inner.borrow_mut();
        let id = HandleId(inner.next_id);
        inner.next_id += 1;
        let generation = inner.bump_generation();
        let tracker = DragTracker::new(options).with_frame(frame);
        inner.slots.push(Slot {
            id,
            generation,
            hit,
            frame,
            tracker: Rc::new(RefCell::new(tracker)),
        });
        debug!(handle = id.0, "drag listener attached");
        DragBinding {
            surface: Rc::downgrade(&self.inner),
            id,
            generation,
        }
    }

    /// Number of attached handles.
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// Whether no handle is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a gesture is being routed.
    pub fn is_dragging(&self) -> bool {
        self.inner.borrow().active.is_some()
    }

    /// Handle receiving the current gesture.
    pub fn active_handle(&self) -> Option<HandleId> {
        self.inner.borrow().active.map(|active| active.id)
    }

    /// Topmost handle whose hit rectangle contains `pointer`.
    pub fn hit_test(&self, pointer: ScreenPoint) -> Option<HandleId> {
        self.inner
            .borrow()
            .slots
            .iter()
            .rev()
            .find(|slot| slot.hit.contains(pointer))
            .map(|slot| slot.id)
    }

    /// Route a pointer-down. Returns the handle that took the gesture.
    ///
    /// A second pointer-down while a gesture is active is ignored.
    pub fn pointer_down(&self, pointer: ScreenPoint) -> Option<HandleId> {
        let (active, tracker, frame) = {
            let mut inner = self.inner.borrow_mut();
            if inner.active.is_some() {
                return None;
            }
            let slot = inner.slots.iter().rev().find(|slot| slot.hit.contains(pointer))?;
            let active = ActiveGesture {
                id: slot.id,
                generation: slot.generation,
            };
            let picked = (active, Rc::clone(&slot.tracker), slot.frame);
            inner.active = Some(active);
            picked
        };
        let started = match tracker.try_borrow_mut() {
            Ok(mut tracker) => {
                tracker.set_frame(frame);
                tracker.start(pointer)
            }
            Err(_) => false,
        };
        if !started {
            let mut inner = self.inner.borrow_mut();
            if inner.active == Some(active) {
                inner.active = None;
            }
            return None;
        }
        self.settle();
        Some(active.id)
    }

    /// Route a pointer move to the active gesture.
    pub fn pointer_move(&self, pointer: ScreenPoint) -> Result<Option<ScreenPoint>, DragError> {
        let Some((tracker, frame)) = self.active_tracker() else {
            return Ok(None);
        };
        let result = match tracker.try_borrow_mut() {
            Ok(mut tracker) => {
                tracker.set_frame(frame);
                tracker.drag(pointer)
            }
            Err(_) => {
                trace!("ignoring nested pointer move");
                Ok(None)
            }
        };
        self.settle();
        result
    }

    /// Route a pointer-up, ending the active gesture.
    ///
    /// Returns `None` when no gesture is active, so duplicate releases are
    /// harmless. A release issued from the gesture's own callback ends it
    /// once that callback returns, and also reports `None`.
    pub fn pointer_up(&self, pointer: ScreenPoint) -> Option<ScreenPoint> {
        let (tracker, _) = self.active_tracker()?;
        self.inner.borrow_mut().active = None;
        let ended = self.finish(tracker, Finish::End(pointer));
        self.settle();
        ended
    }

    /// Abort the active gesture without end callbacks.
    pub fn cancel(&self) -> bool {
        let Some((tracker, _)) = self.active_tracker() else {
            return false;
        };
        self.inner.borrow_mut().active = None;
        self.finish(tracker, Finish::Cancel);
        self.settle();
        true
    }

    fn active_tracker(&self) -> Option<(Rc<RefCell<DragTracker>>, ScreenRect)> {
        let mut inner = self.inner.borrow_mut();
        let active = inner.active?;
        match inner.position(active.id, active.generation) {
            Some(index) => {
                let slot = &inner.slots[index];
                Some((Rc::clone(&slot.tracker), slot.frame))
            }
            None => {
                trace!(handle = active.id.0, "dropping gesture for detached handle");
                inner.active = None;
                None
            }
        }
    }

    // End or cancel now, or queue it when the tracker is still dispatching.
    fn finish(&self, tracker: Rc<RefCell<DragTracker>>, action: Finish) -> Option<ScreenPoint> {
        if !self.inner.borrow().awaits_handoff(&tracker) {
            if let Ok(mut idle) = tracker.try_borrow_mut() {
                return apply_finish(&mut idle, action);
            }
        }
        trace!(?action, "deferring gesture finish");
        self.inner.borrow_mut().deferred = Some((tracker, action));
        None
    }

    // Apply work queued by callbacks once no tracker involved is borrowed.
    fn settle(&self) {
        let handoff = self.inner.borrow_mut().handoff.take();
        if let Some(handoff) = handoff {
            let moved = match (handoff.from.try_borrow_mut(), handoff.to.try_borrow_mut()) {
                (Ok(mut from), Ok(mut to)) => {
                    if let Some(session) = from.take_session() {
                        to.resume_session(session);
                    }
                    true
                }
                _ => false,
            };
            if !moved {
                self.inner.borrow_mut().handoff = Some(handoff);
                return;
            }
            trace!("gesture handed to reattached listener");
        }

        let deferred = self.inner.borrow_mut().deferred.take();
        if let Some((tracker, finish)) = deferred {
            let applied = match tracker.try_borrow_mut() {
                Ok(mut target) => {
                    apply_finish(&mut target, finish);
                    true
                }
                Err(_) => false,
            };
            if !applied {
                self.inner.borrow_mut().deferred = Some((tracker, finish));
            }
        }
    }
}

impl std::fmt::Debug for DragSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DragSurface")
            .field("handles", &inner.slots.len())
            .field("active", &inner.active.map(|active| active.id))
            .finish()
    }
}

/// Owned subscription of one drag handle on a [`DragSurface`].
///
/// Dropping the binding detaches the listener.
#[derive(Debug)]
pub struct DragBinding {
    surface: Weak<RefCell<SurfaceInner>>,
    id: HandleId,
    generation: u64,
}

impl DragBinding {
    /// Handle identity, stable across [`DragBinding::reattach`].
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Whether the listener is still installed.
    pub fn is_attached(&self) -> bool {
        self.with_inner(|inner| inner.position(self.id, self.generation).is_some())
            .unwrap_or(false)
    }

    /// Whether this handle owns the active gesture.
    pub fn is_dragging(&self) -> bool {
        self.with_inner(|inner| inner.is_active(self.id, self.generation))
            .unwrap_or(false)
    }

    /// Snapshot of the in-flight session, if this handle is dragging.
    ///
    /// Returns `None` while the handle's own callbacks are running.
    pub fn session(&self) -> Option<DragSession> {
        let tracker = self.with_inner(|inner| {
            let index = inner.position(self.id, self.generation)?;
            Some(Rc::clone(&inner.slots[index].tracker))
        })??;
        let tracker = tracker.try_borrow().ok()?;
        tracker.session().copied()
    }

    /// Move the grab region.
    pub fn set_hit_rect(&self, hit: ScreenRect) {
        self.with_slot(|slot| slot.hit = hit);
    }

    /// Move the coordinate frame. Takes effect from the next tick.
    pub fn set_frame(&self, frame: ScreenRect) {
        self.with_slot(|slot| slot.frame = frame);
    }

    /// Replace the listener options.
    ///
    /// The previous listener is removed before the new one is installed, so a
    /// tick never reaches both. A gesture in flight moves to the new listener
    /// with its original constraint snapshot; when called from the handle's
    /// own callback the move happens as soon as that callback returns.
    pub fn reattach(&mut self, options: DragOptions) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        let mut inner = surface.borrow_mut();
        let Some(index) = inner.position(self.id, self.generation) else {
            return;
        };
        let was_active = inner.is_active(self.id, self.generation);
        let old = inner.slots.remove(index);
        let generation = inner.bump_generation();

        let mut tracker = DragTracker::new(options).with_frame(old.frame);
        let mut pending = false;
        if was_active {
            if inner.awaits_handoff(&old.tracker) {
                pending = true;
            } else {
                match old.tracker.try_borrow_mut() {
                    Ok(mut previous) => {
                        if let Some(session) = previous.take_session() {
                            tracker.resume_session(session);
                        }
                    }
                    // Reattached from its own callback; hand over after dispatch.
                    Err(_) => pending = true,
                }
            }
            inner.active = Some(ActiveGesture {
                id: self.id,
                generation,
            });
        }
        let tracker = Rc::new(RefCell::new(tracker));
        if pending {
            match inner.handoff.as_mut() {
                Some(handoff) if Rc::ptr_eq(&handoff.to, &old.tracker) => {
                    handoff.to = Rc::clone(&tracker);
                }
                _ => {
                    inner.handoff = Some(Handoff {
                        from: Rc::clone(&old.tracker),
                        to: Rc::clone(&tracker),
                    });
                }
            }
        }

        inner.slots.insert(
            index,
            Slot {
                id: self.id,
                generation,
                hit: old.hit,
                frame: old.frame,
                tracker,
            },
        );
        self.generation = generation;
        debug!(handle = self.id.0, carried = was_active, "drag listener reattached");
    }

    /// Detach the listener now.
    pub fn detach(self) {}

    fn with_inner<R>(&self, f: impl FnOnce(&SurfaceInner) -> R) -> Option<R> {
        let surface = self.surface.upgrade()?;
        let inner = surface.borrow();
        Some(f(&inner))
    }

    fn with_slot(&self, f: impl FnOnce(&mut Slot)) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        let mut inner = surface.borrow_mut();
        if let Some(index) = inner.position(self.id, self.generation) {
            f(&mut inner.slots[index]);
        }
    }
}

impl Drop for DragBinding {
    fn drop(&mut self) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        let removed = {
            let Ok(mut inner) = surface.try_borrow_mut() else {
                return;
            };
            let Some(index) = inner.position(self.id, self.generation) else {
                return;
            };
            let slot = inner.slots.remove(index);
            let was_active = inner.is_active(self.id, self.generation);
            if was_active {
                inner.active = None;
            }
            if inner.awaits_handoff(&slot.tracker) {
                inner.handoff = None;
            }
            if inner
                .deferred
                .as_ref()
                .is_some_and(|(tracker, _)| Rc::ptr_eq(tracker, &slot.tracker))
            {
                inner.deferred = None;
            }
            (slot, was_active)
        };
        let (slot, was_active) = removed;
        if was_active {
            if let Ok(mut tracker) = slot.tracker.try_borrow_mut() {
                tracker.cancel();
            }
        }
        debug!(handle = self.id.0, cancelled = was_active, "drag listener detached");
    }
}
