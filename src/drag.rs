//! Raw drag tracking: pointer gestures to clamped screen coordinates.
//!
//! A [`DragTracker`] owns at most one [`DragSession`] at a time. The session
//! is created on pointer-down and destroyed on pointer-up or cancellation.
//! Each tick reports a point relative to the tracker frame, clamped by the
//! constraint snapshot captured when the gesture started.
//!
//! Two effects run per tick, in order:
//!
//! 1. the optional preview callback, for immediate visual feedback;
//! 2. the drag callback, which commits the tick to authoritative state.
//!
//! Dropping the preview only costs smoothness.

use tracing::{debug, trace};

use crate::constraint::ConstraintRect;
use crate::error::DragError;
use crate::geom::{ScreenPoint, ScreenRect};

/// Gesture phase carried by a [`DragEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pointer pressed on the element.
    Start,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released or gesture ended.
    End,
}

/// Pointer event delivered to drag callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    /// Gesture phase.
    pub phase: DragPhase,
    /// Raw pointer position in window coordinates.
    pub pointer: ScreenPoint,
    /// Pointer position relative to the tracker frame, before clamping.
    pub local: ScreenPoint,
}

/// Called once when a gesture starts.
pub type StartCallback = Box<dyn FnMut(&DragEvent)>;
/// Called on every tick with the clamped position.
pub type DragCallback = Box<dyn FnMut(ScreenPoint, &DragEvent) -> Result<(), DragError>>;
/// Called once when a gesture ends with the last clamped position.
pub type EndCallback = Box<dyn FnMut(ScreenPoint, &DragEvent)>;
/// Called on every tick before the drag callback.
pub type PreviewCallback = Box<dyn FnMut(ScreenPoint)>;

/// Callbacks and bounds for a [`DragTracker`].
#[derive(Default)]
pub struct DragOptions {
    on_start: Option<StartCallback>,
    on_drag: Option<DragCallback>,
    on_end: Option<EndCallback>,
    preview: Option<PreviewCallback>,
    constraints: ConstraintRect,
}

impl DragOptions {
    /// Options with no callbacks and no bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gesture start callback.
    pub fn on_start(mut self, callback: impl FnMut(&DragEvent) + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Set the per-tick commit callback.
    pub fn on_drag(
        mut self,
        callback: impl FnMut(ScreenPoint, &DragEvent) -> Result<(), DragError> + 'static,
    ) -> Self {
        self.on_drag = Some(Box::new(callback));
        self
    }

    /// Set the gesture end callback.
    pub fn on_end(mut self, callback: impl FnMut(ScreenPoint, &DragEvent) + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    /// Set the per-tick preview callback.
    pub fn preview(mut self, callback: impl FnMut(ScreenPoint) + 'static) -> Self {
        self.preview = Some(Box::new(callback));
        self
    }

    /// Set the clamp bounds.
    pub fn constraints(mut self, constraints: ConstraintRect) -> Self {
        self.constraints = constraints;
        self
    }

    /// Access the clamp bounds.
    pub fn constraint_rect(&self) -> ConstraintRect {
        self.constraints
    }
}

impl std::fmt::Debug for DragOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragOptions")
            .field("on_start", &self.on_start.is_some())
            .field("on_drag", &self.on_drag.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("preview", &self.preview.is_some())
            .field("constraints", &self.constraints)
            .finish()
    }
}

/// State of one in-flight gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    start: ScreenPoint,
    position: ScreenPoint,
    constraints: ConstraintRect,
    ticks: u64,
}

impl DragSession {
    fn new(start: ScreenPoint, constraints: ConstraintRect) -> Self {
        Self {
            start,
            position: start,
            constraints,
            ticks: 0,
        }
    }

    /// Clamped position where the gesture started.
    pub fn start(&self) -> ScreenPoint {
        self.start
    }

    /// Latest clamped position.
    pub fn position(&self) -> ScreenPoint {
        self.position
    }

    /// Constraint snapshot used for the whole gesture.
    pub fn constraints(&self) -> ConstraintRect {
        self.constraints
    }

    /// Number of move ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Converts a pointer gesture into clamped per-tick callbacks.
#[derive(Debug)]
pub struct DragTracker {
    options: DragOptions,
    frame: ScreenRect,
    session: Option<DragSession>,
}

impl DragTracker {
    /// Create an idle tracker whose frame origin is the window origin.
    pub fn new(options: DragOptions) -> Self {
        Self {
            options,
            frame: ScreenRect::default(),
            session: None,
        }
    }

    /// Set the coordinate frame positions are reported in.
    pub fn with_frame(mut self, frame: ScreenRect) -> Self {
        self.frame = frame;
        self
    }

    /// Replace the coordinate frame.
    pub fn set_frame(&mut self, frame: ScreenRect) {
        self.frame = frame;
    }

    /// Access the coordinate frame.
    pub fn frame(&self) -> ScreenRect {
        self.frame
    }

    /// Bounds that the next gesture will snapshot.
    pub fn constraints(&self) -> ConstraintRect {
        self.options.constraints
    }

    /// Whether a gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Access the in-flight gesture, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Begin a gesture at `pointer`.
    ///
    /// Returns `false` without side effects when a gesture is already active.
    pub fn start(&mut self, pointer: ScreenPoint) -> bool {
        if self.session.is_some() {
            return false;
        }
        let local = pointer.relative_to(self.frame.min);
        let constraints = self.options.constraints;
        let session = DragSession::new(constraints.clamp(local), constraints);
        debug!(x = session.start.x, y = session.start.y, "drag start");
        self.session = Some(session);
        if let Some(on_start) = self.options.on_start.as_mut() {
            on_start(&DragEvent {
                phase: DragPhase::Start,
                pointer,
                local,
            });
        }
        true
    }

    /// Process one move tick.
    ///
    /// Returns the clamped position, or `Ok(None)` when no gesture is active.
    pub fn drag(&mut self, pointer: ScreenPoint) -> Result<Option<ScreenPoint>, DragError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let local = pointer.relative_to(self.frame.min);
        let position = session.constraints.clamp(local);
        session.position = position;
        session.ticks += 1;
        trace!(x = position.x, y = position.y, tick = session.ticks, "drag tick");

        if let Some(preview) = self.options.preview.as_mut() {
            preview(position);
        }
        if let Some(on_drag) = self.options.on_drag.as_mut() {
            let event = DragEvent {
                phase: DragPhase::Move,
                pointer,
                local,
            };
            on_drag(position, &event)?;
        }
        Ok(Some(position))
    }

    /// End the gesture, reporting the last clamped position.
    ///
    /// Ending an idle tracker is a no-op and returns `None`.
    pub fn end(&mut self, pointer: ScreenPoint) -> Option<ScreenPoint> {
        let session = self.session.take()?;
        debug!(
            x = session.position.x,
            y = session.position.y,
            ticks = session.ticks,
            "drag end"
        );
        if let Some(on_end) = self.options.on_end.as_mut() {
            on_end(
                session.position,
                &DragEvent {
                    phase: DragPhase::End,
                    pointer,
                    local: pointer.relative_to(self.frame.min),
                },
            );
        }
        Some(session.position)
    }

    /// Drop the gesture without calling the end callback.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.session.take().is_some();
        if cancelled {
            debug!("drag cancelled");
        }
        cancelled
    }

    pub(crate) fn take_session(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    pub(crate) fn resume_session(&mut self, session: DragSession) {
        self.session = Some(session);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn reports_clamped_positions_relative_to_frame() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let options = DragOptions::new()
            .constraints(ConstraintRect::none().with_x(10.0, 100.0))
            .on_drag(move |point, _| {
                sink.borrow_mut().push(point);
                Ok(())
            });
        let frame = ScreenRect::from_origin_size(ScreenPoint::new(50.0, 20.0), 200.0, 100.0);
        let mut tracker = DragTracker::new(options).with_frame(frame);

        assert!(tracker.start(ScreenPoint::new(80.0, 30.0)));
        tracker.drag(ScreenPoint::new(300.0, 40.0)).unwrap();
        tracker.drag(ScreenPoint::new(55.0, 60.0)).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![ScreenPoint::new(100.0, 20.0), ScreenPoint::new(10.0, 40.0)]
        );
    }

    #[test]
    fn lifecycle_callbacks_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c, d) = (
            Rc::clone(&log),
            Rc::clone(&log),
            Rc::clone(&log),
            Rc::clone(&log),
        );
        let options = DragOptions::new()
            .on_start(move |_| a.borrow_mut().push("start"))
            .preview(move |_| b.borrow_mut().push("preview"))
            .on_drag(move |_, _| {
                c.borrow_mut().push("drag");
                Ok(())
            })
            .on_end(move |_, _| d.borrow_mut().push("end"));
        let mut tracker = DragTracker::new(options);

        tracker.start(ScreenPoint::new(0.0, 0.0));
        assert!(tracker.is_dragging());
        tracker.drag(ScreenPoint::new(1.0, 1.0)).unwrap();
        tracker.end(ScreenPoint::new(1.0, 1.0));
        assert!(!tracker.is_dragging());

        assert_eq!(*log.borrow(), vec!["start", "preview", "drag", "end"]);
    }

    #[test]
    fn end_reports_last_clamped_position_once() {
        let ends = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ends);
        let options = DragOptions::new()
            .constraints(ConstraintRect::none().with_y(0.0, 50.0))
            .on_end(move |point, _| sink.borrow_mut().push(point));
        let mut tracker = DragTracker::new(options);

        tracker.start(ScreenPoint::new(5.0, 5.0));
        tracker.drag(ScreenPoint::new(5.0, 90.0)).unwrap();
        assert_eq!(
            tracker.end(ScreenPoint::new(5.0, 400.0)),
            Some(ScreenPoint::new(5.0, 50.0))
        );
        assert_eq!(tracker.end(ScreenPoint::new(5.0, 400.0)), None);
        assert_eq!(*ends.borrow(), vec![ScreenPoint::new(5.0, 50.0)]);
    }

    #[test]
    fn idle_tracker_ignores_moves() {
        let mut tracker = DragTracker::new(DragOptions::new().on_drag(|_, _| {
            panic!("no gesture is active");
        }));
        assert_eq!(tracker.drag(ScreenPoint::new(1.0, 2.0)), Ok(None));
    }

    #[test]
    fn cancel_skips_end_callback() {
        let mut tracker = DragTracker::new(DragOptions::new().on_end(|_, _| {
            panic!("cancel must not end");
        }));
        tracker.start(ScreenPoint::new(0.0, 0.0));
        assert!(tracker.cancel());
        assert!(!tracker.cancel());
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn drag_errors_propagate() {
        let mut tracker = DragTracker::new(
            DragOptions::new().on_drag(|point, _| Err(DragError::NotInvertible(point.x))),
        );
        tracker.start(ScreenPoint::new(0.0, 0.0));
        assert_eq!(
            tracker.drag(ScreenPoint::new(3.0, 0.0)),
            Err(DragError::NotInvertible(3.0))
        );
        assert!(tracker.is_dragging());
    }
}
