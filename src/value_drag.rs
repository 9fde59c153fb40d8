//! Single-value dragging through an axis scale.
//!
//! A [`ValueDragger`] turns the selected coordinate of each drag tick into a
//! domain value by inverting an [`AxisScale`], clamps it to the caller's
//! bounds, and reports it only when it differs from the current value. The
//! raw tracker is constrained to the screen image of the bounds, so the
//! handle never visually leaves the allowed interval.

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use crate::axis::{Axis, AxisScale};
use crate::constraint::ConstraintRect;
use crate::drag::{DragOptions, DragTracker};
use crate::error::DragError;
use crate::geom::ScreenRect;
use crate::range::Range;
use crate::surface::{DragBinding, DragSurface, HandleId};

/// Called with each new domain value.
pub type ChangeCallback = Box<dyn FnMut(f64)>;

/// Current value shared between a dragger and its owner.
#[derive(Debug, Clone, Default)]
pub struct SharedValue(Rc<Cell<f64>>);

impl SharedValue {
    /// Create a shared value.
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    /// Read the value.
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    /// Overwrite the value without notifying anyone.
    pub fn set(&self, value: f64) {
        self.0.set(value);
    }
}

/// Builder for a drag handle controlling one domain value.
pub struct ValueDragger<S> {
    value: f64,
    scale: S,
    axis: Axis,
    bounds: Option<Range>,
    on_change: Option<ChangeCallback>,
}

impl<S: AxisScale + 'static> ValueDragger<S> {
    /// Start a dragger at `value` using `scale` for the X axis.
    ///
    /// Bounds default to the scale's domain.
    pub fn new(value: f64, scale: S) -> Self {
        Self {
            value,
            scale,
            axis: Axis::X,
            bounds: None,
            on_change: None,
        }
    }

    /// Select the axis the value follows.
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Restrict the value to `bounds`.
    pub fn bounds(mut self, bounds: Range) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the value change callback.
    pub fn on_change(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    fn resolved_bounds(&self) -> Range {
        self.bounds.unwrap_or_else(|| self.scale.domain())
    }

    /// Screen-space clamp derived from the bounds.
    pub fn constraints(&self) -> Result<ConstraintRect, DragError> {
        value_constraints(&self.scale, self.axis, self.resolved_bounds())
    }

    /// Build tracker options plus the shared current value.
    pub fn into_options(self) -> Result<(DragOptions, SharedValue), DragError> {
        let constraints = self.constraints()?;
        let bounds = self.resolved_bounds();
        let Self {
            value,
            scale,
            axis,
            mut on_change,
            ..
        } = self;
        let current = SharedValue::new(value);
        let shared = current.clone();

        let options = DragOptions::new()
            .constraints(constraints)
            .on_drag(move |point, _| {
                let position = axis.coordinate(point);
                let candidate = scale
                    .inverse(position)
                    .ok_or(DragError::NotInvertible(position))?;
                let candidate = bounds.clamp(candidate);
                if candidate != shared.get() {
                    trace!(value = candidate, "value drag change");
                    shared.set(candidate);
                    if let Some(on_change) = on_change.as_mut() {
                        on_change(candidate);
                    }
                }
                Ok(())
            });
        Ok((options, current))
    }

    /// Build a standalone tracker plus the shared current value.
    pub fn into_tracker(self) -> Result<(DragTracker, SharedValue), DragError> {
        let (options, value) = self.into_options()?;
        Ok((DragTracker::new(options), value))
    }

    /// Attach the dragger to a surface.
    pub fn attach(
        self,
        surface: &DragSurface,
        hit: ScreenRect,
        frame: ScreenRect,
    ) -> Result<ValueDragBinding, DragError> {
        let (options, value) = self.into_options()?;
        Ok(ValueDragBinding {
            binding: surface.attach(hit, frame, options),
            value,
        })
    }
}

impl<S> std::fmt::Debug for ValueDragger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueDragger")
            .field("value", &self.value)
            .field("axis", &self.axis)
            .field("bounds", &self.bounds)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

/// Map domain bounds through a scale into a clamp on one screen axis.
///
/// The screen interval is ordered, so scales running backwards (typical for
/// vertical axes) produce a usable clamp.
pub fn value_constraints(
    scale: &impl AxisScale,
    axis: Axis,
    bounds: Range,
) -> Result<ConstraintRect, DragError> {
    if !bounds.is_finite() {
        return Err(DragError::InvalidBounds {
            min: bounds.min,
            max: bounds.max,
        });
    }
    let a = scale
        .forward(bounds.min)
        .ok_or(DragError::Unmappable(bounds.min))?;
    let b = scale
        .forward(bounds.max)
        .ok_or(DragError::Unmappable(bounds.max))?;
    let (lo, hi) = (a.min(b), a.max(b));
    Ok(match axis {
        Axis::X => ConstraintRect::none().with_x(lo, hi),
        Axis::Y => ConstraintRect::none().with_y(lo, hi),
    })
}

/// A [`ValueDragger`] attached to a surface.
#[derive(Debug)]
pub struct ValueDragBinding {
    binding: DragBinding,
    value: SharedValue,
}

impl ValueDragBinding {
    /// Handle identity.
    pub fn id(&self) -> HandleId {
        self.binding.id()
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Sync the current value from caller state without re-attaching.
    pub fn set_value(&self, value: f64) {
        self.value.set(value);
    }

    /// Whether the handle owns the active gesture.
    pub fn is_dragging(&self) -> bool {
        self.binding.is_dragging()
    }

    /// Move the grab region.
    pub fn set_hit_rect(&self, hit: ScreenRect) {
        self.binding.set_hit_rect(hit);
    }

    /// Move the coordinate frame.
    pub fn set_frame(&self, frame: ScreenRect) {
        self.binding.set_frame(frame);
    }

    /// Replace scale, bounds, or callback.
    ///
    /// The old listener is detached first; a gesture in flight continues
    /// under the new one.
    pub fn reattach<S: AxisScale + 'static>(
        &mut self,
        dragger: ValueDragger<S>,
    ) -> Result<(), DragError> {
        let (options, value) = dragger.into_options()?;
        self.binding.reattach(options);
        self.value = value;
        Ok(())
    }
}
