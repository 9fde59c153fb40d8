//! Draggable bars over a linked value vector.
//!
//! Each bar of a discrete distribution gets its own drag handle. Dragging bar
//! `i` vertically proposes a new probability for that entry; a
//! [`RedistributePolicy`] then recomputes the whole vector. Every tick runs the
//! preview callback with fresh bar geometry and then commits the vector
//! through the change callback.
//!
//! The binding keeps a private copy of the vector. The caller's own state is
//! only ever updated through the change callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::axis::{Axis, AxisFormatter, AxisScale, BandScale, ContinuousScale};
use crate::drag::DragOptions;
use crate::error::DragError;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::range::Range;
use crate::redistribute::{Proportional, RedistributePolicy};
use crate::surface::{DragBinding, DragSurface};
use crate::value_drag::value_constraints;

/// Called with the committed vector after each tick.
pub type ValuesCallback = Box<dyn FnMut(&[f64])>;
/// Called with recomputed bar geometry after each tick.
pub type BarPreviewCallback = Box<dyn FnMut(&[BarGeometry])>;

/// Screen geometry of one bar, relative to the chart frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    /// Entry index.
    pub index: usize,
    /// Bar rectangle from the baseline to the value.
    pub rect: ScreenRect,
    /// Entry value.
    pub value: f64,
    /// Formatted value label.
    pub label: String,
}

/// Lay out one bar per entry.
pub fn layout_bars(
    values: &[f64],
    x_scale: &BandScale,
    y_scale: &ContinuousScale,
    formatter: &AxisFormatter,
) -> Result<Vec<BarGeometry>, DragError> {
    if x_scale.count() != values.len() {
        return Err(DragError::LengthMismatch {
            expected: x_scale.count(),
            actual: values.len(),
        });
    }
    let baseline = y_scale.forward(0.0).ok_or(DragError::Unmappable(0.0))?;
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let band = x_scale.band(index).ok_or(DragError::LengthMismatch {
                expected: x_scale.count(),
                actual: values.len(),
            })?;
            let top = y_scale.forward(value).ok_or(DragError::Unmappable(value))?;
            Ok(BarGeometry {
                index,
                rect: ScreenRect::new(
                    ScreenPoint::new(band.start, top.min(baseline)),
                    ScreenPoint::new(band.start + band.width, top.max(baseline)),
                ),
                value,
                label: formatter.format(value),
            })
        })
        .collect()
}

/// Builder for a set of redistributing bar handles.
pub struct BarDragger {
    values: Vec<f64>,
    x_scale: BandScale,
    y_scale: ContinuousScale,
    policy: Rc<dyn RedistributePolicy>,
    on_change: Option<ValuesCallback>,
    preview: Option<BarPreviewCallback>,
    formatter: AxisFormatter,
}

impl BarDragger {
    /// Create bars for `values` using the proportional policy.
    ///
    /// `y_scale` maps probabilities onto the frame's vertical pixels.
    pub fn new(values: Vec<f64>, x_scale: BandScale, y_scale: ContinuousScale) -> Self {
        Self {
            values,
            x_scale,
            y_scale,
            policy: Rc::new(Proportional),
            on_change: None,
            preview: None,
            formatter: AxisFormatter::default(),
        }
    }

    /// Replace the redistribution policy. The policy's output is used as is.
    pub fn policy(mut self, policy: impl RedistributePolicy + 'static) -> Self {
        self.policy = Rc::new(policy);
        self
    }

    /// Set the commit callback.
    pub fn on_change(mut self, callback: impl FnMut(&[f64]) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Set the preview callback.
    pub fn preview(mut self, callback: impl FnMut(&[BarGeometry]) + 'static) -> Self {
        self.preview = Some(Box::new(callback));
        self
    }

    /// Set the label formatter used for previews.
    pub fn formatter(mut self, formatter: AxisFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Attach one handle per bar to `surface`.
    ///
    /// Bar positions are relative to `frame.min`.
    pub fn attach(
        self,
        surface: &DragSurface,
        frame: ScreenRect,
    ) -> Result<BarDragBinding, DragError> {
        if self.values.is_empty() {
            return Err(DragError::EmptyValues);
        }
        check_layout(self.values.len(), &self.x_scale, &self.y_scale)?;

        let count = self.values.len();
        let shared = Rc::new(BarShared {
            values: RefCell::new(self.values),
            x_scale: Cell::new(self.x_scale),
            y_scale: Cell::new(self.y_scale),
            policy: self.policy,
            formatter: self.formatter,
            on_change: RefCell::new(self.on_change),
            preview: RefCell::new(self.preview),
        });

        let mut bindings = Vec::with_capacity(count);
        for index in 0..count {
            let hit = shared.column(index)?.translate(frame.min);
            bindings.push(surface.attach(hit, frame, bar_options(&shared, index)?));
        }
        debug!(bars = count, "bar drag handles attached");
        Ok(BarDragBinding { bindings, shared })
    }
}

impl std::fmt::Debug for BarDragger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarDragger")
            .field("values", &self.values)
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

fn check_layout(
    count: usize,
    x_scale: &BandScale,
    y_scale: &ContinuousScale,
) -> Result<(), DragError> {
    if x_scale.count() != count {
        return Err(DragError::LengthMismatch {
            expected: x_scale.count(),
            actual: count,
        });
    }
    value_constraints(y_scale, Axis::Y, Range::unit()).map(|_| ())
}

fn bar_options(shared: &Rc<BarShared>, index: usize) -> Result<DragOptions, DragError> {
    let constraints = value_constraints(&shared.y_scale.get(), Axis::Y, Range::unit())?;
    let tick = Rc::clone(shared);
    Ok(DragOptions::new()
        .constraints(constraints)
        .on_drag(move |point, _| tick.tick(index, point.y)))
}

struct BarShared {
    values: RefCell<Vec<f64>>,
    x_scale: Cell<BandScale>,
    y_scale: Cell<ContinuousScale>,
    policy: Rc<dyn RedistributePolicy>,
    formatter: AxisFormatter,
    on_change: RefCell<Option<ValuesCallback>>,
    preview: RefCell<Option<BarPreviewCallback>>,
}

impl BarShared {
    fn tick(&self, index: usize, y: f32) -> Result<(), DragError> {
        let new_value = self
            .y_scale
            .get()
            .inverse(y)
            .ok_or(DragError::NotInvertible(y))?
            .clamp(0.0, 1.0);
        let snapshot = self.values.borrow().clone();
        let updated = self.policy.redistribute(&snapshot, index, new_value);
        if updated.len() != snapshot.len() {
            return Err(DragError::LengthMismatch {
                expected: snapshot.len(),
                actual: updated.len(),
            });
        }
        trace!(index, value = new_value, "bar drag tick");
        self.values.replace(updated.clone());

        if let Some(preview) = self.preview.borrow_mut().as_mut() {
            let geometry = layout_bars(
                &updated,
                &self.x_scale.get(),
                &self.y_scale.get(),
                &self.formatter,
            )?;
            preview(&geometry);
        }
        if let Some(on_change) = self.on_change.borrow_mut().as_mut() {
            on_change(&updated);
        }
        Ok(())
    }

    // Grab region for a bar: the whole band column between value 0 and 1.
    fn column(&self, index: usize) -> Result<ScreenRect, DragError> {
        let x_scale = self.x_scale.get();
        let y_scale = self.y_scale.get();
        let band = x_scale.band(index).ok_or(DragError::LengthMismatch {
            expected: x_scale.count(),
            actual: index + 1,
        })?;
        let zero = y_scale.forward(0.0).ok_or(DragError::Unmappable(0.0))?;
        let one = y_scale.forward(1.0).ok_or(DragError::Unmappable(1.0))?;
        Ok(ScreenRect::new(
            ScreenPoint::new(band.start, zero.min(one)),
            ScreenPoint::new(band.start + band.width, zero.max(one)),
        ))
    }
}

/// Bar handles attached to a surface.
///
/// Dropping the binding detaches every bar.
pub struct BarDragBinding {
    bindings: Vec<DragBinding>,
    shared: Rc<BarShared>,
}

impl BarDragBinding {
    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Always `false`; empty vectors are rejected at attach time.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Latest committed vector.
    pub fn values(&self) -> Vec<f64> {
        self.shared.values.borrow().clone()
    }

    /// Sync the vector from caller state.
    pub fn set_values(&self, values: Vec<f64>) -> Result<(), DragError> {
        if values.len() != self.bindings.len() {
            return Err(DragError::LengthMismatch {
                expected: self.bindings.len(),
                actual: values.len(),
            });
        }
        self.shared.values.replace(values);
        Ok(())
    }

    /// Index of the bar being dragged.
    pub fn dragging_index(&self) -> Option<usize> {
        self.bindings.iter().position(DragBinding::is_dragging)
    }

    /// Whether any bar is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.dragging_index().is_some()
    }

    /// Geometry of the committed vector, relative to the frame.
    pub fn geometry(&self) -> Result<Vec<BarGeometry>, DragError> {
        layout_bars(
            &self.shared.values.borrow(),
            &self.shared.x_scale.get(),
            &self.shared.y_scale.get(),
            &self.shared.formatter,
        )
    }

    /// Move the chart frame and replace both scales.
    ///
    /// When the vertical scale changes the handles are reattached with new
    /// bounds; a gesture in flight keeps its original bounds.
    pub fn relayout(
        &mut self,
        frame: ScreenRect,
        x_scale: BandScale,
        y_scale: ContinuousScale,
    ) -> Result<(), DragError> {
        check_layout(self.bindings.len(), &x_scale, &y_scale)?;
        let y_changed = self.shared.y_scale.get() != y_scale;
        self.shared.x_scale.set(x_scale);
        self.shared.y_scale.set(y_scale);

        for (index, binding) in self.bindings.iter_mut().enumerate() {
            if y_changed {
                binding.reattach(bar_options(&self.shared, index)?);
            }
            binding.set_frame(frame);
            binding.set_hit_rect(self.shared.column(index)?.translate(frame.min));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BarDragBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarDragBinding")
            .field("bars", &self.bindings.len())
            .field("values", &self.shared.values.borrow())
            .field("dragging", &self.dragging_index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three 100px bands over a 100px tall frame at the window origin.
    fn scales(count: usize) -> (BandScale, ContinuousScale) {
        (
            BandScale::new(count, 0.0, 100.0 * count as f32).unwrap(),
            ContinuousScale::linear(Range::unit(), 100.0, 0.0).unwrap(),
        )
    }

    fn frame(count: usize) -> ScreenRect {
        ScreenRect::from_origin_size(ScreenPoint::new(0.0, 0.0), 100.0 * count as f32, 100.0)
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn layout_spans_baseline_to_value() {
        let (x, y) = scales(2);
        let bars = layout_bars(&[0.25, 0.75], &x, &y, &AxisFormatter::Percent).unwrap();
        assert_eq!(
            bars[0].rect,
            ScreenRect::new(ScreenPoint::new(0.0, 75.0), ScreenPoint::new(100.0, 100.0))
        );
        assert_eq!(bars[1].rect.min.y, 25.0);
        assert_eq!(bars[1].label, "75.0%");
    }

    #[test]
    fn layout_rejects_length_mismatch() {
        let (x, y) = scales(3);
        let result = layout_bars(&[0.5, 0.5], &x, &y, &AxisFormatter::Default);
        assert_eq!(
            result,
            Err(DragError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn dragging_a_bar_redistributes_and_commits() {
        let surface = DragSurface::new();
        let (x, y) = scales(3);
        let committed = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(Cell::new(0));
        let sink = Rc::clone(&committed);
        let seen = Rc::clone(&previews);
        let binding = BarDragger::new(vec![0.5, 0.3, 0.2], x, y)
            .on_change(move |values| sink.borrow_mut().push(values.to_vec()))
            .preview(move |bars| {
                assert_eq!(bars.len(), 3);
                seen.set(seen.get() + 1);
            })
            .attach(&surface, frame(3))
            .unwrap();

        surface.pointer_down(ScreenPoint::new(50.0, 50.0));
        assert_eq!(binding.dragging_index(), Some(0));
        surface.pointer_move(ScreenPoint::new(50.0, 20.0)).unwrap();
        surface.pointer_up(ScreenPoint::new(50.0, 20.0));

        assert_eq!(previews.get(), 1);
        let committed = committed.borrow();
        assert_eq!(committed.len(), 1);
        assert_close(&committed[0], &[0.8, 0.12, 0.08]);
        assert_close(&binding.values(), &[0.8, 0.12, 0.08]);
        assert!(!binding.is_dragging());
    }

    #[test]
    fn drag_above_chart_clamps_to_one() {
        let surface = DragSurface::new();
        let (x, y) = scales(2);
        let binding = BarDragger::new(vec![0.5, 0.5], x, y)
            .attach(&surface, frame(2))
            .unwrap();
        surface.pointer_down(ScreenPoint::new(150.0, 90.0));
        surface.pointer_move(ScreenPoint::new(150.0, -300.0)).unwrap();
        assert_close(&binding.values(), &[0.0, 1.0]);
    }

    #[test]
    fn custom_policy_is_used_verbatim() {
        let surface = DragSurface::new();
        let (x, y) = scales(2);
        let binding = BarDragger::new(vec![0.5, 0.5], x, y)
            .policy(|values: &[f64], index: usize, new_value: f64| {
                let mut next = values.to_vec();
                next[index] = new_value;
                next
            })
            .attach(&surface, frame(2))
            .unwrap();
        surface.pointer_down(ScreenPoint::new(50.0, 50.0));
        surface.pointer_move(ScreenPoint::new(50.0, 10.0)).unwrap();
        assert_close(&binding.values(), &[0.9, 0.5]);
    }

    #[test]
    fn policy_changing_length_is_an_error() {
        let surface = DragSurface::new();
        let (x, y) = scales(2);
        let _binding = BarDragger::new(vec![0.5, 0.5], x, y)
            .policy(|_: &[f64], _: usize, _: f64| vec![1.0])
            .attach(&surface, frame(2))
            .unwrap();
        surface.pointer_down(ScreenPoint::new(50.0, 50.0));
        assert_eq!(
            surface.pointer_move(ScreenPoint::new(50.0, 10.0)),
            Err(DragError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn attach_checks_preconditions() {
        let surface = DragSurface::new();
        let (x, y) = scales(3);
        let err = BarDragger::new(vec![0.5, 0.5], x, y)
            .attach(&surface, frame(3))
            .unwrap_err();
        assert_eq!(
            err,
            DragError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        let err = BarDragger::new(Vec::new(), x, y)
            .attach(&surface, frame(3))
            .unwrap_err();
        assert_eq!(err, DragError::EmptyValues);
        assert!(surface.is_empty());
    }

    #[test]
    fn relayout_moves_handles() {
        let surface = DragSurface::new();
        let (x, y) = scales(2);
        let mut binding = BarDragger::new(vec![0.5, 0.5], x, y)
            .attach(&surface, frame(2))
            .unwrap();

        let moved = ScreenRect::from_origin_size(ScreenPoint::new(0.0, 0.0), 400.0, 200.0);
        let x = BandScale::new(2, 0.0, 400.0).unwrap();
        let y = ContinuousScale::linear(Range::unit(), 200.0, 0.0).unwrap();
        binding.relayout(moved, x, y).unwrap();

        assert_eq!(surface.len(), 2);
        surface.pointer_down(ScreenPoint::new(300.0, 150.0));
        assert_eq!(binding.dragging_index(), Some(1));
        surface.pointer_move(ScreenPoint::new(300.0, 40.0)).unwrap();
        assert_close(&binding.values(), &[0.2, 0.8]);
    }

    #[test]
    fn set_values_checks_length() {
        let surface = DragSurface::new();
        let (x, y) = scales(2);
        let binding = BarDragger::new(vec![0.5, 0.5], x, y)
            .attach(&surface, frame(2))
            .unwrap();
        assert!(binding.set_values(vec![1.0]).is_err());
        binding.set_values(vec![0.1, 0.9]).unwrap();
        assert_eq!(binding.values(), vec![0.1, 0.9]);
        assert_eq!(binding.geometry().unwrap()[1].value, 0.9);
    }
}
