//! Rectangular clamp bounds for raw drag coordinates.

use crate::geom::ScreenPoint;

/// Optional axis-aligned bounds applied to every drag tick.
///
/// Each bound is independent; a missing bound leaves that side open. When a
/// caller supplies `min > max` on an axis the minimum wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConstraintRect {
    /// Smallest allowed x.
    pub min_x: Option<f32>,
    /// Largest allowed x.
    pub max_x: Option<f32>,
    /// Smallest allowed y.
    pub min_y: Option<f32>,
    /// Largest allowed y.
    pub max_y: Option<f32>,
}

impl ConstraintRect {
    /// Unconstrained bounds.
    pub fn none() -> Self {
        Self::default()
    }

    /// Constrain x to `[min, max]`.
    pub fn with_x(mut self, min: f32, max: f32) -> Self {
        self.min_x = Some(min);
        self.max_x = Some(max);
        self
    }

    /// Constrain y to `[min, max]`.
    pub fn with_y(mut self, min: f32, max: f32) -> Self {
        self.min_y = Some(min);
        self.max_y = Some(max);
        self
    }

    /// Check whether no bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min_x.is_none() && self.max_x.is_none() && self.min_y.is_none() && self.max_y.is_none()
    }

    /// Clamp a point into the bounds, each axis independently.
    pub fn clamp(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            clamp_axis(point.x, self.min_x, self.max_x),
            clamp_axis(point.y, self.min_y, self.max_y),
        )
    }
}

// Max is applied first so the min bound dominates when the two cross.
fn clamp_axis(value: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let mut value = value;
    if let Some(max) = max {
        value = value.min(max);
    }
    if let Some(min) = min {
        value = value.max(min);
    }
    value
}
