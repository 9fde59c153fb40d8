//! Geometric primitives in screen space.
//!
//! All drag coordinates are logical pixels. Domain values live in `f64` and
//! never appear here.

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Express this point relative to `origin`.
    pub fn relative_to(self, origin: ScreenPoint) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }

    /// Shift this point by `offset`.
    pub fn offset_by(self, offset: ScreenPoint) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub const fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(origin: ScreenPoint, width: f32, height: f32) -> Self {
        Self::new(
            origin,
            ScreenPoint::new(origin.x + width, origin.y + height),
        )
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Translate the rectangle by `offset`.
    pub fn translate(&self, offset: ScreenPoint) -> Self {
        Self::new(self.min.offset_by(offset), self.max.offset_by(offset))
    }

    /// Grow the rectangle on every side.
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x - dx, self.min.y - dy),
            ScreenPoint::new(self.max.x + dx, self.max.y + dy),
        )
    }

    /// Shrink the rectangle by `padding` on every side, keeping at least a
    /// single pixel of extent.
    pub fn inset(&self, padding: f32) -> Self {
        let min = ScreenPoint::new(self.min.x + padding, self.min.y + padding);
        let max = ScreenPoint::new(
            (self.max.x - padding).max(min.x + 1.0),
            (self.max.y - padding).max(min.y + 1.0),
        );
        Self::new(min, max)
    }
}
