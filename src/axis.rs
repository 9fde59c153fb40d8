//! Axis selection, scales, and label formatting.
//!
//! A scale is the invertible bridge between a screen coordinate and a domain
//! value. Drag bindings only consume scales; the visualization owns them.

use std::sync::Arc;

use crate::geom::ScreenPoint;
use crate::range::Range;

const MIN_SPAN: f64 = 1e-12;

/// Screen axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Horizontal axis.
    #[default]
    X,
    /// Vertical axis. Screen y grows downward.
    Y,
}

impl Axis {
    /// Pick the coordinate for this axis out of a point.
    pub fn coordinate(self, point: ScreenPoint) -> f32 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }
}

/// An invertible mapping between domain values and screen positions.
pub trait AxisScale {
    /// Map a domain value to a screen position.
    fn forward(&self, value: f64) -> Option<f32>;

    /// Map a screen position back to a domain value.
    fn inverse(&self, position: f32) -> Option<f64>;

    /// The domain covered by the scale.
    fn domain(&self) -> Range;
}

impl<S: AxisScale + ?Sized> AxisScale for Arc<S> {
    fn forward(&self, value: f64) -> Option<f32> {
        (**self).forward(value)
    }

    fn inverse(&self, position: f32) -> Option<f64> {
        (**self).inverse(position)
    }

    fn domain(&self) -> Range {
        (**self).domain()
    }
}

/// Scale type for continuous axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleKind {
    /// Linear scaling.
    #[default]
    Linear,
    /// Base-10 logarithmic scaling.
    Log10,
}

impl ScaleKind {
    /// Map a value into axis space.
    pub fn map_value(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Self::Linear => Some(value),
            Self::Log10 => {
                if value <= 0.0 {
                    None
                } else {
                    Some(value.log10())
                }
            }
        }
    }

    /// Invert a value from axis space back into data space.
    pub fn invert_value(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Self::Linear => Some(value),
            Self::Log10 => Some(10_f64.powf(value)),
        }
    }

    /// Check whether a data range is valid for this scale.
    pub fn is_range_valid(self, range: Range) -> bool {
        if !range.is_finite() {
            return false;
        }
        match self {
            Self::Linear => true,
            Self::Log10 => range.min > 0.0 && range.max > 0.0,
        }
    }
}

/// Continuous scale from a domain interval onto a pixel interval.
///
/// The pixel interval may run backwards (`start > end`), which is how a
/// vertical axis with larger values drawn higher is expressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousScale {
    kind: ScaleKind,
    domain: Range,
    mapped: Range,
    start: f32,
    end: f32,
}

impl ContinuousScale {
    /// Create a scale mapping `domain` onto pixels `start..end`.
    ///
    /// Returns `None` when the domain is invalid for the scale kind or the
    /// pixel interval is empty.
    pub fn new(kind: ScaleKind, domain: Range, start: f32, end: f32) -> Option<Self> {
        if !kind.is_range_valid(domain) || !start.is_finite() || !end.is_finite() {
            return None;
        }
        if start == end {
            return None;
        }
        let min = kind.map_value(domain.min)?;
        let max = kind.map_value(domain.max)?;
        Some(Self {
            kind,
            domain,
            mapped: Range::new(min, max).with_min_span(MIN_SPAN),
            start,
            end,
        })
    }

    /// Create a linear scale.
    pub fn linear(domain: Range, start: f32, end: f32) -> Option<Self> {
        Self::new(ScaleKind::Linear, domain, start, end)
    }

    /// Create a log10 scale.
    pub fn log10(domain: Range, start: f32, end: f32) -> Option<Self> {
        Self::new(ScaleKind::Log10, domain, start, end)
    }

    /// Access the scale kind.
    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// Pixel interval as `(start, end)`.
    pub fn pixel_range(&self) -> (f32, f32) {
        (self.start, self.end)
    }
}

impl AxisScale for ContinuousScale {
    fn forward(&self, value: f64) -> Option<f32> {
        let mapped = self.kind.map_value(value)?;
        let t = self.mapped.fraction_of(mapped);
        let pixels = self.start as f64 + t * (self.end as f64 - self.start as f64);
        Some(pixels as f32)
    }

    fn inverse(&self, position: f32) -> Option<f64> {
        if !position.is_finite() {
            return None;
        }
        let t = (position as f64 - self.start as f64) / (self.end as f64 - self.start as f64);
        self.kind.invert_value(self.mapped.lerp(t))
    }

    fn domain(&self) -> Range {
        self.domain
    }
}

/// Categorical scale with one equal-width band per entry.
///
/// Padding is a fraction of the step applied between bands and at both
/// outer edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f32,
    end: f32,
    padding: f32,
}

/// One band of a [`BandScale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Left edge in pixels.
    pub start: f32,
    /// Band width in pixels.
    pub width: f32,
}

impl Band {
    /// Horizontal center of the band.
    pub fn center(&self) -> f32 {
        self.start + self.width * 0.5
    }
}

impl BandScale {
    /// Create a band scale with `count` bands over pixels `start..end`.
    pub fn new(count: usize, start: f32, end: f32) -> Option<Self> {
        if count == 0 || !start.is_finite() || !end.is_finite() || end <= start {
            return None;
        }
        Some(Self {
            count,
            start,
            end,
            padding: 0.0,
        })
    }

    /// Set the band padding as a fraction of the step, clamped to `[0, 0.95]`.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding.clamp(0.0, 0.95);
        self
    }

    /// Number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f32 {
        let n = self.count as f32;
        (self.end - self.start) / (n - self.padding + self.padding * 2.0).max(1.0)
    }

    /// Width of every band.
    pub fn bandwidth(&self) -> f32 {
        self.step() * (1.0 - self.padding)
    }

    fn first_start(&self) -> f32 {
        let n = self.count as f32;
        let used = self.step() * (n - self.padding);
        self.start + (self.end - self.start - used) * 0.5
    }

    /// The band at `index`.
    pub fn band(&self, index: usize) -> Option<Band> {
        if index >= self.count {
            return None;
        }
        Some(Band {
            start: self.first_start() + self.step() * index as f32,
            width: self.bandwidth(),
        })
    }

    /// The band index under a pixel position, if any.
    pub fn index_at(&self, position: f32) -> Option<usize> {
        if !position.is_finite() {
            return None;
        }
        let offset = position - self.first_start();
        if offset < 0.0 {
            return None;
        }
        let index = (offset / self.step()).floor() as usize;
        let band = self.band(index)?;
        (position <= band.start + band.width).then_some(index)
    }
}

impl AxisScale for BandScale {
    fn forward(&self, value: f64) -> Option<f32> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return None;
        }
        self.band(value as usize).map(|band| band.start)
    }

    fn inverse(&self, position: f32) -> Option<f64> {
        self.index_at(position).map(|index| index as f64)
    }

    fn domain(&self) -> Range {
        Range::new(0.0, (self.count - 1) as f64)
    }
}

/// Formatter for value labels.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// Two decimal places.
    #[default]
    Default,
    /// Percentage with one decimal place.
    Percent,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Default => format!("{value:.2}"),
            Self::Percent => format!("{:.1}%", value * 100.0),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "AxisFormatter::Default"),
            Self::Percent => write!(f, "AxisFormatter::Percent"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}
