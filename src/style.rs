//! Color themes for draggable charts.

use crate::render::Color;

/// Visual theme for draggable charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Background fill.
    pub background: Color,
    /// Baseline and frame strokes.
    pub axis: Color,
    /// Idle bar fill.
    pub bar: Color,
    /// Fill of the bar being dragged.
    pub bar_active: Color,
    /// Value label color.
    pub label: Color,
    /// Marker line color.
    pub marker: Color,
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Light theme.
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            axis: Color::new(0.35, 0.35, 0.38, 1.0),
            bar: Color::new(0.27, 0.51, 0.71, 1.0),
            bar_active: Color::new(0.95, 0.55, 0.2, 1.0),
            label: Color::new(0.1, 0.1, 0.12, 1.0),
            marker: Color::new(0.84, 0.15, 0.16, 1.0),
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::new(0.08, 0.09, 0.11, 1.0),
            axis: Color::new(0.6, 0.62, 0.66, 1.0),
            bar: Color::new(0.2, 0.75, 0.95, 1.0),
            bar_active: Color::new(0.9, 0.65, 0.25, 1.0),
            label: Color::new(0.92, 0.93, 0.95, 1.0),
            marker: Color::new(0.98, 0.4, 0.4, 1.0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
