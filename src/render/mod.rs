//! Rendering primitives for draggable charts.
//!
//! These types are backend-agnostic and are used by render backends (such as the
//! GPUI backend) to describe how bars and markers should be drawn.

use crate::bars::BarGeometry;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::style::Theme;

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
        }
    }
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// A single draw instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text.
    Text {
        /// Top-left text position.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

/// Emit one filled rectangle per bar, plus value labels when `label_size` is
/// set. Bar geometry is relative to `origin`.
pub fn build_bar_commands(
    bars: &[BarGeometry],
    origin: ScreenPoint,
    theme: &Theme,
    active: Option<usize>,
    label_size: Option<f32>,
    out: &mut RenderList,
) {
    for bar in bars {
        let fill = if active == Some(bar.index) {
            theme.bar_active
        } else {
            theme.bar
        };
        let rect = bar.rect.translate(origin);
        out.push(RenderCommand::Rect {
            rect,
            style: RectStyle {
                fill,
                stroke: fill,
                stroke_width: 0.0,
            },
        });
        if let Some(size) = label_size {
            out.push(RenderCommand::Text {
                position: ScreenPoint::new(rect.min.x + 2.0, rect.min.y - size * 1.4),
                text: bar.label.clone(),
                style: TextStyle {
                    color: theme.label,
                    size,
                },
            });
        }
    }
}

/// Emit a horizontal line across `frame` at local height `y`.
pub fn build_horizontal_line(frame: ScreenRect, y: f32, style: LineStyle, out: &mut RenderList) {
    let y = frame.min.y + y;
    out.push(RenderCommand::LineSegments {
        segments: vec![LineSegment::new(
            ScreenPoint::new(frame.min.x, y),
            ScreenPoint::new(frame.max.x, y),
        )],
        style,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(index: usize, rect: ScreenRect) -> BarGeometry {
        BarGeometry {
            index,
            rect,
            value: 0.5,
            label: "0.50".to_string(),
        }
    }

    #[test]
    fn bars_are_translated_and_highlighted() {
        let theme = Theme::light();
        let bars = [
            bar(0, ScreenRect::from_origin_size(ScreenPoint::new(0.0, 50.0), 10.0, 50.0)),
            bar(1, ScreenRect::from_origin_size(ScreenPoint::new(20.0, 50.0), 10.0, 50.0)),
        ];
        let mut list = RenderList::new();
        build_bar_commands(&bars, ScreenPoint::new(5.0, 5.0), &theme, Some(1), None, &mut list);

        assert_eq!(list.commands().len(), 2);
        match &list.commands()[1] {
            RenderCommand::Rect { rect, style } => {
                assert_eq!(rect.min, ScreenPoint::new(25.0, 55.0));
                assert_eq!(style.fill, theme.bar_active);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn labels_follow_bars() {
        let bars = [bar(0, ScreenRect::from_origin_size(ScreenPoint::new(0.0, 40.0), 10.0, 60.0))];
        let mut list = RenderList::new();
        let origin = ScreenPoint::default();
        build_bar_commands(&bars, origin, &Theme::dark(), None, Some(10.0), &mut list);
        assert!(matches!(
            &list.commands()[1],
            RenderCommand::Text { text, .. } if text == "0.50"
        ));
    }

    #[test]
    fn horizontal_line_spans_frame() {
        let frame = ScreenRect::from_origin_size(ScreenPoint::new(10.0, 20.0), 100.0, 50.0);
        let mut list = RenderList::new();
        build_horizontal_line(frame, 25.0, LineStyle::default(), &mut list);
        let RenderCommand::LineSegments { segments, .. } = &list.commands()[0] else {
            panic!("expected a line");
        };
        assert_eq!(segments[0].start, ScreenPoint::new(10.0, 45.0));
        assert_eq!(segments[0].end, ScreenPoint::new(110.0, 45.0));
    }
}
