use crate::axis::AxisFormatter;
use crate::style::Theme;

/// Configuration for the GPUI distribution view.
#[derive(Debug, Clone)]
pub struct DistributionViewConfig {
    /// Padding around the chart area in pixels.
    pub padding_px: f32,
    /// Extra space above the chart reserved for value labels.
    pub label_gutter_px: f32,
    /// Gap between bars as a fraction of the band step.
    pub bar_padding: f32,
    /// Font size of value labels.
    pub label_size: f32,
    /// Show value labels above bars.
    pub show_labels: bool,
    /// Formatter for value labels.
    pub formatter: AxisFormatter,
    /// Initial value of the horizontal marker; `None` hides it.
    pub marker: Option<f64>,
    /// Half height of the marker grab strip in pixels.
    pub marker_hit_px: f32,
    /// Color theme.
    pub theme: Theme,
}

impl Default for DistributionViewConfig {
    fn default() -> Self {
        Self {
            padding_px: 24.0,
            label_gutter_px: 20.0,
            bar_padding: 0.2,
            label_size: 12.0,
            show_labels: true,
            formatter: AxisFormatter::default(),
            marker: None,
            marker_hit_px: 6.0,
            theme: Theme::default(),
        }
    }
}
