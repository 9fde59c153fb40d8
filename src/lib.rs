//! gpui_dragvalue bridges pointer-drag gestures to domain-value state.
//! The crate targets interactive statistics charts: draggable value handles
//! on an axis and draggable probability bars that keep summing to one.

#![forbid(unsafe_code)]

pub mod axis;
pub mod bars;
pub mod constraint;
pub mod drag;
pub mod error;
pub mod geom;
pub mod range;
pub mod redistribute;
pub mod render;
pub mod style;
pub mod surface;
pub mod value_drag;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{Axis, AxisFormatter, AxisScale, Band, BandScale, ContinuousScale, ScaleKind};
pub use bars::{BarDragBinding, BarDragger, BarGeometry, layout_bars};
pub use constraint::ConstraintRect;
pub use drag::{DragEvent, DragOptions, DragPhase, DragSession, DragTracker};
pub use error::DragError;
pub use geom::{ScreenPoint, ScreenRect};
pub use range::Range;
pub use redistribute::{
    Proportional, RedistributePolicy, SUM_TOLERANCE, redistribute_proportional, sums_to_one,
};
pub use render::{Color, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle};
pub use style::Theme;
pub use surface::{DragBinding, DragSurface, HandleId};
pub use value_drag::{SharedValue, ValueDragBinding, ValueDragger};

#[cfg(feature = "gpui")]
pub use gpui_backend::{DistributionViewConfig, GpuiDistributionView};
