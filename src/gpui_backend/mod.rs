//! GPUI integration for gpui_dragvalue.
//!
//! This module provides a GPUI view that renders a discrete distribution as
//! draggable bars, optionally with a draggable horizontal marker, and routes
//! mouse input through a [`DragSurface`](crate::surface::DragSurface).

mod config;
mod frame;
mod paint;
mod state;
mod view;

pub use config::DistributionViewConfig;
pub use view::GpuiDistributionView;
