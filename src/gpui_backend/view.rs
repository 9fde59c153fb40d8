use std::cell::RefCell;
use std::rc::Rc;

use gpui::prelude::*;
use gpui::{MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point, Window};
use gpui::{canvas, div};
use tracing::{debug, error, warn};

use crate::error::DragError;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::redistribute::{normalize, uniform};
use crate::surface::DragSurface;

use super::config::DistributionViewConfig;
use super::frame::build_frame;
use super::paint::{paint_frame, to_hsla};
use super::state::ViewState;

/// A GPUI view that edits a discrete probability distribution.
///
/// Each entry is drawn as a bar whose top can be dragged; the other entries
/// are rescaled so the vector keeps summing to one. An optional horizontal
/// marker can be dragged independently.
#[derive(Clone)]
pub struct GpuiDistributionView {
    surface: DragSurface,
    state: Rc<RefCell<ViewState>>,
    config: DistributionViewConfig,
}

impl GpuiDistributionView {
    /// Create a view over `values` using the default
    /// [`DistributionViewConfig`].
    ///
    /// Negative entries are clamped to zero and the vector is normalized.
    pub fn new(values: Vec<f64>) -> Result<Self, DragError> {
        Self::with_config(values, DistributionViewConfig::default())
    }

    /// Create a view with a custom configuration.
    pub fn with_config(
        values: Vec<f64>,
        config: DistributionViewConfig,
    ) -> Result<Self, DragError> {
        let values = prepare(values)?;
        let state = ViewState::new(values, config.marker);
        Ok(Self {
            surface: DragSurface::new(),
            state: Rc::new(RefCell::new(state)),
            config,
        })
    }

    /// Register a listener for committed values.
    ///
    /// The listener runs on every drag tick of a bar.
    pub fn on_change(self, listener: impl FnMut(&[f64]) + 'static) -> Self {
        self.state
            .borrow()
            .listener
            .replace(Some(Box::new(listener)));
        self
    }

    /// The committed distribution.
    pub fn values(&self) -> Vec<f64> {
        self.state.borrow().committed.borrow().clone()
    }

    /// Replace the distribution.
    ///
    /// Any gesture in flight is cancelled and handles are rebuilt on the next
    /// frame.
    pub fn set_values(&mut self, values: Vec<f64>) -> Result<(), DragError> {
        let values = prepare(values)?;
        self.surface.cancel();
        let mut state = self.state.borrow_mut();
        state.detach_all();
        state.committed.replace(values);
        Ok(())
    }

    /// Current marker value, if the marker is enabled.
    pub fn marker(&self) -> Option<f64> {
        self.state.borrow().marker()
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        if let Some(handle) = self.surface.pointer_down(pos) {
            debug!(handle = handle.get(), "distribution drag started");
            cx.notify();
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        if !self.surface.is_dragging() {
            return;
        }
        let pos = screen_point(ev.position);
        if let Err(err) = self.surface.pointer_move(pos) {
            error!(%err, "drag tick failed");
        }
        cx.notify();
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        if self.surface.pointer_up(pos).is_some() {
            cx.notify();
        }
    }
}

impl Render for GpuiDistributionView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = Rc::clone(&self.state);
        let surface = self.surface.clone();
        let config = self.config.clone();

        div()
            .size_full()
            .bg(to_hsla(self.config.theme.background))
            .child(
                canvas(
                    move |bounds, _, _| {
                        let mut state = state.borrow_mut();
                        build_frame(&mut state, &surface, &config, to_screen_rect(bounds))
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
    }
}

fn prepare(mut values: Vec<f64>) -> Result<Vec<f64>, DragError> {
    if values.is_empty() {
        return Err(DragError::EmptyValues);
    }
    for value in &mut values {
        if !value.is_finite() || *value < 0.0 {
            *value = 0.0;
        }
    }
    if !normalize(&mut values) {
        warn!(len = values.len(), "initial distribution has no mass, using uniform");
        values = uniform(values.len());
    }
    Ok(values)
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}

fn to_screen_rect(bounds: gpui::Bounds<Pixels>) -> ScreenRect {
    ScreenRect::new(
        screen_point(bounds.origin),
        screen_point(bounds.bottom_right()),
    )
}
