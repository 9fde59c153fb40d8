use std::rc::Rc;

use tracing::{error, trace};

use crate::axis::{Axis, AxisScale, BandScale, ContinuousScale};
use crate::bars::{BarDragger, BarGeometry};
use crate::error::DragError;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::range::Range;
use crate::render::{
    LineStyle, RectStyle, RenderCommand, RenderList, TextStyle, build_bar_commands,
    build_horizontal_line,
};
use crate::surface::DragSurface;
use crate::value_drag::ValueDragger;

use super::config::DistributionViewConfig;
use super::state::ViewState;

#[derive(Debug, Clone)]
pub(crate) struct DistributionFrame {
    pub(crate) render: RenderList,
}

pub(crate) fn build_frame(
    state: &mut ViewState,
    surface: &DragSurface,
    config: &DistributionViewConfig,
    bounds: ScreenRect,
) -> DistributionFrame {
    let mut render = RenderList::new();
    if bounds.width() <= 1.0 || bounds.height() <= 1.0 {
        return DistributionFrame { render };
    }
    let theme = &config.theme;
    render.push(RenderCommand::Rect {
        rect: bounds,
        style: RectStyle {
            fill: theme.background,
            stroke: theme.background,
            stroke_width: 0.0,
        },
    });

    let padded = bounds.inset(config.padding_px);
    let top = (padded.min.y + config.label_gutter_px).min(padded.max.y - 1.0);
    let plot = ScreenRect::new(ScreenPoint::new(padded.min.x, top), padded.max);

    if let Err(err) = sync_bindings(state, surface, config, plot) {
        error!(%err, "failed to lay out draggable bars");
        return DistributionFrame { render };
    }
    let Some(bars) = state.bars.as_ref() else {
        return DistributionFrame { render };
    };

    let dragging = bars.dragging_index();
    if dragging.is_none() {
        state.preview.replace(None);
    }
    let preview = state.preview.borrow().clone();
    let geometry: Vec<BarGeometry> = match preview {
        Some(preview) => preview,
        None => match bars.geometry() {
            Ok(geometry) => geometry,
            Err(err) => {
                error!(%err, "failed to compute bar geometry");
                return DistributionFrame { render };
            }
        },
    };

    let label_size = config.show_labels.then_some(config.label_size);
    build_bar_commands(&geometry, plot.min, theme, dragging, label_size, &mut render);
    build_horizontal_line(
        plot,
        plot.height(),
        LineStyle {
            color: theme.axis,
            width: 1.0,
        },
        &mut render,
    );

    if let Some(marker) = state.marker.as_ref() {
        let y_scale = vertical_scale(plot);
        if let Some(y) = y_scale.and_then(|scale| scale.forward(marker.value())) {
            build_horizontal_line(
                plot,
                y,
                LineStyle {
                    color: theme.marker,
                    width: if marker.is_dragging() { 3.0 } else { 2.0 },
                },
                &mut render,
            );
            if config.show_labels {
                render.push(RenderCommand::Text {
                    position: ScreenPoint::new(
                        plot.max.x - 48.0,
                        plot.min.y + y - config.label_size * 1.4,
                    ),
                    text: config.formatter.format(marker.value()),
                    style: TextStyle {
                        color: theme.marker,
                        size: config.label_size,
                    },
                });
            }
        }
    }

    DistributionFrame { render }
}

fn vertical_scale(plot: ScreenRect) -> Option<ContinuousScale> {
    ContinuousScale::linear(Range::unit(), plot.height(), 0.0)
}

// Attach bindings on first layout and keep them in step with the plot rect.
fn sync_bindings(
    state: &mut ViewState,
    surface: &DragSurface,
    config: &DistributionViewConfig,
    plot: ScreenRect,
) -> Result<(), DragError> {
    let count = state.committed.borrow().len();
    let x_scale = BandScale::new(count, 0.0, plot.width())
        .ok_or(DragError::EmptyValues)?
        .with_padding(config.bar_padding);
    let y_scale = vertical_scale(plot).ok_or(DragError::Unmappable(0.0))?;
    let layout_changed = state.plot_rect != Some(plot);

    match state.bars.as_mut() {
        None => {
            let committed = Rc::clone(&state.committed);
            let preview = Rc::clone(&state.preview);
            let listener = Rc::clone(&state.listener);
            let values = committed.borrow().clone();
            let binding = BarDragger::new(values, x_scale, y_scale)
                .formatter(config.formatter.clone())
                .preview(move |bars| {
                    preview.replace(Some(bars.to_vec()));
                })
                .on_change(move |values| {
                    committed.replace(values.to_vec());
                    if let Some(listener) = listener.borrow_mut().as_mut() {
                        listener(values);
                    }
                })
                .attach(surface, plot)?;
            state.bars = Some(binding);
        }
        Some(bars) if layout_changed => {
            trace!(width = plot.width(), height = plot.height(), "relayout bars");
            bars.relayout(plot, x_scale, y_scale)?;
        }
        Some(_) => {}
    }

    if let Some(initial) = state.marker_value {
        match state.marker.as_mut() {
            None => {
                let binding = ValueDragger::new(initial, y_scale)
                    .axis(Axis::Y)
                    .bounds(Range::unit())
                    .on_change(|value| trace!(value, "marker moved"))
                    .attach(surface, marker_hit(plot, &y_scale, initial, config), plot)?;
                state.marker = Some(binding);
            }
            Some(marker) if layout_changed => {
                let value = marker.value();
                marker.reattach(
                    ValueDragger::new(value, y_scale)
                        .axis(Axis::Y)
                        .bounds(Range::unit())
                        .on_change(|value| trace!(value, "marker moved")),
                )?;
                marker.set_frame(plot);
            }
            Some(_) => {}
        }
    }

    if let Some(marker) = state.marker.as_ref() {
        marker.set_hit_rect(marker_hit(plot, &y_scale, marker.value(), config));
    }
    state.plot_rect = Some(plot);
    Ok(())
}

fn marker_hit(
    plot: ScreenRect,
    y_scale: &ContinuousScale,
    value: f64,
    config: &DistributionViewConfig,
) -> ScreenRect {
    let y = y_scale.forward(value).unwrap_or(0.0);
    ScreenRect::new(
        ScreenPoint::new(plot.min.x, plot.min.y + y),
        ScreenPoint::new(plot.max.x, plot.min.y + y),
    )
    .inflate(0.0, config.marker_hit_px)
}
