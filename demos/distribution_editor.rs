use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use gpui_dragvalue::{AxisFormatter, DistributionViewConfig, GpuiDistributionView, Theme};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(640.0), px(420.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let config = DistributionViewConfig {
                theme: Theme::dark(),
                formatter: AxisFormatter::Percent,
                marker: Some(0.25),
                ..Default::default()
            };
            let view = GpuiDistributionView::with_config(vec![0.1, 0.2, 0.4, 0.2, 0.1], config)
                .unwrap()
                .on_change(|values| tracing::info!(?values, "distribution changed"));
            cx.new(|_| view)
        })
        .unwrap();
    });
}
