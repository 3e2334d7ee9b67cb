//! Plotters-powered result chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`,
//! sharing the drawing routine with the SVG export.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{ChartSeries, ChartStyle, draw_chart};

/// Render-only chart; series and bounds are computed outside the render call.
pub struct ResultChart<'a> {
    pub series: &'a ChartSeries,
}

impl<'a> Widget for ResultChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.series.x_bounds;
        let [y0, y1] = self.series.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let series = self.series;
        let widget = widget_fn(move |root| {
            draw_chart(&root, series, &ChartStyle::terminal()).map_err(|e| e.to_string().into())
        });

        widget.render(area, buf);
    }
}
