//! Plotters rendering of the main result chart.
//!
//! The same drawing routine backs two outputs:
//! - an SVG file (`cond analyze --chart out.svg`)
//! - the interactive terminal view (via `plotters-ratatui-backend`)
//!
//! Series and bounds are computed up front in `ChartSeries`, so drawing stays
//! a pure function of data + style.

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::AnalysisReport;
use crate::error::AppError;
use crate::math::polyval;
use crate::plot::ascii::{ErrorPoint, error_points_kj, pad_range};

pub const X_LABEL: &str = "1/er - 1";
pub const Y_LABEL: &str = "kJ/mol";

/// Data to draw, in plot units (kJ/mol).
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub points: Vec<ErrorPoint>,
    /// Fitted line sampled across `x_bounds`.
    pub line: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartSeries {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let points = error_points_kj(report);
        let coefficients = [report.fit.slope / 1000.0, report.fit.intercept / 1000.0];

        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &points {
            x0 = x0.min(p.x);
            x1 = x1.max(p.x);
        }
        if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
            x0 = -1.0;
            x1 = 0.0;
        }
        let (x0, x1) = pad_range(x0, x1, 0.05);

        let n = 100usize;
        let line: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let u = i as f64 / (n as f64 - 1.0);
                let x = x0 + u * (x1 - x0);
                (x, polyval(&coefficients, x))
            })
            .collect();

        let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &points {
            y0 = y0.min(p.y - p.err);
            y1 = y1.max(p.y + p.err);
        }
        for &(_, y) in &line {
            y0 = y0.min(y);
            y1 = y1.max(y);
        }
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            y0 = 0.0;
            y1 = 1.0;
        }
        let (y0, y1) = pad_range(y0, y1, 0.05);

        Self {
            points,
            line,
            x_bounds: [x0, x1],
            y_bounds: [y0, y1],
        }
    }
}

/// Colors and sizes for one output medium.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub background: Option<RGBColor>,
    pub foreground: RGBColor,
    pub line: RGBColor,
    pub point: RGBColor,
    pub bar: RGBColor,
    pub font_size: u32,
    pub margin: u32,
    pub left_label_area: u32,
    pub bottom_label_area: u32,
    pub caption: Option<String>,
    /// Draw points as filled circles; otherwise as single pixels.
    ///
    /// The ratatui backend maps circle radii incorrectly (pixel radius ->
    /// normalized canvas units), so the terminal uses pixels.
    pub circles: bool,
    pub cap_width: u32,
}

impl ChartStyle {
    pub fn svg() -> Self {
        Self {
            background: Some(WHITE),
            foreground: BLACK,
            line: RGBColor(31, 119, 180),
            point: RGBColor(31, 119, 180),
            bar: BLACK,
            font_size: 16,
            margin: 20,
            left_label_area: 60,
            bottom_label_area: 45,
            caption: Some("dG0 vs 1/er - 1".to_string()),
            circles: true,
            cap_width: 8,
        }
    }

    pub fn terminal() -> Self {
        Self {
            background: None,
            foreground: WHITE,
            line: RGBColor(0, 255, 255),
            point: RGBColor(0, 255, 0),
            bar: RGBColor(255, 255, 0),
            font_size: 10,
            margin: 1,
            left_label_area: 6,
            bottom_label_area: 3,
            caption: None,
            circles: false,
            cap_width: 1,
        }
    }
}

/// Draw error bars, points and the fitted line onto any Plotters area.
pub fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &ChartSeries,
    style: &ChartStyle,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let [x0, x1] = series.x_bounds;
    let [y0, y1] = series.y_bounds;

    if let Some(bg) = style.background {
        root.fill(&bg)?;
    }

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(style.margin)
        .set_label_area_size(LabelAreaPosition::Left, style.left_label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, style.bottom_label_area);
    if let Some(caption) = &style.caption {
        builder.caption(caption, ("sans-serif", style.font_size + 4).into_font().color(&style.foreground));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&|v| format!("{v:.3}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", style.font_size).into_font().color(&style.foreground))
        .axis_style(&style.foreground)
        .bold_line_style(&style.foreground)
        .draw()?;

    // 1) Fitted line.
    chart.draw_series(LineSeries::new(series.line.iter().copied(), &style.line))?;

    // 2) Error bars (±1 MC standard error).
    chart.draw_series(series.points.iter().map(|p| {
        ErrorBar::new_vertical(p.x, p.y - p.err, p.y, p.y + p.err, style.bar.stroke_width(1), style.cap_width)
    }))?;

    // 3) Measured values on top.
    if style.circles {
        chart.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new((p.x, p.y), 4, style.point.filled())),
        )?;
    } else {
        chart.draw_series(series.points.iter().map(|p| Pixel::new((p.x, p.y), style.point)))?;
    }

    Ok(())
}

/// Write the result chart as an SVG file.
pub fn write_svg_chart(path: &Path, report: &AnalysisReport, size: (u32, u32)) -> Result<(), AppError> {
    let series = ChartSeries::from_report(report);
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_chart(&root, &series, &ChartStyle::svg())
        .map_err(|e| AppError::input(format!("Failed to draw chart '{}': {e}", path.display())))?;
    root.present()
        .map_err(|e| AppError::input(format!("Failed to write chart '{}': {e}", path.display())))?;
    Ok(())
}
