//! ASCII plotting for terminal output.
//!
//! A fixed-size character grid: no terminal queries, and the same report always
//! renders to the same text, so the output can be snapshot-tested.
//!
//! Glyphs:
//! - measured dG0: `o`
//! - error bars (±1 MC standard error): `|`
//! - fitted line: `-`

use crate::domain::AnalysisReport;
use crate::math::polyval;

/// One plotted measurement with a symmetric error bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorPoint {
    pub x: f64,
    pub y: f64,
    pub err: f64,
}

/// Render `dG0` (kJ/mol) against `1/er - 1` with the fitted line.
pub fn render_ascii_plot(report: &AnalysisReport, width: usize, height: usize) -> String {
    let points = error_points_kj(report);
    let line = [report.fit.slope / 1000.0, report.fit.intercept / 1000.0];
    render_plot(&points, Some(&line), width, height)
}

/// Measurements in kJ/mol, in report order.
pub fn error_points_kj(report: &AnalysisReport) -> Vec<ErrorPoint> {
    report
        .substances
        .iter()
        .map(|s| ErrorPoint {
            x: s.x,
            y: s.dg0 / 1000.0,
            err: s.dg0_sigma / 1000.0,
        })
        .collect()
}

/// Render points with error bars and an optional polynomial (highest power first).
pub fn render_plot(points: &[ErrorPoint], line: Option<&[f64]>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(points).unwrap_or((-1.0, 0.0));
    let curve = line.map(|p| sample_line(p, x_min, x_max, width));

    let (y_min, y_max) = y_range(points, curve.as_deref()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw line first (so bars and points can overlay).
    if let Some(curve) = &curve {
        draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);
    }

    for p in points {
        let col = map_x(p.x, x_min, x_max, width);
        let top = map_y(p.y + p.err, y_min, y_max, height);
        let bottom = map_y(p.y - p.err, y_min, y_max, height);
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[col] = '|';
        }
    }
    for p in points {
        let col = map_x(p.x, x_min, x_max, width);
        let row = map_y(p.y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] (1/er - 1) | y=[{y_min:.2}, {y_max:.2}] kJ/mol\n"
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str("o dG0   | error   - fit\n");

    out
}

fn x_range(points: &[ErrorPoint]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        Some((min_x - 0.5, max_x + 0.5))
    }
}

fn sample_line(coefficients: &[f64], x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, polyval(coefficients, x))
        })
        .collect()
}

fn y_range(points: &[ErrorPoint], curve: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_y = min_y.min(p.y - p.err);
        max_y = max_y.max(p.y + p.err);
    }
    if let Some(curve) = curve {
        for &(_, y) in curve {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

pub(crate) fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
