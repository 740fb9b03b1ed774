//! Static Chart Renderer
//! Writes the series as a PNG line plot using plotters.
//!
//! Layout:
//! 1. Title centered on top
//! 2. Date/time x-axis, value y-axis with the configured labels
//! 3. The series as a single line over the chosen time window

use crate::charts::plotter::format_timestamp;
use crate::charts::ViewWindow;
use crate::config::{ChartOptions, ExportOptions};
use crate::data::TimeSeries;
use chrono::Local;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const LINE: RGBColor = RGBColor(31, 119, 180);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to render")]
    NoData,
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the points of `series` inside `window` to a PNG at `path`.
    pub fn render_png(
        series: &TimeSeries,
        window: ViewWindow,
        chart: &ChartOptions,
        export: &ExportOptions,
        path: &Path,
    ) -> Result<(), RenderError> {
        let points = Self::points_in(series, window);
        if points.is_empty() {
            return Err(RenderError::NoData);
        }

        let (x_min, x_max) = Self::x_range(window);
        let (y_min, y_max) = Self::y_range(&points, chart.value_range);
        let span = x_max - x_min;

        let root = BitMapBackend::new(path, (export.width, export.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&export.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .x_desc(export.x_label.as_str())
            .y_desc(export.y_label.as_str())
            .x_labels(6)
            .x_label_formatter(&|x| format_timestamp(*x, span, &Local))
            .draw()
            .map_err(draw_err)?;

        ctx.draw_series(LineSeries::new(
            points.iter().map(|p| (p[0], p[1])),
            LINE.stroke_width(2),
        ))
        .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        info!(path = %path.display(), points = points.len(), "exported chart image");
        Ok(())
    }

    fn points_in(series: &TimeSeries, window: ViewWindow) -> Vec<[f64; 2]> {
        series
            .points
            .iter()
            .filter(|p| window.contains(p[0]))
            .copied()
            .collect()
    }

    fn x_range(window: ViewWindow) -> (f64, f64) {
        if window.span() > 0.0 {
            (window.start, window.end)
        } else {
            (window.start - 1000.0, window.end + 1000.0)
        }
    }

    fn y_range(points: &[[f64; 2]], fixed: Option<[f64; 2]>) -> (f64, f64) {
        if let Some([lo, hi]) = fixed {
            return (lo, hi);
        }
        let lo = points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
        let hi = points.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
        let pad = ((hi - lo) * 0.05).max(1.0);
        (lo - pad, hi + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn series() -> TimeSeries {
        TimeSeries {
            points: vec![[0.0, 60.0], [1000.0, 90.0], [2000.0, 70.0]],
            label: None,
        }
    }

    #[test]
    fn only_points_in_window_are_drawn() {
        let pts = StaticChartRenderer::points_in(&series(), ViewWindow::new(500.0, 2500.0));
        assert_eq!(pts, vec![[1000.0, 90.0], [2000.0, 70.0]]);
    }

    #[test]
    fn y_range_uses_fixed_limits_or_pads_data() {
        let pts = series().points;
        assert_eq!(
            StaticChartRenderer::y_range(&pts, Some([0.0, 200.0])),
            (0.0, 200.0)
        );
        assert_eq!(StaticChartRenderer::y_range(&pts, None), (58.5, 91.5));
    }

    #[test]
    fn empty_window_is_not_rendered() {
        let err = StaticChartRenderer::render_png(
            &series(),
            ViewWindow::new(5000.0, 6000.0),
            &ChartOptions::default(),
            &ExportOptions::default(),
            &PathBuf::from("unused.png"),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::NoData));
    }

    #[test]
    fn zero_width_window_is_widened() {
        assert_eq!(
            StaticChartRenderer::x_range(ViewWindow::new(5.0, 5.0)),
            (-995.0, 1005.0)
        );
    }
}
