//! Chart Plotter Module
//! Interactive time-series chart using egui_plot.

use crate::charts::{ChartHandle, ViewWindow};
use crate::config::ChartOptions;
use crate::data::{parse_series, ParseError, TimeSeries};
use crate::stats::SeriesSummary;
use chrono::{DateTime, Local, TimeZone};
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Points};

pub const LINE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const POINT_COLOR: Color32 = Color32::from_rgb(41, 128, 185);

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Format a millisecond timestamp for an axis whose visible span is `span_ms`.
pub fn format_timestamp<Tz: TimeZone>(ms: f64, span_ms: f64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let fmt = if span_ms < 2.0 * MS_PER_MINUTE {
        "%H:%M:%S%.3f"
    } else if span_ms < MS_PER_DAY {
        "%H:%M:%S"
    } else if span_ms < 60.0 * MS_PER_DAY {
        "%m-%d %H:%M"
    } else {
        "%Y-%m-%d"
    };
    format_with(ms, fmt, tz)
}

/// Full date and time, used for hover labels and exports.
pub fn format_datetime<Tz: TimeZone>(ms: f64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format_with(ms, "%Y-%m-%d %H:%M:%S", tz)
}

fn format_with<Tz: TimeZone>(ms: f64, fmt: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if !ms.is_finite() {
        return String::new();
    }
    DateTime::from_timestamp_millis(ms.round() as i64)
        .map(|dt| dt.with_timezone(tz).format(fmt).to_string())
        .unwrap_or_default()
}

/// The chart the view controller drives.
pub struct TimeSeriesChart {
    series: TimeSeries,
    options: ChartOptions,
    extremes: ViewWindow,
    visible: ViewWindow,
    /// Window to apply on the next frame.
    pending: Option<ViewWindow>,
    /// Fit the y-axis to the data instead of keeping the plot's y bounds.
    fit_y: bool,
}

impl TimeSeriesChart {
    /// Parse `text` and build a chart showing all of it.
    pub fn construct(text: &str, options: ChartOptions) -> Result<Self, ParseError> {
        Self::from_series(parse_series(text)?, options)
    }

    pub fn from_series(series: TimeSeries, options: ChartOptions) -> Result<Self, ParseError> {
        let extremes = series.time_extremes().ok_or(ParseError::NoPoints)?;
        Ok(Self {
            series,
            options,
            extremes,
            visible: extremes,
            pending: Some(extremes),
            fit_y: true,
        })
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Summary of the values in the visible window.
    pub fn visible_summary(&self) -> Option<SeriesSummary> {
        SeriesSummary::for_window(&self.series, self.visible)
    }

    fn y_range(&self, current: Option<&PlotBounds>) -> [f64; 2] {
        if let Some(range) = self.options.value_range {
            return range;
        }
        if let Some(bounds) = current.filter(|_| !self.fit_y) {
            if bounds.is_valid_y() {
                return [bounds.min()[1], bounds.max()[1]];
            }
        }
        match self.series.value_extremes() {
            Some((lo, hi)) => {
                let space = ((hi - lo) * 0.05).max(1.0);
                [lo - space, hi + space]
            }
            None => [0.0, 1.0],
        }
    }

    /// Draw the chart into `ui` with the given size.
    pub fn show(&mut self, ui: &mut egui::Ui, width: f32, height: f32) {
        let y_label = self.options.y_label.clone();
        let fixed_y = self.options.value_range.is_some();

        let mut plot = Plot::new("hr_chart");
        if let Some([lo, hi]) = self.options.value_range {
            // Double-click fit keeps the fixed range too.
            plot = plot.include_y(lo).include_y(hi);
        }

        let response = plot
            .width(width)
            .height(height)
            .y_axis_label(y_label.clone())
            .allow_zoom([true, !fixed_y])
            .allow_drag([true, !fixed_y])
            .allow_scroll([true, false])
            .x_axis_formatter(|mark, range| {
                let span = range.end() - range.start();
                format_timestamp(mark.value, span, &Local)
            })
            .label_formatter(move |_name, value| {
                format!(
                    "{}\n{}: {:.1}",
                    format_datetime(value.x, &Local),
                    y_label,
                    value.y
                )
            })
            .show(ui, |plot_ui| {
                if let Some(window) = self.pending.take() {
                    let current = plot_ui.plot_bounds();
                    let [y_min, y_max] = self.y_range(Some(&current));
                    let (start, end) = if window.span() > 0.0 {
                        (window.start, window.end)
                    } else {
                        (window.start - 1000.0, window.end + 1000.0)
                    };
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [start, y_min],
                        [end, y_max],
                    ));
                    self.fit_y = false;
                }

                let name = self.series.label.clone().unwrap_or_else(|| "value".to_string());
                plot_ui.line(
                    Line::new(PlotPoints::from(self.series.points.clone()))
                        .color(LINE_COLOR)
                        .width(self.options.line_width)
                        .name(&name),
                );
                if self.options.draw_points {
                    plot_ui.points(
                        Points::new(PlotPoints::from(self.series.points.clone()))
                            .radius(2.0)
                            .color(POINT_COLOR)
                            .name(&name),
                    );
                }
            });

        // Keep up with user drag/zoom so the next pan starts from what is shown.
        if self.pending.is_none() {
            let bounds = response.transform.bounds();
            self.visible = ViewWindow::new(bounds.min()[0], bounds.max()[0]);
        }
    }
}

impl ChartHandle for TimeSeriesChart {
    fn full_range(&self) -> ViewWindow {
        self.extremes
    }

    fn visible_range(&self) -> ViewWindow {
        self.visible
    }

    fn set_visible_window(&mut self, window: ViewWindow) {
        self.visible = window;
        self.pending = Some(window);
    }
}

/// Draw the summary grid for the visible window.
pub fn draw_summary_table(ui: &mut egui::Ui, summary: &SeriesSummary) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            egui::Grid::new("visible_summary")
                .striped(true)
                .min_col_width(55.0)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    for header in ["N", "Mean", "Median", "Std", "Min", "Max"] {
                        ui.label(RichText::new(header).strong().size(11.0));
                    }
                    ui.end_row();

                    ui.label(RichText::new(summary.count.to_string()).size(11.0));
                    for v in [
                        summary.mean,
                        summary.median,
                        summary.std,
                        summary.min,
                        summary.max,
                    ] {
                        let text = if v.is_finite() {
                            format!("{:.1}", v)
                        } else {
                            "-".to_string()
                        };
                        ui.label(RichText::new(text).size(11.0));
                    }
                    ui.end_row();
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn chart() -> TimeSeriesChart {
        TimeSeriesChart::construct("1000,60\n2000,70\n5000,65\n", ChartOptions::default()).unwrap()
    }

    #[test]
    fn new_chart_shows_full_extremes() {
        let c = chart();
        assert_eq!(c.full_range(), ViewWindow::new(1000.0, 5000.0));
        assert_eq!(c.visible_range(), c.full_range());
        assert_eq!(c.pending, Some(ViewWindow::new(1000.0, 5000.0)));
    }

    #[test]
    fn set_window_is_visible_before_next_frame() {
        let mut c = chart();
        c.set_visible_window(ViewWindow::new(1500.0, 2500.0));
        assert_eq!(c.visible_range(), ViewWindow::new(1500.0, 2500.0));
        assert_eq!(c.pending, Some(ViewWindow::new(1500.0, 2500.0)));
    }

    #[test]
    fn unparsable_text_builds_no_chart() {
        assert!(TimeSeriesChart::construct("", ChartOptions::default()).is_err());
    }

    #[test]
    fn fixed_value_range_wins_over_data() {
        let c = chart();
        assert_eq!(c.y_range(None), [0.0, 200.0]);

        let mut options = ChartOptions::default();
        options.value_range = None;
        let c = TimeSeriesChart::construct("1000,60\n2000,80\n", options).unwrap();
        assert_eq!(c.y_range(None), [59.0, 81.0]);
    }

    #[test]
    fn fresh_chart_fits_y_to_data_over_default_bounds() {
        let mut options = ChartOptions::default();
        options.value_range = None;
        let mut c = TimeSeriesChart::construct("1000,95\n2000,110\n3000,100\n", options).unwrap();
        // egui_plot's bounds before anything was drawn.
        let default_bounds = PlotBounds::from_min_max([0.0, -0.5], [1.0, 1.5]);
        assert_eq!(c.y_range(Some(&default_bounds)), [94.0, 111.0]);

        // Once the first window is applied, later pans keep the user's y zoom.
        c.fit_y = false;
        let zoomed = PlotBounds::from_min_max([1000.0, 90.0], [3000.0, 120.0]);
        assert_eq!(c.y_range(Some(&zoomed)), [90.0, 120.0]);
    }

    #[test]
    fn visible_summary_follows_window() {
        let mut c = chart();
        c.set_visible_window(ViewWindow::new(1500.0, 5000.0));
        let s = c.visible_summary().unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.min, 65.0);
    }

    #[test]
    fn timestamp_format_depends_on_span() {
        let ms = 1_704_196_800_000.0; // 2024-01-02 12:00:00 UTC
        assert_eq!(format_timestamp(ms, 30_000.0, &Utc), "12:00:00.000");
        assert_eq!(format_timestamp(ms, 3_600_000.0, &Utc), "12:00:00");
        assert_eq!(format_timestamp(ms, 7.0 * MS_PER_DAY, &Utc), "01-02 12:00");
        assert_eq!(format_timestamp(ms, 365.0 * MS_PER_DAY, &Utc), "2024-01-02");
        assert_eq!(format_datetime(ms, &Utc), "2024-01-02 12:00:00");
        assert_eq!(format_datetime(f64::NAN, &Utc), "");
    }
}
