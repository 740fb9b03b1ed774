//! Chart Viewer Widget
//! Central area showing the chart, doubling as the drop target for files.

use crate::charts::{TimeSeriesChart, ViewController};
use egui::{Color32, RichText};

const MIN_CHART_HEIGHT: f32 = 150.0;
const DROP_HIGHLIGHT: Color32 = Color32::from_rgb(100, 149, 237);

/// Draws whatever chart the view controller owns.
pub struct ChartViewer {
    width_fraction: f32,
    height_fraction: f32,
}

impl ChartViewer {
    pub fn new(width_fraction: f32, height_fraction: f32) -> Self {
        Self {
            width_fraction: width_fraction.clamp(0.1, 1.0),
            height_fraction: height_fraction.clamp(0.1, 1.0),
        }
    }

    /// Draw the chart area. `hovering` is true while files are dragged over the window.
    pub fn show(
        &self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        view: &mut ViewController<TimeSeriesChart>,
        hovering: bool,
    ) {
        if hovering {
            ui.painter().rect_stroke(
                ui.max_rect().shrink(4.0),
                8.0,
                egui::Stroke::new(3.0, DROP_HIGHLIGHT),
            );
        }

        let Some(chart) = view.chart_mut() else {
            ui.centered_and_justified(|ui| {
                let text = if hovering {
                    "Release to load file"
                } else {
                    "No Data\nBrowse for a file or drop one here"
                };
                ui.label(RichText::new(text).size(20.0));
            });
            return;
        };

        let screen = ctx.screen_rect();
        let width = ui.available_width().min(screen.width() * self.width_fraction);
        let height = (screen.height() * self.height_fraction).max(MIN_CHART_HEIGHT);

        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            chart.show(ui, width, height);
            ui.label(
                RichText::new("Drag to pan, scroll to zoom, double-click to fit")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
    }
}
