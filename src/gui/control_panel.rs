//! Control Panel Widget
//! Left side panel with file selection, view buttons and the status line.

use crate::charts::{draw_summary_table, format_datetime, ChartHandle, PanDirection, TimeSeriesChart};
use chrono::Local;
use egui::{Color32, RichText};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// The message line under the controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// Left side control panel.
#[derive(Default)]
pub struct ControlPanel {
    /// Name of the last file read successfully.
    pub file_name: Option<String>,
    pub message: Option<Message>,
    pub is_loading: bool,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            kind: MessageKind::Error,
        });
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            kind: MessageKind::Info,
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, chart: Option<&TimeSeriesChart>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let has_chart = chart.is_some();

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("❤ HR Plot")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== File Section =====
        ui.label(RichText::new("📁 Data File").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (name, color) = match &self.file_name {
                        Some(name) => (name.as_str(), ui.visuals().strong_text_color()),
                        None => ("No file selected", Color32::GRAY),
                    };
                    ui.label(RichText::new(name).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.is_loading, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseFile;
                            }
                        });
                    });
                });
            });
        ui.label(
            RichText::new("…or drop a file onto the window")
                .size(11.0)
                .color(Color32::GRAY),
        );
        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Reading file...");
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Section =====
        ui.label(RichText::new("🔍 View").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(has_chart, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⏴ left").on_hover_text("Pan left").clicked() {
                    action = ControlPanelAction::Pan(PanDirection::Left);
                }
                if ui.button("full").on_hover_text("Show all data").clicked() {
                    action = ControlPanelAction::ResetView;
                }
                if ui.button("right ⏵").on_hover_text("Pan right").clicked() {
                    action = ControlPanelAction::Pan(PanDirection::Right);
                }
            });

            ui.add_space(8.0);
            if ui.button("🖼 Export PNG").clicked() {
                action = ControlPanelAction::ExportPng;
            }
        });

        if let Some(chart) = chart {
            let window = chart.visible_range();
            ui.add_space(10.0);
            egui::Grid::new("visible_window")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("From:");
                    ui.label(format_datetime(window.start, &Local));
                    ui.end_row();
                    ui.label("To:");
                    ui.label(format_datetime(window.end, &Local));
                    ui.end_row();
                    ui.label("Points:");
                    ui.label(chart.series().len().to_string());
                    ui.end_row();
                });

            if let Some(summary) = chart.visible_summary() {
                ui.add_space(8.0);
                draw_summary_table(ui, &summary);
            }
        }

        // ===== Message =====
        if let Some(message) = &self.message {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(5.0);
            let color = match message.kind {
                MessageKind::Error => ERROR_COLOR,
                MessageKind::Info => OK_COLOR,
            };
            ui.label(RichText::new(&message.text).size(12.0).color(color));
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    ResetView,
    Pan(PanDirection),
    ExportPng,
}
