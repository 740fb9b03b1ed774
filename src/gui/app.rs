//! HR Plot Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartHandle, PanDirection, StaticChartRenderer, TimeSeriesChart, ViewController};
use crate::config::ViewerConfig;
use crate::data::{FileLoader, FileSource, LoadResult};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use tracing::{error, info, warn};

/// Everything the window reacts to.
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    BrowseFile,
    FileDropped(FileSource),
    ResetView,
    Pan(PanDirection),
    ExportPng,
}

impl ControlPanelAction {
    fn into_event(self) -> Option<ViewerEvent> {
        match self {
            ControlPanelAction::None => None,
            ControlPanelAction::BrowseFile => Some(ViewerEvent::BrowseFile),
            ControlPanelAction::ResetView => Some(ViewerEvent::ResetView),
            ControlPanelAction::Pan(direction) => Some(ViewerEvent::Pan(direction)),
            ControlPanelAction::ExportPng => Some(ViewerEvent::ExportPng),
        }
    }
}

/// Main application window.
pub struct HrPlotApp {
    config: ViewerConfig,
    loader: FileLoader,
    view: ViewController<TimeSeriesChart>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl HrPlotApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        Self::with_config(config)
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            loader: FileLoader::new(),
            view: ViewController::new(config.view.pan_fraction, config.view.clamp_pan),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(
                config.chart.width_fraction,
                config.chart.height_fraction,
            ),
            config,
        }
    }

    pub fn dispatch(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::BrowseFile => self.handle_browse_file(),
            ViewerEvent::FileDropped(source) => self.start_load(source),
            ViewerEvent::ResetView => {
                self.view.reset();
            }
            ViewerEvent::Pan(direction) => {
                self.view.pan(direction);
            }
            ViewerEvent::ExportPng => self.handle_export_png(),
        }
    }

    fn handle_browse_file(&mut self) {
        if self.loader.is_loading() {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &["csv", "tsv", "txt", "dat"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.start_load(FileSource::Path(path));
        }
    }

    fn start_load(&mut self, source: FileSource) {
        info!(file = %source.display_name(), "loading file");
        if self.loader.load(source) {
            self.control_panel.is_loading = true;
        } else {
            warn!("a file is already loading, request ignored");
        }
    }

    /// Check for file loading results
    fn check_load_results(&mut self) {
        if let Some(result) = self.loader.poll() {
            self.handle_load_result(result);
        }
        self.control_panel.is_loading = self.loader.is_loading();
    }

    fn handle_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Complete { name, text } => {
                self.control_panel.file_name = Some(name.clone());
                match TimeSeriesChart::construct(&text, self.config.chart.clone()) {
                    Ok(chart) => {
                        info!(file = %name, points = chart.series().len(), "chart created");
                        self.view.attach(chart);
                        self.control_panel.clear_message();
                    }
                    Err(e) => {
                        warn!(file = %name, error = %e, "could not plot file");
                        self.control_panel
                            .set_error(format!("could not plot {}: {}", name, e));
                    }
                }
            }
            LoadResult::Failed { name, error } => {
                error!(file = %name, error = ?error, "load failed");
                self.control_panel.set_error(error.to_string());
            }
        }
    }

    /// Handle PNG export of the visible window
    fn handle_export_png(&mut self) {
        let Some(chart) = self.view.chart() else {
            self.control_panel.set_error("No chart to export");
            return;
        };

        let default_name = self
            .control_panel
            .file_name
            .as_deref()
            .and_then(|n| n.rsplit_once('.').map(|(stem, _)| stem).or(Some(n)))
            .map(|stem| format!("{}.png", stem))
            .unwrap_or_else(|| "heartrate.png".to_string());

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(default_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_png(
            chart.series(),
            chart.visible_range(),
            chart.options(),
            &self.config.export,
            &output_path,
        ) {
            Ok(()) => {
                self.control_panel
                    .set_info(format!("Exported {}", output_path.display()));
                if self.config.export.open_after_export {
                    if let Err(e) = open::that(&output_path) {
                        warn!(error = %e, "could not open exported image");
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.control_panel.set_error(format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for HrPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.loader.is_loading() {
            ctx.request_repaint();
        }

        // Handle file drop
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(FileSource::from_dropped));
        if let Some(source) = dropped {
            self.dispatch(ViewerEvent::FileDropped(source));
        }
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.view.chart());
                    if let Some(event) = action.into_event() {
                        self.dispatch(event);
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui, &mut self.view, hovering);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ViewWindow;
    use crate::data::LoaderError;
    use crate::gui::control_panel::MessageKind;
    use std::path::PathBuf;

    fn app() -> HrPlotApp {
        HrPlotApp::with_config(ViewerConfig::default())
    }

    fn complete(name: &str, text: &str) -> LoadResult {
        LoadResult::Complete {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    fn read_failure() -> LoadResult {
        LoadResult::Failed {
            name: "gone.tsv".to_string(),
            error: LoaderError::Io {
                path: PathBuf::from("gone.tsv"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            },
        }
    }

    #[test]
    fn loaded_file_name_is_displayed_and_chart_created() {
        let mut app = app();
        app.handle_load_result(complete("attyshrv_heartrate.tsv", "1000\t60\n2000\t62\n"));
        assert_eq!(
            app.control_panel.file_name.as_deref(),
            Some("attyshrv_heartrate.tsv")
        );
        assert!(app.control_panel.message.is_none());
        assert_eq!(
            app.view.chart().unwrap().full_range(),
            ViewWindow::new(1000.0, 2000.0)
        );
    }

    #[test]
    fn failed_read_shows_message_and_creates_no_chart() {
        let mut app = app();
        app.handle_load_result(read_failure());
        let message = app.control_panel.message.clone().unwrap();
        assert_eq!(message.text, "error reading file");
        assert_eq!(message.kind, MessageKind::Error);
        assert!(!app.view.has_chart());
        assert!(app.control_panel.file_name.is_none());
    }

    #[test]
    fn failed_read_leaves_existing_chart_untouched() {
        let mut app = app();
        app.handle_load_result(complete("a.csv", "0,1\n100,2\n"));
        app.dispatch(ViewerEvent::Pan(PanDirection::Right));
        app.handle_load_result(read_failure());

        let chart = app.view.chart().unwrap();
        assert_eq!(chart.full_range(), ViewWindow::new(0.0, 100.0));
        assert_eq!(chart.visible_range(), ViewWindow::new(25.0, 125.0));
        assert_eq!(app.control_panel.file_name.as_deref(), Some("a.csv"));
    }

    #[test]
    fn unplottable_file_reports_and_keeps_name() {
        let mut app = app();
        app.handle_load_result(complete("notes.txt", "hello\n"));
        assert_eq!(app.control_panel.file_name.as_deref(), Some("notes.txt"));
        let message = app.control_panel.message.clone().unwrap();
        assert!(message.text.starts_with("could not plot notes.txt"));
        assert!(!app.view.has_chart());
    }

    #[test]
    fn pan_and_reset_events_drive_the_view() {
        let mut app = app();
        app.handle_load_result(complete("a.csv", "0,1\n50,2\n100,3\n"));

        app.dispatch(ViewerEvent::Pan(PanDirection::Right));
        app.dispatch(ViewerEvent::Pan(PanDirection::Left));
        assert_eq!(
            app.view.chart().unwrap().visible_range(),
            ViewWindow::new(0.0, 100.0)
        );

        app.dispatch(ViewerEvent::Pan(PanDirection::Left));
        app.dispatch(ViewerEvent::Pan(PanDirection::Left));
        app.dispatch(ViewerEvent::ResetView);
        assert_eq!(
            app.view.chart().unwrap().visible_range(),
            ViewWindow::new(0.0, 100.0)
        );
    }

    #[test]
    fn panel_actions_map_to_events() {
        assert!(ControlPanelAction::None.into_event().is_none());
        assert!(matches!(
            ControlPanelAction::Pan(PanDirection::Left).into_event(),
            Some(ViewerEvent::Pan(PanDirection::Left))
        ));
        assert!(matches!(
            ControlPanelAction::ResetView.into_event(),
            Some(ViewerEvent::ResetView)
        ));
    }
}
