//! Viewer configuration, read from an optional JSON file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "HRPLOT_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub chart: ChartOptions,
    pub view: ViewOptions,
    pub export: ExportOptions,
}

/// Interactive chart appearance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub y_label: String,
    /// Fixed y-axis range; `None` fits the data.
    pub value_range: Option<[f64; 2]>,
    pub draw_points: bool,
    pub line_width: f32,
    /// Chart size relative to the window.
    pub width_fraction: f32,
    pub height_fraction: f32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            y_label: "HR / bpm".to_string(),
            value_range: Some([0.0, 200.0]),
            draw_points: true,
            line_width: 1.5,
            width_fraction: 0.8,
            height_fraction: 0.25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub pan_fraction: f64,
    /// Keep panning inside the data extremes.
    pub clamp_pan: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            pan_fraction: crate::charts::DEFAULT_PAN_FRACTION,
            clamp_pan: false,
        }
    }
}

/// Static PNG export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub open_after_export: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            title: "Heartrate".to_string(),
            x_label: "Date/time".to_string(),
            y_label: "HR/BPM".to_string(),
            open_after_export: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `$HRPLOT_CONFIG`, falling back to defaults on any error.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_path(Path::new(&path)) {
            Ok(config) => {
                info!(path = ?path, "loaded config");
                config
            }
            Err(e) => {
                warn!("using default config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_heart_rate_view() {
        let config = ViewerConfig::default();
        assert_eq!(config.chart.value_range, Some([0.0, 200.0]));
        assert_eq!(config.chart.y_label, "HR / bpm");
        assert!(config.chart.draw_points);
        assert_eq!(config.view.pan_fraction, 0.25);
        assert!(!config.view.clamp_pan);
        assert_eq!(config.export.title, "Heartrate");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"view": {"clamp_pan": true}, "chart": {"value_range": null}}"#)
                .unwrap();
        assert!(config.view.clamp_pan);
        assert_eq!(config.view.pan_fraction, 0.25);
        assert_eq!(config.chart.value_range, None);
        assert_eq!(config.chart.y_label, "HR / bpm");
        assert_eq!(config.export.width, 1200);
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let err = ViewerConfig::from_path(Path::new("/nonexistent/hrplot.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
