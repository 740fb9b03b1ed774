//! Summary statistics for the samples inside the visible window.

use crate::charts::ViewWindow;
use crate::data::TimeSeries;
use statrs::statistics::{Data, Median, Statistics};

/// Descriptive statistics of the values in one time window.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; NaN with fewer than two samples.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesSummary {
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = Statistics::mean(values.iter());
        let std = Statistics::std_dev(values.iter());
        let min = Statistics::min(values.iter());
        let max = Statistics::max(values.iter());
        let median = Data::new(values).median();

        Some(Self {
            count,
            mean,
            median,
            std,
            min,
            max,
        })
    }

    /// Summarize the points of `series` whose time lies in `window`.
    pub fn for_window(series: &TimeSeries, window: ViewWindow) -> Option<Self> {
        Self::from_values(series.values_in(window))
    }
}
