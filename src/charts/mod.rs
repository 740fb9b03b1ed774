//! Charts module - interactive chart, view control and static export

mod plotter;
mod renderer;
mod view;

pub use plotter::{draw_summary_table, format_datetime, TimeSeriesChart};
pub use renderer::StaticChartRenderer;
pub use view::{ChartHandle, PanDirection, ViewController, ViewWindow, DEFAULT_PAN_FRACTION};
