//! View Controller Module
//! Owns the chart handle and applies the reset and pan transforms to its time window.

use tracing::debug;

/// Fraction of the visible span moved by one pan step.
pub const DEFAULT_PAN_FRACTION: f64 = 0.25;

/// Time-axis bounds in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub start: f64,
    pub end: f64,
}

impl ViewWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn shifted(&self, by: f64) -> Self {
        Self::new(self.start + by, self.end + by)
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Slide the window back inside `extremes`, keeping its width.
    /// A window wider than the extremes collapses onto them.
    pub fn clamped_to(&self, extremes: ViewWindow) -> Self {
        if self.span() >= extremes.span() {
            return extremes;
        }
        if self.start < extremes.start {
            self.shifted(extremes.start - self.start)
        } else if self.end > extremes.end {
            self.shifted(extremes.end - self.end)
        } else {
            *self
        }
    }
}

impl From<[f64; 2]> for ViewWindow {
    fn from(range: [f64; 2]) -> Self {
        Self::new(range[0], range[1])
    }
}

/// Pan direction along the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
}

impl PanDirection {
    pub fn sign(self) -> f64 {
        match self {
            PanDirection::Left => -1.0,
            PanDirection::Right => 1.0,
        }
    }
}

/// Shift `window` by `fraction` of its own span in `direction`.
pub fn pan_window(window: ViewWindow, direction: PanDirection, fraction: f64) -> ViewWindow {
    let scale = window.span();
    window.shifted(scale * fraction * direction.sign())
}

/// What the view controller needs from a chart.
pub trait ChartHandle {
    /// Extremes of the loaded data on the time axis.
    fn full_range(&self) -> ViewWindow;
    /// The window currently shown.
    fn visible_range(&self) -> ViewWindow;
    fn set_visible_window(&mut self, window: ViewWindow);
}

/// Owns the single chart instance and drives its visible window.
pub struct ViewController<C> {
    chart: Option<C>,
    pan_fraction: f64,
    clamp_pan: bool,
}

impl<C> Default for ViewController<C> {
    fn default() -> Self {
        Self {
            chart: None,
            pan_fraction: DEFAULT_PAN_FRACTION,
            clamp_pan: false,
        }
    }
}

impl<C: ChartHandle> ViewController<C> {
    pub fn new(pan_fraction: f64, clamp_pan: bool) -> Self {
        Self {
            chart: None,
            pan_fraction,
            clamp_pan,
        }
    }

    /// Replace the current chart, returning the previous one.
    pub fn attach(&mut self, chart: C) -> Option<C> {
        self.chart.replace(chart)
    }

    pub fn chart(&self) -> Option<&C> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut C> {
        self.chart.as_mut()
    }

    #[cfg(test)]
    pub fn has_chart(&self) -> bool {
        self.chart.is_some()
    }

    /// Show the full data extremes.
    pub fn reset(&mut self) -> Option<ViewWindow> {
        let chart = self.chart.as_mut()?;
        let window = chart.full_range();
        chart.set_visible_window(window);
        debug!(start = window.start, end = window.end, "view reset");
        Some(window)
    }

    /// Move the visible window by one pan step.
    pub fn pan(&mut self, direction: PanDirection) -> Option<ViewWindow> {
        let chart = self.chart.as_mut()?;
        let mut window = pan_window(chart.visible_range(), direction, self.pan_fraction);
        if self.clamp_pan {
            window = window.clamped_to(chart.full_range());
        }
        chart.set_visible_window(window);
        debug!(?direction, start = window.start, end = window.end, "view panned");
        Some(window)
    }
}
