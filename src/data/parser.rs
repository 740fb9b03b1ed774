//! Series Parser Module
//! Turns a delimited text blob into a single time series using Polars.
//!
//! The first column is time, the second the value. Time is either a number of
//! milliseconds since the Unix epoch or a date string.

use crate::charts::ViewWindow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::datatypes::TimeUnit;
use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("file contains no data")]
    Empty,
    #[error("expected a time column followed by a value column")]
    MissingValueColumn,
    #[error("no rows with a valid time and value")]
    NoPoints,
    #[error("Failed to read data: {0}")]
    Polars(#[from] PolarsError),
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// A single series of `[time_ms, value]` points sorted by time.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    pub points: Vec<[f64; 2]>,
    /// Value column name, when the input had a header.
    pub label: Option<String>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Extremes of the time axis.
    pub fn time_extremes(&self) -> Option<ViewWindow> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some(ViewWindow::new(first[0], last[0]))
    }

    pub fn value_extremes(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p[1], p[1])),
            Some((lo, hi)) => Some((lo.min(p[1]), hi.max(p[1]))),
        })
    }

    /// Values of the points whose time lies inside `window`.
    pub fn values_in(&self, window: ViewWindow) -> Vec<f64> {
        self.points
            .iter()
            .filter(|p| window.contains(p[0]))
            .map(|p| p[1])
            .collect()
    }
}

/// Parse text into a time series.
pub fn parse_series(text: &str) -> Result<TimeSeries, ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .collect();
    let Some(first) = lines.first() else {
        return Err(ParseError::Empty);
    };

    let separator = if first.contains('\t') { b'\t' } else { b',' };
    let first_field = first
        .split(separator as char)
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');
    let has_header = parse_time_str(first_field).is_none();

    let body = lines.join("\n");
    // Every column is read as a string; cells are converted one by one below so a
    // late fractional value can never be nulled by an integer schema.
    let df = CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(Some(0))
        .with_ignore_errors(true)
        .map_parse_options(|opts| {
            opts.with_separator(separator)
                .with_truncate_ragged_lines(true)
        })
        .into_reader_with_file_handle(Cursor::new(body.into_bytes()))
        .finish()?;

    let columns = df.get_columns();
    if columns.len() < 2 {
        return Err(ParseError::MissingValueColumn);
    }
    if columns.len() > 2 {
        warn!(
            columns = columns.len(),
            "only the first value column is plotted, extra columns ignored"
        );
    }

    let time_col = &columns[0];
    let value_col = &columns[1];
    debug!(
        time_dtype = %time_col.dtype(),
        value_dtype = %value_col.dtype(),
        rows = df.height(),
        has_header,
        "parsed table"
    );

    let mut points = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let t = to_time_ms(time_col.get(idx)?);
        let v = to_value(value_col.get(idx)?);
        match (t, v) {
            (Some(t), Some(v)) if t.is_finite() && v.is_finite() => points.push([t, v]),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "skipped rows without a valid time and value");
    }
    if points.is_empty() {
        return Err(ParseError::NoPoints);
    }

    points.sort_by(|a, b| a[0].total_cmp(&b[0]));

    Ok(TimeSeries {
        points,
        label: has_header.then(|| value_col.name().to_string()),
    })
}

fn to_time_ms(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => parse_time_str(s),
        AnyValue::StringOwned(s) => parse_time_str(s.as_str()),
        AnyValue::Datetime(ts, unit, _) => Some(match unit {
            TimeUnit::Nanoseconds => ts as f64 / 1e6,
            TimeUnit::Microseconds => ts as f64 / 1e3,
            TimeUnit::Milliseconds => ts as f64,
        }),
        AnyValue::Date(days) => Some(days as f64 * 86_400_000.0),
        other => other.extract::<f64>(),
    }
}

fn to_value(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => s.trim().parse().ok(),
        AnyValue::StringOwned(s) => s.as_str().trim().parse().ok(),
        other => other.extract::<f64>(),
    }
}

/// Parse a time field: a millisecond count or a date/time string (UTC).
pub fn parse_time_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ms) = s.parse::<f64>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis() as f64);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> f64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis() as f64
    }

    #[test]
    fn parses_headerless_tab_separated_milliseconds() {
        let text = "1700000000000\t72.5\n1700000001000\t75\n1700000002000\t74\n";
        let series = parse_series(text).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.points[0], [1_700_000_000_000.0, 72.5]);
        assert_eq!(series.label, None);
        assert_eq!(
            series.time_extremes(),
            Some(ViewWindow::new(1_700_000_000_000.0, 1_700_000_002_000.0))
        );
    }

    #[test]
    fn parses_csv_with_header_and_dates_in_time_order() {
        let text = "Date,HR\n2024-01-02 10:00:00,70\n2024-01-02 09:00:00,65\n";
        let series = parse_series(text).unwrap();
        assert_eq!(series.label.as_deref(), Some("HR"));
        assert_eq!(series.points[0], [ms(2024, 1, 2, 9, 0, 0), 65.0]);
        assert_eq!(series.points[1], [ms(2024, 1, 2, 10, 0, 0), 70.0]);
    }

    #[test]
    fn headerless_dates_are_not_mistaken_for_a_header() {
        let text = "2024/03/01 12:00:00,80\n2024/03/01 12:00:05,82\n";
        let series = parse_series(text).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.label, None);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# recorded on device\n\n1000,60\r\n# mid comment\n2000,61\r\n";
        let series = parse_series(text).unwrap();
        assert_eq!(series.points, vec![[1000.0, 60.0], [2000.0, 61.0]]);
    }

    #[test]
    fn rows_with_bad_values_are_skipped() {
        let text = "1000,70\n2000,abc\n3000,80\n";
        let series = parse_series(text).unwrap();
        assert_eq!(series.points, vec![[1000.0, 70.0], [3000.0, 80.0]]);
    }

    #[test]
    fn late_fractional_rows_are_kept_in_long_recordings() {
        let mut text = String::new();
        for i in 0..10_050u64 {
            text.push_str(&format!("{}\t70\n", 1_700_000_000_000u64 + i * 1000));
        }
        text.push_str("1700010050000\t72.5\n");
        text.push_str("1700010050500.5\t71\n");

        let series = parse_series(&text).unwrap();
        assert_eq!(series.len(), 10_052);
        assert!(!series.is_empty());
        assert_eq!(series.points[10_050], [1_700_010_050_000.0, 72.5]);
        assert_eq!(series.points[10_051], [1_700_010_050_500.5, 71.0]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_series(""), Err(ParseError::Empty)));
        assert!(matches!(parse_series("# nothing\n\n"), Err(ParseError::Empty)));
    }

    #[test]
    fn single_column_is_an_error() {
        assert!(matches!(
            parse_series("100\n200\n"),
            Err(ParseError::MissingValueColumn)
        ));
    }

    #[test]
    fn header_without_usable_rows_is_an_error() {
        assert!(matches!(
            parse_series("time,value\nfoo,bar\n"),
            Err(ParseError::NoPoints)
        ));
    }

    #[test]
    fn values_in_window_are_inclusive() {
        let series = TimeSeries {
            points: vec![[0.0, 1.0], [10.0, 2.0], [20.0, 3.0]],
            label: None,
        };
        assert_eq!(series.values_in(ViewWindow::new(0.0, 10.0)), vec![1.0, 2.0]);
        assert_eq!(series.value_extremes(), Some((1.0, 3.0)));
    }

    #[test]
    fn parse_time_accepts_rfc3339_and_plain_dates() {
        assert_eq!(
            parse_time_str("2024-01-01T00:00:00Z"),
            Some(ms(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(parse_time_str("2024-01-01"), Some(ms(2024, 1, 1, 0, 0, 0)));
        assert_eq!(parse_time_str("HR"), None);
    }
}
