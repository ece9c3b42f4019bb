//! Chart Renderer: draws a [`TimeSeries`] as an SVG line chart.
//!
//! The chart has a time-valued X axis ("Time") and an integer-valued Y axis
//! ("Stargazers"), no grid mesh, and a single light-blue line. Rendering
//! happens entirely in memory through the plotters SVG backend, which uses
//! estimated font metrics, so no system fonts are required.
//!
//! [`error_svg`] produces the fixed 1024×50 graphic used when the upstream
//! refuses to enumerate a repository's stars.

use chrono::{DateTime, Utc};
use plotters::prelude::*;

use crate::error::{RenderError, Result, StarchartError};
use crate::series::{MIN_POINTS, TimeSeries};

/// Default chart canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1024;
/// Default chart canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;

/// Error graphic canvas width in pixels.
pub const ERROR_WIDTH: u32 = 1024;
/// Error graphic canvas height in pixels.
pub const ERROR_HEIGHT: u32 = 50;

const SECS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Span used for the X axis when every timestamp is identical.
const DEGENERATE_SPAN_SECS: f64 = SECS_PER_DAY;

/// Upper bound on X tick labels.
const MAX_X_LABELS: usize = 6;
/// Upper bound on Y tick labels.
const MAX_Y_LABELS: usize = 10;

/// Rendering configuration for a star-history chart.
///
/// Built per render and never mutated while drawing.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// X axis name.
    pub x_label: String,
    /// Y axis name.
    pub y_label: String,
    /// Stroke color of the series line.
    pub series_color: RGBColor,
    /// Stroke width of the series line.
    pub series_width: u32,
    /// Stroke color of both axis lines.
    pub axis_color: RGBColor,
    /// Stroke width of both axis lines.
    pub axis_width: u32,
    /// `strftime` pattern for X tick labels.
    pub time_format: String,
    /// Formatter for Y tick labels.
    pub value_formatter: fn(f64) -> String,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            x_label: "Time".to_string(),
            y_label: "Stargazers".to_string(),
            series_color: RGBColor(129, 199, 239),
            series_width: 2,
            axis_color: RGBColor(85, 85, 85),
            axis_width: 2,
            time_format: "%Y-%m-%d".to_string(),
            value_formatter: format_int,
        }
    }
}

impl ChartSpec {
    /// Sets the canvas size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Formats a Y tick as a non-negative integer with no decimal places.
///
/// Rounds to the nearest integer: `12.7` becomes `"13"`.
pub fn format_int(value: f64) -> String {
    let value = if value > 0.0 { value } else { 0.0 };
    format!("{value:.0}")
}

/// Renders `series` as an SVG document.
///
/// # Errors
///
/// Returns [`RenderError::NotEnoughPoints`] for series shorter than
/// [`MIN_POINTS`], and [`RenderError::Backend`] if plotters fails.
pub fn render_svg(series: &TimeSeries, spec: &ChartSpec) -> Result<String> {
    let (x_start, x_end) = match series.x_range() {
        Some(range) if series.len() >= MIN_POINTS => x_bounds(range),
        _ => {
            return Err(RenderError::NotEnoughPoints {
                points: series.len(),
            }
            .into());
        }
    };
    let y_end = series.y_max().unwrap_or(0.0).max(1.0);

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (spec.width, spec.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(backend_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(
                KeyPointAxis((x_start..x_end).with_key_points(x_ticks(x_start, x_end))),
                0f64..y_end,
            )
            .map_err(backend_error)?;

        let x_formatter = |secs: &f64| format_time(*secs, &spec.time_format);
        let y_formatter = |value: &f64| (spec.value_formatter)(*value);

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .axis_style(ShapeStyle::from(&spec.axis_color).stroke_width(spec.axis_width))
            .y_labels(y_label_count(y_end))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .draw()
            .map_err(backend_error)?;

        chart
            .draw_series(LineSeries::new(
                series.points().map(|(t, y)| (to_secs(t), y)),
                ShapeStyle::from(&spec.series_color).stroke_width(spec.series_width),
            ))
            .map_err(backend_error)?;

        root.present().map_err(backend_error)?;
    }

    Ok(buffer)
}

/// Renders the fixed-layout error graphic for `message`.
///
/// A pure function of the message. Only `&`, `<` and `>` are escaped, so
/// quotes and apostrophes appear verbatim in the text node.
pub fn error_svg(message: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{ERROR_WIDTH}" height="{ERROR_HEIGHT}">
	<text xmlns="http://www.w3.org/2000/svg" y="20" x="100" fill="red">{}</text>
 </svg>"#,
        escape_xml(message)
    )
}

/// X axis bounds in unix seconds, widened when the range is empty.
fn x_bounds((start, end): (DateTime<Utc>, DateTime<Utc>)) -> (f64, f64) {
    let start = to_secs(start);
    let mut end = to_secs(end);
    if end <= start {
        end = start + DEGENERATE_SPAN_SECS;
    }
    (start, end)
}

/// Delegates to the wrapped `WithKeyPoints` axis; exists only so the axis
/// satisfies the `ValueFormatter` bound of `configure_mesh` (labels come from
/// the explicit `x_label_formatter`).
struct KeyPointAxis(plotters::coord::combinators::WithKeyPoints<plotters::coord::types::RangedCoordf64>);

impl Ranged for KeyPointAxis {
    type ValueType = f64;
    type FormatOption = plotters::coord::ranged1d::DefaultFormatting;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: plotters::coord::ranged1d::KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

/// X ticks on UTC midnights, at least one day apart, so no two share a date.
///
/// Falls back to `start` alone when the range crosses no midnight.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn x_ticks(start: f64, end: f64) -> Vec<f64> {
    let first = (start / SECS_PER_DAY).ceil() * SECS_PER_DAY;
    if first > end {
        return vec![start];
    }
    let midnights = ((end - first) / SECS_PER_DAY).floor() as usize + 1;
    let step = midnights.div_ceil(MAX_X_LABELS) as f64 * SECS_PER_DAY;

    let mut ticks = Vec::with_capacity(MAX_X_LABELS);
    let mut tick = first;
    while tick <= end {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

/// Caps the Y label count so every candidate tick is a whole number.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn y_label_count(y_end: f64) -> usize {
    (y_end.floor() as usize + 1).min(MAX_Y_LABELS)
}

#[allow(clippy::cast_precision_loss)] // second resolution is all the axis needs
fn to_secs(t: DateTime<Utc>) -> f64 {
    t.timestamp() as f64
}

#[allow(clippy::cast_possible_truncation)]
fn format_time(secs: f64, pattern: &str) -> String {
    DateTime::from_timestamp(secs.round() as i64, 0)
        .map(|t| t.format(pattern).to_string())
        .unwrap_or_default()
}

/// Escapes `text` for use as element content.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn backend_error<E: std::fmt::Display>(err: E) -> StarchartError {
    RenderError::Backend {
        reason: err.to_string(),
    }
    .into()
}
