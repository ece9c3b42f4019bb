//! Series Builder: turns star events into a plot-ready cumulative series.
//!
//! The i-th event becomes the point `(starred_at_i, i)`, i.e. the zero-based
//! number of stars the repository had when that star was recorded.
//!
//! # Padding
//!
//! A line needs at least two points. When fewer than two events are given,
//! synthetic points `(now, i)` are appended until there are two, so the last
//! point is always `(now, 1)`. Synthetic points are a rendering convenience
//! only: [`TimeSeries::is_padded`] reports them, and
//! [`TimeSeries::real_len`] counts only points backed by real events.
//!
//! # Ordering
//!
//! No sorting, deduplication or validation is done. Callers substituting a
//! different data source must hand events over in ascending order.

use chrono::{DateTime, Utc};

use crate::event::StarEvent;

/// Minimum number of points the renderer needs to draw a line.
pub const MIN_POINTS: usize = 2;

/// An ordered `(timestamp, cumulative rank)` series.
///
/// Invariant: `x.len() == y.len()`. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    x: Vec<DateTime<Utc>>,
    y: Vec<f64>,
    synthetic: usize,
}

impl TimeSeries {
    /// Timestamps, in input order.
    pub fn x_values(&self) -> &[DateTime<Utc>] {
        &self.x
    }

    /// Cumulative ranks, parallel to [`x_values`](Self::x_values).
    pub fn y_values(&self) -> &[f64] {
        &self.y
    }

    /// Number of points, including synthetic ones.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Whether synthetic points were appended to reach [`MIN_POINTS`].
    pub fn is_padded(&self) -> bool {
        self.synthetic > 0
    }

    /// Number of points that correspond to real star events.
    pub fn real_len(&self) -> usize {
        self.len() - self.synthetic
    }

    /// Iterates over `(timestamp, rank)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Earliest and latest timestamp, or `None` when empty.
    pub fn x_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let min = self.x.iter().min()?;
        let max = self.x.iter().max()?;
        Some((*min, *max))
    }

    /// Largest rank in the series, or `None` when empty.
    pub fn y_max(&self) -> Option<f64> {
        self.y.iter().copied().reduce(f64::max)
    }
}

/// Builds a series from chronologically ordered star events, padding with
/// the current wall-clock time when needed.
pub fn build_series(events: &[StarEvent]) -> TimeSeries {
    build_series_at(events, Utc::now())
}

/// Like [`build_series`], but uses `now` as the synthetic point's timestamp.
#[allow(clippy::cast_precision_loss)] // ranks stay far below 2^52
pub fn build_series_at(events: &[StarEvent], now: DateTime<Utc>) -> TimeSeries {
    let mut x = Vec::with_capacity(events.len().max(MIN_POINTS));
    let mut y = Vec::with_capacity(events.len().max(MIN_POINTS));

    for (i, event) in events.iter().enumerate() {
        x.push(event.starred_at);
        y.push(i as f64);
    }

    let mut synthetic = 0;
    while x.len() < MIN_POINTS {
        y.push(x.len() as f64);
        x.push(now);
        synthetic += 1;
    }

    TimeSeries { x, y, synthetic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_events_map_to_zero_based_ranks() {
        let events: Vec<StarEvent> = [1_600_000_000, 1_600_000_100, 1_600_000_200]
            .into_iter()
            .map(|s| StarEvent::new(ts(s)))
            .collect();

        let series = build_series_at(&events, ts(1_700_000_000));

        assert_eq!(series.len(), 3);
        assert!(!series.is_padded());
        assert_eq!(series.real_len(), 3);
        assert_eq!(series.y_values(), &[0.0, 1.0, 2.0]);
        assert_eq!(
            series.x_values(),
            &[ts(1_600_000_000), ts(1_600_000_100), ts(1_600_000_200)]
        );
    }

    #[test]
    fn test_empty_input_is_padded_to_two_points() {
        let now = ts(1_700_000_000);
        let series = build_series_at(&[], now);

        assert_eq!(series.len(), 2);
        assert!(series.is_padded());
        assert_eq!(series.real_len(), 0);
        assert_eq!(series.y_values(), &[0.0, 1.0]);
        assert_eq!(series.x_values(), &[now, now]);
    }

    #[test]
    fn test_single_event_is_padded() {
        let now = ts(1_700_000_000);
        let series = build_series_at(&[StarEvent::new(ts(1_600_000_000))], now);

        assert_eq!(series.len(), 2);
        assert!(series.is_padded());
        assert_eq!(series.real_len(), 1);
        assert_eq!(series.y_values(), &[0.0, 1.0]);
        assert_eq!(series.x_values()[1], now);
    }

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let events = vec![
            StarEvent::new(ts(300)),
            StarEvent::new(ts(100)),
            StarEvent::new(ts(200)),
        ];
        let series = build_series_at(&events, ts(1_000));

        assert_eq!(series.x_values(), &[ts(300), ts(100), ts(200)]);
        assert_eq!(series.x_range(), Some((ts(100), ts(300))));
    }

    #[test]
    fn test_y_max() {
        let events: Vec<StarEvent> = (0..10).map(|s| StarEvent::new(ts(s))).collect();
        let series = build_series_at(&events, ts(1_000));
        assert_eq!(series.y_max(), Some(9.0));
        assert_eq!(series.points().count(), 10);
    }
}
