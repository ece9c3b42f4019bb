//! Response assembly for the "chart for repository X" capability.
//!
//! [`ChartHandler::handle`] runs the whole pipeline for one request and
//! returns a transport-agnostic [`ChartResponse`]:
//!
//! | Outcome                              | Status | Body                 |
//! |--------------------------------------|--------|----------------------|
//! | Chart rendered                       | 200    | SVG chart            |
//! | Source refuses: too many stars       | 200    | SVG error graphic    |
//! | Repository lookup failed             | 400    | error text           |
//! | Star retrieval failed otherwise      | 503    | error text           |
//! | Graphics backend failed              | 200    | empty                |
//!
//! Successful responses carry `content-type`, `cache-control`, `date` and
//! `expires` headers. `expires` is the response time even though
//! `cache-control` advertises a one-day `max-age`; clients that honour
//! `max-age` ignore `expires`.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::chart::{ChartSpec, error_svg, render_svg};
use crate::error::UpstreamErrorKind;
use crate::observe::Observer;
use crate::series::build_series;
use crate::source::StarSource;

/// Content type of every SVG response.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml;charset=utf-8";
/// Content type of plain-text error responses.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
/// Cache directive of every SVG response.
pub const CACHE_CONTROL: &str = "public, max-age=86400";

/// A status, header list and body, ready to be written by any HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lower-case names, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl ChartResponse {
    /// Returns the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// A plain-text response with the given status.
    fn text(status: u16, body: String) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), TEXT_CONTENT_TYPE.to_string())],
            body: body.into_bytes(),
        }
    }

    /// A 200 SVG response stamped with cache headers for `now`.
    fn svg(body: Vec<u8>, now: DateTime<Utc>) -> Self {
        let stamp = http_date(now);
        Self {
            status: 200,
            headers: vec![
                ("content-type".to_string(), SVG_CONTENT_TYPE.to_string()),
                ("cache-control".to_string(), CACHE_CONTROL.to_string()),
                ("date".to_string(), stamp.clone()),
                ("expires".to_string(), stamp),
            ],
            body,
        }
    }
}

/// Formats `t` as an RFC 1123 HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Serves star-history charts from a [`StarSource`].
///
/// Holds no mutable state; one instance can serve concurrent requests.
pub struct ChartHandler<S> {
    source: S,
    observer: Arc<dyn Observer>,
    spec: ChartSpec,
}

impl<S: StarSource> ChartHandler<S> {
    /// Creates a handler with the default [`ChartSpec`].
    pub fn new(source: S, observer: Arc<dyn Observer>) -> Self {
        Self {
            source,
            observer,
            spec: ChartSpec::default(),
        }
    }

    /// Replaces the chart configuration.
    #[must_use]
    pub fn with_spec(mut self, spec: ChartSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Builds the response for the repository `owner/repo`.
    pub fn handle(&self, owner: &str, repo: &str) -> ChartResponse {
        let name = format!("{owner}/{repo}");
        let started = Instant::now();
        let response = self.collect_and_render(&name);
        self.observer.timing(&name, "collect_stars", started.elapsed());
        response
    }

    fn collect_and_render(&self, name: &str) -> ChartResponse {
        let metadata = match self.source.resolve_repository(name) {
            Ok(metadata) => metadata,
            Err(e) => return ChartResponse::text(400, e.to_string()),
        };

        let events = match self.source.fetch_star_events(&metadata) {
            Ok(events) => events,
            Err(e) => match e.kind() {
                UpstreamErrorKind::TooManyStars => {
                    return ChartResponse::svg(error_svg(&e.to_string()).into_bytes(), Utc::now());
                }
                UpstreamErrorKind::NotFound | UpstreamErrorKind::Transient => {
                    self.observer.error(name, "failed to get stars", &e);
                    return ChartResponse::text(503, e.to_string());
                }
            },
        };

        let series = build_series(&events);
        if series.is_padded() {
            self.observer
                .info(name, "not enough results, adding some fake ones");
        }

        let started = Instant::now();
        let body = match render_svg(&series, &self.spec) {
            Ok(svg) => svg.into_bytes(),
            Err(e) => {
                self.observer.error(name, "failed to render graph", &e);
                Vec::new()
            }
        };
        self.observer.timing(name, "chart", started.elapsed());

        ChartResponse::svg(body, Utc::now())
    }
}
