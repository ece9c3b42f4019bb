//! # starchart
//!
//! Star-history charts for GitHub repositories, rendered as SVG.
//!
//! starchart turns the chronological list of "starred" events of a
//! repository into a cumulative time series and draws it as a single-line
//! SVG chart, ready to be embedded in a README or served over HTTP.
//!
//! ## Key Properties
//!
//! - Stateless: every request builds its own series and chart
//! - Typed upstream failures: the "too many stars" guard is a distinct
//!   [`UpstreamErrorKind`], recovered as an inline SVG error graphic
//! - Observability is injected through the [`Observer`] trait, never global
//! - No background threads, no caches, no retries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use starchart::{ChartHandler, NoopObserver, RepoMetadata, StarEvent, StarSource, UpstreamError};
//!
//! // Any data source works; the `github` module ships one for the REST API.
//! struct Fixed;
//!
//! impl StarSource for Fixed {
//!     fn resolve_repository(&self, name: &str) -> Result<RepoMetadata, UpstreamError> {
//!         Ok(RepoMetadata::new(name, 1))
//!     }
//!
//!     fn fetch_star_events(&self, _repo: &RepoMetadata) -> Result<Vec<StarEvent>, UpstreamError> {
//!         Ok(vec![StarEvent::new(chrono::Utc::now())])
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = ChartHandler::new(Fixed, Arc::new(NoopObserver));
//!
//! let response = handler.handle("rust-lang", "rust");
//! assert_eq!(response.status, 200);
//! std::fs::write("rust.svg", &response.body)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`series`] — Series Builder: star events to a plot-ready [`TimeSeries`]
//! - [`chart`] — Chart Renderer: [`ChartSpec`], SVG rendering and the error graphic
//! - [`handler`] — Response assembly: status, headers and body per request
//! - [`source`] — The [`StarSource`] collaborator contract
//! - [`observe`] — Injected logging and timing hooks
//! - [`error`] — Error types
//! - `github` — A [`StarSource`] backed by the GitHub REST API
//!   (requires the `github-client` feature)

pub mod chart;
pub mod error;
pub mod event;
#[cfg(feature = "github-client")]
pub mod github;
pub mod handler;
pub mod observe;
pub mod series;
pub mod source;

// Re-export primary API types at crate root for convenience.
pub use chart::{ChartSpec, error_svg, render_svg};
pub use error::{RenderError, Result, StarchartError, UpstreamError, UpstreamErrorKind};
pub use event::StarEvent;
pub use handler::{ChartHandler, ChartResponse};
pub use observe::{NoopObserver, Observer, TracingObserver};
pub use series::{TimeSeries, build_series};
pub use source::{RepoMetadata, StarSource};
