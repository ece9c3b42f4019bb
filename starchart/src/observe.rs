//! Observability hooks injected into the chart handler.
//!
//! The handler never logs through a global; it is handed an [`Observer`]
//! at construction. [`TracingObserver`] forwards to `tracing`, and
//! [`NoopObserver`] drops everything.

use std::time::Duration;

/// Receives log events and stage timings from the chart handler.
///
/// Every hook takes the `owner/repo` identifier being served.
pub trait Observer: Send + Sync {
    /// An informational event.
    fn info(&self, repo: &str, message: &str);

    /// A failure, with the error that caused it.
    fn error(&self, repo: &str, message: &str, error: &dyn std::error::Error);

    /// Wall-clock time spent in a named stage.
    fn timing(&self, repo: &str, stage: &str, elapsed: Duration);
}

/// Forwards events to the `tracing` crate with a `repo` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn info(&self, repo: &str, message: &str) {
        tracing::info!(repo = repo, "{message}");
    }

    fn error(&self, repo: &str, message: &str, error: &dyn std::error::Error) {
        tracing::error!(repo = repo, error = %error, "{message}");
    }

    fn timing(&self, repo: &str, stage: &str, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(repo = repo, stage = stage, elapsed_ms = elapsed_ms, "stage finished");
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn info(&self, _repo: &str, _message: &str) {}

    fn error(&self, _repo: &str, _message: &str, _error: &dyn std::error::Error) {}

    fn timing(&self, _repo: &str, _stage: &str, _elapsed: Duration) {}
}
