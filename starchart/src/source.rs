//! The data source contract consumed by the chart handler.
//!
//! A [`StarSource`] resolves repository metadata and lists the instants at
//! which the repository was starred. Pagination, authentication, caching,
//! timeouts and the star-count limit all live behind this trait.

use chrono::{DateTime, Utc};

use crate::error::UpstreamError;
use crate::event::StarEvent;

/// Repository metadata returned by [`StarSource::resolve_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMetadata {
    /// The `owner/repo` identifier as reported by the source.
    pub full_name: String,
    /// Current number of stargazers.
    pub stargazers_count: u64,
    /// When the repository was created, if known.
    pub created_at: Option<DateTime<Utc>>,
    /// Short description, if any.
    pub description: Option<String>,
}

impl RepoMetadata {
    /// Creates metadata with only the required fields set.
    pub fn new(full_name: impl Into<String>, stargazers_count: u64) -> Self {
        Self {
            full_name: full_name.into(),
            stargazers_count,
            created_at: None,
            description: None,
        }
    }
}

/// Source of repository metadata and star events.
///
/// Implementations must be safe to share between request threads.
pub trait StarSource: Send + Sync {
    /// Looks up the repository named `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::NotFound`] for unknown or malformed names and
    /// [`UpstreamError::Transient`] for anything else.
    fn resolve_repository(&self, name: &str) -> Result<RepoMetadata, UpstreamError>;

    /// Lists every star event of `repo` in ascending timestamp order.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::TooManyStars`] when the repository exceeds the
    /// source's enumeration limit, and [`UpstreamError::Transient`] for
    /// network or payload failures.
    fn fetch_star_events(&self, repo: &RepoMetadata) -> Result<Vec<StarEvent>, UpstreamError>;
}

impl<S: StarSource + ?Sized> StarSource for std::sync::Arc<S> {
    fn resolve_repository(&self, name: &str) -> Result<RepoMetadata, UpstreamError> {
        (**self).resolve_repository(name)
    }

    fn fetch_star_events(&self, repo: &RepoMetadata) -> Result<Vec<StarEvent>, UpstreamError> {
        (**self).fetch_star_events(repo)
    }
}
