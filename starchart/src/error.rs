//! Error types for the starchart chart pipeline.

use thiserror::Error;

/// The main error type for starchart operations that can fail as a whole.
#[derive(Error, Debug)]
pub enum StarchartError {
    /// The upstream data source failed.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// The graphics backend failed while producing the SVG document.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Coarse classification of an [`UpstreamError`].
///
/// Callers branch on this instead of inspecting error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamErrorKind {
    /// The repository does not exist or the identifier is malformed.
    NotFound,
    /// The repository has more stargazers than the source will enumerate.
    TooManyStars,
    /// Network failure, upstream outage, rate limiting or malformed payload.
    Transient,
}

/// Errors reported by a [`StarSource`](crate::source::StarSource).
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The repository could not be found.
    #[error("repository {repo} not found")]
    NotFound {
        /// The `owner/repo` identifier that was requested.
        repo: String,
    },

    /// The repository exceeds the configured stargazer enumeration limit.
    #[error("repo has too many stargazers, github won't allow us to list all stars")]
    TooManyStars {
        /// The `owner/repo` identifier.
        repo: String,
        /// Star count reported by the upstream.
        stars: u64,
        /// The configured limit.
        limit: u64,
    },

    /// Any other retrieval failure.
    #[error("failed to fetch {repo}: {reason}")]
    Transient {
        /// The `owner/repo` identifier.
        repo: String,
        /// Description of the failure.
        reason: String,
    },
}

impl UpstreamError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            UpstreamError::NotFound { .. } => UpstreamErrorKind::NotFound,
            UpstreamError::TooManyStars { .. } => UpstreamErrorKind::TooManyStars,
            UpstreamError::Transient { .. } => UpstreamErrorKind::Transient,
        }
    }

    /// Shorthand for a [`UpstreamError::Transient`] error.
    pub fn transient(repo: impl Into<String>, reason: impl ToString) -> Self {
        UpstreamError::Transient {
            repo: repo.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised by the graphics backend while serializing a chart.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The series has too few points to draw a line.
    #[error("cannot render a series with {points} point(s); at least 2 are required")]
    NotEnoughPoints {
        /// The number of points in the series.
        points: usize,
    },

    /// The drawing backend reported a failure.
    #[error("drawing backend failed: {reason}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
    },
}

/// Type alias for `Result<T, StarchartError>`.
pub type Result<T> = std::result::Result<T, StarchartError>;
