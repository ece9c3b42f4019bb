//! The star event type.

use chrono::{DateTime, Utc};

/// The instant at which one account starred a repository.
///
/// Sources hand these out in ascending timestamp order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StarEvent {
    /// When the star was recorded.
    pub starred_at: DateTime<Utc>,
}

impl StarEvent {
    /// Creates a new star event.
    pub fn new(starred_at: DateTime<Utc>) -> Self {
        Self { starred_at }
    }
}

impl From<DateTime<Utc>> for StarEvent {
    fn from(starred_at: DateTime<Utc>) -> Self {
        Self::new(starred_at)
    }
}
