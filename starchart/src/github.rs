//! A [`StarSource`] backed by the GitHub REST API.
//!
//! Resolves `GET /repos/{owner}/{repo}` and walks
//! `GET /repos/{owner}/{repo}/stargazers` page by page with the
//! `application/vnd.github.v3.star+json` media type, which adds the
//! `starred_at` timestamp to every entry.
//!
//! Repositories with more stargazers than [`GitHubConfig::max_stars`] are
//! refused with [`UpstreamError::TooManyStars`] before any page is fetched.
//! GitHub only serves the first 400 pages of a listing, so the default
//! limit is 400 × 100.
//!
//! This module is only available when the `github-client` feature is
//! enabled.
//!
//! # Example
//!
//! ```rust,no_run
//! use starchart::StarSource;
//! use starchart::github::{GitHub, GitHubConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let github = GitHub::new(GitHubConfig::new().with_token("ghp_example"))?;
//! let repo = github.resolve_repository("rust-lang/rust")?;
//! let events = github.fetch_star_events(&repo)?;
//! println!("{} has {} stars", repo.full_name, events.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::UpstreamError;
use crate::event::StarEvent;
use crate::source::{RepoMetadata, StarSource};

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size GitHub accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Media type that makes the stargazers listing include `starred_at`.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

/// Configuration for the GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL, without a trailing slash.
    pub api_url: String,
    /// Optional access token sent as a bearer token.
    pub token: Option<String>,
    /// HTTP timeout for each request.
    pub timeout: Duration,
    /// Stargazers requested per page.
    pub page_size: u32,
    /// Repositories with more stargazers than this are refused.
    pub max_stars: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubConfig {
    /// Creates a new config with sensible defaults.
    ///
    /// Defaults: public API, no token, 30s timeout, 100 per page, 40 000 stars.
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            page_size: MAX_PAGE_SIZE,
            max_stars: 400 * u64::from(MAX_PAGE_SIZE),
        }
    }

    /// Sets the API base URL (e.g., for GitHub Enterprise).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page size, clamped to `1..=100`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Sets the star-count limit.
    #[must_use]
    pub fn with_max_stars(mut self, max_stars: u64) -> Self {
        self.max_stars = max_stars;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    full_name: String,
    stargazers_count: u64,
    created_at: Option<DateTime<Utc>>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StargazerResponse {
    starred_at: DateTime<Utc>,
}

/// GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GitHub {
    config: GitHubConfig,
    client: reqwest::blocking::Client,
}

impl GitHub {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transient`] if the HTTP client cannot be built.
    pub fn new(config: GitHubConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("starchart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::transient("", e))?;
        Ok(Self { config, client })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Sends a GET request and returns the body of a 2xx response.
    fn get(&self, repo: &str, url: &str, accept: &str) -> Result<String, UpstreamError> {
        let mut request = self.client.get(url).header("Accept", accept);
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .map_err(|e| UpstreamError::transient(repo, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                repo: repo.to_string(),
            });
        }

        let body = response
            .text()
            .map_err(|e| UpstreamError::transient(repo, e))?;
        if !status.is_success() {
            return Err(UpstreamError::transient(
                repo,
                format!("github returned status {}: {}", status.as_u16(), body.trim()),
            ));
        }

        Ok(body)
    }
}

impl StarSource for GitHub {
    fn resolve_repository(&self, name: &str) -> Result<RepoMetadata, UpstreamError> {
        if !is_valid_name(name) {
            return Err(UpstreamError::NotFound {
                repo: name.to_string(),
            });
        }

        let url = format!("{}/repos/{name}", self.config.api_url);
        let body = self.get(name, &url, "application/vnd.github+json")?;
        parse_repository(&body).map_err(|e| UpstreamError::transient(name, e))
    }

    fn fetch_star_events(&self, repo: &RepoMetadata) -> Result<Vec<StarEvent>, UpstreamError> {
        let name = repo.full_name.as_str();
        if repo.stargazers_count > self.config.max_stars {
            return Err(UpstreamError::TooManyStars {
                repo: name.to_string(),
                stars: repo.stargazers_count,
                limit: self.config.max_stars,
            });
        }

        let page_size = u64::from(self.config.page_size);
        let last_page = repo.stargazers_count.div_ceil(page_size).max(1);
        let mut events = Vec::new();

        for page in 1..=last_page {
            let url = format!(
                "{}/repos/{name}/stargazers?per_page={page_size}&page={page}",
                self.config.api_url
            );
            let body = self.get(name, &url, STAR_MEDIA_TYPE)?;
            let batch = parse_stargazers(&body).map_err(|e| UpstreamError::transient(name, e))?;
            let short = (batch.len() as u64) < page_size;

            events.extend(batch);
            if short {
                break;
            }
        }

        tracing::debug!(repo = name, count = events.len(), "fetched stargazers");
        Ok(events)
    }
}

/// Returns `true` for names of the form `owner/repo` with GitHub-legal characters.
fn is_valid_name(name: &str) -> bool {
    let Some((owner, repo)) = name.split_once('/') else {
        return false;
    };
    let legal = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    legal(owner) && legal(repo)
}

fn parse_repository(body: &str) -> Result<RepoMetadata, serde_json::Error> {
    let repo: RepoResponse = serde_json::from_str(body)?;
    Ok(RepoMetadata {
        full_name: repo.full_name,
        stargazers_count: repo.stargazers_count,
        created_at: repo.created_at,
        description: repo.description,
    })
}

fn parse_stargazers(body: &str) -> Result<Vec<StarEvent>, serde_json::Error> {
    let page: Vec<StargazerResponse> = serde_json::from_str(body)?;
    Ok(page
        .into_iter()
        .map(|s| StarEvent::new(s.starred_at))
        .collect())
}
