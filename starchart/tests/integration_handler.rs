//! End-to-end tests for the chart handler against an in-memory source.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use starchart::handler::SVG_CONTENT_TYPE;
use starchart::{
    ChartHandler, ChartSpec, NoopObserver, Observer, RepoMetadata, StarEvent, StarSource,
    UpstreamError,
};

/// What the fake source answers for the stargazer listing.
enum Stars {
    Events(Vec<StarEvent>),
    TooMany,
    Outage,
}

struct FakeSource {
    known_repo: &'static str,
    stars: Stars,
}

impl StarSource for FakeSource {
    fn resolve_repository(&self, name: &str) -> Result<RepoMetadata, UpstreamError> {
        if name == self.known_repo {
            Ok(RepoMetadata::new(name, 3))
        } else {
            Err(UpstreamError::NotFound {
                repo: name.to_string(),
            })
        }
    }

    fn fetch_star_events(&self, repo: &RepoMetadata) -> Result<Vec<StarEvent>, UpstreamError> {
        match &self.stars {
            Stars::Events(events) => Ok(events.clone()),
            Stars::TooMany => Err(UpstreamError::TooManyStars {
                repo: repo.full_name.clone(),
                stars: 100_000,
                limit: 40_000,
            }),
            Stars::Outage => Err(UpstreamError::transient(&repo.full_name, "connection refused")),
        }
    }
}

#[derive(Default)]
struct RecordingObserver {
    lines: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Observer for RecordingObserver {
    fn info(&self, repo: &str, message: &str) {
        self.lines.lock().unwrap().push(format!("info {repo}: {message}"));
    }

    fn error(&self, repo: &str, message: &str, error: &dyn std::error::Error) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("error {repo}: {message}: {error}"));
    }

    fn timing(&self, repo: &str, stage: &str, _elapsed: Duration) {
        self.lines.lock().unwrap().push(format!("timing {repo}: {stage}"));
    }
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn handler(stars: Stars) -> ChartHandler<FakeSource> {
    ChartHandler::new(
        FakeSource {
            known_repo: "caarlos0/starcharts",
            stars,
        },
        Arc::new(NoopObserver),
    )
}

fn body_str(body: &[u8]) -> &str {
    std::str::from_utf8(body).unwrap()
}

#[test]
fn test_three_stars_render_a_chart() {
    let events = [1_600_000_000, 1_600_086_400, 1_600_172_800]
        .into_iter()
        .map(|s| StarEvent::new(ts(s)))
        .collect();
    let response = handler(Stars::Events(events)).handle("caarlos0", "starcharts");

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some(SVG_CONTENT_TYPE));
    assert!(response.header("cache-control").unwrap().contains("max-age=86400"));
    assert!(response.header("date").unwrap().ends_with("GMT"));
    assert_eq!(response.header("expires"), response.header("date"));

    let svg = body_str(&response.body).to_lowercase();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("stargazers"));
    assert_eq!(svg.matches("#81c7ef").count(), 1);
}

#[test]
fn test_zero_stars_still_render() {
    let observer = Arc::new(RecordingObserver::default());
    let handler = ChartHandler::new(
        FakeSource {
            known_repo: "caarlos0/starcharts",
            stars: Stars::Events(Vec::new()),
        },
        observer.clone(),
    );

    let response = handler.handle("caarlos0", "starcharts");

    assert_eq!(response.status, 200);
    assert!(body_str(&response.body).contains("</svg>"));
    assert!(
        observer
            .lines()
            .contains(&"info caarlos0/starcharts: not enough results, adding some fake ones".to_string())
    );
}

#[test]
fn test_too_many_stars_renders_error_graphic() {
    let response = handler(Stars::TooMany).handle("caarlos0", "starcharts");

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some(SVG_CONTENT_TYPE));
    assert!(response.header("cache-control").unwrap().contains("max-age=86400"));

    let svg = body_str(&response.body);
    assert!(svg.contains(r#"width="1024""#));
    assert!(svg.contains(r#"height="50""#));
    assert!(svg.contains("repo has too many stargazers, github won't allow us to list all stars"));
}

#[test]
fn test_unknown_repository_is_bad_request() {
    let response = handler(Stars::Events(Vec::new())).handle("nobody", "nothing");

    assert_eq!(response.status, 400);
    assert_eq!(body_str(&response.body), "repository nobody/nothing not found");
    assert_eq!(response.header("cache-control"), None);
}

#[test]
fn test_outage_is_service_unavailable() {
    let observer = Arc::new(RecordingObserver::default());
    let handler = ChartHandler::new(
        FakeSource {
            known_repo: "caarlos0/starcharts",
            stars: Stars::Outage,
        },
        observer.clone(),
    );

    let response = handler.handle("caarlos0", "starcharts");

    assert_eq!(response.status, 503);
    assert_eq!(
        body_str(&response.body),
        "failed to fetch caarlos0/starcharts: connection refused"
    );

    let lines = observer.lines();
    assert!(lines.iter().any(|l| l.starts_with("error caarlos0/starcharts: failed to get stars")));
    assert!(lines.contains(&"timing caarlos0/starcharts: collect_stars".to_string()));
}

#[test]
fn test_successful_render_reports_stage_timings() {
    let observer = Arc::new(RecordingObserver::default());
    let handler = ChartHandler::new(
        FakeSource {
            known_repo: "caarlos0/starcharts",
            stars: Stars::Events(vec![StarEvent::new(ts(1)), StarEvent::new(ts(2))]),
        },
        observer.clone(),
    );

    handler.handle("caarlos0", "starcharts");

    assert_eq!(
        observer.lines(),
        vec![
            "timing caarlos0/starcharts: chart".to_string(),
            "timing caarlos0/starcharts: collect_stars".to_string(),
        ]
    );
}

#[test]
fn test_handler_is_shareable_across_threads() {
    let handler = Arc::new(handler(Stars::Events(vec![StarEvent::new(ts(1_600_000_000))])));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handler = Arc::clone(&handler);
            std::thread::spawn(move || handler.handle("caarlos0", "starcharts").status)
        })
        .collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap(), 200);
    }
}

#[test]
fn test_custom_chart_spec() {
    let handler = handler(Stars::Events(vec![StarEvent::new(ts(1)), StarEvent::new(ts(2))]))
        .with_spec(ChartSpec::default().with_size(800, 300));

    let response = handler.handle("caarlos0", "starcharts");

    let svg = body_str(&response.body);
    assert!(svg.contains(r#"width="800""#));
    assert!(svg.contains(r#"height="300""#));
}
