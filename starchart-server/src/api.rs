//! Minimal HTTP front end for the chart handler.
//!
//! Uses `std::net::TcpListener` with a fixed pool of worker threads fed
//! through a bounded queue. Endpoints:
//!
//! - `GET /health`               — liveness check
//! - `GET /{owner}/{repo}.svg`   — star-history chart

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use starchart::handler::TEXT_CONTENT_TYPE;
use starchart::{ChartHandler, ChartResponse, StarSource};

/// A parsed request path.
#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Health,
    Chart { owner: &'a str, repo: &'a str },
    NotFound,
}

/// Accepts connections forever, serving them on `workers` threads.
///
/// At most `workers` requests run at once; up to `workers` more accepted
/// connections wait in the queue before `accept` stops being called.
pub fn run_api_server<S>(listener: TcpListener, handler: Arc<ChartHandler<S>>, workers: usize)
where
    S: StarSource + 'static,
{
    let workers = workers.max(1);
    let (tx, rx) = mpsc::sync_channel::<TcpStream>(workers);
    let rx = Arc::new(Mutex::new(rx));

    for id in 0..workers {
        let rx = Arc::clone(&rx);
        let handler = Arc::clone(&handler);
        let spawned = std::thread::Builder::new()
            .name(format!("starchart-worker-{id}"))
            .spawn(move || serve_queue(&rx, handler.as_ref()));
        if let Err(e) = spawned {
            tracing::error!("failed to spawn worker {id}: {e}");
        }
    }
    drop(rx);

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("accept error: {e}");
                continue;
            }
        };

        // Short read timeout so slow clients cannot pin a worker forever
        let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));

        if tx.send(stream).is_err() {
            tracing::error!("no workers left, stopping server");
            return;
        }
    }
}

/// Worker loop: serves queued connections until the sender is gone.
fn serve_queue<S: StarSource>(queue: &Mutex<Receiver<TcpStream>>, handler: &ChartHandler<S>) {
    loop {
        let next = match queue.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => return,
        };
        let Ok(stream) = next else {
            return;
        };

        if let Err(e) = handle_request(&stream, handler) {
            tracing::debug!("request error: {e}");
        }
    }
}

/// Parses an HTTP request and dispatches to the appropriate handler.
fn handle_request<S: StarSource>(
    stream: &TcpStream,
    handler: &ChartHandler<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Parse: "GET /path?query HTTP/1.x"
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return send_text(stream, 400, "Bad Request");
    }
    let (method, target) = (parts[0], parts[1]);
    let path = target.split_once('?').map_or(target, |(p, _)| p);

    // Drain remaining headers (we don't need them)
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
    }

    if method != "GET" {
        return send_text(stream, 405, "Method Not Allowed");
    }

    match parse_route(path) {
        Route::Health => send_text(stream, 200, "ok"),
        Route::Chart { owner, repo } => {
            let response = handler.handle(owner, repo);
            let name = format!("{owner}/{repo}");
            tracing::info!(repo = %name, status = response.status, "served chart");
            send_response(stream, &response)
        }
        Route::NotFound => send_text(stream, 404, "Not Found"),
    }
}

/// Maps a request path to a [`Route`].
fn parse_route(path: &str) -> Route<'_> {
    if path == "/health" {
        return Route::Health;
    }

    let Some(rest) = path.strip_prefix('/') else {
        return Route::NotFound;
    };
    let Some((owner, repo)) = rest.split_once('/') else {
        return Route::NotFound;
    };
    match repo.strip_suffix(".svg") {
        Some(repo) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Route::Chart { owner, repo }
        }
        _ => Route::NotFound,
    }
}

/// Sends a plain-text response.
fn send_text(stream: &TcpStream, status: u16, body: &str) -> Result<(), Box<dyn std::error::Error>> {
    let response = ChartResponse {
        status,
        headers: vec![("content-type".to_string(), TEXT_CONTENT_TYPE.to_string())],
        body: body.as_bytes().to_vec(),
    };
    send_response(stream, &response)
}

/// Writes `response` as an HTTP/1.1 message and closes the exchange.
fn send_response(
    mut stream: &TcpStream,
    response: &ChartResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let status_text = match response.status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    };

    let mut head = format!("HTTP/1.1 {} {status_text}\r\n", response.status);
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n",
        response.body.len()
    ));

    stream.write_all(head.as_bytes())?;
    stream.write_all(&response.body)?;
    stream.flush()?;
    Ok(())
}
