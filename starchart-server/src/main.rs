//! starchart — serves GitHub star-history charts as SVG.
//!
//! `starchart serve` runs the HTTP server; `starchart render` writes a
//! single repository's chart to a file or stdout.

mod api;

use std::io::Write;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use starchart::github::{DEFAULT_API_URL, GitHub, GitHubConfig};
use starchart::{ChartHandler, TracingObserver};
use tracing_subscriber::EnvFilter;

/// starchart — GitHub star-history charts as SVG.
#[derive(Parser)]
#[command(name = "starchart", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Serve charts over HTTP at `GET /{owner}/{repo}.svg`.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on.
        #[arg(long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Worker threads serving requests.
        #[arg(long, default_value = "8")]
        workers: usize,

        #[command(flatten)]
        github: GitHubArgs,
    },

    /// Render one repository's chart.
    Render {
        /// Repository as `owner/repo`.
        repo: String,

        /// Output file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        github: GitHubArgs,
    },
}

/// GitHub client options shared by all commands.
#[derive(Args)]
struct GitHubArgs {
    /// GitHub access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api: String,

    /// Refuse repositories with more stargazers than this.
    #[arg(long, default_value = "40000")]
    max_stars: u64,

    /// Per-request timeout against the GitHub API, in seconds.
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

impl GitHubArgs {
    fn build(self) -> Result<GitHub, Box<dyn std::error::Error>> {
        let mut config = GitHubConfig::new()
            .with_api_url(self.github_api)
            .with_max_stars(self.max_stars)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(token) = self.github_token {
            config = config.with_token(token);
        }
        Ok(GitHub::new(config)?)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            bind,
            port,
            workers,
            github,
        } => cmd_serve(&bind, port, workers, github),
        Commands::Render {
            repo,
            output,
            github,
        } => cmd_render(&repo, output, github),
    };

    if let Err(e) = result {
        tracing::error!("starchart failed: {e}");
        std::process::exit(1);
    }
}

/// Implements `starchart serve`.
fn cmd_serve(
    bind: &str,
    port: u16,
    workers: usize,
    github: GitHubArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let handler = Arc::new(ChartHandler::new(github.build()?, Arc::new(TracingObserver)));

    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr)?;
    tracing::info!("listening on {addr} with {workers} workers");

    api::run_api_server(listener, handler, workers);
    Ok(())
}

/// Implements `starchart render <owner/repo>`.
fn cmd_render(
    repo: &str,
    output: Option<PathBuf>,
    github: GitHubArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (owner, name) = repo
        .split_once('/')
        .ok_or_else(|| format!("expected owner/repo, got '{repo}'"))?;

    let handler = ChartHandler::new(github.build()?, Arc::new(TracingObserver));
    let response = handler.handle(owner, name);
    if response.status != 200 {
        return Err(format!(
            "status {}: {}",
            response.status,
            String::from_utf8_lossy(&response.body)
        )
        .into());
    }

    match output {
        Some(path) => {
            std::fs::write(&path, &response.body)?;
            tracing::info!("wrote {}", path.display());
        }
        None => std::io::stdout().write_all(&response.body)?,
    }
    Ok(())
}
