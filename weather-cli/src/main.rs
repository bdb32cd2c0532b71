//! Binary crate for the `weather` dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering the dashboard panel and driving refreshes

use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod cli;
mod render;
mod watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `show --json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// `RUST_LOG` directives, falling back to `warn` so refresh failures are visible.
fn log_filter(directives: Option<String>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn log_filter_honours_directives() {
        let filter = log_filter(Some("debug".to_string()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
