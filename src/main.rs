//! Phone-Harvest main entry point
//!
//! This is the command-line interface for the Phone-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use phone_harvest::config::{load_config_with_hash, validate, Config};
use phone_harvest::crawler::{Crawler, SearchQuery};
use phone_harvest::output::{
    emit_all, print_statistics, CrawlStatistics, MarkdownReport, OutputHandler, TextReport,
};
use phone_harvest::HarvestError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Phone-Harvest: a one-level phone number crawler
///
/// Phone-Harvest submits a query to a search engine, follows every absolute
/// link on the results page concurrently, and reports the phone numbers
/// found on each page.
#[derive(Parser, Debug)]
#[command(name = "phone-harvest")]
#[command(version)]
#[command(about = "A one-level phone number crawler", long_about = None)]
struct Cli {
    /// Search query (falls back to `search.default-query` from the config)
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Per-fetch timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Maximum number of link fetches in flight
    #[arg(long, value_name = "N")]
    max_concurrency: Option<u32>,

    /// Search endpoint URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Also write a markdown report to this file
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,

    /// Print crawl statistics after the findings
    #[arg(long)]
    summary: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    let query = resolve_query(cli.query.as_deref(), &config)?;

    tracing::info!("Searching for: {}", query);
    let crawler = Crawler::from_config(&config).context("Failed to build HTTP client")?;

    let report = match crawler.run_until(&query, shutdown_signal()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let mut handlers: Vec<Box<dyn OutputHandler>> =
        vec![Box::new(TextReport::new(std::io::stdout()))];
    if let Some(path) = &config.output.markdown_path {
        handlers.push(Box::new(MarkdownReport::new(path)));
    }
    emit_all(&mut handlers, &report).context("Failed to write report")?;

    if cli.summary {
        println!();
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    if !report.is_complete() {
        tracing::warn!("Crawl was interrupted; the report is partial");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("phone_harvest=info,warn"),
            1 => EnvFilter::new("phone_harvest=debug,info"),
            2 => EnvFilter::new("phone_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if given, applies CLI overrides, and validates
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawler.fetch_timeout_ms = timeout_ms;
    }
    if let Some(max) = cli.max_concurrency {
        config.crawler.max_concurrent_fetches = max;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.search.endpoint = endpoint.clone();
    }
    if let Some(path) = &cli.markdown {
        config.output.markdown_path = Some(path.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Picks the query from the command line, else from the config default
///
/// A blank command-line query counts as absent.
fn resolve_query(cli_query: Option<&str>, config: &Config) -> Result<SearchQuery, HarvestError> {
    let cli_query = cli_query.filter(|query| !query.trim().is_empty());
    match cli_query.or(config.search.default_query.as_deref()) {
        Some(query) => SearchQuery::new(query),
        None => Err(HarvestError::EmptyQuery),
    }
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::warn!("Interrupt received, stopping outstanding fetches"),
        Err(e) => {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}
