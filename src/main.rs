//! mezzofy-crawler main entry point
//!
//! This is the command-line interface: serve the HTTP API, run a one-off
//! crawl, list stored pages, or check a configuration file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mezzofy_crawler::config::{load_config_with_hash, Config};
use mezzofy_crawler::storage::{open_storage, PageFilter};
use mezzofy_crawler::{api, crawler, ScopeValidator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mezzofy crawler: single-domain content crawler with a search API
///
/// Crawls one domain breadth-first, keeps pages that mention any of the
/// configured keywords, and serves them over HTTP.
#[derive(Parser, Debug)]
#[command(name = "mezzofy-crawler")]
#[command(version)]
#[command(about = "Single-domain content crawler with a search API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,

    /// Run a single crawl and print the summary as JSON
    Crawl {
        /// Seed URL (defaults to the configured start URL)
        #[arg(long)]
        start_url: Option<String>,

        /// Maximum number of pages to visit
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Print stored pages as JSON
    Pages {
        /// Case-insensitive search across title, description, snippet and keywords
        #[arg(short = 'Q', long)]
        query: Option<String>,

        /// Maximum number of pages to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Validate the configuration and show what would be crawled
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => handle_serve(&config).await,
        Command::Crawl {
            start_url,
            max_pages,
        } => handle_crawl(&config, start_url.as_deref(), max_pages).await,
        Command::Pages { query, limit } => handle_pages(&config, query.as_deref(), limit),
        Command::Check => handle_check(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` wins over the verbosity flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "mezzofy_crawler=info,warn",
            1 => "mezzofy_crawler=debug,tower_http=debug,info",
            2 => "mezzofy_crawler=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// The PORT environment variable overrides the configured port
fn apply_env_overrides(config: &mut Config) -> anyhow::Result<()> {
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("invalid PORT value '{}'", port))?;
    }
    Ok(())
}

async fn handle_serve(config: &Config) -> anyhow::Result<()> {
    let store = open_storage(&config.storage);
    api::serve(config, store).await?;
    Ok(())
}

async fn handle_crawl(
    config: &Config,
    start_url: Option<&str>,
    max_pages: Option<usize>,
) -> anyhow::Result<()> {
    let summary = crawler::crawl(config, start_url, max_pages).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn handle_pages(config: &Config, query: Option<&str>, limit: Option<usize>) -> anyhow::Result<()> {
    let store = open_storage(&config.storage);
    let limit = limit.unwrap_or(config.server.default_page_limit);

    let pages = store
        .query(&PageFilter::search(query), limit)
        .unwrap_or_else(|e| {
            tracing::warn!("Page query failed, showing no pages: {}", e);
            Vec::new()
        });

    println!("{}", serde_json::to_string_pretty(&pages)?);
    Ok(())
}

fn handle_check(config: &Config) -> anyhow::Result<()> {
    let scope = ScopeValidator::new(&config.crawler.root_domain);

    println!("=== mezzofy-crawler configuration ===\n");

    println!("Crawler:");
    println!("  Root domain: {}", scope.root_domain());
    println!("  Default start URL: {}", config.crawler.default_start_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Source tag: {}", config.crawler.source);
    println!("  Keywords ({}): {}", config.crawler.keywords.len(), config.crawler.keywords.join(", "));

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nStorage:");
    match &config.storage.database_path {
        Some(path) => println!("  Database: {}", path),
        None => println!("  Database: none (pages will not be persisted)"),
    }

    println!("\nServer:");
    println!("  App name: {}", config.server.app_name);
    println!("  Address: {}:{}", config.server.host, config.server.port);
    if config.server.allowed_origins.is_empty() {
        println!("  CORS: any origin");
    } else {
        println!("  CORS: {}", config.server.allowed_origins.join(", "));
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
