//! Docscribe main entry point
//!
//! This is the command-line interface for the Docscribe documentation harvester.

use anyhow::Context;
use clap::Parser;
use docscribe::config::{read_config, resolve_config, Config, ConfigOverrides};
use docscribe::crawler::Coordinator;
use docscribe::output::{load_documents, print_report};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Docscribe: a documentation-site harvester
///
/// Docscribe crawls one documentation site, extracts the prose and code
/// blocks of every article page, and writes them to numbered batch files
/// ready for a retrieval pipeline.
#[derive(Parser, Debug)]
#[command(name = "docscribe")]
#[command(version)]
#[command(about = "A documentation-site harvester", long_about = None)]
struct Cli {
    /// Base URL of the documentation site (overrides the config file)
    #[arg(value_name = "BASE_URL")]
    base_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving the batch files (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume an interrupted crawl (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, discarding any checkpoint
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long, conflicts_with = "inspect")]
    dry_run: bool,

    /// Load the batch files in the output directory and list their documents
    #[arg(long, conflicts_with = "dry_run")]
    inspect: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let overrides = ConfigOverrides {
        base_url: cli.base_url.clone(),
        output_directory: cli.output.clone(),
    };

    if cli.inspect {
        return handle_inspect(cli.config.as_deref(), overrides);
    }

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = resolve_config(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docscribe=info,warn"),
            1 => EnvFilter::new("docscribe=debug,info"),
            2 => EnvFilter::new("docscribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Docscribe Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    println!(
        "\nExcluded Path Segments ({}):",
        config.crawler.excluded_paths.len()
    );
    for segment in &config.crawler.excluded_paths {
        println!("  - {}", segment);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  Batch files: {}",
        docscribe::output::batch_file_name(&config.output.file_prefix, 1)
    );
    println!("  Batch size: {}", config.output.batch_size);
    println!(
        "  Checkpoint: {}",
        if config.output.checkpoint { "enabled" } else { "disabled" }
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --inspect mode: reads back the batch files of a crawl
fn handle_inspect(config_path: Option<&Path>, overrides: ConfigOverrides) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => read_config(path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    if let Some(directory) = overrides.output_directory {
        config.output.directory = directory;
    }

    let directory = Path::new(&config.output.directory);
    let documents = load_documents(directory)
        .with_context(|| format!("Failed to load batch files from {}", directory.display()))?;

    println!("=== Documents in {} ===\n", directory.display());
    for document in &documents {
        println!("{}", document.id);
        println!("  Title: {}", document.title);
        println!(
            "  {} text fragments, {} code blocks, {} characters flattened",
            document.content.text.len(),
            document.content.code_blocks.len(),
            document.flattened().chars().count()
        );
    }
    println!("\nTotal documents: {}", documents.len());

    Ok(())
}

/// Handles the main crawl mode
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (discarding any checkpoint)");
    }

    let mut coordinator = Coordinator::new(config, fresh)?;

    let cancel = coordinator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current page");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    match coordinator.run().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            if let Some(report) = coordinator.last_report() {
                print_report(report);
            }
            Err(e).context("Crawl aborted")
        }
    }
}
