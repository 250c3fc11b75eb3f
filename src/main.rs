// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG)
// 2. Parse and validate the command-line arguments
// 3. Recreate the output directory
// 4. Run the crawl session: crawl -> download -> manifest
// 5. Print how many images were saved, plus any issues we hit on the way
// 6. Exit with proper code (0 = run completed, 2 = could not run)
//
// Nothing touches the disk or the network until step 2 has succeeded.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated run settings
mod crawl; // src/crawl/ - traversal, extraction, index
mod download; // src/download/ - saving images to disk
mod error; // src/error.rs - recoverable issues and the issue log
mod fetch; // src/fetch/ - HTTP client
mod manifest; // src/manifest.rs - index.json
mod session; // src/session.rs - ties a whole run together

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::CrawlConfig;
use fetch::HttpFetcher;
use session::{CrawlSession, RunReport};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Cannot continue, {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with the final report on stdout.
// Default level is info; try RUST_LOG=image_crawler=debug for progress.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    run_with(Cli::parse()).await
}

// This is the main application logic
// Returns:
//   Ok(0) = run completed (some images may have been skipped)
//   Ok(2) = bad arguments, nothing was done
//   Err   = fatal error during setup or while writing the manifest
async fn run_with(cli: Cli) -> Result<i32> {
    let config = match CrawlConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Cannot continue, {}", e);
            return Ok(2);
        }
    };

    let fetcher = HttpFetcher::new(&config.fetch).context("failed to build HTTP client")?;
    download::prepare_output_dir(&config.output_dir)?;

    println!("🔍 Crawling: {}", config.start_url);
    println!("📊 Max crawl depth: {}", config.max_depth);

    let report = CrawlSession::new(config).run(&fetcher).await?;
    print_report(&report);

    Ok(0)
}

fn print_report(report: &RunReport) {
    println!(
        "📄 Processed {} page(s), found {} image reference(s)",
        report.pages_processed, report.images_found
    );
    println!("🗂️  Manifest: {}", report.manifest_path.display());

    if report.issues.is_empty() {
        println!(
            "\n✅ Process completed successfully. {} images were downloaded.",
            report.downloaded
        );
    } else {
        println!(
            "\n⚠️  Process completed, {} images were downloaded. Following issues found:",
            report.downloaded
        );
        for issue in &report.issues {
            println!("{}", issue);
        }
    }
}
