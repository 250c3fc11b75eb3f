// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   crawl <START_URL> <DEPTH> [--output-dir images] [--concurrency 8]
//                             [--timeout 10] [--user-agent UA]
//
// clap only checks the *shape* of the input here (is DEPTH an integer?).
// The real validation (URL has a host, depth within 1..=5) lives in
// config.rs so that it can be unit tested and reported uniformly.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "crawl",
    version = "0.1.0",
    about = "Crawl a website and download every image it references",
    long_about = "crawl starts at a URL, follows links breadth-first up to the given depth \
                  and downloads each image it discovers exactly once, writing an index.json \
                  manifest recording where every image was found."
)]
pub struct Cli {
    /// Website URL to start crawling from (e.g., https://example.com)
    pub start_url: String,

    /// How many levels of links to follow (1 = just the start page, max 5)
    ///
    /// Kept as a signed integer so that out-of-range values such as 0
    /// reach our own validation and get a helpful message.
    #[arg(allow_negative_numbers = true)]
    pub depth: i64,

    /// Directory for downloaded images; removed and recreated on every run
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Maximum number of pages or images fetched at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}
