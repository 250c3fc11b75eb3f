// src/config.rs
// =============================================================================
// This module turns raw command-line input into a validated CrawlConfig.
//
// Everything is checked here, BEFORE the output directory is touched or a
// single request is sent. A bad argument means we report and stop with no
// side effects at all.
//
// Rules:
// - The start URL must have a scheme and a host (trailing '/' is trimmed)
// - Depth must be between 1 and MAX_DEPTH (values above are rejected, never
//   clamped)
// - Concurrency must be at least 1
// - The request timeout must be at least one second
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cli::Cli;
use crate::crawl::is_valid_url;
use crate::fetch::FetchSettings;

/// Deepest crawl we accept. Depth 1 is the start page alone.
pub const MAX_DEPTH: u32 = 5;

/// Name of the directory images and the manifest are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "images";

/// How many pages or images we fetch at the same time by default.
pub const DEFAULT_CONCURRENCY: usize = 8;

// Problems with the arguments the operator gave us.
// All of these are fatal: the run stops before any work begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wrong url provided: '{0}'")]
    InvalidUrl(String),

    #[error("wrong depth value provided ({depth}), use an integer between 1 and {max}")]
    DepthOutOfRange { depth: i64, max: u32 },

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("timeout must be at least 1 second")]
    ZeroTimeout,
}

// The validated settings for one run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URL, without trailing slashes
    pub start_url: String,
    /// Pages at this depth are still scanned, but their links are not followed
    pub max_depth: u32,
    /// Recreated from scratch at the start of every run
    pub output_dir: PathBuf,
    /// Upper bound on parallel fetches (pages per wave, images in flight)
    pub concurrency: usize,
    pub fetch: FetchSettings,
}

impl CrawlConfig {
    // Validates the two positional arguments and builds a config with defaults
    // for everything else.
    pub fn new(start_url: &str, depth: i64) -> Result<Self, ConfigError> {
        let start_url = start_url.trim().trim_end_matches('/').to_string();
        if !is_valid_url(&start_url) {
            return Err(ConfigError::InvalidUrl(start_url));
        }

        if !(1..=i64::from(MAX_DEPTH)).contains(&depth) {
            return Err(ConfigError::DepthOutOfRange {
                depth,
                max: MAX_DEPTH,
            });
        }

        Ok(Self {
            start_url,
            max_depth: depth as u32,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            fetch: FetchSettings::default(),
        })
    }

    // Builds the config from everything the user typed, optional flags included
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if cli.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut config = Self::new(&cli.start_url, cli.depth)?
            .with_output_dir(cli.output_dir.clone())
            .with_concurrency(cli.concurrency);
        config.fetch.request_timeout = Duration::from_secs(cli.timeout);
        if let Some(agent) = &cli.user_agent {
            config.fetch.user_agent = agent.clone();
        }

        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}
