// src/fetch/mod.rs
// =============================================================================
// This module is our only door to the network.
//
// Both the crawler (HTML pages) and the downloader (image bytes) go through
// HttpFetcher::get. It never panics and never "throws": every request ends
// in either Ok(Fetched) or Err(FetchError), and callers decide what to do.
// =============================================================================

mod client;

pub use client::{FetchError, FetchSettings, HttpFetcher};
