// src/crawl/mod.rs
// =============================================================================
// This module holds the crawling building blocks.
//
// Submodules:
// - validate: is a string an absolute URL?
// - classify: does a URL look like an image?
// - extract: hyperlinks and image references from a parsed page
// - index: the deduplicated (image, page) registry
// - frontier: Pending/Done bookkeeping for breadth-first traversal
//
// The loop that ties them together lives in session.rs.
// =============================================================================

mod classify;
mod extract;
mod frontier;
mod index;
mod validate;

pub(crate) use classify::url_path;
pub use extract::{extract_images, extract_links};
pub use frontier::{Frontier, FrontierEntry};
pub use index::{CrawlIndex, IndexKey};
pub use validate::{is_valid_url, normalize_link};
