// src/error.rs
// =============================================================================
// Recoverable problems that can happen during a run, and the log that
// collects them.
//
// None of these stop the crawl. Each one is:
// 1. emitted as a tracing event (with structured fields), and
// 2. appended as a plain sentence to the IssueLog, which is printed once at
//    the very end of the run.
//
// Fatal problems (bad arguments, cannot create the output directory) are NOT
// here - see config.rs and main.rs.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum CrawlIssue {
    /// A page could not be fetched; it is marked as processed and skipped
    #[error("Error fetching page content. {source}. page is {url}")]
    PageFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// An image could not be fetched
    #[error("Error fetching image content. {source}. image is {url}")]
    ImageFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// A <link> element had an unusable reference
    #[error("Error fetching image path. {reason}. image link is {href} (page {page})")]
    Extraction {
        page: String,
        href: String,
        reason: String,
    },

    /// No file name could be derived from the image URL
    #[error("Error fetching image name. image link is {url}")]
    Naming { url: String },

    /// The image link could not be resolved against the page it came from
    #[error("Error resolving image link {url} against page {page}")]
    Unresolvable { url: String, page: String },

    /// The server answered with text (usually an HTML error page)
    #[error("Error saving image. Either link is not an image or image not found. image link is {url}")]
    NonImageContent { url: String },

    /// Writing the bytes to disk failed
    #[error("Error saving image. error is: {source}. image path is {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrawlIssue {
    // Short, stable name used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            CrawlIssue::PageFetch { .. } => "page_fetch",
            CrawlIssue::ImageFetch { .. } => "image_fetch",
            CrawlIssue::Extraction { .. } => "extraction",
            CrawlIssue::Naming { .. } => "naming",
            CrawlIssue::Unresolvable { .. } => "unresolvable",
            CrawlIssue::NonImageContent { .. } => "non_image_content",
            CrawlIssue::Persistence { .. } => "persistence",
        }
    }
}

// Ordered list of human-readable issue descriptions.
//
// Owned by the CrawlSession; only the task driving the session writes to it.
#[derive(Debug, Default)]
pub struct IssueLog {
    entries: Vec<String>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, issue: CrawlIssue) {
        tracing::warn!(kind = issue.kind(), "{}", issue);
        self.entries.push(issue.to_string());
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_insertion_order() {
        let mut log = IssueLog::new();
        log.record(CrawlIssue::Naming {
            url: "http://example.test/".to_string(),
        });
        log.record(CrawlIssue::NonImageContent {
            url: "http://example.test/a.png".to_string(),
        });

        assert_eq!(log.len(), 2);
        assert!(log.entries()[0].contains("image name"));
        assert!(log.entries()[1].contains("a.png"));
    }

    #[test]
    fn test_page_fetch_message_mentions_url_and_cause() {
        let issue = CrawlIssue::PageFetch {
            url: "http://example.test/x".to_string(),
            source: FetchError::HttpStatus(500),
        };
        let text = issue.to_string();
        assert!(text.contains("http://example.test/x"));
        assert!(text.contains("500"));
        assert_eq!(issue.kind(), "page_fetch");
    }
}
