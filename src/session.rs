// src/session.rs
// =============================================================================
// A CrawlSession is one complete run:
//
//   crawl pages  ->  download images  ->  write manifest  ->  report
//
// It owns all mutable state of the run (Frontier, CrawlIndex, IssueLog) and
// is passed around by &mut, so there is exactly one writer at any time and no
// global state anywhere.
//
// How the crawl works (breadth-first):
// 1. Seed the Frontier with the start URL at depth 1
// 2. Take up to `concurrency` pending pages (oldest first) and fetch them
//    at the same time
// 3. For each fetched page, in order:
//    - fetch failed (timeout, connection error): log it, mark the page
//      Done, move on
//    - any answer that arrived is parsed, error statuses included: a 404
//      page still has links and images
//    - depth < max_depth: enqueue every new absolute link at depth + 1
//    - always: scan the page for images and record them in the index
//    - mark the page Done
// 4. Repeat until nothing is Pending
//
// Pages at max_depth are still fetched and scanned for images - the depth
// limit only stops us from following their links.
// =============================================================================

use std::path::PathBuf;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use scraper::Html;

use crate::config::CrawlConfig;
use crate::crawl::{extract_images, extract_links, normalize_link, CrawlIndex, Frontier, FrontierEntry};
use crate::download::Downloader;
use crate::error::{CrawlIssue, IssueLog};
use crate::fetch::HttpFetcher;
use crate::manifest::{manifest_path, write_manifest};

// What the operator is told at the end of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub downloaded: usize,
    pub pages_processed: usize,
    pub images_found: usize,
    pub manifest_path: PathBuf,
    pub issues: Vec<String>,
}

#[derive(Debug)]
pub struct CrawlSession {
    config: CrawlConfig,
    frontier: Frontier,
    index: CrawlIndex,
    issues: IssueLog,
}

impl CrawlSession {
    pub fn new(config: CrawlConfig) -> Self {
        let seed = normalize_link(&config.start_url).unwrap_or_else(|| config.start_url.clone());

        Self {
            frontier: Frontier::seeded(&seed),
            index: CrawlIndex::new(),
            issues: IssueLog::new(),
            config,
        }
    }

    #[cfg(test)]
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    #[cfg(test)]
    pub fn index(&self) -> &CrawlIndex {
        &self.index
    }

    #[cfg(test)]
    pub fn issues(&self) -> &IssueLog {
        &self.issues
    }

    // Runs the whole pipeline. The output directory must already exist.
    pub async fn run(mut self, fetcher: &HttpFetcher) -> Result<RunReport> {
        self.crawl(fetcher).await;
        self.download(fetcher).await;
        let downloaded = write_manifest(&self.index, &self.config.output_dir)?;

        Ok(RunReport {
            downloaded,
            pages_processed: self.frontier.done_len(),
            images_found: self.index.len(),
            manifest_path: manifest_path(&self.config.output_dir),
            issues: self.issues.into_entries(),
        })
    }

    // Phase 1: visit pages until the Frontier is exhausted
    pub async fn crawl(&mut self, fetcher: &HttpFetcher) {
        let concurrency = self.config.concurrency.max(1);

        while !self.frontier.is_exhausted() {
            let batch = self.frontier.next_batch(concurrency);
            if batch.is_empty() {
                break;
            }

            // `buffered` (not `buffer_unordered`) hands results back in
            // batch order, which keeps the traversal FIFO.
            let fetched: Vec<_> = stream::iter(batch)
                .map(|entry| async move {
                    tracing::debug!(depth = entry.depth, url = %entry.url, "crawling");
                    let result = fetcher.get(&entry.url).await;
                    (entry, result)
                })
                .buffered(concurrency)
                .collect()
                .await;

            for (entry, result) in fetched {
                match result {
                    Ok(page) => {
                        if !page.is_success() {
                            tracing::debug!(url = %entry.url, status = page.status, "scanning error page");
                        }
                        if page.final_url != entry.url {
                            tracing::debug!(from = %entry.url, to = %page.final_url, "redirected");
                        }
                        self.process_page(&entry, &page.text_lossy());
                    }
                    Err(source) => self.issues.record(CrawlIssue::PageFetch {
                        url: entry.url.clone(),
                        source,
                    }),
                }
                self.frontier.mark_done(&entry.url);

                tracing::debug!(
                    unprocessed = self.frontier.pending_len(),
                    processed = self.frontier.done_len(),
                    "frontier updated"
                );
            }
        }

        tracing::info!(
            pages = self.frontier.done_len(),
            images = self.index.len(),
            "crawl phase finished"
        );
    }

    // Steps 3-4 for one page whose body arrived
    pub fn process_page(&mut self, entry: &FrontierEntry, html: &str) {
        let document = Html::parse_document(html);

        if entry.depth < self.config.max_depth {
            let mut added = 0;
            for link in extract_links(&document) {
                if self.frontier.enqueue(&link, entry.depth + 1) {
                    added += 1;
                }
            }
            tracing::trace!(url = %entry.url, added, "links enqueued");
        }

        let found = extract_images(&document, &entry.url, entry.depth);
        for issue in found.issues {
            self.issues.record(issue);
        }
        for candidate in found.candidates {
            self.index
                .record(&candidate.url, &candidate.page, candidate.depth);
        }
    }

    // Phase 2: fetch and save every recorded image
    pub async fn download(&mut self, fetcher: &HttpFetcher) -> usize {
        let downloader =
            Downloader::new(fetcher, &self.config.output_dir, self.config.concurrency);
        downloader.run(&mut self.index, &mut self.issues).await
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `buffered(n)`?
//    - It runs up to n futures at the same time, like buffer_unordered, but
//      yields results in the order the futures were created
//
// 2. Why is process_page not async?
//    - scraper's Html is not Send, and parsing is pure CPU work
//    - Keeping it out of any .await means the parsed document is dropped
//      before the next network call
//
// 3. Why `run(mut self, ...)`?
//    - The session is consumed: after the report is produced there is
//      nothing left to do with it, and into_entries() can move the issue
//      log out without cloning
// -----------------------------------------------------------------------------
