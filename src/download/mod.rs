// src/download/mod.rs
// =============================================================================
// This module downloads every image in the CrawlIndex.
//
// For each (image, page) entry:
// 1. Derive a file name from the image URL        -> Naming issue if not
// 2. Resolve the image URL against its page       -> Unresolvable if not
//    (handles "pic.png", "/img/pic.png", "//cdn.test/pic.png")
// 3. Fetch the bytes                              -> ImageFetch issue on error
//    or on a non-2xx status
// 4. Refuse bodies that are plain text            -> NonImageContent
// 5. Reserve a collision-free path and write      -> Persistence on error
// 6. Mark the entry as downloaded
//
// Entries are independent: one failure never affects another, and nothing
// is retried. Downloads run concurrently (up to `concurrency` at a time), but
// only this module's caller mutates the index, one finished result at a time.
// =============================================================================

mod naming;
mod storage;

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use url::Url;

use crate::crawl::{CrawlIndex, IndexKey};
use crate::error::{CrawlIssue, IssueLog};
use crate::fetch::{FetchError, HttpFetcher};

pub use naming::{file_name_from_url, PathReserver};
pub use storage::{is_text, prepare_output_dir};

pub struct Downloader<'a> {
    fetcher: &'a HttpFetcher,
    reserver: PathReserver,
    concurrency: usize,
}

impl<'a> Downloader<'a> {
    pub fn new(fetcher: &'a HttpFetcher, output_dir: &Path, concurrency: usize) -> Self {
        Self {
            fetcher,
            reserver: PathReserver::new(output_dir),
            concurrency: concurrency.max(1),
        }
    }

    // Drains the index: tries every entry that is not downloaded yet.
    //
    // Returns: how many images were saved by this call
    pub async fn run(&self, index: &mut CrawlIndex, issues: &mut IssueLog) -> usize {
        let keys: Vec<IndexKey> = index
            .entries()
            .filter(|(_, entry)| !entry.downloaded)
            .map(|(key, _)| key.clone())
            .collect();
        let total = keys.len();

        let mut results = stream::iter(keys.into_iter().enumerate())
            .map(|(i, key)| async move {
                tracing::debug!(
                    image = %key.image_url,
                    "downloading image {} out of {}",
                    i + 1,
                    total
                );
                let outcome = self.download_one(&key).await;
                (key, outcome)
            })
            .buffer_unordered(self.concurrency);

        let mut saved = 0;
        while let Some((key, outcome)) = results.next().await {
            match outcome {
                Ok(path) => {
                    tracing::debug!(image = %key.image_url, path = %path.display(), "image saved");
                    index.mark_downloaded(&key);
                    saved += 1;
                }
                Err(issue) => issues.record(issue),
            }
        }

        tracing::info!(saved, total, "download phase finished");
        saved
    }

    // Runs steps 1-5 for one entry. Never touches the index.
    async fn download_one(&self, key: &IndexKey) -> Result<PathBuf, CrawlIssue> {
        let name = file_name_from_url(&key.image_url).ok_or_else(|| CrawlIssue::Naming {
            url: key.image_url.clone(),
        })?;

        let resolved = Url::parse(&key.page_url)
            .and_then(|page| page.join(&key.image_url))
            .map_err(|_| CrawlIssue::Unresolvable {
                url: key.image_url.clone(),
                page: key.page_url.clone(),
            })?;

        let fetched = self
            .fetcher
            .get(resolved.as_str())
            .await
            .map_err(|source| CrawlIssue::ImageFetch {
                url: resolved.to_string(),
                source,
            })?;
        if !fetched.is_success() {
            return Err(CrawlIssue::ImageFetch {
                url: resolved.to_string(),
                source: FetchError::HttpStatus(fetched.status),
            });
        }

        tracing::trace!(
            url = %resolved,
            content_type = ?fetched.content_type,
            bytes = fetched.bytes.len(),
            "image fetched"
        );
        if is_text(&fetched.bytes) {
            return Err(CrawlIssue::NonImageContent {
                url: resolved.to_string(),
            });
        }

        let path = self.reserver.reserve(&name);
        tokio::fs::write(&path, &fetched.bytes)
            .await
            .map_err(|source| CrawlIssue::Persistence {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchSettings;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchSettings::default()).unwrap()
    }

    async fn serve(server: &MockServer, at: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_relative_image_is_resolved_and_saved() {
        let server = MockServer::start().await;
        serve(&server, "/img/pic.png", ResponseTemplate::new(200).set_body_bytes(PNG)).await;

        let dir = TempDir::new().unwrap();
        let mut index = CrawlIndex::new();
        let page = format!("{}/blog/post", server.uri());
        index.record("../img/pic.png", &page, 1);

        let fetcher = fetcher();
        let mut issues = IssueLog::new();
        let saved = Downloader::new(&fetcher, dir.path(), 4)
            .run(&mut index, &mut issues)
            .await;

        assert_eq!(saved, 1);
        assert!(issues.is_empty());
        assert_eq!(std::fs::read(dir.path().join("pic.png")).unwrap(), PNG);
        assert!(index.get(&IndexKey::new("../img/pic.png", &page)).unwrap().downloaded);
    }

    #[tokio::test]
    async fn test_text_body_is_not_saved() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/missing.png",
            ResponseTemplate::new(200).set_body_string("<html>Not Found</html>"),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let mut index = CrawlIndex::new();
        index.record("/missing.png", &server.uri(), 1);

        let fetcher = fetcher();
        let mut issues = IssueLog::new();
        let saved = Downloader::new(&fetcher, dir.path(), 1)
            .run(&mut index, &mut issues)
            .await;

        assert_eq!(saved, 0);
        assert_eq!(issues.len(), 1);
        assert!(issues.entries()[0].contains("not an image"));
        assert_eq!(index.downloaded().count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_logged_and_skipped() {
        let server = MockServer::start().await;
        serve(&server, "/gone.png", ResponseTemplate::new(404)).await;
        serve(&server, "/ok.png", ResponseTemplate::new(200).set_body_bytes(PNG)).await;

        let dir = TempDir::new().unwrap();
        let mut index = CrawlIndex::new();
        index.record("/gone.png", &server.uri(), 1);
        index.record("/ok.png", &server.uri(), 1);

        let fetcher = fetcher();
        let mut issues = IssueLog::new();
        let saved = Downloader::new(&fetcher, dir.path(), 2)
            .run(&mut index, &mut issues)
            .await;

        assert_eq!(saved, 1);
        assert_eq!(issues.len(), 1);
        assert!(issues.entries()[0].contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_entry_without_file_name_is_skipped_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut index = CrawlIndex::new();
        index.record(&format!("{}/folder/", server.uri()), &server.uri(), 1);

        let fetcher = fetcher();
        let mut issues = IssueLog::new();
        let saved = Downloader::new(&fetcher, dir.path(), 1)
            .run(&mut index, &mut issues)
            .await;

        assert_eq!(saved, 0);
        assert_eq!(issues.len(), 1);
        assert!(issues.entries()[0].contains("image name"));
    }

    #[tokio::test]
    async fn test_same_name_from_two_urls_keeps_both_files() {
        let server = MockServer::start().await;
        serve(&server, "/a/logo.png", ResponseTemplate::new(200).set_body_bytes(PNG)).await;
        serve(
            &server,
            "/b/logo.png",
            ResponseTemplate::new(200).set_body_bytes(&[0xFF, 0xD8, 0xFF, 0xE0][..]),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let mut index = CrawlIndex::new();
        index.record("/a/logo.png", &server.uri(), 1);
        index.record("/b/logo.png", &server.uri(), 1);

        let fetcher = fetcher();
        let mut issues = IssueLog::new();
        let saved = Downloader::new(&fetcher, dir.path(), 2)
            .run(&mut index, &mut issues)
            .await;

        assert_eq!(saved, 2);
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"logo.png".to_string()));
        assert!(names.iter().any(|n| n.len() == 14 && n.ends_with("-logo.png")));
    }

    #[tokio::test]
    async fn test_write_failure_leaves_entry_pending() {
        let server = MockServer::start().await;
        serve(&server, "/pic.png", ResponseTemplate::new(200).set_body_bytes(PNG)).await;

        let root = TempDir::new().unwrap();
        let missing_dir = root.path().join("does-not-exist");
        let mut index = CrawlIndex::new();
        index.record("/pic.png", &server.uri(), 1);

        let fetcher = fetcher();
        let mut issues = IssueLog::new();
        let saved = Downloader::new(&fetcher, &missing_dir, 1)
            .run(&mut index, &mut issues)
            .await;

        assert_eq!(saved, 0);
        assert_eq!(issues.len(), 1);
        assert!(issues.entries()[0].contains("Error saving image"));
        assert_eq!(index.downloaded().count(), 0);
    }
}
