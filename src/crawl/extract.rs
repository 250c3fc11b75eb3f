// src/crawl/extract.rs
// =============================================================================
// This module pulls hyperlinks and image references out of a parsed page.
//
// Images are found three independent ways, and all results are kept:
// 1. <img> tags: the first present of data-srcset, data-src,
//    data-fallback-src, src (lazy-loading sites put the real image in data-*)
// 2. <link> tags: favicons, apple-touch-icons, preloads... via href
// 3. Raw text: any absolute http(s) URL anywhere in the markup, which finds
//    images hidden in inline <script>, <style> or JSON blobs
//
// The same image is usually found more than once (e.g. an absolute <img src>
// also matches the text scan). We don't care here: the CrawlIndex ignores
// repeats.
//
// We use the `scraper` crate for the DOM and CSS selectors, `url` to check
// that link references resolve, and `regex` for the text scan.
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Element;
use scraper::{Html, Selector};
use url::Url;

use super::classify::is_image_url;
use super::validate::normalize_link;
use crate::error::CrawlIssue;

/// Attributes probed on <img>, highest priority first.
pub const IMG_SOURCE_ATTRIBUTES: &[&str] = &["data-srcset", "data-src", "data-fallback-src", "src"];

// These selectors are constants and known to be valid, so a failure here is a
// programmer error.
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid img selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link").expect("valid link selector"));

// Absolute http(s) URLs: alphanumerics, $-_@.&+ and !*(), plus the usual
// path/query punctuation and %XX escapes. Quotes, angle brackets and
// whitespace end a match.
static INLINE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:[a-z0-9$\-_@.&+!*(),/:;=?~#]|%[0-9a-f]{2})+")
        .expect("valid inline url pattern")
});

// One image reference, tagged with where we found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Exactly as written in the page (may be relative)
    pub url: String,
    /// Page the reference was found on
    pub page: String,
    pub depth: u32,
}

// Everything the image scan produced for a single page
#[derive(Debug, Default)]
pub struct PageImages {
    pub candidates: Vec<ImageCandidate>,
    pub issues: Vec<CrawlIssue>,
}

// Extracts every followable hyperlink from a page
//
// Only absolute URLs with a scheme and a host are returned, normalized and
// without fragment; relative hrefs, mailto:, javascript: etc. are dropped.
// Duplicates are left in - the Frontier decides what is new.
pub fn extract_links(document: &Html) -> Vec<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| normalize_link(href.trim()))
        .collect()
}

// Runs all three image strategies over a page
//
// Parameters:
//   document: the parsed page
//   page_url: URL the page was fetched from (the "parent" of every image)
//   depth: depth of the page; recorded with every image found on it
pub fn extract_images(document: &Html, page_url: &str, depth: u32) -> PageImages {
    let mut found = PageImages::default();
    let push = |found: &mut PageImages, url: &str| {
        found.candidates.push(ImageCandidate {
            url: url.to_string(),
            page: page_url.to_string(),
            depth,
        });
    };

    for url in img_tag_images(document) {
        push(&mut found, url);
    }

    let base = Url::parse(page_url).ok();
    for href in document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| is_image_url(href))
    {
        let resolves = base.as_ref().map(|base| base.join(href));
        match resolves {
            Some(Ok(_)) => push(&mut found, href),
            Some(Err(e)) => found.issues.push(CrawlIssue::Extraction {
                page: page_url.to_string(),
                href: href.to_string(),
                reason: e.to_string(),
            }),
            None => found.issues.push(CrawlIssue::Extraction {
                page: page_url.to_string(),
                href: href.to_string(),
                reason: "page url cannot be used as a base".to_string(),
            }),
        }
    }

    for url in inline_images(&document.html()) {
        push(&mut found, &url);
    }

    found
}

// Strategy 1: <img> tags
fn img_tag_images(document: &Html) -> Vec<&str> {
    document
        .select(&IMG_SELECTOR)
        .filter_map(|element| first_present(element.value(), IMG_SOURCE_ATTRIBUTES))
        .filter(|url| is_image_url(url))
        .collect()
}

// Returns the value of the first attribute in `names` the element has.
// An attribute that is present but empty still wins.
fn first_present<'a>(element: &'a Element, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| element.attr(name))
}

// Strategy 3: absolute URLs in the raw markup text
fn inline_images(text: &str) -> Vec<String> {
    INLINE_URL
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| is_image_url(url))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "http://example.test/blog/";

    fn urls(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        extract_images(&document, PAGE, 2)
            .candidates
            .into_iter()
            .map(|c| c.url)
            .collect()
    }

    #[test]
    fn test_img_src_is_found() {
        let found = urls(r#"<img src="pic.png">"#);
        assert_eq!(found, vec!["pic.png"]);
    }

    #[test]
    fn test_lazy_load_attribute_wins_over_src() {
        let found = urls(r#"<img data-src="real.jpg" src="placeholder.gif">"#);
        assert_eq!(found, vec!["real.jpg"]);
    }

    #[test]
    fn test_first_present_attribute_wins_even_if_not_an_image() {
        // data-srcset is present, so src is never looked at
        let found = urls(r#"<img data-srcset="a.png 1x, b.png 2x" src="c.png">"#);
        assert!(found.is_empty());
    }

    #[test]
    fn test_img_without_attributes_contributes_nothing() {
        assert!(urls(r#"<img alt="nothing here"><img src="">"#).is_empty());
    }

    #[test]
    fn test_link_tag_icons_are_found() {
        let found = urls(
            r#"<head>
                <link rel="icon" href="/favicon.ico">
                <link rel="stylesheet" href="/site.css">
                <link rel="preload">
            </head>"#,
        );
        assert_eq!(found, vec!["/favicon.ico"]);
    }

    #[test]
    fn test_inline_script_urls_are_found() {
        let found = urls(
            r#"<script>var hero = "https://cdn.example.test/hero.webp";
               var api = "https://api.example.test/data.json";</script>"#,
        );
        assert_eq!(found, vec!["https://cdn.example.test/hero.webp"]);
    }

    #[test]
    fn test_absolute_img_is_found_by_two_strategies() {
        let found = urls(r#"<img src="https://example.test/a.gif">"#);
        assert_eq!(
            found,
            vec!["https://example.test/a.gif", "https://example.test/a.gif"]
        );
    }

    #[test]
    fn test_candidates_carry_page_and_depth() {
        let document = Html::parse_document(r#"<img src="x.bmp">"#);
        let found = extract_images(&document, PAGE, 4);
        assert_eq!(
            found.candidates,
            vec![ImageCandidate {
                url: "x.bmp".to_string(),
                page: PAGE.to_string(),
                depth: 4,
            }]
        );
        assert!(found.issues.is_empty());
    }

    #[test]
    fn test_unresolvable_link_href_is_reported_and_skipped() {
        let document = Html::parse_document(
            r#"<link rel="icon" href="http://[broken/icon.png"><img src="ok.png">"#,
        );
        let found = extract_images(&document, PAGE, 1);
        assert_eq!(found.candidates.len(), 1);
        assert_eq!(found.candidates[0].url, "ok.png");
        assert_eq!(found.issues.len(), 1);
        assert_eq!(found.issues[0].kind(), "extraction");
    }

    #[test]
    fn test_extract_links_keeps_only_absolute_urls() {
        let document = Html::parse_document(
            r##"
            <a href="https://example.test/about#team">About</a>
            <a href="/relative">Relative</a>
            <a href="mailto:hi@example.test">Mail</a>
            <a href="#top">Top</a>
            <a>No href</a>
            "##,
        );
        assert_eq!(extract_links(&document), vec!["https://example.test/about"]);
    }
}
