// src/crawl/validate.rs
// =============================================================================
// "Is this string a well-formed absolute URL?"
//
// A URL is accepted only if it parses AND has both a scheme and a host.
// Relative links like "/docs" or scheme-only links like "mailto:a@b.c" fail.
// =============================================================================

use url::Url;

pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

// Canonical form of a followable link, used as the frontier key.
//
// The url crate normalizes the spelling ("HTTP://A.test" and "http://a.test/"
// become the same string) and the "#fragment" is dropped, since "page#top"
// and "page" are the same document.
//
// Returns: None if the link is not a valid absolute URL
pub fn normalize_link(link: &str) -> Option<String> {
    if !is_valid_url(link) {
        return None;
    }
    let mut url = Url::parse(link).ok()?;
    url.set_fragment(None);
    Some(url.to_string())
}
