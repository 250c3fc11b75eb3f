// src/crawl/classify.rs
// =============================================================================
// "Does this URL point at an image?" - decided purely by file extension.
// =============================================================================

/// Extensions we download, compared lower-cased.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "bmp", "png", "ico", "webp", "gif", "tiff"];

// Looks at the last path segment of the URL (query string and fragment
// removed) and checks the text after its last '.'.
//
// Works for absolute and relative URLs alike:
//   "https://a.test/img/Logo.PNG?v=2" -> true
//   "pic.png"                         -> true
//   "https://a.test/page"             -> false (no extension)
//   ""                                -> false
pub fn is_image_url(url: &str) -> bool {
    let path = url_path(url);
    let last_segment = path.rsplit('/').next().unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, extension)) => {
            let extension = extension.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&extension.as_str())
        }
        None => false,
    }
}

// Path part of an absolute, protocol-relative or relative URL, without
// query string and fragment. The host never counts as a path.
pub(crate) fn url_path(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or("");

    let after_authority = if let Some((_, rest)) = without_query.split_once("://") {
        Some(rest)
    } else {
        without_query.strip_prefix("//")
    };

    match after_authority {
        Some(rest) => rest.find('/').map_or("", |idx| &rest[idx..]),
        None => without_query,
    }
}
