// src/download/naming.rs
// =============================================================================
// Where does an image go on disk?
//
// 1. file_name_from_url: "https://a.test/img/logo.png?v=2" -> "logo.png"
// 2. PathReserver::reserve: "logo.png" -> images/logo.png, or
//    images/qwert-logo.png if that name is already taken
//
// Reservation happens under a lock and remembers every path it handed out,
// so two downloads running at the same time can never pick the same name,
// even before either file exists on disk.
// =============================================================================

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::crawl::url_path;

/// Length of the random prefix added to colliding names.
const PREFIX_LEN: usize = 5;

// Derives a file name from the last path segment of an image URL
//
// Returns None when there is no usable name: an empty last segment
// ("https://a.test/img/"), "." or "..", or characters that are not allowed
// in file names on common filesystems.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let name = url_path(url).rsplit('/').next()?.trim();

    if name.is_empty() || name == "." || name == ".." || name.chars().any(is_forbidden) {
        return None;
    }

    Some(name.to_string())
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}')
}

// Hands out unique save paths inside one directory
#[derive(Debug)]
pub struct PathReserver {
    dir: PathBuf,
    reserved: Mutex<HashSet<PathBuf>>,
}

impl PathReserver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reserved: Mutex::new(HashSet::new()),
        }
    }

    // Picks a path for `name` that no file and no earlier reservation uses.
    //
    // The plain name is tried first; after that, random lowercase prefixes
    // ("abcde-name") until a free one turns up.
    pub fn reserve(&self, name: &str) -> PathBuf {
        // A poisoned lock only means another download panicked; the set
        // itself is still consistent.
        let mut reserved = self.reserved.lock().unwrap_or_else(PoisonError::into_inner);

        let mut candidate = self.dir.join(name);
        while reserved.contains(&candidate) || candidate.exists() {
            candidate = self.dir.join(format!("{}-{}", random_prefix(), name));
        }

        reserved.insert(candidate.clone());
        candidate
    }
}

fn random_prefix() -> String {
    (0..PREFIX_LEN).map(|_| fastrand::lowercase()).collect()
}
