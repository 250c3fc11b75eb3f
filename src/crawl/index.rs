// src/crawl/index.rs
// =============================================================================
// The CrawlIndex: every (image, page it was found on) pair we discovered.
//
// - The key is the PAIR. The same logo found on two pages is two entries,
//   because we want to know every place an image came from.
// - Recording is write-once: the first discovery wins, later ones (even with
//   a different depth) are ignored.
// - Iteration follows insertion order so progress output and the manifest
//   are stable from run to run.
//
// The index is only ever mutated through &mut self, by whoever owns the
// CrawlSession. That makes "check if present, then insert" a single step
// with no room for a race.
// =============================================================================

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub image_url: String,
    pub page_url: String,
}

impl IndexKey {
    pub fn new(image_url: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            page_url: page_url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Depth of the page at first discovery
    pub depth: u32,
    pub downloaded: bool,
}

#[derive(Debug, Default)]
pub struct CrawlIndex {
    order: Vec<IndexKey>,
    entries: HashMap<IndexKey, IndexEntry>,
}

impl CrawlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // Inserts the pair if it's new.
    //
    // Returns: true if this call added an entry, false if it was already known
    pub fn record(&mut self, image_url: &str, page_url: &str, depth: u32) -> bool {
        let key = IndexKey::new(image_url, page_url);
        if self.entries.contains_key(&key) {
            return false;
        }

        self.entries.insert(
            key.clone(),
            IndexEntry {
                depth,
                downloaded: false,
            },
        );
        self.order.push(key);
        true
    }

    // Flags an entry as saved to disk. Unknown keys are ignored.
    pub fn mark_downloaded(&mut self, key: &IndexKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.downloaded = true;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &IndexKey) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    // All entries, in the order they were first recorded
    pub fn entries(&self) -> impl Iterator<Item = (&IndexKey, &IndexEntry)> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|entry| (key, entry)))
    }

    pub fn downloaded(&self) -> impl Iterator<Item = (&IndexKey, &IndexEntry)> + '_ {
        self.entries().filter(|(_, entry)| entry.downloaded)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}
