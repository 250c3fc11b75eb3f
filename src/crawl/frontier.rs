// src/crawl/frontier.rs
// =============================================================================
// This module tracks which pages still need visiting and which are done.
//
// Every URL moves through three states:
//
//   Unvisited --enqueue--> Pending --mark_done--> Done
//
// - Pending and Done never share a URL
// - Once Done, a URL can never become Pending again, so link cycles
//   (A -> B -> A) cannot make us fetch a page twice
// - Pending URLs are handed out in the order they were discovered (FIFO),
//   which gives us a breadth-first crawl
//
// A URL stays Pending while it is being fetched ("in flight"); it only moves
// to Done after its page was processed (or the fetch failed).
//
// Rust concepts:
// - HashMap: O(1) "have we seen this URL?" checks, with the depth as value
// - VecDeque: FIFO queue of pending URLs not yet handed out
// =============================================================================

use std::collections::{HashMap, VecDeque};

// Represents a page in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32, // How many link hops from the start URL (start = 1)
}

#[derive(Debug, Default)]
pub struct Frontier {
    // Pending URLs that have not been handed out yet, oldest first
    queue: VecDeque<String>,
    // All Pending URLs (queued or in flight) -> depth
    pending: HashMap<String, u32>,
    // Done URLs -> depth they were discovered at
    done: HashMap<String, u32>,
}

impl Frontier {
    // Starts a frontier with the seed URL at depth 1
    pub fn seeded(start_url: &str) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(start_url, 1);
        frontier
    }

    // Adds a URL as Pending if it's in neither set.
    //
    // Returns: true if the URL was new
    pub fn enqueue(&mut self, url: &str, depth: u32) -> bool {
        if self.is_known(url) {
            return false;
        }

        self.pending.insert(url.to_string(), depth);
        self.queue.push_back(url.to_string());
        true
    }

    pub fn is_known(&self, url: &str) -> bool {
        self.pending.contains_key(url) || self.done.contains_key(url)
    }

    // Hands out up to `max` pending entries, oldest first.
    //
    // They stay Pending until mark_done is called for them.
    pub fn next_batch(&mut self, max: usize) -> Vec<FrontierEntry> {
        let mut batch = Vec::with_capacity(max.min(self.queue.len()));
        while batch.len() < max {
            let Some(url) = self.queue.pop_front() else {
                break;
            };
            if let Some(&depth) = self.pending.get(&url) {
                batch.push(FrontierEntry { url, depth });
            }
        }
        batch
    }

    // Moves a URL from Pending to Done, keeping its depth
    pub fn mark_done(&mut self, url: &str) {
        if let Some(depth) = self.pending.remove(url) {
            self.done.insert(url.to_string(), depth);
        }
    }

    // The crawl is over exactly when nothing is Pending
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    #[cfg(test)]
    pub fn done_depth(&self, url: &str) -> Option<u32> {
        self.done.get(url).copied()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two maps instead of one "visited" set?
//    - Pending and Done answer different questions: "is there work left?"
//      (is_exhausted) and "where did this URL end up?"
//    - enqueue checks BOTH, so a URL can only ever be added once
//
// 2. What is `let ... else`?
//    - `let Some(url) = queue.pop_front() else { break; };`
//    - Binds `url` if the pattern matches, otherwise runs the else block
//      (which must leave the loop or function)
//
// 3. Why does next_batch leave URLs in `pending`?
//    - A page being fetched is still Pending; if some other page links to
//      it in the meantime, enqueue must still say "already known"
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_pending_at_depth_one() {
        let mut frontier = Frontier::seeded("http://a.test");
        assert_eq!(frontier.pending_len(), 1);
        assert_eq!(
            frontier.next_batch(10),
            vec![FrontierEntry {
                url: "http://a.test".to_string(),
                depth: 1
            }]
        );
    }

    #[test]
    fn test_batches_are_fifo() {
        let mut frontier = Frontier::seeded("http://a.test/1");
        frontier.enqueue("http://a.test/2", 2);
        frontier.enqueue("http://a.test/3", 2);

        let first: Vec<_> = frontier.next_batch(2).into_iter().map(|e| e.url).collect();
        assert_eq!(first, vec!["http://a.test/1", "http://a.test/2"]);
        let second: Vec<_> = frontier.next_batch(2).into_iter().map(|e| e.url).collect();
        assert_eq!(second, vec!["http://a.test/3"]);
        assert!(frontier.next_batch(2).is_empty());
    }

    #[test]
    fn test_in_flight_urls_are_still_pending() {
        let mut frontier = Frontier::seeded("http://a.test");
        let batch = frontier.next_batch(1);
        assert_eq!(batch.len(), 1);

        assert!(!frontier.is_exhausted());
        assert!(!frontier.enqueue("http://a.test", 2));

        frontier.mark_done("http://a.test");
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_done_urls_are_never_re_enqueued() {
        let mut frontier = Frontier::seeded("http://a.test");
        frontier.next_batch(1);
        frontier.mark_done("http://a.test");

        assert!(!frontier.enqueue("http://a.test", 3));
        assert!(frontier.is_exhausted());
        assert_eq!(frontier.done_depth("http://a.test"), Some(1));
    }

    #[test]
    fn test_duplicate_enqueue_keeps_first_depth() {
        let mut frontier = Frontier::seeded("http://a.test");
        assert!(frontier.enqueue("http://a.test/x", 2));
        assert!(!frontier.enqueue("http://a.test/x", 3));
        assert_eq!(frontier.pending_len(), 2);

        let batch = frontier.next_batch(5);
        assert_eq!(batch[1].depth, 2);
    }

    #[test]
    fn test_mark_done_of_unknown_url_is_ignored() {
        let mut frontier = Frontier::default();
        frontier.mark_done("http://nowhere.test");
        assert_eq!(frontier.done_len(), 0);
    }
}
