//! Exact-key result cache.
//!
//! Maps a [`QueryKey`] to the authoritative result set for that exact query,
//! populated only by completed fetches. Entries are `Arc<[Suggestion]>`: once
//! stored they are immutable and can only be replaced wholesale by a newer
//! fetch for the same key. There is no eviction and no TTL; the cache lives
//! exactly as long as its controller, and a query fetched once is assumed to
//! answer consistently for the rest of the session.
//!
//! An absent entry means "unknown, still resolving". A present-but-empty
//! entry means "resolved, zero matches". The distinction is load-bearing for
//! both the predictive filter and the no-results signal.

use std::collections::HashMap;
use std::sync::Arc;

use crate::normalize::QueryKey;
use crate::suggestion::Suggestion;

/// Mapping from exact query key to its immutable result set.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<QueryKey, Arc<[Suggestion]>>,
}

impl ResultCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the result set for an exact key. O(1), never mutates.
    #[must_use]
    pub fn get(&self, key: &QueryKey) -> Option<Arc<[Suggestion]>> {
        self.entries.get(key).cloned()
    }

    /// Look up by normalized text, avoiding a key allocation. Used by the
    /// predictive filter while scanning prefixes.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<Arc<[Suggestion]>> {
        self.entries.get(key).cloned()
    }

    /// Store the result set for a key, replacing any previous entry
    /// wholesale. Last writer for a given key wins; other keys are untouched.
    pub fn put(&mut self, key: QueryKey, results: Vec<Suggestion>) {
        self.entries.insert(key, Arc::from(results));
    }

    /// Whether an exact entry exists (empty entries count as present).
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
