//! Content-addressed, TTL-based memoization of completed responses.
//!
//! The cache is the only state shared across concurrent requests. It is a
//! performance layer, never the source of truth: a process restart
//! discards it silently. Keys are the composite
//! `(word, section, entry_index, sense_index)`; values are successful
//! [`LookupResponse`]s stored verbatim, so cache hits are bit-identical to
//! the response that populated them.
//!
//! Expiry is checked lazily on read; there is no background sweep. Because
//! payloads are deterministic for a key within its TTL window, concurrent
//! writers to the same key may race harmlessly (last write wins).

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::request::LookupResponse;
use crate::section::Section;

/// Composite cache key. Words are lowercased so `"Run"` and `"run"` share
/// an entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub word: String,
    pub section: Section,
    pub entry_index: Option<usize>,
    pub sense_index: Option<usize>,
}

impl CacheKey {
    pub fn new(
        word: &str,
        section: Section,
        entry_index: Option<usize>,
        sense_index: Option<usize>,
    ) -> Self {
        Self {
            word: word.to_lowercase(),
            section,
            entry_index,
            sense_index,
        }
    }

    /// Key for the word's `basic` skeleton.
    pub fn basic(word: &str) -> Self {
        Self::new(word, Section::Basic, None, None)
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    response: LookupResponse,
    expires_at: Duration,
}

/// Guarded in-process response cache with lazy TTL expiry.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<Mutex<FxHashMap<CacheKey, CacheEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock::new()))
    }

    /// Inject a clock; tests use [`ManualClock`] for deterministic expiry.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(FxHashMap::default())),
            ttl,
            clock,
        }
    }

    /// Fetch a live entry, removing it if its TTL has lapsed.
    pub fn get(&self, key: &CacheKey) -> Option<LookupResponse> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("cache poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.response.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a completed response.
    ///
    /// Failed or partial responses are refused so transient errors never
    /// freeze into stale results; the caller does not need to pre-filter.
    pub fn put(&self, key: CacheKey, response: LookupResponse) {
        if !response.success {
            return;
        }
        let expires_at = self.clock.now() + self.ttl;
        let entry = CacheEntry {
            response,
            expires_at,
        };
        self.entries
            .lock()
            .expect("cache poisoned")
            .insert(key, entry);
    }

    /// Number of entries currently stored, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DataSource;

    fn response(success: bool) -> LookupResponse {
        LookupResponse {
            headword: "run".into(),
            data_source: DataSource::Authoritative,
            payload: None,
            execution_time: 0.1,
            success,
            missing_fields: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn keys_are_case_insensitive_on_word() {
        assert_eq!(CacheKey::basic("Run"), CacheKey::basic("run"));
    }

    #[test]
    fn failed_responses_are_never_stored() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(CacheKey::basic("run"), response(false));
        assert!(cache.get(&CacheKey::basic("run")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_expire_lazily_on_read() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::with_clock(Duration::from_secs(3600), clock.clone());
        cache.put(CacheKey::basic("run"), response(true));

        clock.advance(Duration::from_secs(3599));
        assert!(cache.get(&CacheKey::basic("run")).is_some());

        clock.advance(Duration::from_secs(2));
        assert!(cache.get(&CacheKey::basic("run")).is_none());
        // The expired entry was removed on read, not by a sweeper.
        assert!(cache.is_empty());
    }

    #[test]
    fn hits_are_identical_to_the_stored_response() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let original = response(true);
        cache.put(CacheKey::basic("run"), original.clone());
        let hit = cache.get(&CacheKey::basic("run")).unwrap();
        assert_eq!(hit, original);
        assert_eq!(
            serde_json::to_vec(&hit).unwrap(),
            serde_json::to_vec(&original).unwrap()
        );
    }
}
