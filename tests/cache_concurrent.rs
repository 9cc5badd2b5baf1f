//! Cache behavior under concurrent access from multiple in-flight
//! requests: safe reads and writes, harmless last-write-wins races, and
//! key separation across the composite address.

use std::sync::Arc;
use std::time::Duration;

use lexweave::cache::{CacheKey, ResponseCache};
use lexweave::request::{DataSource, LookupResponse};
use lexweave::section::Section;

fn response(word: &str, execution_time: f64) -> LookupResponse {
    LookupResponse {
        headword: word.to_string(),
        data_source: DataSource::Authoritative,
        payload: None,
        execution_time,
        success: true,
        missing_fields: Vec::new(),
        error: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_to_the_same_key_race_harmlessly() {
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));

    let mut handles = Vec::new();
    for i in 0..16 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            let key = CacheKey::basic("run");
            cache.put(key.clone(), response("run", 0.001 * i as f64));
            cache.get(&key)
        }));
    }

    let mut hits = 0;
    for handle in handles {
        if let Some(hit) = handle.await.unwrap() {
            assert_eq!(hit.headword, "run");
            assert!(hit.success);
            hits += 1;
        }
    }
    // Every reader saw some writer's value; which one is unspecified.
    assert_eq!(hits, 16);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn composite_keys_separate_sections_and_addresses() {
    let cache = ResponseCache::new(Duration::from_secs(60));

    cache.put(CacheKey::basic("run"), response("basic", 0.1));
    cache.put(
        CacheKey::new("run", Section::Etymology, None, None),
        response("etymology", 0.2),
    );
    cache.put(
        CacheKey::new("run", Section::DetailedSense, Some(0), Some(0)),
        response("detail-0-0", 0.3),
    );
    cache.put(
        CacheKey::new("run", Section::DetailedSense, Some(0), Some(1)),
        response("detail-0-1", 0.4),
    );

    assert_eq!(cache.len(), 4);
    assert_eq!(
        cache.get(&CacheKey::basic("run")).unwrap().headword,
        "basic"
    );
    assert_eq!(
        cache
            .get(&CacheKey::new("run", Section::DetailedSense, Some(0), Some(1)))
            .unwrap()
            .headword,
        "detail-0-1"
    );
    assert!(cache
        .get(&CacheKey::new("run", Section::DetailedSense, Some(1), Some(0)))
        .is_none());
}
