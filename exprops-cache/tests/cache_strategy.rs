use exprops_cache::{CacheStrategy, ConcurrentMapCacheStrategy, ExpiringCacheStrategy, TtlCacheStrategy};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

#[test]
fn test_map_cache_hit() {
    let cache = ConcurrentMapCacheStrategy::new();
    cache.cache("key", "value");
    assert_eq!(cache.get(&"key"), Some("value"));
}

#[test]
fn test_map_cache_miss() {
    let cache: ConcurrentMapCacheStrategy<&str, &str> = ConcurrentMapCacheStrategy::new();
    assert_eq!(cache.get(&"missing"), None);
}

#[test]
fn test_map_cache_keeps_first_value() {
    let cache = ConcurrentMapCacheStrategy::new();
    cache.cache("key", "first");
    cache.cache("key", "second");
    assert_eq!(cache.get(&"key"), Some("first"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_map_cache_expire() {
    let cache = ConcurrentMapCacheStrategy::new();
    cache.cache("a", 1);
    cache.cache("b", 2);
    cache.expire(&"a");
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(2));

    cache.expire_all();
    assert!(cache.is_empty());
}

#[test]
fn test_ttl_cache_expiry() {
    let cache = TtlCacheStrategy::new(Duration::from_millis(50));
    cache.cache("key", "value");
    assert_eq!(cache.get(&"key"), Some("value"));
    sleep(Duration::from_millis(60));
    assert_eq!(cache.get(&"key"), None);
}

#[test]
fn test_ttl_cache_replaces_stale_entry() {
    let cache = TtlCacheStrategy::new(Duration::from_millis(50));
    cache.cache("key", "old");
    sleep(Duration::from_millis(60));
    cache.cache("key", "new");
    assert_eq!(cache.get(&"key"), Some("new"));
}

#[test]
fn test_ttl_cache_evict_expired() {
    let cache = TtlCacheStrategy::new(Duration::from_millis(50));
    cache.cache("a", 1);
    sleep(Duration::from_millis(60));
    cache.evict_expired();
    assert_eq!(cache.get(&"a"), None);
}

#[test]
fn test_expiring_cache_removes_entry_after_lifetime() {
    let cache = ExpiringCacheStrategy::new(Duration::from_millis(50));
    cache.cache("key".to_string(), "value".to_string());
    assert_eq!(cache.get(&"key".to_string()), Some("value".to_string()));

    sleep(Duration::from_millis(250));
    assert_eq!(cache.get(&"key".to_string()), None);
}

#[test]
fn test_cache_reports_whether_value_was_stored() {
    let cache = ConcurrentMapCacheStrategy::new();
    assert!(cache.cache("key", 1));
    assert!(!cache.cache("key", 2));

    let ttl = TtlCacheStrategy::new(Duration::from_millis(50));
    assert!(ttl.cache("key", 1));
    assert!(!ttl.cache("key", 2));
    sleep(Duration::from_millis(60));
    assert!(ttl.cache("key", 3));
}

#[test]
fn test_expiring_cache_ignored_insert_does_not_shorten_next_entry() {
    let cache = ExpiringCacheStrategy::new(Duration::from_millis(400));
    assert!(cache.cache("key", "v1"));
    sleep(Duration::from_millis(200));
    assert!(!cache.cache("key", "ignored"));
    assert_eq!(cache.pending(), 1);

    sleep(Duration::from_millis(300));
    assert_eq!(cache.get(&"key"), None);

    assert!(cache.cache("key", "v2"));
    sleep(Duration::from_millis(200));
    assert_eq!(cache.get(&"key"), Some("v2"));
}

#[test]
fn test_expiring_cache_recached_entry_gets_full_lifetime() {
    let cache = ExpiringCacheStrategy::new(Duration::from_millis(300));
    cache.cache("key", "v1");
    sleep(Duration::from_millis(150));
    cache.expire(&"key");
    assert_eq!(cache.pending(), 0);
    cache.cache("key", "v2");

    // The removal scheduled for v1 is due now.
    sleep(Duration::from_millis(250));
    assert_eq!(cache.get(&"key"), Some("v2"));

    sleep(Duration::from_millis(300));
    assert_eq!(cache.get(&"key"), None);
    assert_eq!(cache.pending(), 0);
}

#[test]
fn test_expiring_cache_keeps_entry_before_lifetime() {
    let cache = ExpiringCacheStrategy::new(Duration::from_secs(60));
    cache.cache(1u32, "one");
    sleep(Duration::from_millis(20));
    assert_eq!(cache.get(&1), Some("one"));
}

#[test]
fn test_expiring_cache_explicit_expire() {
    let cache = ExpiringCacheStrategy::new(Duration::from_secs(60));
    cache.cache("a", 1);
    cache.cache("b", 2);
    cache.expire(&"a");
    assert_eq!(cache.get(&"a"), None);
    cache.expire_all();
    assert_eq!(cache.get(&"b"), None);
}

#[test]
fn test_expiring_cache_dropped_before_expiry() {
    let cache = ExpiringCacheStrategy::new(Duration::from_millis(10));
    cache.cache("key", "value");
    drop(cache);
    // The pending expiry must not keep the cache alive or panic.
    sleep(Duration::from_millis(50));
}

#[test]
fn test_expiring_cache_decorates_custom_strategy() {
    let cache = ExpiringCacheStrategy::wrap(
        TtlCacheStrategy::new(Duration::from_secs(60)),
        Duration::from_millis(50),
    );
    assert_eq!(cache.lifetime(), Duration::from_millis(50));
    cache.cache("key", 42);
    assert_eq!(cache.inner().get(&"key"), Some(42));
    sleep(Duration::from_millis(250));
    assert_eq!(cache.get(&"key"), None);
}

#[test]
fn test_shared_strategy_through_arc() {
    let cache: Arc<dyn CacheStrategy<String, i32>> = Arc::new(ConcurrentMapCacheStrategy::new());
    let clone = cache.clone();
    clone.cache("answer".to_string(), 42);
    assert_eq!(cache.get(&"answer".to_string()), Some(42));
}

#[test]
fn test_concurrent_inserts_keep_single_value() {
    let cache = Arc::new(ConcurrentMapCacheStrategy::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            std::thread::spawn(move || cache.cache("key", i))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&"key").is_some());
}
