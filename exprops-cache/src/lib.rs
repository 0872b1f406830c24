use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod scheduler;

/// A key-value store used by the resolution pipeline.
///
/// Implementations must be safe to share between threads without external
/// locking. [`cache`](CacheStrategy::cache) is insert-if-absent: an entry that
/// is already present is never overwritten, only removed.
pub trait CacheStrategy<K, V>: Send + Sync {
    /// Store `value` under `key` unless an entry already exists. Returns
    /// whether `value` was stored.
    fn cache(&self, key: K, value: V) -> bool;

    /// Get a cached value.
    fn get(&self, key: &K) -> Option<V>;

    /// Remove a specific entry.
    fn expire(&self, key: &K);

    /// Remove all entries.
    fn expire_all(&self);
}

impl<K, V, S> CacheStrategy<K, V> for Arc<S>
where
    S: CacheStrategy<K, V> + ?Sized,
{
    fn cache(&self, key: K, value: V) -> bool {
        (**self).cache(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn expire(&self, key: &K) {
        (**self).expire(key)
    }

    fn expire_all(&self) {
        (**self).expire_all()
    }
}

// ---------------------------------------------------------------------------
// ConcurrentMapCacheStrategy
// ---------------------------------------------------------------------------

/// Unbounded cache strategy backed by `DashMap`. Entries live until expired.
pub struct ConcurrentMapCacheStrategy<K, V> {
    inner: DashMap<K, V>,
}

impl<K: Eq + Hash, V> ConcurrentMapCacheStrategy<K, V> {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for ConcurrentMapCacheStrategy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStrategy<K, V> for ConcurrentMapCacheStrategy<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache(&self, key: K, value: V) -> bool {
        match self.inner.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    fn expire(&self, key: &K) {
        self.inner.remove(key);
    }

    fn expire_all(&self) {
        self.inner.clear();
    }
}

// ---------------------------------------------------------------------------
// TtlCacheStrategy
// ---------------------------------------------------------------------------

/// A TTL cache strategy backed by `DashMap`.
///
/// Entries expire after the configured `ttl` and are lazily evicted on access.
/// No background work is involved, which makes it usable where spawning the
/// expiry worker is undesirable.
#[derive(Clone)]
pub struct TtlCacheStrategy<K, V> {
    inner: Arc<DashMap<K, (V, Instant)>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V> TtlCacheStrategy<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Remove all expired entries.
    pub fn evict_expired(&self) {
        let ttl = self.ttl;
        self.inner.retain(|_, (_, inserted)| inserted.elapsed() < ttl);
    }
}

impl<K, V> CacheStrategy<K, V> for TtlCacheStrategy<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache(&self, key: K, value: V) -> bool {
        match self.inner.entry(key) {
            // A stale entry counts as absent.
            Entry::Occupied(mut entry) => {
                if entry.get().1.elapsed() < self.ttl {
                    return false;
                }
                entry.insert((value, Instant::now()));
                true
            }
            Entry::Vacant(entry) => {
                entry.insert((value, Instant::now()));
                true
            }
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        if let Some(entry) = self.inner.get(key) {
            let (val, inserted) = entry.value();
            if inserted.elapsed() < self.ttl {
                return Some(val.clone());
            }
            drop(entry);
            self.inner.remove(key);
        }
        None
    }

    fn expire(&self, key: &K) {
        self.inner.remove(key);
    }

    fn expire_all(&self) {
        self.inner.clear();
    }
}

// ---------------------------------------------------------------------------
// ExpiringCacheStrategy
// ---------------------------------------------------------------------------

/// Decorates a [`CacheStrategy`] so that every entry is removed once
/// `lifetime` has elapsed since it was cached.
///
/// Removal is scheduled on a single process-wide worker thread, so reads and
/// writes never wait on expiry bookkeeping. Each stored entry gets a
/// generation, and a scheduled removal only applies to the generation it was
/// scheduled for: an entry expired and cached again keeps its full lifetime.
/// The worker only holds weak references to the decorated cache.
///
/// ```ignore
/// let cache = ExpiringCacheStrategy::new(Duration::from_secs(60));
/// cache.cache("app.name".to_string(), "demo".to_string());
/// ```
pub struct ExpiringCacheStrategy<K, V, S = ConcurrentMapCacheStrategy<K, V>> {
    inner: Arc<S>,
    generations: Arc<DashMap<K, u64>>,
    next_generation: AtomicU64,
    lifetime: Duration,
    _entry: PhantomData<fn(K) -> V>,
}

impl<K: Eq + Hash, V> ExpiringCacheStrategy<K, V> {
    /// Expiring cache over a fresh [`ConcurrentMapCacheStrategy`].
    pub fn new(lifetime: Duration) -> Self {
        Self::wrap(ConcurrentMapCacheStrategy::new(), lifetime)
    }
}

impl<K: Eq + Hash, V, S> ExpiringCacheStrategy<K, V, S> {
    pub fn wrap(inner: S, lifetime: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            generations: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
            lifetime,
            _entry: PhantomData,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// The decorated strategy.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of entries waiting for their scheduled removal.
    pub fn pending(&self) -> usize {
        self.generations.len()
    }
}

impl<K, V, S> CacheStrategy<K, V> for ExpiringCacheStrategy<K, V, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: CacheStrategy<K, V> + 'static,
{
    fn cache(&self, key: K, value: V) -> bool {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        // The generation entry stays locked until the value is stored, so a
        // concurrent removal cannot interleave.
        let slot = self.generations.entry(key.clone());
        if !self.inner.cache(key.clone(), value) {
            return false;
        }
        slot.insert(generation);

        let cache = Arc::downgrade(&self.inner);
        let generations = Arc::downgrade(&self.generations);
        scheduler::schedule(
            self.lifetime,
            Box::new(move || {
                let (Some(cache), Some(generations)) = (cache.upgrade(), generations.upgrade())
                else {
                    return;
                };
                if let Entry::Occupied(current) = generations.entry(key.clone()) {
                    if *current.get() == generation {
                        cache.expire(&key);
                        current.remove();
                    }
                };
            }),
        );
        true
    }

    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    fn expire(&self, key: &K) {
        self.generations.remove(key);
        self.inner.expire(key)
    }

    fn expire_all(&self) {
        self.generations.clear();
        self.inner.expire_all()
    }
}
