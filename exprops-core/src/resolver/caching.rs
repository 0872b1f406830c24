use std::sync::Arc;
use std::time::Duration;

use exprops_cache::{CacheStrategy, ExpiringCacheStrategy};

use crate::context::InvocationContext;
use crate::error::Result;

use super::Resolver;

/// Decorates a resolver with a cache keyed by property name.
///
/// Only present values are cached, so a value that appears after a miss
/// (e.g. an environment variable set later) is still picked up.
pub struct CachingResolver<R> {
    resolver: R,
    cache: Arc<dyn CacheStrategy<String, String>>,
}

impl<R: Resolver> CachingResolver<R> {
    pub fn new(resolver: R, cache: impl CacheStrategy<String, String> + 'static) -> Self {
        Self::with_cache(resolver, Arc::new(cache))
    }

    /// Share an existing cache.
    pub fn with_cache(resolver: R, cache: Arc<dyn CacheStrategy<String, String>>) -> Self {
        CachingResolver { resolver, cache }
    }

    /// Cache entries expire `lifetime` after being stored.
    pub fn with_lifetime(resolver: R, lifetime: Duration) -> Self {
        Self::new(resolver, ExpiringCacheStrategy::new(lifetime))
    }

    pub fn cache(&self) -> &Arc<dyn CacheStrategy<String, String>> {
        &self.cache
    }
}

impl<R: Resolver> Resolver for CachingResolver<R> {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        let key = name.to_string();
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(property = name, "resolver cache hit");
            return Ok(Some(hit));
        }
        let resolved = self.resolver.resolve(ctx, name)?;
        if let Some(value) = &resolved {
            self.cache.cache(key, value.clone());
        }
        Ok(resolved)
    }

    fn ordinal(&self) -> Option<i32> {
        self.resolver.ordinal()
    }
}
