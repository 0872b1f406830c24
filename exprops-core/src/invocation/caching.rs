use std::sync::Arc;

use exprops_cache::CacheStrategy;

use crate::context::Arguments;
use crate::error::Result;
use crate::value::Value;

use super::{Invocation, Middleware, Next};

/// Cache key of one proxy call: interface path, method and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvocationKey {
    interface: &'static str,
    method: &'static str,
    arguments: Arguments,
}

impl InvocationKey {
    pub fn new(interface: &'static str, method: &'static str, arguments: Arguments) -> Self {
        InvocationKey {
            interface,
            method,
            arguments,
        }
    }

    pub fn of(invocation: &Invocation<'_>) -> Self {
        let method = invocation.method();
        Self::new(
            method.interface_path(),
            method.name(),
            invocation.arguments().clone(),
        )
    }

    pub fn interface(&self) -> &'static str {
        self.interface
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }
}

/// Serves repeated calls from the cache and stores every computed value,
/// defaults included. Failed calls are not cached.
#[derive(Clone)]
pub struct InvocationCaching {
    cache: Arc<dyn CacheStrategy<InvocationKey, Value>>,
}

impl InvocationCaching {
    pub fn new(cache: Arc<dyn CacheStrategy<InvocationKey, Value>>) -> Self {
        InvocationCaching { cache }
    }

    pub fn cache(&self) -> &Arc<dyn CacheStrategy<InvocationKey, Value>> {
        &self.cache
    }
}

impl Middleware for InvocationCaching {
    fn handle(&self, next: Next<'_>, invocation: &Invocation<'_>) -> Result<Value> {
        let key = InvocationKey::of(invocation);
        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!(interface = key.interface, method = key.method, "invocation cache hit");
            return Ok(cached);
        }
        tracing::trace!(interface = key.interface, method = key.method, "invocation cache miss");
        let value = next.run(invocation)?;
        self.cache.cache(key, value.clone());
        Ok(value)
    }
}
