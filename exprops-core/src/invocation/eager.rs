use std::sync::Arc;

use exprops_cache::CacheStrategy;

use crate::context::Arguments;
use crate::error::{Error, Result};
use crate::value::Value;

use super::{Initialization, Invocation, InvocationKey, Middleware, Next};

/// Loads every zero-argument property of a proxy when it is created.
///
/// Any failure while loading aborts proxy initialization. Calls are then
/// served from the seeded cache; anything not cached goes down the chain.
#[derive(Clone)]
pub struct EagerLoading {
    cache: Arc<dyn CacheStrategy<InvocationKey, Value>>,
}

impl EagerLoading {
    pub fn new(cache: Arc<dyn CacheStrategy<InvocationKey, Value>>) -> Self {
        EagerLoading { cache }
    }
}

impl Middleware for EagerLoading {
    fn handle(&self, next: Next<'_>, invocation: &Invocation<'_>) -> Result<Value> {
        match self.cache.get(&InvocationKey::of(invocation)) {
            Some(loaded) => Ok(loaded),
            None => next.run(invocation),
        }
    }

    fn initialize(&self, next: Next<'_>, initialization: &Initialization<'_>) -> Result<()> {
        let interface = initialization.interface();
        let mut loaded = 0usize;
        for (index, method) in interface.methods().iter().enumerate() {
            if !method.is_eager_loadable() {
                continue;
            }
            let default = || {
                initialization.default_value(index).unwrap_or_else(|| {
                    Err(Error::Configuration(format!(
                        "missing default body for ({})",
                        method.signature()
                    )))
                })
            };
            let mut invocation = Invocation::new(method, Arguments::empty());
            if method.has_default() {
                invocation = invocation.with_default(&default);
            }
            let value = next.run(&invocation)?;
            self.cache.cache(InvocationKey::of(&invocation), value);
            loaded += 1;
        }
        tracing::debug!(interface = interface.name(), loaded, "eagerly loaded properties");
        next.initialize(initialization)
    }
}
