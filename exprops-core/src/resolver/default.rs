use std::sync::Arc;

use crate::context::InvocationContext;
use crate::error::Result;

use super::{CompositeResolver, EnvironmentResolver, Resolver, SystemPropertyResolver};

/// System properties, then environment variables.
#[derive(Clone)]
pub struct DefaultResolver {
    resolver: CompositeResolver,
}

impl DefaultResolver {
    pub fn new() -> Self {
        DefaultResolver {
            resolver: CompositeResolver::flatten([
                Arc::new(SystemPropertyResolver) as Arc<dyn Resolver>,
                Arc::new(EnvironmentResolver),
            ]),
        }
    }
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for DefaultResolver {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        self.resolver.resolve(ctx, name)
    }

    fn members(&self) -> Option<&[Arc<dyn Resolver>]> {
        Some(self.resolver.resolvers())
    }
}
