use std::sync::Arc;

use crate::context::InvocationContext;
use crate::error::Result;

use super::Resolver;

/// Ordered fallback chain: the first member with a value wins.
///
/// Nested composites are flattened depth-first on construction, so a lookup
/// never walks more than one level.
#[derive(Clone, Default)]
pub struct CompositeResolver {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl CompositeResolver {
    /// A composite that never resolves anything.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn flatten<I>(resolvers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Resolver>>,
    {
        let mut flat = Vec::new();
        flatten_into(resolvers, &mut flat);
        CompositeResolver { resolvers: flat }
    }

    pub fn resolvers(&self) -> &[Arc<dyn Resolver>] {
        &self.resolvers
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

fn flatten_into<I>(resolvers: I, out: &mut Vec<Arc<dyn Resolver>>)
where
    I: IntoIterator<Item = Arc<dyn Resolver>>,
{
    for resolver in resolvers {
        match resolver.members() {
            Some(members) => flatten_into(members.iter().cloned(), out),
            None => out.push(resolver),
        }
    }
}

impl Resolver for CompositeResolver {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        for (position, resolver) in self.resolvers.iter().enumerate() {
            if let Some(value) = resolver.resolve(ctx, name)? {
                tracing::trace!(property = name, position, "property resolved");
                return Ok(Some(value));
            }
        }
        tracing::trace!(property = name, "property not found in any resolver");
        Ok(None)
    }

    fn members(&self) -> Option<&[Arc<dyn Resolver>]> {
        Some(&self.resolvers)
    }
}
