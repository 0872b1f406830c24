use std::sync::Arc;

use crate::context::InvocationContext;
use crate::error::Result;
use crate::expander::{ExpansionContext, VariableExpander};
use crate::processor::RootProcessor;

use super::{CompositeResolver, Resolver};

/// The resolver behind every proxy: expands the name, resolves it through the
/// flattened chain, then runs the method's processors on the value.
pub struct RootResolver {
    resolver: CompositeResolver,
    expander: Arc<dyn VariableExpander>,
    processor: RootProcessor,
}

impl RootResolver {
    pub fn new(
        resolvers: impl IntoIterator<Item = Arc<dyn Resolver>>,
        expander: Arc<dyn VariableExpander>,
        processor: RootProcessor,
    ) -> Self {
        RootResolver {
            resolver: CompositeResolver::flatten(resolvers),
            expander,
            processor,
        }
    }

    pub fn composite(&self) -> &CompositeResolver {
        &self.resolver
    }

    pub fn processor(&self) -> &RootProcessor {
        &self.processor
    }

    /// Expand `${...}` placeholders, resolving them through the chain.
    pub fn expand_variables(&self, ctx: &InvocationContext<'_>, template: &str) -> Result<String> {
        self.expander
            .expand(&ExpansionContext::new(ctx, &self.resolver), template)
    }

    /// Resolve an already expanded name and process the value.
    pub fn resolve_expanded(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        match self.resolver.resolve(ctx, name)? {
            Some(value) => self.processor.process(ctx, &value).map(Some),
            None => Ok(None),
        }
    }
}

impl Resolver for RootResolver {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        let name = self.expand_variables(ctx, name)?;
        self.resolve_expanded(ctx, &name)
    }
}
