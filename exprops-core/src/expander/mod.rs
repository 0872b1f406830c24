//! `${name}` placeholder expansion.

mod pattern;
mod simple;

use crate::context::InvocationContext;
use crate::error::Result;
use crate::resolver::Resolver;

pub use pattern::PatternVariableExpander;
pub use simple::SimpleVariableExpander;

/// Expands placeholders inside property names (and facade inputs).
///
/// Expansion is single-pass: a resolved value is inserted verbatim and never
/// scanned again, so cyclic definitions cannot loop.
pub trait VariableExpander: Send + Sync {
    fn expand(&self, ctx: &ExpansionContext<'_>, template: &str) -> Result<String>;
}

impl<E: VariableExpander + ?Sized> VariableExpander for std::sync::Arc<E> {
    fn expand(&self, ctx: &ExpansionContext<'_>, template: &str) -> Result<String> {
        (**self).expand(ctx, template)
    }
}

/// The invocation plus the resolver placeholders are looked up in.
#[derive(Clone, Copy)]
pub struct ExpansionContext<'a> {
    invocation: InvocationContext<'a>,
    resolver: &'a dyn Resolver,
}

impl<'a> ExpansionContext<'a> {
    pub fn new(invocation: &InvocationContext<'a>, resolver: &'a dyn Resolver) -> Self {
        ExpansionContext {
            invocation: *invocation,
            resolver,
        }
    }

    pub fn invocation(&self) -> &InvocationContext<'a> {
        &self.invocation
    }

    /// Resolve a placeholder name.
    pub fn resolve(&self, name: &str) -> Result<Option<String>> {
        self.resolver.resolve(&self.invocation, name)
    }
}
