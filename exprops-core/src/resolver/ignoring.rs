use crate::context::InvocationContext;
use crate::error::Result;

use super::Resolver;

/// Turns resolver failures into absence, logging a warning.
///
/// Only used while detecting the active profile, where a broken source must
/// not prevent the remaining ones from being consulted.
pub struct ExceptionIgnoringResolver<R> {
    resolver: R,
}

impl<R: Resolver> ExceptionIgnoringResolver<R> {
    pub fn new(resolver: R) -> Self {
        ExceptionIgnoringResolver { resolver }
    }
}

impl<R: Resolver> Resolver for ExceptionIgnoringResolver<R> {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        match self.resolver.resolve(ctx, name) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(property = name, error = %e, "ignoring resolver failure");
                Ok(None)
            }
        }
    }

    fn ordinal(&self) -> Option<i32> {
        self.resolver.ordinal()
    }
}
