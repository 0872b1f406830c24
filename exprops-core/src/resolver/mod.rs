//! Property sources and their composition.

mod caching;
mod composite;
mod default;
mod dotenv;
mod env;
mod ignoring;
mod map;
mod resource;
mod root;
pub mod system;

use std::sync::Arc;

use crate::context::InvocationContext;
use crate::error::Result;

pub use caching::CachingResolver;
pub use composite::CompositeResolver;
pub use default::DefaultResolver;
pub use dotenv::DotenvResolver;
pub use env::EnvironmentResolver;
pub use ignoring::ExceptionIgnoringResolver;
pub use map::MapResolver;
pub use resource::{JsonReader, ResourceReader, ResourceResolver, YamlReader};
pub use root::RootResolver;
pub use system::SystemPropertyResolver;

/// A source of property values keyed by name.
///
/// `Ok(None)` means the source has no value for `name`. An `Err` aborts the
/// whole lookup: resolvers are never silently skipped on failure.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a property resolver",
    label = "does not implement `Resolver`",
    note = "implement `Resolver::resolve` returning `Ok(None)` for unknown names"
)]
pub trait Resolver: Send + Sync {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>>;

    /// Position hint in the chain, lower is earlier.
    fn ordinal(&self) -> Option<i32> {
        None
    }

    /// Members of a composite, expanded when composites are flattened.
    fn members(&self) -> Option<&[Arc<dyn Resolver>]> {
        None
    }
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        (**self).resolve(ctx, name)
    }

    fn ordinal(&self) -> Option<i32> {
        (**self).ordinal()
    }

    fn members(&self) -> Option<&[Arc<dyn Resolver>]> {
        (**self).members()
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        (**self).resolve(ctx, name)
    }

    fn ordinal(&self) -> Option<i32> {
        (**self).ordinal()
    }

    fn members(&self) -> Option<&[Arc<dyn Resolver>]> {
        (**self).members()
    }
}

/// `app.db-url` -> `APP_DB_URL`.
pub(crate) fn env_var_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
