use std::env::VarError;

use crate::context::InvocationContext;
use crate::error::{Error, Result};

use super::{env_var_name, Resolver};

/// Resolves properties from process environment variables.
///
/// `app.db-url` is looked up as-is first, then as `APP_DB_URL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentResolver;

impl EnvironmentResolver {
    pub fn new() -> Self {
        EnvironmentResolver
    }
}

fn lookup(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(Error::other(format!(
            "environment variable '{name}' is not valid unicode"
        ))),
    }
}

impl Resolver for EnvironmentResolver {
    fn resolve(&self, _ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        // Names with '=' or NUL make std::env::var panic on some platforms.
        if name.is_empty() || name.contains(['=', '\0']) {
            return Ok(None);
        }
        if let Some(value) = lookup(name)? {
            return Ok(Some(value));
        }
        let env_name = env_var_name(name);
        if env_name == name {
            return Ok(None);
        }
        lookup(&env_name)
    }
}
