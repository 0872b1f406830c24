use std::collections::HashMap;
use std::path::Path;

use crate::context::InvocationContext;
use crate::error::{Error, Result};

use super::{env_var_name, Resolver};

/// Resolves properties from a `.env` file without loading it into the
/// process environment.
///
/// Names are matched like [`EnvironmentResolver`](super::EnvironmentResolver):
/// exact first, then the `UPPER_SNAKE` form.
#[derive(Debug, Clone, Default)]
pub struct DotenvResolver {
    variables: HashMap<String, String>,
}

impl DotenvResolver {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resource_error = |e: dotenvy::Error| Error::Resource {
            resource: path.display().to_string(),
            source: e.into(),
        };
        let mut variables = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(resource_error)? {
            let (key, value) = item.map_err(resource_error)?;
            variables.insert(key, value);
        }
        Ok(DotenvResolver { variables })
    }
}

impl Resolver for DotenvResolver {
    fn resolve(&self, _ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        if let Some(value) = self.variables.get(name) {
            return Ok(Some(value.clone()));
        }
        Ok(self.variables.get(&env_var_name(name)).cloned())
    }
}
