use dashmap::DashMap;

use crate::context::InvocationContext;
use crate::error::Result;

use super::Resolver;

type UnresolvedHandler = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves properties from an in-memory map.
///
/// An optional handler is consulted for names missing from the map; its
/// answers are stored (insert-if-absent) so the handler runs once per name.
pub struct MapResolver {
    properties: DashMap<String, String>,
    unresolved: Option<UnresolvedHandler>,
}

impl MapResolver {
    pub fn new<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MapResolver {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            unresolved: None,
        }
    }

    /// A resolver holding a single property.
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        let entry: (String, String) = (key.into(), value.into());
        Self::new([entry])
    }

    pub fn with_unresolved_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.unresolved = Some(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Resolver for MapResolver {
    fn resolve(&self, _ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        if let Some(value) = self.properties.get(name) {
            return Ok(Some(value.value().clone()));
        }
        let Some(handler) = &self.unresolved else {
            return Ok(None);
        };
        Ok(handler(name).map(|value| {
            self.properties
                .entry(name.to_string())
                .or_insert(value)
                .value()
                .clone()
        }))
    }
}
