use std::collections::HashMap;
use std::path::Path;

use crate::context::InvocationContext;
use crate::error::{BoxError, Error, Result};

use super::Resolver;

/// Parses a resource document into a tree.
pub trait ResourceReader: Send + Sync {
    fn read(&self, content: &str) -> std::result::Result<serde_yaml::Value, BoxError>;
}

/// Reads YAML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlReader;

impl ResourceReader for YamlReader {
    fn read(&self, content: &str) -> std::result::Result<serde_yaml::Value, BoxError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Reads JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl ResourceReader for JsonReader {
    fn read(&self, content: &str) -> std::result::Result<serde_yaml::Value, BoxError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Resolves properties from a flattened document.
///
/// Nested keys are joined with `.`, sequence items are addressed as
/// `key[0]`, `key[1]`, ... An empty sequence or a null becomes `""`.
///
/// ```yaml
/// app:
///   name: demo
///   hosts: [a, b]
/// ```
///
/// yields `app.name = demo`, `app.hosts[0] = a` and `app.hosts[1] = b`.
#[derive(Debug, Clone, Default)]
pub struct ResourceResolver {
    properties: HashMap<String, String>,
}

impl ResourceResolver {
    /// Parse `content` with `reader`.
    pub fn from_str(content: &str, reader: &dyn ResourceReader) -> Result<Self> {
        let tree = reader.read(content).map_err(|source| Error::Resource {
            resource: "<inline>".to_string(),
            source,
        })?;
        Ok(Self::from_tree(&tree))
    }

    /// Read and parse the file at `path` with `reader`.
    pub fn from_path(path: impl AsRef<Path>, reader: &dyn ResourceReader) -> Result<Self> {
        let path = path.as_ref();
        let resource = || path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Resource {
            resource: resource(),
            source: e.into(),
        })?;
        let tree = reader.read(&content).map_err(|source| Error::Resource {
            resource: resource(),
            source,
        })?;
        Ok(Self::from_tree(&tree))
    }

    /// YAML file shortcut.
    pub fn yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path(path, &YamlReader)
    }

    pub fn from_tree(tree: &serde_yaml::Value) -> Self {
        let mut properties = HashMap::new();
        flatten("", tree, &mut properties);
        ResourceResolver { properties }
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

fn key_string(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

/// Flatten a tree into dot-separated keys.
fn flatten(prefix: &str, value: &serde_yaml::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = key_string(k);
                let full_key = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&full_key, v, out);
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            if seq.is_empty() {
                out.insert(prefix.to_string(), String::new());
            }
            for (i, item) in seq.iter().enumerate() {
                flatten(&format!("{prefix}[{i}]"), item, out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        leaf => {
            if prefix.is_empty() {
                return;
            }
            let text = match leaf {
                serde_yaml::Value::String(s) => s.clone(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => String::new(),
            };
            out.insert(prefix.to_string(), text);
        }
    }
}

impl Resolver for ResourceResolver {
    fn resolve(&self, _ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        Ok(self.properties.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_and_sequences() {
        let yaml = "app:\n  name: demo\n  port: 8080\n  hosts:\n    - a\n    - b\n  empty: []\n  missing: ~\n";
        let resolver = ResourceResolver::from_str(yaml, &YamlReader).unwrap();
        let props = resolver.properties();
        assert_eq!(props["app.name"], "demo");
        assert_eq!(props["app.port"], "8080");
        assert_eq!(props["app.hosts[0]"], "a");
        assert_eq!(props["app.hosts[1]"], "b");
        assert_eq!(props["app.empty"], "");
        assert_eq!(props["app.missing"], "");
    }

    #[test]
    fn test_json_reader() {
        let json = r#"{"db": {"pool": {"size": 4}, "replicas": [{"host": "r1"}]}}"#;
        let resolver = ResourceResolver::from_str(json, &JsonReader).unwrap();
        assert_eq!(resolver.properties()["db.pool.size"], "4");
        assert_eq!(resolver.properties()["db.replicas[0].host"], "r1");
    }

    #[test]
    fn test_invalid_document() {
        let err = ResourceResolver::from_str("{not json", &JsonReader).unwrap_err();
        assert!(matches!(err, Error::Resource { .. }));
    }
}
