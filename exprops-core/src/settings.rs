//! Builder settings loaded from YAML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Default lifetime of invocation cache entries.
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(30 * 60);

/// Section name looked up at the top of a settings document.
pub const SECTION: &str = "exprops";

/// Feature flags and cache lifetime for [`Builder::settings`](crate::Builder::settings).
///
/// ```yaml
/// exprops:
///   cache_duration: 5m
///   default_resolvers: true
///   default_converters: true
///   invocation_caching: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(deserialize_with = "humantime_duration")]
    pub cache_duration: Duration,
    pub default_resolvers: bool,
    pub default_converters: bool,
    pub invocation_caching: bool,
    pub eager_loading: bool,
    pub initialize_caching: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cache_duration: DEFAULT_CACHE_DURATION,
            default_resolvers: false,
            default_converters: false,
            invocation_caching: false,
            eager_loading: false,
            initialize_caching: false,
        }
    }
}

fn humantime_duration<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

impl Settings {
    /// Parse settings from the `exprops:` section, or from the document root
    /// when there is no such section. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| settings_error("<string>", e))?;
        Self::from_document(document, "<string>")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resource = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| settings_error(&resource, e))?;
        let document: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| settings_error(&resource, e))?;
        Self::from_document(document, &resource)
    }

    fn from_document(document: serde_yaml::Value, resource: &str) -> Result<Self> {
        let settings = match document {
            serde_yaml::Value::Null => return Ok(Settings::default()),
            serde_yaml::Value::Mapping(mut map) => match map.remove(SECTION) {
                Some(serde_yaml::Value::Null) => return Ok(Settings::default()),
                Some(section) => section,
                None => serde_yaml::Value::Mapping(map),
            },
            other => other,
        };
        serde_yaml::from_value(settings).map_err(|e| settings_error(resource, e))
    }
}

fn settings_error(
    resource: &str,
    source: impl Into<crate::error::BoxError>,
) -> Error {
    Error::Resource {
        resource: resource.to_string(),
        source: source.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_and_root_documents() {
        let section = Settings::from_yaml_str("exprops:\n  cache_duration: 5m\n  eager_loading: true\n")
            .unwrap();
        assert_eq!(section.cache_duration, Duration::from_secs(300));
        assert!(section.eager_loading);
        assert!(!section.invocation_caching);

        let root = Settings::from_yaml_str("invocation_caching: true\n").unwrap();
        assert!(root.invocation_caching);
        assert_eq!(root.cache_duration, DEFAULT_CACHE_DURATION);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml_str("exprops:\n").unwrap(), Settings::default());
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_durations() {
        assert!(Settings::from_yaml_str("exprops:\n  cache_size: 3\n").is_err());
        assert!(Settings::from_yaml_str("cache_duration: soon\n").is_err());
    }
}
