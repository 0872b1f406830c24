//! Process-wide system properties.
//!
//! A mutable registry of string properties shared by the whole process,
//! seeded on first access with platform facts:
//!
//! | Key              | Value |
//! |------------------|-------|
//! | `os.name`        | `std::env::consts::OS` |
//! | `os.arch`        | `std::env::consts::ARCH` |
//! | `os.family`      | `std::env::consts::FAMILY` |
//! | `user.dir`       | current working directory, when readable |
//! | `file.separator` | platform path separator |
//! | `path.separator` | `:` or `;` |
//! | `line.separator` | `\n` or `\r\n` |

use std::sync::OnceLock;

use dashmap::DashMap;

use crate::context::InvocationContext;
use crate::error::Result;

use super::Resolver;

static PROPERTIES: OnceLock<DashMap<String, String>> = OnceLock::new();

fn registry() -> &'static DashMap<String, String> {
    PROPERTIES.get_or_init(|| {
        let properties = DashMap::new();
        properties.insert("os.name".to_string(), std::env::consts::OS.to_string());
        properties.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
        properties.insert("os.family".to_string(), std::env::consts::FAMILY.to_string());
        if let Ok(dir) = std::env::current_dir() {
            properties.insert("user.dir".to_string(), dir.display().to_string());
        }
        properties.insert(
            "file.separator".to_string(),
            std::path::MAIN_SEPARATOR.to_string(),
        );
        let (path_separator, line_separator) = if cfg!(windows) {
            (";", "\r\n")
        } else {
            (":", "\n")
        };
        properties.insert("path.separator".to_string(), path_separator.to_string());
        properties.insert("line.separator".to_string(), line_separator.to_string());
        properties
    })
}

pub fn get(name: &str) -> Option<String> {
    registry().get(name).map(|v| v.value().clone())
}

/// Set a property, returning the previous value.
pub fn set(name: impl Into<String>, value: impl Into<String>) -> Option<String> {
    registry().insert(name.into(), value.into())
}

pub fn remove(name: &str) -> Option<String> {
    registry().remove(name).map(|(_, v)| v)
}

/// Resolves properties from the [`system`](self) registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPropertyResolver;

impl SystemPropertyResolver {
    pub fn new() -> Self {
        SystemPropertyResolver
    }
}

impl Resolver for SystemPropertyResolver {
    fn resolve(&self, _ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        Ok(get(name))
    }
}
