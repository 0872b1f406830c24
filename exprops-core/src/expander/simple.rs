use crate::error::{Error, Result};

use super::{ExpansionContext, VariableExpander};

/// Scans for `prefix name suffix` tokens (`${` and `}` by default).
///
/// An unterminated token (`${name`) or an empty one (`${}`) is kept as
/// literal text.
#[derive(Debug, Clone)]
pub struct SimpleVariableExpander {
    prefix: String,
    suffix: String,
}

impl SimpleVariableExpander {
    pub const DEFAULT_PREFIX: &'static str = "${";
    pub const DEFAULT_SUFFIX: &'static str = "}";

    pub fn new() -> Self {
        SimpleVariableExpander {
            prefix: Self::DEFAULT_PREFIX.to_string(),
            suffix: Self::DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Custom delimiters, e.g. `#[` and `]`. Both must be non-empty.
    pub fn with_delimiters(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        if prefix.is_empty() || suffix.is_empty() {
            return Err(Error::Configuration(
                "variable prefix and suffix must not be empty".to_string(),
            ));
        }
        Ok(SimpleVariableExpander { prefix, suffix })
    }
}

impl Default for SimpleVariableExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableExpander for SimpleVariableExpander {
    fn expand(&self, ctx: &ExpansionContext<'_>, template: &str) -> Result<String> {
        let mut expanded = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find(&self.prefix) {
            let after_prefix = &rest[start + self.prefix.len()..];
            let Some(end) = after_prefix.find(&self.suffix) else {
                break;
            };
            let name = &after_prefix[..end];
            let token_end = start + self.prefix.len() + end + self.suffix.len();
            if name.is_empty() {
                expanded.push_str(&rest[..token_end]);
            } else {
                expanded.push_str(&rest[..start]);
                let value = ctx.resolve(name)?.ok_or_else(|| Error::VariableExpansion {
                    placeholder: name.to_string(),
                    template: template.to_string(),
                })?;
                expanded.push_str(&value);
            }
            rest = &rest[token_end..];
        }
        expanded.push_str(rest);
        Ok(expanded)
    }
}
