use regex::Regex;

use crate::error::{Error, Result};

use super::{ExpansionContext, VariableExpander};

/// Expands every match of a regular expression; the first capture group is
/// the variable name.
#[derive(Debug, Clone)]
pub struct PatternVariableExpander {
    pattern: Regex,
}

impl PatternVariableExpander {
    pub const DEFAULT_PATTERN: &'static str = r"\$\{(.+?)\}";

    pub fn new() -> Result<Self> {
        Self::with_pattern(Self::DEFAULT_PATTERN)
    }

    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::Configuration(format!("invalid variable pattern: {e}")))?;
        Self::from_regex(pattern)
    }

    pub fn from_regex(pattern: Regex) -> Result<Self> {
        if pattern.captures_len() < 2 {
            return Err(Error::Configuration(format!(
                "variable pattern `{}` needs a capture group for the variable name",
                pattern.as_str()
            )));
        }
        Ok(PatternVariableExpander { pattern })
    }
}

impl VariableExpander for PatternVariableExpander {
    fn expand(&self, ctx: &ExpansionContext<'_>, template: &str) -> Result<String> {
        let mut expanded = String::with_capacity(template.len());
        let mut last = 0;
        for captures in self.pattern.captures_iter(template) {
            let (Some(token), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            expanded.push_str(&template[last..token.start()]);
            let value = ctx
                .resolve(name.as_str())?
                .ok_or_else(|| Error::VariableExpansion {
                    placeholder: name.as_str().to_string(),
                    template: template.to_string(),
                })?;
            expanded.push_str(&value);
            last = token.end();
        }
        expanded.push_str(&template[last..]);
        Ok(expanded)
    }
}
