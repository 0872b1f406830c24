use std::collections::HashSet;
use std::sync::Arc;

use crate::context::InvocationContext;
use crate::error::{Error, Result};

use super::{ProcessingContext, Processor};

/// Runs the registered processors tagged on the current method.
///
/// Processors apply in registration order, each receiving the previous
/// output. The first failure stops the chain.
#[derive(Clone, Default)]
pub struct RootProcessor {
    processors: Vec<Arc<dyn Processor>>,
}

impl RootProcessor {
    pub fn new(processors: impl IntoIterator<Item = Arc<dyn Processor>>) -> Result<Self> {
        let processors: Vec<Arc<dyn Processor>> = processors.into_iter().collect();
        let mut names = HashSet::new();
        for processor in &processors {
            if !names.insert(processor.name()) {
                return Err(Error::Configuration(format!(
                    "processor '{}' is registered more than once",
                    processor.name()
                )));
            }
        }
        Ok(RootProcessor { processors })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processors.iter().any(|p| p.name() == name)
    }

    pub fn process(&self, ctx: &InvocationContext<'_>, value: &str) -> Result<String> {
        let tags = ctx.processors();
        let mut current = value.to_string();
        if tags.is_empty() {
            return Ok(current);
        }
        for processor in &self.processors {
            let stage = processor.name();
            let Some(tag) = tags.iter().find(|tag| tag.name == stage) else {
                continue;
            };
            current = processor
                .process(&ProcessingContext::new(ctx, tag), &current)
                .map_err(|e| match e {
                    Error::Processing { .. } => e,
                    other => Error::processing(stage, other),
                })?;
            tracing::trace!(stage, "value processed");
        }
        Ok(current)
    }
}
