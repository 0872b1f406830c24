use std::sync::Arc;

use crate::error::Result;
use crate::types::TargetType;

use super::{
    ConversionContext, ConversionResult, Converter, DateTimeConverter, DurationConverter,
    ListConverter, OptionalConverter, ParseConverter, PrimitiveConverter, SetConverter,
};

/// Bundle of every built-in converter.
///
/// Registered after user converters by `enable_default_converters`, so a
/// user converter for the same target takes precedence.
#[derive(Clone)]
pub struct DefaultConverter {
    converters: Vec<Arc<dyn Converter>>,
}

impl DefaultConverter {
    pub fn new() -> Self {
        DefaultConverter {
            converters: vec![
                Arc::new(PrimitiveConverter),
                Arc::new(ListConverter),
                Arc::new(SetConverter),
                Arc::new(OptionalConverter),
                Arc::new(DurationConverter),
                Arc::new(DateTimeConverter),
                Arc::new(ParseConverter),
            ],
        }
    }
}

impl Default for DefaultConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DefaultConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        self.converters.iter().any(|c| c.can_convert_to(target))
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        for converter in self.converters.iter().filter(|c| c.can_convert_to(target)) {
            match converter.convert(ctx, value, target)? {
                ConversionResult::Skip => continue,
                converted => return Ok(converted),
            }
        }
        Ok(ConversionResult::Skip)
    }
}
