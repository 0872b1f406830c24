use std::sync::Arc;

use crate::context::InvocationContext;
use crate::error::{Error, Result};
use crate::ordinal::sort_by_ordinal;
use crate::types::TargetType;
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

/// Entry point of the converter chain.
///
/// `String` targets are returned as-is. Otherwise converters claiming the
/// target are tried in ordinal order; the first one that does not skip wins.
#[derive(Clone, Default)]
pub struct RootConverter {
    converters: Vec<Arc<dyn Converter>>,
}

impl RootConverter {
    pub fn new(converters: impl IntoIterator<Item = Arc<dyn Converter>>) -> Self {
        let mut converters: Vec<Arc<dyn Converter>> = converters.into_iter().collect();
        sort_by_ordinal(&mut converters, |c| c.ordinal());
        RootConverter { converters }
    }

    pub fn converters(&self) -> &[Arc<dyn Converter>] {
        &self.converters
    }

    pub fn convert(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<Value> {
        if target.is_string() {
            return Ok(Value::String(value.to_string()));
        }
        let conversion = ConversionContext::new(ctx, self);
        for converter in self.converters.iter().filter(|c| c.can_convert_to(target)) {
            match converter.convert(&conversion, value, target) {
                Ok(ConversionResult::Skip) => continue,
                Ok(ConversionResult::Value(converted)) => {
                    tracing::trace!(target_type = %target, "value converted");
                    return Ok(converted);
                }
                Err(e) if e.is_conversion() => return Err(e),
                Err(e) => return Err(Error::conversion(target, value, e)),
            }
        }
        Err(Error::NoConverter {
            target: target.clone(),
            value: value.to_string(),
        })
    }
}
