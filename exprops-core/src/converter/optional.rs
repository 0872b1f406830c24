use crate::error::Result;
use crate::types::{Kind, TargetType};
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

/// `Option<T>`: empty input is `None`, anything else converts to `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalConverter;

impl OptionalConverter {
    pub fn new() -> Self {
        OptionalConverter
    }
}

impl Converter for OptionalConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        target.is(Kind::Optional)
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        if value.is_empty() {
            return Ok(ConversionResult::Value(Value::none()));
        }
        let string = TargetType::string();
        let inner = target.arg(0).unwrap_or(&string);
        let converted = ctx.convert(value, inner)?;
        Ok(ConversionResult::Value(Value::some(converted)))
    }
}
