use crate::error::Result;
use crate::types::{Kind, TargetType};
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

/// Split on the method delimiter (`,` unless `delimiter` is set), dropping
/// empty tokens when `strip_empty` is set. Empty input has no tokens.
fn tokens<'v>(ctx: &ConversionContext<'_>, value: &'v str) -> Vec<&'v str> {
    if value.is_empty() {
        return Vec::new();
    }
    let attributes = ctx.attributes();
    value
        .split(attributes.delimiter())
        .filter(|token| !(attributes.strip_empty && token.is_empty()))
        .collect()
}

fn convert_elements(
    ctx: &ConversionContext<'_>,
    value: &str,
    target: &TargetType,
) -> Result<Vec<Value>> {
    let string = TargetType::string();
    let element = target.arg(0).unwrap_or(&string);
    tokens(ctx, value)
        .into_iter()
        .map(|token| ctx.convert(token, element))
        .collect()
}

/// `Vec<T>`: each token is converted to `T` through the root converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConverter;

impl ListConverter {
    pub fn new() -> Self {
        ListConverter
    }
}

impl Converter for ListConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        target.is(Kind::List)
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        Ok(ConversionResult::Value(Value::List(convert_elements(
            ctx, value, target,
        )?)))
    }
}

/// Sets: like [`ListConverter`], keeping the first of equal elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetConverter;

impl SetConverter {
    pub fn new() -> Self {
        SetConverter
    }
}

impl Converter for SetConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        target.is(Kind::Set)
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        let elements = convert_elements(ctx, value, target)?;
        Ok(ConversionResult::Value(Value::set_from(elements)))
    }
}
