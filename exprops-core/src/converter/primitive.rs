use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{Kind, TargetType};
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

/// `bool`, `char`, integers and floats.
///
/// Malformed input is a conversion error, never a zero value. Booleans accept
/// `true` and `false` in any case and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveConverter;

impl PrimitiveConverter {
    pub fn new() -> Self {
        PrimitiveConverter
    }
}

fn parse<T>(value: &str, target: &TargetType) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| Error::conversion(target, value, e))
}

fn parse_bool(value: &str, target: &TargetType) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::conversion(target, value, "expected `true` or `false`"))
    }
}

fn parse_char(value: &str, target: &TargetType) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::conversion(target, value, "expected exactly one character")),
    }
}

impl Converter for PrimitiveConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        let kind = target.kind();
        kind.is_integer() || matches!(kind, Kind::Bool | Kind::Char | Kind::F32 | Kind::F64)
    }

    fn convert(
        &self,
        _ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        let converted = match target.kind() {
            Kind::Bool => Value::Bool(parse_bool(value, target)?),
            Kind::Char => Value::Char(parse_char(value, target)?),
            Kind::I8 => Value::I8(parse(value, target)?),
            Kind::I16 => Value::I16(parse(value, target)?),
            Kind::I32 => Value::I32(parse(value, target)?),
            Kind::I64 => Value::I64(parse(value, target)?),
            Kind::I128 => Value::I128(parse(value, target)?),
            Kind::Isize => Value::Isize(parse(value, target)?),
            Kind::U8 => Value::U8(parse(value, target)?),
            Kind::U16 => Value::U16(parse(value, target)?),
            Kind::U32 => Value::U32(parse(value, target)?),
            Kind::U64 => Value::U64(parse(value, target)?),
            Kind::U128 => Value::U128(parse(value, target)?),
            Kind::Usize => Value::Usize(parse(value, target)?),
            Kind::F32 => Value::F32(parse(value, target)?),
            Kind::F64 => Value::F64(parse(value, target)?),
            _ => return Ok(ConversionResult::Skip),
        };
        Ok(ConversionResult::Value(converted))
    }
}
