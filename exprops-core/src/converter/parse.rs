use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::{Kind, TargetType};
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

/// Types parsed straight from their textual form: paths, URLs, UUIDs and
/// socket addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseConverter;

impl ParseConverter {
    pub fn new() -> Self {
        ParseConverter
    }
}

impl Converter for ParseConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        matches!(
            target.kind(),
            Kind::Path | Kind::Url | Kind::Uuid | Kind::IpAddr | Kind::SocketAddr
        )
    }

    fn convert(
        &self,
        _ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        let converted = match target.kind() {
            Kind::Path if value.is_empty() => {
                return Err(Error::conversion(target, value, "empty path"));
            }
            Kind::Path => Value::Path(PathBuf::from(value)),
            Kind::Url => Value::Url(
                url::Url::parse(value).map_err(|e| Error::conversion(target, value, e))?,
            ),
            Kind::Uuid => Value::Uuid(
                uuid::Uuid::parse_str(value).map_err(|e| Error::conversion(target, value, e))?,
            ),
            Kind::IpAddr => {
                Value::IpAddr(value.parse().map_err(|e| Error::conversion(target, value, e))?)
            }
            Kind::SocketAddr => {
                Value::SocketAddr(value.parse().map_err(|e| Error::conversion(target, value, e))?)
            }
            _ => return Ok(ConversionResult::Skip),
        };
        Ok(ConversionResult::Value(converted))
    }
}
