use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{Error, Result};
use crate::types::{Kind, TargetType};
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

/// chrono date and time types.
///
/// Without a `date_time_format` attribute the ISO-8601 / RFC 3339 form is
/// expected. With one, the value is parsed with that `strftime` pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl DateTimeConverter {
    pub fn new() -> Self {
        DateTimeConverter
    }
}

impl Converter for DateTimeConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        matches!(
            target.kind(),
            Kind::DateTimeUtc
                | Kind::DateTimeFixed
                | Kind::NaiveDateTime
                | Kind::NaiveDate
                | Kind::NaiveTime
        )
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        let format = ctx.attributes().date_time_format;
        let fail = |e: chrono::ParseError| Error::conversion(target, value, e);
        let converted = match (target.kind(), format) {
            (Kind::NaiveDate, Some(f)) => Value::NaiveDate(NaiveDate::parse_from_str(value, f).map_err(fail)?),
            (Kind::NaiveDate, None) => Value::NaiveDate(value.parse().map_err(fail)?),
            (Kind::NaiveTime, Some(f)) => Value::NaiveTime(NaiveTime::parse_from_str(value, f).map_err(fail)?),
            (Kind::NaiveTime, None) => Value::NaiveTime(value.parse().map_err(fail)?),
            (Kind::NaiveDateTime, Some(f)) => {
                Value::NaiveDateTime(NaiveDateTime::parse_from_str(value, f).map_err(fail)?)
            }
            (Kind::NaiveDateTime, None) => Value::NaiveDateTime(value.parse().map_err(fail)?),
            (Kind::DateTimeFixed, Some(f)) => {
                Value::DateTimeFixed(DateTime::parse_from_str(value, f).map_err(fail)?)
            }
            (Kind::DateTimeFixed, None) => {
                Value::DateTimeFixed(DateTime::parse_from_rfc3339(value).map_err(fail)?)
            }
            (Kind::DateTimeUtc, Some(f)) => Value::DateTimeUtc(parse_utc(value, f).map_err(fail)?),
            (Kind::DateTimeUtc, None) => Value::DateTimeUtc(value.parse().map_err(fail)?),
            _ => return Ok(ConversionResult::Skip),
        };
        Ok(ConversionResult::Value(converted))
    }
}

/// Patterns without an offset are read as UTC wall-clock time.
fn parse_utc(value: &str, format: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_str(value, format) {
        Ok(fixed) => Ok(fixed.with_timezone(&Utc)),
        Err(offset_error) => NaiveDateTime::parse_from_str(value, format)
            .map(|naive| naive.and_utc())
            .map_err(|_| offset_error),
    }
}
