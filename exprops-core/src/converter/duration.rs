use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{Kind, TargetType};
use crate::value::Value;

use super::{ConversionContext, ConversionResult, Converter};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// [`Duration`] from one of three notations:
///
/// - ISO-8601 durations: `PT30S`, `P2DT3H4M`, `-PT1.5S` (days and smaller)
/// - plain digits, read as milliseconds: `1500`
/// - humantime strings: `30s`, `1h 30m`, `250ms`
///
/// Negative durations are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationConverter;

impl DurationConverter {
    pub fn new() -> Self {
        DurationConverter
    }
}

impl Converter for DurationConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        target.is(Kind::Duration)
    }

    fn convert(
        &self,
        _ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        parse_duration(value)
            .map(|d| ConversionResult::Value(Value::Duration(d)))
            .map_err(|message| Error::conversion(target, value, message))
    }
}

pub(crate) fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    if is_iso(value) {
        let nanos = parse_iso(value).ok_or_else(|| format!("invalid ISO-8601 duration `{value}`"))?;
        return from_nanos(nanos);
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| e.to_string());
    }
    humantime::parse_duration(value).map_err(|e| e.to_string())
}

fn is_iso(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    unsigned.starts_with(['P', 'p'])
}

fn from_nanos(nanos: i128) -> std::result::Result<Duration, String> {
    if nanos < 0 {
        return Err("negative durations are not supported".to_string());
    }
    let secs = u64::try_from(nanos / NANOS_PER_SECOND).map_err(|e| e.to_string())?;
    // Remainder of a non-negative value is below one second.
    let subsec = (nanos % NANOS_PER_SECOND) as u32;
    Ok(Duration::new(secs, subsec))
}

/// `[-+]P[nD][T[nH][nM][n[.f]S]]`, each amount optionally signed.
fn parse_iso(value: &str) -> Option<i128> {
    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let body = unsigned.strip_prefix(['P', 'p'])?;
    let (date, time) = match body.find(['T', 't']) {
        Some(index) => (&body[..index], Some(&body[index + 1..])),
        None => (body, None),
    };
    if date.is_empty() && time.is_none() {
        return None;
    }

    let mut total: i128 = 0;
    if !date.is_empty() {
        let days = date.strip_suffix(['D', 'd'])?;
        total = total.checked_add(amount(days)?.checked_mul(NANOS_PER_DAY)?)?;
    }
    if let Some(time) = time {
        if time.is_empty() {
            return None;
        }
        let mut rest = time;
        for (upper, lower, unit) in [('H', 'h', NANOS_PER_HOUR), ('M', 'm', NANOS_PER_MINUTE)] {
            if let Some(index) = rest.find([upper, lower]) {
                total = total.checked_add(amount(&rest[..index])?.checked_mul(unit)?)?;
                rest = &rest[index + 1..];
            }
        }
        if !rest.is_empty() {
            let seconds = rest.strip_suffix(['S', 's'])?;
            total = total.checked_add(seconds_amount(seconds)?)?;
        }
    }
    Some(if negative { -total } else { total })
}

fn amount(text: &str) -> Option<i128> {
    if text.is_empty() {
        return None;
    }
    text.parse::<i64>().ok().map(i128::from)
}

/// Seconds with an optional fraction of up to nine digits, in nanoseconds.
fn seconds_amount(text: &str) -> Option<i128> {
    let (whole, fraction) = match text.find(['.', ',']) {
        Some(index) => (&text[..index], Some(&text[index + 1..])),
        None => (text, None),
    };
    let whole_nanos = amount(whole)?.checked_mul(NANOS_PER_SECOND)?;
    let Some(fraction) = fraction else {
        return Some(whole_nanos);
    };
    if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{fraction:0<9}");
    let fraction_nanos: i128 = padded.parse().ok()?;
    if whole.starts_with('-') {
        whole_nanos.checked_sub(fraction_nanos)
    } else {
        whole_nanos.checked_add(fraction_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_durations() {
        assert_eq!(parse_duration("PT30S"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("PT15M"), Ok(Duration::from_secs(900)));
        assert_eq!(
            parse_duration("P2DT3H4M"),
            Ok(Duration::from_secs(2 * 86_400 + 3 * 3_600 + 4 * 60))
        );
        assert_eq!(parse_duration("pt1.5s"), Ok(Duration::from_millis(1_500)));
        assert_eq!(parse_duration("+PT1H"), Ok(Duration::from_secs(3_600)));
        assert_eq!(parse_duration("PT1H-10M"), Ok(Duration::from_secs(3_000)));
    }

    #[test]
    fn malformed_iso_durations() {
        for input in ["P", "PT", "PT5", "P1H", "PTS", "PT1.1234567891S", "PT5S5M"] {
            assert!(parse_duration(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn negative_durations_are_rejected() {
        assert!(parse_duration("-PT1S").is_err());
        assert!(parse_duration("PT-0.5S").is_err());
    }

    #[test]
    fn plain_digits_are_millis() {
        assert_eq!(parse_duration("1500"), Ok(Duration::from_millis(1_500)));
    }

    #[test]
    fn humantime_notation() {
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("1h 30m"), Ok(Duration::from_secs(5_400)));
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("").is_err());
    }
}
