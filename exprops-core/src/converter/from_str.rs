use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::TargetType;
use crate::value::PropertyType;

use super::{ConversionContext, ConversionResult, Converter};

/// Converter for any user type with a [`FromStr`] impl.
///
/// ```ignore
/// #[derive(Clone, PropertyType)]
/// struct Color(String);
///
/// impl FromStr for Color { /* ... */ }
///
/// let props = ExternalizedProperties::builder()
///     .defaults()
///     .converter(FromStrConverter::<Color>::new())
///     .build()?;
/// ```
pub struct FromStrConverter<T> {
    target: TargetType,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PropertyType> FromStrConverter<T> {
    pub fn new() -> Self {
        FromStrConverter {
            target: T::target_type(),
            _marker: PhantomData,
        }
    }
}

impl<T: PropertyType> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FromStrConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromStrConverter")
            .field("target", &self.target)
            .finish()
    }
}

impl<T> Converter for FromStrConverter<T>
where
    T: PropertyType + FromStr,
    T::Err: fmt::Display,
{
    fn can_convert_to(&self, target: &TargetType) -> bool {
        *target == self.target
    }

    fn convert(
        &self,
        _ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        value
            .parse::<T>()
            .map(ConversionResult::of)
            .map_err(|e| Error::conversion(target, value, e.to_string()))
    }
}
