//! String to typed value conversion.

mod collection;
mod datetime;
mod default;
mod duration;
mod from_str;
mod optional;
mod parse;
mod primitive;
mod root;

use crate::context::InvocationContext;
use crate::error::Result;
use crate::method::Attributes;
use crate::types::TargetType;
use crate::value::{PropertyType, Value};

pub use collection::{ListConverter, SetConverter};
pub use datetime::DateTimeConverter;
pub use default::DefaultConverter;
pub use duration::DurationConverter;
pub use from_str::FromStrConverter;
pub use optional::OptionalConverter;
pub use parse::ParseConverter;
pub use primitive::PrimitiveConverter;
pub use root::RootConverter;

/// Outcome of a single converter.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// Not handled here, try the next converter.
    Skip,
    Value(Value),
}

impl ConversionResult {
    pub fn of<T: PropertyType>(value: T) -> Self {
        ConversionResult::Value(value.into_value())
    }
}

/// Converts a resolved string into a requested [`TargetType`].
///
/// Converters for containers must convert their elements through
/// [`ConversionContext::convert`], never by calling themselves, so that
/// converters registered earlier in the chain win at every level.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a property converter",
    label = "does not implement `Converter`",
    note = "implement `Converter::can_convert_to` and `Converter::convert`"
)]
pub trait Converter: Send + Sync {
    fn can_convert_to(&self, target: &TargetType) -> bool;

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult>;

    /// Position hint in the chain, lower is earlier.
    fn ordinal(&self) -> Option<i32> {
        None
    }
}

impl<C: Converter + ?Sized> Converter for std::sync::Arc<C> {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        (**self).can_convert_to(target)
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        (**self).convert(ctx, value, target)
    }

    fn ordinal(&self) -> Option<i32> {
        (**self).ordinal()
    }
}

/// The invocation plus the root converter for sub-conversions.
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
    invocation: InvocationContext<'a>,
    root: &'a RootConverter,
}

impl<'a> ConversionContext<'a> {
    pub fn new(invocation: &InvocationContext<'a>, root: &'a RootConverter) -> Self {
        ConversionContext {
            invocation: *invocation,
            root,
        }
    }

    pub fn invocation(&self) -> &InvocationContext<'a> {
        &self.invocation
    }

    pub fn attributes(&self) -> Attributes {
        self.invocation.attributes()
    }

    /// Convert through the whole chain, starting at the root.
    pub fn convert(&self, value: &str, target: &TargetType) -> Result<Value> {
        self.root.convert(&self.invocation, value, target)
    }
}
