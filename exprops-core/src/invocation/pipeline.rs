use crate::context::{Argument, InvocationContext};
use crate::converter::RootConverter;
use crate::error::{Error, Result};
use crate::method::MethodKind;
use crate::resolver::RootResolver;
use crate::types::TargetType;
use crate::value::Value;

use super::{Invocation, InvocationHandler};

/// Base handler: name resolution, expansion, resolution, conversion and
/// default fallback.
pub struct Pipeline {
    resolver: RootResolver,
    converter: RootConverter,
}

impl Pipeline {
    pub fn new(resolver: RootResolver, converter: RootConverter) -> Self {
        Pipeline {
            resolver,
            converter,
        }
    }

    pub fn resolver(&self) -> &RootResolver {
        &self.resolver
    }

    pub fn converter(&self) -> &RootConverter {
        &self.converter
    }

    fn property(&self, invocation: &Invocation<'_>) -> Result<Value> {
        let method = invocation.method();
        let template = method.property_name().ok_or_else(|| {
            Error::Configuration(format!("no property name on ({})", method.signature()))
        })?;
        let ctx = invocation.context();
        let name = self.resolver.expand_variables(&ctx, template)?;
        self.resolve_named(invocation, &ctx, &name, method.target())
    }

    fn resolver_facade(&self, invocation: &Invocation<'_>) -> Result<Value> {
        let name = string_argument(invocation, "property name")?;
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "property name must not be blank ({})",
                invocation.method().signature()
            )));
        }
        let ctx = invocation.context();
        let name = self.resolver.expand_variables(&ctx, name)?;
        let target = target_argument(invocation);
        self.resolve_named(invocation, &ctx, &name, target)
    }

    fn converter_facade(&self, invocation: &Invocation<'_>) -> Result<Value> {
        let value = string_argument(invocation, "value")?;
        let target = target_argument(invocation);
        self.converter.convert(&invocation.context(), value, target)
    }

    fn variable_expander_facade(&self, invocation: &Invocation<'_>) -> Result<Value> {
        let template = string_argument(invocation, "value")?;
        self.resolver
            .expand_variables(&invocation.context(), template)
            .map(Value::String)
    }

    fn resolve_named(
        &self,
        invocation: &Invocation<'_>,
        ctx: &InvocationContext<'_>,
        name: &str,
        target: &TargetType,
    ) -> Result<Value> {
        match self.resolver.resolve_expanded(ctx, name)? {
            Some(value) => self.converter.convert(ctx, &value, target),
            None => {
                tracing::trace!(property = name, "property not resolved, falling back");
                fallback(invocation, name, target)
            }
        }
    }
}

fn fallback(invocation: &Invocation<'_>, name: &str, target: &TargetType) -> Result<Value> {
    if let Some(default) = invocation.default_value() {
        return default;
    }
    if target.is_optional() {
        return Ok(Value::none());
    }
    Err(Error::UnresolvedProperty {
        name: name.to_string(),
        method: invocation.method().signature().to_string(),
    })
}

fn string_argument<'a>(invocation: &Invocation<'a>, what: &str) -> Result<&'a str> {
    invocation
        .arguments()
        .get(0)
        .and_then(Argument::as_str)
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "expected the {what} as first argument ({})",
                invocation.method().signature()
            ))
        })
}

/// Second `TargetType` argument, else the method's return type.
fn target_argument<'a>(invocation: &Invocation<'a>) -> &'a TargetType {
    invocation
        .arguments()
        .get(1)
        .and_then(Argument::as_type)
        .unwrap_or_else(|| invocation.method().target())
}

impl InvocationHandler for Pipeline {
    fn invoke(&self, invocation: &Invocation<'_>) -> Result<Value> {
        match invocation.method().kind() {
            MethodKind::Property => self.property(invocation),
            MethodKind::ResolverFacade => self.resolver_facade(invocation),
            MethodKind::ConverterFacade => self.converter_facade(invocation),
            MethodKind::VariableExpanderFacade => self.variable_expander_facade(invocation),
        }
    }
}
