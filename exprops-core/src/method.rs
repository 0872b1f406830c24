//! Static descriptors of proxy methods.
//!
//! The `#[externalized]` macro emits one [`PropertyMethod`] per trait method.
//! Hand-written adapters build the same descriptors with the builder-style
//! constructors below.

use std::fmt;

use crate::types::{Kind, TargetType};

/// What a proxy method does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// `#[property("name")]`: resolve, process, convert.
    Property,
    /// Property name taken from the first argument.
    ResolverFacade,
    /// Converts the first argument, no resolution.
    ConverterFacade,
    /// Expands variables in the first argument.
    VariableExpanderFacade,
}

impl MethodKind {
    pub fn name(&self) -> &'static str {
        match self {
            MethodKind::Property => "property",
            MethodKind::ResolverFacade => "resolver facade",
            MethodKind::ConverterFacade => "converter facade",
            MethodKind::VariableExpanderFacade => "variable expander facade",
        }
    }
}

/// How a parameter enters the invocation arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// `&str` / `String`.
    Str,
    /// A [`TargetType`] chosen by the caller.
    Type,
    /// Any other [`PropertyType`](crate::PropertyType).
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: &'static str,
    pub ty: &'static str,
    pub kind: ParameterKind,
}

impl Parameter {
    pub const fn new(name: &'static str, ty: &'static str, kind: ParameterKind) -> Self {
        Parameter { name, ty, kind }
    }
}

/// A `#[process(...)]` tag selecting a processor for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessorTag {
    pub name: &'static str,
    pub argument: Option<&'static str>,
}

impl ProcessorTag {
    pub const fn new(name: &'static str) -> Self {
        ProcessorTag {
            name,
            argument: None,
        }
    }

    pub const fn with_argument(name: &'static str, argument: &'static str) -> Self {
        ProcessorTag {
            name,
            argument: Some(argument),
        }
    }
}

/// Method-level conversion hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// Collection delimiter, `,` when unset.
    pub delimiter: Option<&'static str>,
    /// Drop empty collection tokens.
    pub strip_empty: bool,
    /// chrono format string for date/time targets.
    pub date_time_format: Option<&'static str>,
}

impl Attributes {
    pub const DEFAULT_DELIMITER: &'static str = ",";

    pub fn delimiter(&self) -> &'static str {
        self.delimiter.unwrap_or(Self::DEFAULT_DELIMITER)
    }
}

/// Descriptor of one proxy method, computed once per interface.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMethod {
    interface: &'static str,
    interface_path: &'static str,
    name: &'static str,
    kind: MethodKind,
    property: Option<&'static str>,
    target: TargetType,
    parameters: Vec<Parameter>,
    has_default: bool,
    processors: Vec<ProcessorTag>,
    attributes: Attributes,
}

impl PropertyMethod {
    fn new(
        interface: &'static str,
        name: &'static str,
        kind: MethodKind,
        property: Option<&'static str>,
        target: TargetType,
    ) -> Self {
        PropertyMethod {
            interface,
            interface_path: interface,
            name,
            kind,
            property,
            target,
            parameters: Vec::new(),
            has_default: false,
            processors: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    /// A `#[property("...")]` method. `property` is the full name template,
    /// prefix included.
    pub fn property(
        interface: &'static str,
        name: &'static str,
        property: &'static str,
        target: TargetType,
    ) -> Self {
        Self::new(interface, name, MethodKind::Property, Some(property), target)
    }

    pub fn resolver_facade(interface: &'static str, name: &'static str, target: TargetType) -> Self {
        Self::new(interface, name, MethodKind::ResolverFacade, None, target)
    }

    pub fn converter_facade(interface: &'static str, name: &'static str, target: TargetType) -> Self {
        Self::new(interface, name, MethodKind::ConverterFacade, None, target)
    }

    pub fn variable_expander_facade(
        interface: &'static str,
        name: &'static str,
        target: TargetType,
    ) -> Self {
        Self::new(interface, name, MethodKind::VariableExpanderFacade, None, target)
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn with_processor(mut self, tag: ProcessorTag) -> Self {
        self.processors.push(tag);
        self
    }

    pub fn with_delimiter(mut self, delimiter: &'static str) -> Self {
        self.attributes.delimiter = Some(delimiter);
        self
    }

    pub fn with_strip_empty(mut self) -> Self {
        self.attributes.strip_empty = true;
        self
    }

    pub fn with_date_time_format(mut self, format: &'static str) -> Self {
        self.attributes.date_time_format = Some(format);
        self
    }

    pub fn interface(&self) -> &'static str {
        self.interface
    }

    /// Fully qualified interface identity, the bare interface name unless
    /// set through [`ProxyInterface::with_path`](crate::ProxyInterface::with_path).
    pub fn interface_path(&self) -> &'static str {
        self.interface_path
    }

    pub(crate) fn set_interface_path(&mut self, path: &'static str) {
        self.interface_path = path;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Static property name template, if any.
    pub fn property_name(&self) -> Option<&'static str> {
        self.property
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub fn processors(&self) -> &[ProcessorTag] {
        &self.processors
    }

    /// First tag with the given processor name.
    pub fn processor_tag(&self, name: &str) -> Option<&ProcessorTag> {
        self.processors.iter().find(|tag| tag.name == name)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Zero-argument property methods are pre-loaded by eager loading.
    pub fn is_eager_loadable(&self) -> bool {
        self.kind == MethodKind::Property && self.parameters.is_empty()
    }

    /// `Trait::method(&str, TargetType) -> Vec<i32>`, for diagnostics.
    pub fn signature(&self) -> Signature<'_> {
        Signature(self)
    }

    pub(crate) fn returns_unit(&self) -> bool {
        self.target.is(Kind::Unit)
    }
}

/// Display adapter for [`PropertyMethod::signature`].
pub struct Signature<'a>(&'a PropertyMethod);

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.0;
        write!(f, "{}::{}(", method.interface, method.name)?;
        for (i, parameter) in method.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(parameter.ty)?;
        }
        write!(f, ") -> {}", method.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_display() {
        let method = PropertyMethod::resolver_facade("AppConfig", "resolve", TargetType::string())
            .with_parameter(Parameter::new("name", "&str", ParameterKind::Str))
            .with_parameter(Parameter::new("target", "TargetType", ParameterKind::Type));
        assert_eq!(
            method.signature().to_string(),
            "AppConfig::resolve(&str, TargetType) -> String"
        );
    }

    #[test]
    fn test_default_delimiter() {
        let method = PropertyMethod::property("A", "b", "a.b", TargetType::string());
        assert_eq!(method.attributes().delimiter(), ",");
        assert_eq!(method.with_delimiter(";").attributes().delimiter(), ";");
    }
}
