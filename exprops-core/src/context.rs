use crate::method::{Attributes, PropertyMethod, ProcessorTag};
use crate::types::TargetType;
use crate::value::{PropertyType, Value};

/// One invocation argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Argument {
    Str(String),
    Type(TargetType),
    Value(Value),
}

impl Argument {
    pub fn value<T: PropertyType>(value: T) -> Self {
        Argument::Value(value.into_value())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TargetType> {
        match self {
            Argument::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Str(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Str(value)
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Argument::Str(value.clone())
    }
}

impl From<TargetType> for Argument {
    fn from(value: TargetType) -> Self {
        Argument::Type(value)
    }
}

impl From<&TargetType> for Argument {
    fn from(value: &TargetType) -> Self {
        Argument::Type(value.clone())
    }
}

/// Arguments of a proxy method call, compared structurally in cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Arguments(Vec<Argument>);

static NO_ARGUMENTS: Arguments = Arguments(Vec::new());

impl Arguments {
    pub const fn new() -> Self {
        Arguments(Vec::new())
    }

    pub fn empty() -> &'static Arguments {
        &NO_ARGUMENTS
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(arguments: Vec<Argument>) -> Self {
        Arguments(arguments)
    }
}

impl FromIterator<Argument> for Arguments {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Arguments(iter.into_iter().collect())
    }
}

/// What resolvers, processors and expanders know about the current call.
///
/// Lookups made outside a proxy method (the direct API on
/// [`ExternalizedProperties`](crate::ExternalizedProperties), or tests) use
/// [`InvocationContext::detached`].
#[derive(Debug, Clone, Copy)]
pub struct InvocationContext<'a> {
    method: Option<&'a PropertyMethod>,
    arguments: &'a Arguments,
}

impl<'a> InvocationContext<'a> {
    pub fn new(method: &'a PropertyMethod, arguments: &'a Arguments) -> Self {
        InvocationContext {
            method: Some(method),
            arguments,
        }
    }

    pub fn detached() -> InvocationContext<'static> {
        InvocationContext {
            method: None,
            arguments: Arguments::empty(),
        }
    }

    pub fn method(&self) -> Option<&'a PropertyMethod> {
        self.method
    }

    pub fn arguments(&self) -> &'a Arguments {
        self.arguments
    }

    /// Method attributes, defaults when detached.
    pub fn attributes(&self) -> Attributes {
        self.method.map(|m| *m.attributes()).unwrap_or_default()
    }

    pub fn processors(&self) -> &'a [ProcessorTag] {
        match self.method {
            Some(method) => method.processors(),
            None => &[],
        }
    }
}
