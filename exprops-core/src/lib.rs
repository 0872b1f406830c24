pub mod builder;
pub mod context;
pub mod converter;
pub mod error;
pub mod expander;
pub mod invocation;
pub mod method;
pub mod ordinal;
pub mod prelude;
pub mod processor;
pub mod proxy;
pub mod resolver;
pub mod settings;
pub mod types;
pub mod value;

pub use builder::{Builder, ExternalizedProperties, OnProfiles, PROFILE_PROPERTY};
pub use context::{Argument, Arguments, InvocationContext};
pub use converter::{ConversionContext, ConversionResult, Converter, RootConverter};
pub use error::{BoxError, Error, Result};
pub use expander::{ExpansionContext, VariableExpander};
pub use invocation::{Initialization, Invocation, InvocationKey, Middleware, Next};
pub use method::{
    Attributes, MethodKind, Parameter, ParameterKind, ProcessorTag, PropertyMethod,
};
pub use ordinal::{ordered, Ordered};
pub use processor::{ProcessingContext, Processor};
pub use proxy::{Proxy, ProxyHandler, ProxyInterface};
pub use resolver::{Resolver, RootResolver};
pub use settings::Settings;
pub use types::{CustomKind, Kind, TargetType};
pub use value::{CustomValue, PropertyType, Value};

pub use exprops_cache as cache;
