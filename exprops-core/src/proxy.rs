//! Runtime side of generated (or hand-written) proxies.

use std::fmt;
use std::sync::Arc;

use crate::context::Arguments;
use crate::error::{Error, Result};
use crate::invocation::{HandlerChain, Invocation};
use crate::method::{MethodKind, ParameterKind, PropertyMethod};
use crate::processor::RootProcessor;
use crate::value::{PropertyType, Value};

/// A named list of method descriptors.
#[derive(Debug, Clone)]
pub struct ProxyInterface {
    name: &'static str,
    path: &'static str,
    methods: Vec<PropertyMethod>,
}

impl ProxyInterface {
    pub fn new(name: &'static str, methods: Vec<PropertyMethod>) -> Self {
        ProxyInterface {
            name,
            path: name,
            methods,
        }
    }

    /// Qualify the interface, e.g. with `module_path!()`. Two interfaces
    /// sharing a name only get separate invocation cache entries when their
    /// paths differ.
    pub fn with_path(mut self, path: &'static str) -> Self {
        self.path = path;
        for method in &mut self.methods {
            method.set_interface_path(path);
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn methods(&self) -> &[PropertyMethod] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> Option<&PropertyMethod> {
        self.methods.get(index)
    }

    /// Initialization checks. `processors` are the registered processors,
    /// every tag on a method must name one of them.
    pub fn validate(&self, processors: &RootProcessor) -> Result<()> {
        for method in &self.methods {
            validate_method(method, processors)?;
        }
        Ok(())
    }
}

fn invalid(method: &PropertyMethod, reason: &str) -> Error {
    Error::Configuration(format!("invalid proxy method ({}): {reason}", method.signature()))
}

fn validate_method(method: &PropertyMethod, processors: &RootProcessor) -> Result<()> {
    if method.returns_unit() {
        return Err(invalid(method, "proxy methods must return a value"));
    }
    method
        .target()
        .validate()
        .map_err(|e| invalid(method, &e.to_string()))?;

    match method.kind() {
        MethodKind::Property => match method.property_name() {
            None => return Err(invalid(method, "missing property name")),
            Some(name) if name.trim().is_empty() => {
                return Err(invalid(method, "property name must not be blank"));
            }
            Some(_) => {}
        },
        MethodKind::ResolverFacade | MethodKind::ConverterFacade => {
            let kinds: Vec<ParameterKind> = method.parameters().iter().map(|p| p.kind).collect();
            match kinds.as_slice() {
                [ParameterKind::Str] | [ParameterKind::Str, ParameterKind::Type] => {}
                _ => {
                    return Err(invalid(
                        method,
                        "facade methods take a `&str` and an optional `TargetType`",
                    ));
                }
            }
        }
        MethodKind::VariableExpanderFacade => {
            let single_str = matches!(
                method.parameters(),
                [parameter] if parameter.kind == ParameterKind::Str
            );
            if !single_str {
                return Err(invalid(method, "variable expander facades take a single `&str`"));
            }
            if !method.target().is_string() {
                return Err(invalid(method, "variable expander facades must return `String`"));
            }
        }
    }

    for tag in method.processors() {
        if !processors.contains(tag.name) {
            return Err(invalid(
                method,
                &format!("no processor registered under '{}'", tag.name),
            ));
        }
    }
    Ok(())
}

/// Handle to the invocation chain for one interface. Cheap to clone.
#[derive(Clone)]
pub struct ProxyHandler {
    chain: Arc<HandlerChain>,
    interface: &'static ProxyInterface,
}

impl fmt::Debug for ProxyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyHandler")
            .field("interface", &self.interface.path)
            .finish_non_exhaustive()
    }
}

impl ProxyHandler {
    pub fn new(chain: Arc<HandlerChain>, interface: &'static ProxyInterface) -> Self {
        ProxyHandler { chain, interface }
    }

    pub fn interface(&self) -> &'static ProxyInterface {
        self.interface
    }

    /// Run the method at `index`. `default` is the trait method's default
    /// body, used when the property cannot be resolved.
    pub fn invoke<T: PropertyType>(
        &self,
        index: usize,
        arguments: Arguments,
        default: Option<&dyn Fn() -> Result<T>>,
    ) -> Result<T> {
        let method = self.interface.method(index).ok_or_else(|| {
            Error::Configuration(format!(
                "no method at index {index} on proxy interface {}",
                self.interface.name
            ))
        })?;
        let fallback = || -> Result<Value> {
            match default {
                Some(default) => default().map(PropertyType::into_value),
                None => Err(Error::Configuration(format!(
                    "missing default body for ({})",
                    method.signature()
                ))),
            }
        };
        let mut invocation = Invocation::new(method, &arguments);
        if default.is_some() {
            invocation = invocation.with_default(&fallback);
        }
        let value = self.chain.invoke(&invocation)?;
        T::from_value(value)
    }
}

/// Implemented by proxy structs, usually through `#[externalized]`.
///
/// ```ignore
/// #[derive(Clone)]
/// struct AppConfigProxy(ProxyHandler);
///
/// impl Proxy for AppConfigProxy {
///     fn interface() -> &'static ProxyInterface {
///         static INTERFACE: OnceLock<ProxyInterface> = OnceLock::new();
///         INTERFACE.get_or_init(|| {
///             ProxyInterface::new("AppConfig", vec![
///                 PropertyMethod::property("AppConfig", "name", "app.name", TargetType::string()),
///             ])
///         })
///     }
///
///     fn from_handler(handler: ProxyHandler) -> Self {
///         AppConfigProxy(handler)
///     }
/// }
///
/// impl AppConfig for AppConfigProxy {
///     fn name(&self) -> Result<String> {
///         self.0.invoke(0, Arguments::new(), None)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a property proxy",
    label = "does not implement `Proxy`",
    note = "annotate the trait with `#[externalized]` and initialize its generated proxy struct"
)]
pub trait Proxy: Sized + Send + Sync + Clone + 'static {
    fn interface() -> &'static ProxyInterface;

    fn from_handler(handler: ProxyHandler) -> Self;

    /// Default body of the zero-argument method at `index`, if it has one.
    fn default_value(&self, index: usize) -> Option<Result<Value>> {
        let _ = index;
        None
    }
}
