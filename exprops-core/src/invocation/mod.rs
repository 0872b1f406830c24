//! The per-call pipeline behind every proxy method and its middleware.

mod caching;
mod eager;
mod handler;
mod logged;
mod pipeline;

use crate::context::{Arguments, InvocationContext};
use crate::error::Result;
use crate::method::PropertyMethod;
use crate::proxy::ProxyInterface;
use crate::value::Value;

pub use caching::{InvocationCaching, InvocationKey};
pub use eager::EagerLoading;
pub use handler::{HandlerChain, InvocationHandler, Middleware, Next};
pub use logged::{log_at_level, LogLevel, Logged, Timed};
pub use pipeline::Pipeline;

/// One call of a proxy method.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    method: &'a PropertyMethod,
    arguments: &'a Arguments,
    default: Option<&'a dyn Fn() -> Result<Value>>,
}

impl<'a> Invocation<'a> {
    pub fn new(method: &'a PropertyMethod, arguments: &'a Arguments) -> Self {
        Invocation {
            method,
            arguments,
            default: None,
        }
    }

    /// Attach the trait method's default body.
    pub fn with_default(mut self, default: &'a dyn Fn() -> Result<Value>) -> Self {
        self.default = Some(default);
        self
    }

    pub fn method(&self) -> &'a PropertyMethod {
        self.method
    }

    pub fn arguments(&self) -> &'a Arguments {
        self.arguments
    }

    pub fn context(&self) -> InvocationContext<'a> {
        InvocationContext::new(self.method, self.arguments)
    }

    /// Run the default body, if the method has one.
    pub fn default_value(&self) -> Option<Result<Value>> {
        self.default.map(|default| default())
    }
}

/// Passed to [`Middleware::initialize`] once per created proxy.
#[derive(Clone, Copy)]
pub struct Initialization<'a> {
    interface: &'static ProxyInterface,
    defaults: &'a dyn Fn(usize) -> Option<Result<Value>>,
}

impl<'a> Initialization<'a> {
    pub fn new(
        interface: &'static ProxyInterface,
        defaults: &'a dyn Fn(usize) -> Option<Result<Value>>,
    ) -> Self {
        Initialization {
            interface,
            defaults,
        }
    }

    pub fn interface(&self) -> &'static ProxyInterface {
        self.interface
    }

    /// Default body of the zero-argument method at `index`.
    pub fn default_value(&self, index: usize) -> Option<Result<Value>> {
        (self.defaults)(index)
    }
}
