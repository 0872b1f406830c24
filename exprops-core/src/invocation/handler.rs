use std::sync::Arc;

use crate::error::Result;
use crate::value::Value;

use super::{Initialization, Invocation};

/// Terminal handler of the chain.
pub trait InvocationHandler: Send + Sync {
    fn invoke(&self, invocation: &Invocation<'_>) -> Result<Value>;
}

/// Decorator around the rest of the chain.
///
/// Middleware compose by nesting: the outermost one calls [`Next::run`],
/// which runs the next middleware, and so on down to the base handler.
///
/// ```ignore
/// struct Counting(AtomicUsize);
///
/// impl Middleware for Counting {
///     fn handle(&self, next: Next<'_>, invocation: &Invocation<'_>) -> Result<Value> {
///         self.0.fetch_add(1, Ordering::SeqCst);
///         next.run(invocation)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Middleware`",
    label = "this type cannot be used as invocation middleware",
    note = "implement `Middleware::handle` and register it with `Builder::middleware`"
)]
pub trait Middleware: Send + Sync {
    fn handle(&self, next: Next<'_>, invocation: &Invocation<'_>) -> Result<Value>;

    /// Runs once when a proxy is created. Implementations must call
    /// `next.initialize` so inner middleware are initialized too.
    fn initialize(&self, next: Next<'_>, initialization: &Initialization<'_>) -> Result<()> {
        next.initialize(initialization)
    }
}

/// The remainder of the chain below a middleware.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    base: &'a dyn InvocationHandler,
}

impl<'a> Next<'a> {
    pub fn run(self, invocation: &Invocation<'_>) -> Result<Value> {
        match self.middleware.split_first() {
            Some((first, rest)) => first.handle(
                Next {
                    middleware: rest,
                    base: self.base,
                },
                invocation,
            ),
            None => self.base.invoke(invocation),
        }
    }

    pub fn initialize(self, initialization: &Initialization<'_>) -> Result<()> {
        match self.middleware.split_first() {
            Some((first, rest)) => first.initialize(
                Next {
                    middleware: rest,
                    base: self.base,
                },
                initialization,
            ),
            None => Ok(()),
        }
    }
}

/// Ordered middleware, outermost first, around a base handler.
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Middleware>>,
    base: Arc<dyn InvocationHandler>,
}

impl HandlerChain {
    pub fn new(
        middleware: impl IntoIterator<Item = Arc<dyn Middleware>>,
        base: Arc<dyn InvocationHandler>,
    ) -> Self {
        HandlerChain {
            middleware: middleware.into_iter().collect(),
            base,
        }
    }

    pub fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    fn next(&self) -> Next<'_> {
        Next {
            middleware: &self.middleware,
            base: self.base.as_ref(),
        }
    }

    pub fn invoke(&self, invocation: &Invocation<'_>) -> Result<Value> {
        self.next().run(invocation)
    }

    pub fn initialize(&self, initialization: &Initialization<'_>) -> Result<()> {
        self.next().initialize(initialization)
    }
}
