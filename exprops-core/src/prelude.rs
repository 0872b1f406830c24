//! Everything needed to declare and initialize proxies, in one `use`.
//!
//! ```ignore
//! use exprops::prelude::*;
//!
//! #[externalized(prefix = "app")]
//! trait AppConfig {
//!     #[property("name")]
//!     fn name(&self) -> Result<String>;
//! }
//! ```

// ── Assembly ────────────────────────────────────────────────────────────

pub use crate::builder::{Builder, ExternalizedProperties};
pub use crate::settings::Settings;

// ── Pipeline traits ─────────────────────────────────────────────────────

pub use crate::converter::{ConversionContext, ConversionResult, Converter};
pub use crate::expander::{ExpansionContext, VariableExpander};
pub use crate::invocation::{Invocation, Middleware, Next};
pub use crate::processor::{ProcessingContext, Processor};
pub use crate::resolver::Resolver;

// ── Built-in resolvers and converters ───────────────────────────────────

pub use crate::converter::FromStrConverter;
pub use crate::resolver::{
    DefaultResolver, DotenvResolver, EnvironmentResolver, MapResolver, ResourceResolver,
    SystemPropertyResolver,
};

// ── Types ───────────────────────────────────────────────────────────────

pub use crate::context::InvocationContext;
pub use crate::error::{Error, Result};
pub use crate::ordinal::ordered;
pub use crate::proxy::Proxy;
pub use crate::types::{Kind, TargetType};
pub use crate::value::{PropertyType, Value};
