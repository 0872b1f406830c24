//! exprops: bind Rust traits to externalized properties.
//!
//! A trait annotated with `#[externalized]` gets a generated proxy whose
//! methods resolve a named property (environment, system properties, maps,
//! YAML/JSON documents, `.env` files), post-process it, convert it to the
//! method's return type and optionally cache the result.
//!
//! ```ignore
//! use exprops::prelude::*;
//!
//! #[externalized(prefix = "app")]
//! pub trait AppConfig {
//!     #[property("name")]
//!     fn name(&self) -> Result<String>;
//!
//!     #[property("port")]
//!     fn port(&self) -> Result<u16> {
//!         Ok(8080)
//!     }
//! }
//!
//! let props = ExternalizedProperties::builder().defaults().build()?;
//! let config: AppConfigProxy = props.initialize()?;
//! ```

// Re-export sub-crates as public modules so they're accessible as
// `exprops::exprops_core` and `exprops::exprops_macros`.
//
// The proc macros use `proc-macro-crate` to detect whether the user depends
// on `exprops` (facade) or `exprops-core`, and generate the correct paths.
pub extern crate exprops_core;
pub extern crate exprops_macros;

// Re-export everything from exprops-core at the top level for convenience.
pub use exprops_core::*;

pub use exprops_macros::{externalized, PropertyType};

pub mod prelude;
