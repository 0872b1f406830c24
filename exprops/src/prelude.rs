//! exprops prelude: import everything you need with a single `use`.

// ── Macros (from exprops-macros) ────────────────────────────────────────

/// Trait attribute generating the proxy struct.
pub use exprops_macros::externalized;

/// Derive for custom property value types.
pub use exprops_macros::PropertyType;

// ── Runtime (from exprops-core) ─────────────────────────────────────────

pub use exprops_core::prelude::*;
