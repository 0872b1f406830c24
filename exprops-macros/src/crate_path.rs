//! Crate path resolution for generated code.
//!
//! Detects whether the user depends on `exprops` (facade) or `exprops-core`
//! directly, and returns the appropriate path prefix for generated code.

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;

fn to_path(found: FoundCrate, package: &str) -> TokenStream {
    match found {
        // Integration tests of the package itself link it as an extern crate.
        FoundCrate::Itself if std::env::var_os("CARGO_TARGET_TMPDIR").is_some() => {
            let ident = syn::Ident::new(&package.replace('-', "_"), proc_macro2::Span::call_site());
            quote!(::#ident)
        }
        FoundCrate::Itself => quote!(crate),
        FoundCrate::Name(name) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote!(::#ident)
        }
    }
}

/// Returns the token stream for accessing `exprops_core` types.
///
/// If the user depends on `exprops`, returns `::exprops`.
/// Otherwise returns `::exprops_core`.
pub fn exprops_core_path() -> TokenStream {
    if let Ok(found) = crate_name("exprops") {
        to_path(found, "exprops")
    } else if let Ok(found) = crate_name("exprops-core") {
        to_path(found, "exprops-core")
    } else {
        // Fallback - assume exprops_core is available (for error messages)
        quote!(::exprops_core)
    }
}
