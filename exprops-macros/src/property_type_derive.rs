use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::crate_path::exprops_core_path;

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match generate(&input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "#[derive(PropertyType)] requires an owned `'static` type",
        ));
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let krate = exprops_core_path();

    Ok(quote! {
        impl #impl_generics #krate::PropertyType for #name #ty_generics #where_clause {
            fn target_type() -> #krate::TargetType {
                #krate::TargetType::custom::<Self>()
            }

            fn from_value(value: #krate::Value) -> #krate::Result<Self> {
                value.into_custom::<Self>()
            }

            fn into_value(self) -> #krate::Value {
                #krate::Value::custom(self)
            }
        }
    })
}
