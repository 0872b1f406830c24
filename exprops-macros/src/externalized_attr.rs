use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemTrait, Type};

use crate::crate_path::exprops_core_path;
use crate::externalized_parsing::{
    parse_methods, strip_helper_attrs, ExternalizedArgs, MethodRole, ParamKind, ProxiedMethod,
};

pub fn expand(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut externalized = ExternalizedArgs::default();
    let parser = syn::meta::parser(|meta| externalized.parse_meta(meta));
    parse_macro_input!(args with parser);
    let item = parse_macro_input!(input as ItemTrait);
    match generate(&externalized, item) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate(args: &ExternalizedArgs, mut item: ItemTrait) -> syn::Result<TokenStream2> {
    let methods = parse_methods(&item)?;
    strip_helper_attrs(&mut item);

    let krate = exprops_core_path();
    let trait_ident = &item.ident;
    let trait_name = trait_ident.to_string();
    let vis = &item.vis;
    let proxy = args
        .proxy
        .clone()
        .unwrap_or_else(|| format_ident!("{}Proxy", trait_ident));

    let descriptors = methods
        .iter()
        .map(|method| descriptor(&krate, args, &trait_name, method));
    let impls = methods
        .iter()
        .enumerate()
        .map(|(index, method)| method_impl(&krate, index, method));
    let defaults = methods
        .iter()
        .enumerate()
        .filter(|(_, method)| method.params.is_empty())
        .filter_map(|(index, method)| {
            let body = method.item.default.as_ref()?;
            let ret = return_type(method);
            Some(quote! {
                #index => {
                    let default = || -> #ret #body;
                    ::core::option::Option::Some(default().map(#krate::PropertyType::into_value))
                }
            })
        });
    let proxy_doc = format!("Proxy implementing [`{trait_name}`], created by `ExternalizedProperties::initialize`.");

    Ok(quote! {
        #item

        #[doc = #proxy_doc]
        #[derive(Debug, Clone)]
        #vis struct #proxy {
            handler: #krate::ProxyHandler,
        }

        impl #krate::Proxy for #proxy {
            fn interface() -> &'static #krate::ProxyInterface {
                static INTERFACE: ::std::sync::OnceLock<#krate::ProxyInterface> =
                    ::std::sync::OnceLock::new();
                INTERFACE.get_or_init(|| {
                    #krate::ProxyInterface::new(#trait_name, ::std::vec![#(#descriptors),*])
                        .with_path(::core::concat!(::core::module_path!(), "::", #trait_name))
                })
            }

            fn from_handler(handler: #krate::ProxyHandler) -> Self {
                Self { handler }
            }

            #[allow(unreachable_code, clippy::needless_return)]
            fn default_value(
                &self,
                index: usize,
            ) -> ::core::option::Option<#krate::Result<#krate::Value>> {
                match index {
                    #(#defaults)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #trait_ident for #proxy {
            #(#impls)*
        }
    })
}

fn return_type(method: &ProxiedMethod) -> TokenStream2 {
    match &method.item.sig.output {
        syn::ReturnType::Type(_, ty) => quote!(#ty),
        syn::ReturnType::Default => quote!(()),
    }
}

fn descriptor(
    krate: &TokenStream2,
    args: &ExternalizedArgs,
    trait_name: &str,
    method: &ProxiedMethod,
) -> TokenStream2 {
    let name = method.item.sig.ident.to_string();
    let value_type = &method.value_type;
    let target = quote!(<#value_type as #krate::PropertyType>::target_type());

    let mut descriptor = match &method.role {
        MethodRole::Property(property) => {
            let full_name = args.property_name(&property.name.value());
            quote!(#krate::PropertyMethod::property(#trait_name, #name, #full_name, #target))
        }
        MethodRole::ResolverFacade => {
            quote!(#krate::PropertyMethod::resolver_facade(#trait_name, #name, #target))
        }
        MethodRole::ConverterFacade => {
            quote!(#krate::PropertyMethod::converter_facade(#trait_name, #name, #target))
        }
        MethodRole::VariableExpanderFacade => {
            quote!(#krate::PropertyMethod::variable_expander_facade(#trait_name, #name, #target))
        }
    };

    for param in &method.params {
        let param_name = param.ident.to_string();
        let ty = &param.ty;
        let ty_name = quote!(#ty).to_string().replace(' ', "");
        let kind = match param.kind {
            ParamKind::Str => quote!(#krate::ParameterKind::Str),
            ParamKind::Type => quote!(#krate::ParameterKind::Type),
            ParamKind::Value => quote!(#krate::ParameterKind::Value),
        };
        descriptor = quote! {
            #descriptor.with_parameter(#krate::Parameter::new(#param_name, #ty_name, #kind))
        };
    }
    if method.item.default.is_some() {
        descriptor = quote!(#descriptor.with_default());
    }
    for tag in &method.processors {
        let tag_name = &tag.name;
        descriptor = match &tag.argument {
            Some(argument) => quote! {
                #descriptor.with_processor(#krate::ProcessorTag::with_argument(#tag_name, #argument))
            },
            None => quote!(#descriptor.with_processor(#krate::ProcessorTag::new(#tag_name))),
        };
    }
    if let MethodRole::Property(property) = &method.role {
        if let Some(delimiter) = &property.delimiter {
            descriptor = quote!(#descriptor.with_delimiter(#delimiter));
        }
        if property.strip_empty {
            descriptor = quote!(#descriptor.with_strip_empty());
        }
        if let Some(format) = &property.date_time_format {
            descriptor = quote!(#descriptor.with_date_time_format(#format));
        }
    }
    descriptor
}

fn argument(krate: &TokenStream2, ident: &syn::Ident, ty: &Type, kind: ParamKind) -> TokenStream2 {
    match (kind, ty) {
        (ParamKind::Str | ParamKind::Type, _) => {
            quote!(#krate::Argument::from(::core::clone::Clone::clone(&#ident)))
        }
        (ParamKind::Value, Type::Reference(reference)) => {
            let elem = &reference.elem;
            quote!(#krate::Argument::value(<#elem as ::core::clone::Clone>::clone(#ident)))
        }
        (ParamKind::Value, _) => {
            quote!(#krate::Argument::value(::core::clone::Clone::clone(&#ident)))
        }
    }
}

fn method_impl(krate: &TokenStream2, index: usize, method: &ProxiedMethod) -> TokenStream2 {
    let sig = &method.item.sig;
    let value_type = &method.value_type;
    let arguments = method
        .params
        .iter()
        .map(|param| argument(krate, &param.ident, &param.ty, param.kind));
    let arguments = quote! {
        #krate::Arguments::from(::std::vec![#(#arguments),*])
    };

    match &method.item.default {
        Some(body) => {
            let ret = return_type(method);
            quote! {
                #[allow(unreachable_code, clippy::needless_return)]
                #sig {
                    let default = || -> #ret #body;
                    self.handler.invoke::<#value_type>(
                        #index,
                        #arguments,
                        ::core::option::Option::Some(&default),
                    )
                }
            }
        }
        None => quote! {
            #sig {
                self.handler.invoke::<#value_type>(#index, #arguments, ::core::option::Option::None)
            }
        },
    }
}
