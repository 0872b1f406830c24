//! Parsing of `#[externalized]` traits into method descriptors.

use syn::parse::ParseStream;
use syn::{
    Attribute, FnArg, GenericArgument, Ident, ItemTrait, LitStr, Pat, PathArguments, ReturnType,
    Token, TraitItem, TraitItemFn, Type,
};

const HELPER_ATTRS: &[&str] = &[
    "property",
    "process",
    "resolver_facade",
    "converter_facade",
    "variable_expander_facade",
];

/// Trait-level `#[externalized(prefix = "...", delimiter = "...", proxy = Name)]`.
#[derive(Default)]
pub struct ExternalizedArgs {
    pub prefix: Option<LitStr>,
    pub delimiter: Option<LitStr>,
    pub proxy: Option<Ident>,
}

impl ExternalizedArgs {
    pub fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("prefix") {
            self.prefix = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("delimiter") {
            self.delimiter = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("proxy") {
            self.proxy = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error(
                "unknown #[externalized] option, expected `prefix`, `delimiter` or `proxy`\n\
                 \n  example:\n  #[externalized(prefix = \"app\", proxy = AppConfigProxy)]",
            ))
        }
    }

    /// Full property name with the interface prefix applied.
    pub fn property_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.value().is_empty() => {
                let delimiter = self
                    .delimiter
                    .as_ref()
                    .map(LitStr::value)
                    .unwrap_or_else(|| ".".to_string());
                format!("{}{}{}", prefix.value(), delimiter, name)
            }
            _ => name.to_string(),
        }
    }
}

pub enum MethodRole {
    Property(PropertyAttr),
    ResolverFacade,
    ConverterFacade,
    VariableExpanderFacade,
}

pub struct PropertyAttr {
    pub name: LitStr,
    pub delimiter: Option<LitStr>,
    pub strip_empty: bool,
    pub date_time_format: Option<LitStr>,
}

pub struct ProcessTag {
    pub name: String,
    pub argument: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Type,
    Value,
}

pub struct Param {
    pub ident: Ident,
    pub ty: Type,
    pub kind: ParamKind,
}

/// A trait method that the proxy implements.
pub struct ProxiedMethod {
    pub item: TraitItemFn,
    pub role: MethodRole,
    pub processors: Vec<ProcessTag>,
    pub params: Vec<Param>,
    /// `T` in `Result<T>`.
    pub value_type: Type,
}

/// Split the trait's methods into proxied ones. Unannotated methods with a
/// default body stay trait defaults.
pub fn parse_methods(item: &ItemTrait) -> syn::Result<Vec<ProxiedMethod>> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[externalized] traits cannot be generic",
        ));
    }
    let mut methods = Vec::new();
    for trait_item in &item.items {
        let TraitItem::Fn(method) = trait_item else {
            continue;
        };
        if let Some(proxied) = parse_method(method)? {
            methods.push(proxied);
        }
    }
    Ok(methods)
}

fn parse_method(method: &TraitItemFn) -> syn::Result<Option<ProxiedMethod>> {
    let mut role: Option<MethodRole> = None;
    let mut processors = Vec::new();
    for attr in &method.attrs {
        let next = if attr.path().is_ident("property") {
            Some(MethodRole::Property(parse_property(attr)?))
        } else if attr.path().is_ident("resolver_facade") {
            attr.meta.require_path_only()?;
            Some(MethodRole::ResolverFacade)
        } else if attr.path().is_ident("converter_facade") {
            attr.meta.require_path_only()?;
            Some(MethodRole::ConverterFacade)
        } else if attr.path().is_ident("variable_expander_facade") {
            attr.meta.require_path_only()?;
            Some(MethodRole::VariableExpanderFacade)
        } else {
            if attr.path().is_ident("process") {
                parse_process(attr, &mut processors)?;
            }
            None
        };
        if let Some(next) = next {
            if role.is_some() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "conflicting annotations: use only one of #[property], #[resolver_facade], \
                     #[converter_facade] or #[variable_expander_facade] per method",
                ));
            }
            role = Some(next);
        }
    }

    let Some(role) = role else {
        if method.default.is_some() {
            if let Some(tag) = method.attrs.iter().find(|a| a.path().is_ident("process")) {
                return Err(syn::Error::new_spanned(
                    tag,
                    "#[process] requires #[property] or a facade annotation on the same method",
                ));
            }
            return Ok(None);
        }
        return Err(syn::Error::new_spanned(
            &method.sig,
            "method has no default body and no property annotation\n\
             \n  example:\n  #[property(\"app.name\")]\n  fn name(&self) -> Result<String>;",
        ));
    };

    let sig = &method.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "proxy methods cannot be generic",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, "proxy methods cannot be async"));
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "proxy methods must take `&self`",
            ));
        }
    }

    let mut params = Vec::new();
    for input in sig.inputs.iter().skip(1) {
        let FnArg::Typed(typed) = input else {
            continue;
        };
        let Pat::Ident(pat) = &*typed.pat else {
            return Err(syn::Error::new_spanned(
                &typed.pat,
                "proxy method parameters must be plain identifiers",
            ));
        };
        params.push(Param {
            ident: pat.ident.clone(),
            ty: (*typed.ty).clone(),
            kind: param_kind(&typed.ty),
        });
    }

    let value_type = value_type(&sig.output, sig)?;
    Ok(Some(ProxiedMethod {
        item: method.clone(),
        role,
        processors,
        params,
        value_type,
    }))
}

fn parse_property(attr: &Attribute) -> syn::Result<PropertyAttr> {
    if attr.meta.require_list().is_err() {
        return Err(syn::Error::new_spanned(
            attr,
            "#[property] requires a property name\n\
             \n  example:\n  #[property(\"app.name\")]",
        ));
    }
    attr.parse_args_with(|input: ParseStream| {
        let name: LitStr = input.parse()?;
        if name.value().trim().is_empty() {
            return Err(syn::Error::new(name.span(), "property name must not be blank"));
        }
        let mut property = PropertyAttr {
            name,
            delimiter: None,
            strip_empty: false,
            date_time_format: None,
        };
        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key: Ident = input.parse()?;
            if key == "delimiter" {
                input.parse::<Token![=]>()?;
                let delimiter: LitStr = input.parse()?;
                if delimiter.value().is_empty() {
                    return Err(syn::Error::new(delimiter.span(), "delimiter must not be empty"));
                }
                property.delimiter = Some(delimiter);
            } else if key == "strip_empty" {
                property.strip_empty = true;
            } else if key == "date_time_format" {
                input.parse::<Token![=]>()?;
                property.date_time_format = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown #[property] option, expected `delimiter`, `strip_empty` or `date_time_format`",
                ));
            }
        }
        Ok(property)
    })
}

fn parse_process(attr: &Attribute, tags: &mut Vec<ProcessTag>) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        let name = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected a processor name, e.g. #[process(base64_decode)]"))?
            .to_string();
        let argument = if meta.input.peek(Token![=]) {
            Some(meta.value()?.parse::<LitStr>()?.value())
        } else {
            None
        };
        tags.push(ProcessTag { name, argument });
        Ok(())
    })
}

fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false,
    }
}

fn param_kind(ty: &Type) -> ParamKind {
    let inner = match ty {
        Type::Reference(reference) => &*reference.elem,
        other => other,
    };
    if matches!(inner, Type::Path(_)) && (last_segment_is(inner, "String") || last_segment_is(inner, "str")) {
        ParamKind::Str
    } else if last_segment_is(inner, "TargetType") {
        ParamKind::Type
    } else {
        ParamKind::Value
    }
}

fn value_type(output: &ReturnType, sig: &syn::Signature) -> syn::Result<Type> {
    let error = || {
        syn::Error::new_spanned(
            sig,
            "proxy methods must return `Result<T>` (exprops' `Result<T, Error>`)",
        )
    };
    let ReturnType::Type(_, ty) = output else {
        return Err(error());
    };
    let Type::Path(path) = &**ty else {
        return Err(error());
    };
    let segment = path.path.segments.last().ok_or_else(error)?;
    if segment.ident != "Result" {
        return Err(error());
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Err(error());
    };
    let Some(GenericArgument::Type(value)) = args.args.first() else {
        return Err(error());
    };
    if matches!(value, Type::Tuple(tuple) if tuple.elems.is_empty()) {
        return Err(syn::Error::new_spanned(
            value,
            "proxy methods must return a value, `()` is not a property type",
        ));
    }
    Ok(value.clone())
}

/// Remove the helper attributes so the re-emitted trait compiles.
pub fn strip_helper_attrs(item: &mut ItemTrait) {
    for trait_item in &mut item.items {
        if let TraitItem::Fn(method) = trait_item {
            method
                .attrs
                .retain(|attr| !HELPER_ATTRS.iter().any(|name| attr.path().is_ident(name)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use quote::ToTokens;
    use syn::parse_quote;

    fn parse_err(item: ItemTrait) -> String {
        match parse_methods(&item) {
            Ok(_) => panic!("expected a parse error"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn test_property_name_applies_prefix_and_delimiter() {
        let mut args = ExternalizedArgs::default();
        assert_eq!(args.property_name("port"), "port");

        args.prefix = Some(LitStr::new("app", Span::call_site()));
        assert_eq!(args.property_name("port"), "app.port");

        args.delimiter = Some(LitStr::new("_", Span::call_site()));
        assert_eq!(args.property_name("port"), "app_port");

        args.prefix = Some(LitStr::new("", Span::call_site()));
        assert_eq!(args.property_name("port"), "port");
    }

    #[test]
    fn test_parse_methods_collects_roles_and_tags() {
        let item: ItemTrait = parse_quote! {
            trait AppConfig {
                #[property("tags", delimiter = ";", strip_empty)]
                fn tags(&self) -> Result<Vec<String>>;

                #[property("secret")]
                #[process(base64_decode = "url")]
                #[process(decrypt)]
                fn secret(&self) -> Result<String>;

                #[resolver_facade]
                fn resolve(&self, name: &str, target: TargetType) -> Result<Value>;

                fn summary(&self) -> Result<String> {
                    self.secret()
                }
            }
        };
        let methods = parse_methods(&item).unwrap();
        assert_eq!(methods.len(), 3);

        let MethodRole::Property(tags) = &methods[0].role else {
            panic!("expected a property method");
        };
        assert_eq!(tags.name.value(), "tags");
        assert_eq!(tags.delimiter.as_ref().map(LitStr::value).as_deref(), Some(";"));
        assert!(tags.strip_empty);
        assert_eq!(
            methods[0].value_type.to_token_stream().to_string(),
            "Vec < String >"
        );

        let tags: Vec<_> = methods[1]
            .processors
            .iter()
            .map(|tag| (tag.name.as_str(), tag.argument.as_deref()))
            .collect();
        assert_eq!(tags, vec![("base64_decode", Some("url")), ("decrypt", None)]);

        assert!(matches!(methods[2].role, MethodRole::ResolverFacade));
        let kinds: Vec<_> = methods[2].params.iter().map(|param| param.kind).collect();
        assert!(kinds == vec![ParamKind::Str, ParamKind::Type]);
    }

    #[test]
    fn test_conflicting_annotations_are_rejected() {
        let message = parse_err(parse_quote! {
            trait Config {
                #[property("name")]
                #[resolver_facade]
                fn name(&self, name: &str) -> Result<String>;
            }
        });
        assert!(message.starts_with("conflicting annotations"));
    }

    #[test]
    fn test_unannotated_method_needs_a_default_body() {
        let message = parse_err(parse_quote! {
            trait Config {
                fn name(&self) -> Result<String>;
            }
        });
        assert!(message.contains("no property annotation"));

        let message = parse_err(parse_quote! {
            trait Config {
                #[process(base64_decode)]
                fn name(&self) -> Result<String> {
                    Ok(String::new())
                }
            }
        });
        assert!(message.contains("#[process] requires"));
    }

    #[test]
    fn test_signature_errors() {
        let unit = parse_err(parse_quote! {
            trait Config {
                #[property("run")]
                fn run(&self) -> Result<()>;
            }
        });
        assert!(unit.contains("must return a value"));

        let bare = parse_err(parse_quote! {
            trait Config {
                #[property("port")]
                fn port(&self) -> u16;
            }
        });
        assert!(bare.contains("must return `Result<T>`"));

        let receiver = parse_err(parse_quote! {
            trait Config {
                #[property("port")]
                fn port(&mut self) -> Result<u16>;
            }
        });
        assert!(receiver.contains("`&self`"));

        let generic = parse_err(parse_quote! {
            trait Config {
                #[property("port")]
                fn port<T>(&self) -> Result<T>;
            }
        });
        assert!(generic.contains("cannot be generic"));

        let blank = parse_err(parse_quote! {
            trait Config {
                #[property("  ")]
                fn port(&self) -> Result<u16>;
            }
        });
        assert!(blank.contains("must not be blank"));
    }

    #[test]
    fn test_strip_helper_attrs_keeps_other_attributes() {
        let mut item: ItemTrait = parse_quote! {
            trait Config {
                #[doc = "Port."]
                #[property("port")]
                #[process(trim)]
                fn port(&self) -> Result<u16>;
            }
        };
        strip_helper_attrs(&mut item);
        let TraitItem::Fn(method) = &item.items[0] else {
            panic!("expected a method");
        };
        assert_eq!(method.attrs.len(), 1);
        assert!(method.attrs[0].path().is_ident("doc"));
    }
}
