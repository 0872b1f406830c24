extern crate proc_macro;
use proc_macro::TokenStream;

pub(crate) mod crate_path;
pub(crate) mod externalized_attr;
pub(crate) mod externalized_parsing;
pub(crate) mod property_type_derive;

/// Attribute macro on a trait: generates a proxy struct resolving each
/// annotated method through `ExternalizedProperties`.
///
/// # Trait-level options
///
/// | Parameter   | Description |
/// |-------------|-------------|
/// | `prefix`    | Prepended to every `#[property]` name |
/// | `delimiter` | Joins prefix and name, `.` by default |
/// | `proxy`     | Name of the generated struct, `<Trait>Proxy` by default |
///
/// # Method attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[property("name")]` | Resolve, process and convert the named property. Options: `delimiter = ";"`, `strip_empty`, `date_time_format = "%Y-%m-%d"` |
/// | `#[process(tag)]` / `#[process(tag = "arg")]` | Run a registered processor on the resolved value (repeatable) |
/// | `#[resolver_facade]` | Name from the `&str` argument, optional `TargetType` second argument |
/// | `#[converter_facade]` | Convert the `&str` argument, target from the second argument or the return type |
/// | `#[variable_expander_facade]` | Expand `${...}` in the `&str` argument |
///
/// Every proxied method takes `&self` and returns `Result<T>`. A default body
/// is used when the property cannot be resolved. Unannotated methods must
/// have a default body and are not proxied.
///
/// # Example
///
/// ```ignore
/// use exprops::prelude::*;
///
/// #[externalized(prefix = "app")]
/// pub trait AppConfig {
///     #[property("name")]
///     fn name(&self) -> Result<String>;
///
///     #[property("port")]
///     fn port(&self) -> Result<u16> {
///         Ok(8080)
///     }
///
///     #[property("tags", delimiter = ";", strip_empty)]
///     fn tags(&self) -> Result<Vec<String>>;
///
///     #[property("secret")]
///     #[process(base64_decode)]
///     fn secret(&self) -> Result<String>;
/// }
///
/// let config: AppConfigProxy = props.initialize()?;
/// ```
#[proc_macro_attribute]
pub fn externalized(args: TokenStream, input: TokenStream) -> TokenStream {
    externalized_attr::expand(args, input)
}

/// Derive macro for custom property value types.
///
/// The type must be `Clone + Send + Sync + 'static`; a `Converter` for it
/// (for example `FromStrConverter<T>`) must be registered on the builder.
///
/// ```ignore
/// #[derive(Clone, PropertyType)]
/// struct Color(String);
/// ```
#[proc_macro_derive(PropertyType)]
pub fn derive_property_type(input: TokenStream) -> TokenStream {
    property_type_derive::expand(input)
}
