//! See [`macro@Config`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static CONFIG_ATTRIBUTE_NAME: &str = "config";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Configurable Derivation
///
/// `#[derive(Config)]` implements `cw_config::info::Configurable` for
///
/// - structs with named fields, persisted as a section with one key per field;
/// - enums whose variants are all units, persisted as the variant name.
///
/// Generic type parameters receive a `Configurable` bound.
///
/// ## Construction
///
/// By default a struct is created through `Default` and then filled field by
/// field. Keys missing from the document leave the default value in place.
///
/// ```rust, ignore
/// #[derive(Config, Default)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
/// ```
///
/// `record` builds the struct in one go from all its persisted fields, in
/// declaration order. `constructor = path` calls `path` with the same
/// arguments instead of using a struct literal, and may be used without
/// `record` for types that still prefer it over `Default`. Either way the
/// constructor only runs for new values: loading over an existing one
/// assigns the keys present in the document in place.
///
/// ```rust, ignore
/// #[derive(Config)]
/// #[config(record)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// ```
///
/// `no_default` declares a struct without any way to be built. Its converter
/// fails to resolve, which is only useful to keep a type out of persistence
/// without removing the derive.
///
/// ## Type attributes
///
/// - `type_path = "..."`: override the `module_path!()` based path.
/// - `post_init = method`: call `self.method()` after every load. Records
///   cannot declare one.
/// - `subclassable`: persist an `=type` discriminant next to the fields.
/// - `implements = Trait`: register the type as an implementation of
///   `Box<dyn Trait>` (which needs `cw_config::impl_polymorphic!(Trait)`).
///   May be repeated.
/// - `auto_register`: make the type known by name to
///   `ConverterRegistry::auto_register`.
///
/// The last two are no-ops on generic types and without the `auto_register`
/// feature.
///
/// ## Field attributes
///
/// - `rename = "..."`: persisted key.
/// - `comment = "..."`: comment line written above the key. May be repeated.
/// - `skip`: not persisted. Records fill the field with `Default`.
/// - `path`: filled with the key the enclosing object is stored under, for
///   instance the map key of a map of objects.
/// - `flatten`: the fields of a nested struct are persisted in this
///   struct's section.
/// - `default`: value used by records when the key is missing.
///
/// ## Variant attributes
///
/// - `rename = "..."`: persisted name of the variant.
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive_data = match derive_data::ConfigDerive::from_input(&ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error().into(),
    };

    match &derive_data {
        derive_data::ConfigDerive::Struct(info) => impls::impl_struct(info),
        derive_data::ConfigDerive::Enum(info) => impls::impl_enum(info),
    }
    .into()
}
