use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

/// Path of `cw_config` as seen from the invoking crate.
#[inline(never)]
pub(crate) fn cw_config() -> Path {
    cw_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("cw_config"))
}

#[inline(always)]
pub(crate) fn info_(cw_config_path: &Path) -> TokenStream {
    quote! { #cw_config_path::info }
}

#[inline(always)]
pub(crate) fn macro_exports_(cw_config_path: &Path) -> TokenStream {
    quote! { #cw_config_path::__macro_exports }
}

#[inline(always)]
pub(crate) fn registry_(cw_config_path: &Path) -> TokenStream {
    quote! { #cw_config_path::ConverterRegistry }
}
