use proc_macro2::TokenStream;

use crate::derive_data::ConfigMeta;

/// Generate the static registration of `#[config(auto_register)]` and
/// `#[config(implements = Trait)]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ConfigMeta) -> TokenStream {
    use quote::{quote, quote_spanned};

    let attrs = meta.attrs();
    if attrs.auto_register.is_none() && attrs.implements.is_empty() {
        return TokenStream::new();
    }
    // Invalid for generic types.
    if meta.is_generic() {
        return TokenStream::new();
    }

    let cw_config_path = meta.cw_config_path();
    let exports_ = crate::path::macro_exports_(cw_config_path);
    let registry_ = crate::path::registry_(cw_config_path);
    let ident = meta.ident();

    let register = attrs.auto_register.map(|span| {
        quote_spanned! { span =>
            registry.register::<#ident>();
        }
    });
    let implements = attrs.implements.iter().map(|tr| {
        quote! {
            registry.register_subclass::<#exports_::Box<dyn #tr>, #ident>(
                |value| #exports_::Box::new(value),
            );
        }
    });

    quote! {
        const _: () = {
            fn __cw_config_register(registry: &#registry_) {
                #register
                #(#implements)*
            }

            #exports_::auto_register::inventory::submit! {
                #exports_::auto_register::AutoRegistration(__cw_config_register)
            }
        };
    }
}

/// Generate the static registration of `#[config(auto_register)]` and
/// `#[config(implements = Trait)]`.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ConfigMeta) -> TokenStream {
    TokenStream::new()
}
