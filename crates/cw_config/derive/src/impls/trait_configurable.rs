use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ConfigMeta;

/// Wraps a `shape` body into the full `Configurable` impl.
pub(crate) fn impl_trait_configurable(meta: &ConfigMeta, shape: TokenStream) -> TokenStream {
    let info_ = crate::path::info_(meta.cw_config_path());
    let ident = meta.ident();
    let type_path = meta.type_path_expr();

    let generics = meta.bounded_generics();
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let (_, ty_generics, _) = meta.generics().split_for_impl();

    // Generic instantiations differ by their components.
    let descriptor = if meta.is_generic() {
        let components = meta.generics().type_params().map(|param| {
            let param = &param.ident;
            quote! { <#param as #info_::Configurable>::descriptor() }
        });
        quote! {
            fn descriptor() -> #info_::TypeDescriptor {
                #info_::TypeDescriptor::new(
                    <Self as #info_::Configurable>::type_path(),
                    [#(#components),*],
                )
            }
        }
    } else {
        TokenStream::new()
    };

    quote! {
        impl #impl_generics #info_::Configurable for #ident #ty_generics #where_clause {
            #[inline]
            fn type_path() -> &'static str {
                #type_path
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!(#ident)
            }

            #descriptor

            fn shape() -> #info_::TypeShape {
                #shape
            }
        }
    }
}
