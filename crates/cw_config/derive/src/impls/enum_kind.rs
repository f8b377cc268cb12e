use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ConfigEnum;

/// Implementation of `Configurable` for unit-only enums, persisted by case name.
pub(crate) fn impl_enum(info: &ConfigEnum) -> TokenStream {
    let meta = &info.meta;
    let info_ = crate::path::info_(meta.cw_config_path());
    let exports_ = crate::path::macro_exports_(meta.cw_config_path());

    let names = info.variants.iter().map(|variant| variant.name());
    let index_arms = info.variants.iter().enumerate().map(|(index, variant)| {
        let ident = variant.ident;
        quote! { Self::#ident => #index, }
    });
    let from_arms = info.variants.iter().enumerate().map(|(index, variant)| {
        let ident = variant.ident;
        quote! {
            #index => #exports_::Option::Some(#exports_::Box::new(Self::#ident) as #exports_::Box<dyn #exports_::Any>),
        }
    });

    let shape = quote! {
        #info_::TypeShape::Enum(#info_::EnumShape::new(
            &[#(#names),*],
            |value| {
                let index = match value.downcast_ref::<Self>()? {
                    #(#index_arms)*
                };
                #exports_::Option::Some(index)
            },
            |index| match index {
                #(#from_arms)*
                _ => #exports_::Option::None,
            },
        ))
    };

    let configurable = super::impl_trait_configurable(meta, shape);
    let auto_register = super::get_auto_register_impl(meta);

    quote! {
        #configurable

        #auto_register
    }
}
