use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ConfigStruct, StructField};

/// Implementation of `Configurable` for structs with named fields.
pub(crate) fn impl_struct(info: &ConfigStruct) -> TokenStream {
    let meta = &info.meta;
    let info_ = crate::path::info_(meta.cw_config_path());
    let exports_ = crate::path::macro_exports_(meta.cw_config_path());
    let attrs = meta.attrs();

    let fields = info.active_fields().map(|field| field_info(info, field));

    let construction = if attrs.is_constructed() {
        let constructor = constructor(info);
        if attrs.record.is_some() {
            quote! { #info_::CompositeShape::record(#constructor) }
        } else {
            quote! {
                #info_::CompositeShape::new(#info_::Construction::Populate {
                    empty: #exports_::Option::None,
                    constructor: #exports_::Option::Some(#constructor),
                })
            }
        }
    } else if attrs.no_default.is_some() {
        quote! {
            #info_::CompositeShape::new(#info_::Construction::Populate {
                empty: #exports_::Option::None,
                constructor: #exports_::Option::None,
            })
        }
    } else {
        quote! {
            #info_::CompositeShape::populate(|| {
                #exports_::Box::new(<Self as #exports_::Default>::default()) as #exports_::Box<dyn #exports_::Any>
            })
        }
    };

    let subclassable = attrs.subclassable.map(|_| quote! { .subclassable() });

    let post_init = attrs.post_init.as_ref().map(|method| {
        quote! {
            .with_post_init(#info_::PostInit::new(::core::stringify!(#method), |target| {
                match target.downcast_mut::<Self>() {
                    #exports_::Option::Some(target) => {
                        target.#method();
                        true
                    }
                    #exports_::Option::None => false,
                }
            }))
        }
    });

    let shape = quote! {
        #info_::TypeShape::Composite(
            #construction
                #(#fields)*
                #subclassable
                #post_init
        )
    };

    let configurable = super::impl_trait_configurable(meta, shape);
    let auto_register = super::get_auto_register_impl(meta);

    quote! {
        #configurable

        #auto_register
    }
}

/// `.with_field(...)` for one persisted field.
fn field_info(info: &ConfigStruct, field: &StructField) -> TokenStream {
    let meta = &info.meta;
    let info_ = crate::path::info_(meta.cw_config_path());
    let exports_ = crate::path::macro_exports_(meta.cw_config_path());

    let member = field.ident;
    let ty = field.ty;

    let rename = field.attrs.rename.as_ref().map(|lit| quote! { .with_rename(#lit) });
    let comments = field.attrs.comments.iter().map(|lit| quote! { .with_comment(#lit) });
    let role = if field.attrs.path.is_some() {
        Some(quote! { .with_role(#info_::FieldRole::Path) })
    } else if field.attrs.flatten.is_some() {
        Some(quote! { .with_role(#info_::FieldRole::Flatten) })
    } else {
        None
    };
    let default = field.attrs.default.map(|_| {
        quote! {
            .with_default(|| {
                #exports_::Box::new(<#ty as #exports_::Default>::default()) as #exports_::Box<dyn #exports_::Any>
            })
        }
    });

    quote! {
        .with_field(
            #info_::FieldInfo::new::<#ty>(
                ::core::stringify!(#member),
                #info_::FieldAccess::new(
                    |owner| #exports_::Option::Some(&owner.downcast_ref::<Self>()?.#member as &dyn #exports_::Any),
                    |owner| {
                        #exports_::Option::Some(&mut owner.downcast_mut::<Self>()?.#member as &mut dyn #exports_::Any)
                    },
                    |owner, value| match (owner.downcast_mut::<Self>(), value.downcast::<#ty>()) {
                        (#exports_::Option::Some(owner), ::core::result::Result::Ok(value)) => {
                            owner.#member = *value;
                            true
                        }
                        _ => false,
                    },
                ),
            )
            #rename
            #(#comments)*
            #role
            #default
        )
    }
}

/// The constructor record: one parameter per persisted field, then a build
/// function taking the values in the same order.
fn constructor(info: &ConfigStruct) -> TokenStream {
    let meta = &info.meta;
    let info_ = crate::path::info_(meta.cw_config_path());
    let exports_ = crate::path::macro_exports_(meta.cw_config_path());

    let params = info.active_fields().map(|field| {
        let ty = field.ty;
        let path = field.attrs.path.map(|_| quote! { .path() });
        quote! { #info_::ParamInfo::new::<#ty>() #path }
    });

    let take = |field: &StructField| {
        let ty = field.ty;
        quote! { *values.next()?.downcast::<#ty>().ok()? }
    };

    let build = match &meta.attrs().constructor {
        Some(function) => {
            let args = info.active_fields().map(take);
            quote! { #function(#(#args),*) }
        }
        None => {
            let members = info.fields.iter().map(|field| {
                let member = field.ident;
                if field.is_skipped() {
                    quote! { #member: #exports_::Default::default() }
                } else {
                    let value = take(field);
                    quote! { #member: #value }
                }
            });
            quote! { Self { #(#members),* } }
        }
    };

    let values = if info.active_fields().next().is_some() {
        quote! { let mut values = values.into_iter(); }
    } else {
        quote! { let _ = values; }
    };

    quote! {
        #info_::Constructor::new(
            #exports_::Vec::from([#(#params),*]),
            |values| {
                #values
                let built: Self = #build;
                #exports_::Option::Some(#exports_::Box::new(built) as #exports_::Box<dyn #exports_::Any>)
            },
        )
    }
}
