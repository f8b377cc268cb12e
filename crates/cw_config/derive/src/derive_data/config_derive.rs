use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Path, Type};

use super::{FieldAttributes, TypeAttributes, VariantAttributes};

// -----------------------------------------------------------------------------
// ConfigMeta

/// Data shared by every kind of derive target.
pub(crate) struct ConfigMeta<'a> {
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    cw_config_path: Path,
}

impl<'a> ConfigMeta<'a> {
    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub fn generics(&self) -> &'a Generics {
        self.generics
    }

    #[inline]
    pub fn cw_config_path(&self) -> &Path {
        &self.cw_config_path
    }

    /// `true` if the type has type or const parameters.
    pub fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some() || self.generics.const_params().next().is_some()
    }

    /// The type path expression, `module_path!()` based unless overridden.
    pub fn type_path_expr(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(lit) => quote! { #lit },
            None => {
                let ident = self.ident;
                quote! { ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)) }
            }
        }
    }

    /// Impl generics with a `Configurable` bound added to every type parameter.
    pub fn bounded_generics(&self) -> Generics {
        let info_ = crate::path::info_(&self.cw_config_path);
        let mut generics = self.generics.clone();
        for param in generics.type_params_mut() {
            param.bounds.push(syn::parse_quote!(#info_::Configurable));
        }
        generics
    }
}

// -----------------------------------------------------------------------------
// Struct

pub(crate) struct StructField<'a> {
    pub attrs: FieldAttributes,
    pub ident: &'a Ident,
    pub ty: &'a Type,
}

impl StructField<'_> {
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.attrs.skip.is_some()
    }
}

pub(crate) struct ConfigStruct<'a> {
    pub meta: ConfigMeta<'a>,
    pub fields: Vec<StructField<'a>>,
}

impl<'a> ConfigStruct<'a> {
    /// Fields that take part in persistence, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| !field.is_skipped())
    }
}

// -----------------------------------------------------------------------------
// Enum

pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub attrs: VariantAttributes,
}

impl EnumVariant<'_> {
    pub fn name(&self) -> LitStr {
        self.attrs
            .rename
            .clone()
            .unwrap_or_else(|| LitStr::new(&self.ident.to_string(), self.ident.span()))
    }
}

pub(crate) struct ConfigEnum<'a> {
    pub meta: ConfigMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
}

// -----------------------------------------------------------------------------
// ConfigDerive

pub(crate) enum ConfigDerive<'a> {
    Struct(ConfigStruct<'a>),
    Enum(ConfigEnum<'a>),
}

impl<'a> ConfigDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = ConfigMeta {
            attrs,
            ident: &input.ident,
            generics: &input.generics,
            cw_config_path: crate::path::cw_config(),
        };

        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(named) = &data.fields else {
                    return Err(syn::Error::new(
                        data.fields.span(),
                        "`#[derive(Config)]` supports structs with named fields only",
                    ));
                };
                let fields = named
                    .named
                    .iter()
                    .map(|field| {
                        Ok(StructField {
                            attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                            // Named fields always carry an ident.
                            ident: field.ident.as_ref().ok_or_else(|| {
                                syn::Error::new(field.span(), "expected a named field")
                            })?,
                            ty: &field.ty,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Struct(ConfigStruct { meta, fields }))
            }
            Data::Enum(data) => {
                if data.variants.is_empty() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`#[derive(Config)]` cannot be used on an enum without variants",
                    ));
                }
                if let Some(span) = meta.attrs.record.or(meta.attrs.subclassable).or(meta.attrs.no_default) {
                    return Err(syn::Error::new(span, "this attribute only applies to structs"));
                }
                let variants = data
                    .variants
                    .iter()
                    .map(|variant| {
                        if !matches!(variant.fields, Fields::Unit) {
                            return Err(syn::Error::new(
                                variant.span(),
                                "`#[derive(Config)]` supports enums with unit variants only",
                            ));
                        }
                        Ok(EnumVariant {
                            ident: &variant.ident,
                            attrs: VariantAttributes::parse_attrs(&variant.attrs)?,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Enum(ConfigEnum { meta, variants }))
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span(),
                "`#[derive(Config)]` does not support unions",
            )),
        }
    }
}
