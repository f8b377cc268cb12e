use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitStr, Path};

use crate::CONFIG_ATTRIBUTE_NAME;

fn parse_lit_str(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse::<LitStr>()
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta, name: &str) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate `{name}` attribute")));
    }
    *slot = Some(value);
    Ok(())
}

/// Calls `f` on every item of every `#[config(...)]` attribute.
fn for_each_config_meta(
    attrs: &[Attribute],
    mut f: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(CONFIG_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut f)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Type attributes

/// `#[config(...)]` on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// Built through one constructor call instead of field assignment.
    pub record: Option<Span>,
    /// No `Default` instance; loading fails at inventory build time.
    pub no_default: Option<Span>,
    pub subclassable: Option<Span>,
    pub auto_register: Option<Span>,
    pub type_path: Option<LitStr>,
    pub post_init: Option<Ident>,
    pub constructor: Option<Path>,
    pub implements: Vec<Path>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_config_meta(attrs, |meta| this.parse_meta(&meta))?;
        this.validity()?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        if meta.path.is_ident("record") {
            set_once(&mut self.record, span, meta, "record")
        } else if meta.path.is_ident("no_default") {
            set_once(&mut self.no_default, span, meta, "no_default")
        } else if meta.path.is_ident("subclassable") {
            set_once(&mut self.subclassable, span, meta, "subclassable")
        } else if meta.path.is_ident("auto_register") {
            set_once(&mut self.auto_register, span, meta, "auto_register")
        } else if meta.path.is_ident("type_path") {
            let lit = parse_lit_str(meta)?;
            set_once(&mut self.type_path, lit, meta, "type_path")
        } else if meta.path.is_ident("post_init") {
            let ident = meta.value()?.parse::<Ident>()?;
            set_once(&mut self.post_init, ident, meta, "post_init")
        } else if meta.path.is_ident("constructor") {
            let path = meta.value()?.parse::<Path>()?;
            set_once(&mut self.constructor, path, meta, "constructor")
        } else if meta.path.is_ident("implements") {
            self.implements.push(meta.value()?.parse::<Path>()?);
            Ok(())
        } else {
            Err(meta.error(
                "unknown type attribute, expected one of `record`, `no_default`, `subclassable`, \
                 `auto_register`, `type_path`, `post_init`, `constructor`, `implements`",
            ))
        }
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(span), Some(_)) = (self.no_default, self.record) {
            return Err(syn::Error::new(span, "`no_default` has no effect on a `record`"));
        }
        if let (Some(span), Some(_)) = (self.no_default, &self.constructor) {
            return Err(syn::Error::new(span, "`no_default` conflicts with `constructor`"));
        }
        Ok(())
    }

    /// Whether instances are built by a constructor call.
    #[inline]
    pub fn is_constructed(&self) -> bool {
        self.record.is_some() || self.constructor.is_some()
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// `#[config(...)]` on a named field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub comments: Vec<LitStr>,
    pub skip: Option<Span>,
    pub path: Option<Span>,
    pub flatten: Option<Span>,
    pub default: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_config_meta(attrs, |meta| this.parse_meta(&meta))?;
        this.validity()?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        if meta.path.is_ident("rename") {
            let lit = parse_lit_str(meta)?;
            set_once(&mut self.rename, lit, meta, "rename")
        } else if meta.path.is_ident("comment") {
            self.comments.push(parse_lit_str(meta)?);
            Ok(())
        } else if meta.path.is_ident("skip") {
            set_once(&mut self.skip, span, meta, "skip")
        } else if meta.path.is_ident("path") {
            set_once(&mut self.path, span, meta, "path")
        } else if meta.path.is_ident("flatten") {
            set_once(&mut self.flatten, span, meta, "flatten")
        } else if meta.path.is_ident("default") {
            set_once(&mut self.default, span, meta, "default")
        } else {
            Err(meta.error(
                "unknown field attribute, expected one of `rename`, `comment`, `skip`, `path`, \
                 `flatten`, `default`",
            ))
        }
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(span), Some(_)) = (self.path, self.flatten) {
            return Err(syn::Error::new(span, "a field cannot be both `path` and `flatten`"));
        }
        if let Some(span) = self.skip
            && (self.rename.is_some()
                || !self.comments.is_empty()
                || self.path.is_some()
                || self.flatten.is_some())
        {
            return Err(syn::Error::new(span, "`skip` cannot be combined with other field attributes"));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Variant attributes

/// `#[config(rename = "...")]` on an enum variant.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_config_meta(attrs, |meta| {
            if meta.path.is_ident("rename") {
                let lit = parse_lit_str(&meta)?;
                set_once(&mut this.rename, lit, &meta, "rename")
            } else {
                Err(meta.error("unknown variant attribute, expected `rename`"))
            }
        })?;
        Ok(this)
    }
}
