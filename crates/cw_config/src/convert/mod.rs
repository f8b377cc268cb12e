//! Converters: bidirectional mappings between values and document nodes.
//!
//! Every converter variant is synthesized by the
//! [`ConverterRegistry`](crate::ConverterRegistry) from a [`TypeShape`],
//! except [`Converter::Custom`] which is registered explicitly.
//!
//! [`TypeShape`]: crate::info::TypeShape

// -----------------------------------------------------------------------------
// Modules

mod collection;
mod custom;
mod handle;
mod leaf;
mod object;
mod optional;
mod subclass;

// -----------------------------------------------------------------------------
// Exports

pub use collection::{CollectionConverter, MapConverter};
pub use custom::CustomConverter;
pub use handle::ConverterHandle;
pub use leaf::{NativeConverter, PrimitiveConverter, StringConverter};
pub use object::ObjectConverter;
pub use optional::OptionalConverter;
pub use subclass::SubclassConverter;

// -----------------------------------------------------------------------------
// Converter

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;

use crate::error::{ConfigError, Result};
use crate::registry::ConverterRegistry;
use crate::store::DataHolder;

/// The closed set of converter variants.
///
/// `load` returns `Ok(None)` when nothing is stored at the path and no
/// current value was supplied; when a current value *was* supplied and the
/// path is absent, that value is handed back untouched.
pub enum Converter {
    /// Textual values: `String`, `char`, enums and user string converters.
    String(StringConverter),
    /// Numbers and booleans.
    Primitive(PrimitiveConverter),
    /// Types stored as whole document nodes.
    Native(NativeConverter),
    Collection(CollectionConverter),
    Map(MapConverter),
    Optional(OptionalConverter),
    /// Composite types, field by field.
    Object(ObjectConverter),
    /// Polymorphic values, dispatched on the `=type` discriminant.
    Subclass(SubclassConverter),
    Custom(Arc<dyn CustomConverter>),
}

impl Converter {
    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Primitive(_) => "primitive",
            Self::Native(_) => "native",
            Self::Collection(_) => "collection",
            Self::Map(_) => "map",
            Self::Optional(_) => "optional",
            Self::Object(_) => "object",
            Self::Subclass(_) => "subclass",
            Self::Custom(_) => "custom",
        }
    }

    /// `true` if values can round-trip through a single string, as map keys
    /// and path slots require.
    #[inline]
    pub fn is_string_convertible(&self) -> bool {
        matches!(self, Self::String(_) | Self::Primitive(_))
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectConverter> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Reads the value stored at `path` in `holder`.
    pub fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>> {
        match self {
            Self::String(c) => Ok(c.load(holder, path)?.or(current)),
            Self::Primitive(c) => Ok(c.load(holder, path)?.or(current)),
            Self::Native(c) => Ok(c.load(holder, path)?.or(current)),
            Self::Collection(c) => c.load(registry, holder, path, current),
            Self::Map(c) => c.load(registry, holder, path, current),
            Self::Optional(c) => c.load(registry, holder, path, current),
            Self::Object(c) => c.load(registry, holder, path, current),
            Self::Subclass(c) => c.load(registry, holder, path, current),
            Self::Custom(c) => c.load(registry, holder, path, current),
        }
    }

    /// Loads the document at `path` into `target` in place, where the variant
    /// supports it. `false` if nothing was merged and the caller should
    /// [`load`](Self::load) a fresh value instead.
    pub(crate) fn merge_into(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        target: &mut dyn Any,
    ) -> Result<bool> {
        match self {
            Self::Object(c) => c.merge_into(registry, holder, path, target),
            Self::Optional(c) => c.merge_into(registry, holder, path, target),
            _ => Ok(false),
        }
    }

    /// `true` if saving without `overwrite` merges into what is stored rather
    /// than skipping it.
    fn merges(&self) -> bool {
        match self {
            Self::Object(_) | Self::Subclass(_) | Self::Custom(_) => true,
            Self::Optional(c) => c.inner().get().is_some_and(Self::merges),
            _ => false,
        }
    }

    /// Writes `value` at `path` in `holder`, then attaches `comments`.
    ///
    /// With `overwrite == false` nothing already set is replaced: leaves that
    /// exist are skipped and composites are merged key by key.
    pub fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
        comments: &[String],
    ) -> Result<()> {
        if !overwrite && !self.merges() && holder.is_set(path) {
            return Ok(());
        }

        match self {
            Self::String(c) => c.save(value, holder, path)?,
            Self::Primitive(c) => c.save(value, holder, path)?,
            Self::Native(c) => c.save(value, holder, path)?,
            Self::Collection(c) => c.save(registry, value, holder, path)?,
            Self::Map(c) => c.save(registry, value, holder, path)?,
            Self::Optional(c) => c.save(registry, value, holder, path, overwrite)?,
            Self::Object(c) => c.save(registry, value, holder, path, overwrite)?,
            Self::Subclass(c) => c.save(registry, value, holder, path, overwrite)?,
            Self::Custom(c) => c.save(registry, value, holder, path, overwrite)?,
        }

        if !comments.is_empty() && holder.is_set(path) {
            holder.set_comments(path, comments);
        }
        Ok(())
    }

    /// Textual form of a value, for string-convertible converters.
    pub fn to_text(&self, value: &dyn Any) -> Result<String> {
        match self {
            Self::String(c) => c.to_text(value),
            Self::Primitive(c) => c.to_text(value),
            _ => Err(self.no_string_converter()),
        }
    }

    /// Parses a value from its textual form. `path` is only used for errors.
    pub fn from_text(&self, text: &str, path: &str) -> Result<Box<dyn Any>> {
        match self {
            Self::String(c) => c.from_text(text, path),
            Self::Primitive(c) => c.from_text(text, path),
            _ => Err(self.no_string_converter()),
        }
    }

    fn no_string_converter(&self) -> ConfigError {
        ConfigError::NoStringConverter {
            ty: alloc::format!("<{} converter>", self.kind_name()).into(),
        }
    }
}

impl core::fmt::Debug for Converter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Converter::{}", self.kind_name())
    }
}
