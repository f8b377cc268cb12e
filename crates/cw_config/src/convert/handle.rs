use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use std::sync::OnceLock;

use crate::convert::Converter;
use crate::error::{ConfigError, Result};
use crate::info::TypeDescriptor;
use crate::registry::ConverterRegistry;
use crate::store::DataHolder;

/// A shared, lazily filled reference to the converter of one type.
///
/// The registry hands out a handle *before* the converter behind it is
/// synthesized, so converters of recursive types can refer to themselves.
/// A handle is filled exactly once and never changes afterwards.
#[derive(Clone)]
pub struct ConverterHandle {
    descriptor: TypeDescriptor,
    cell: Arc<OnceLock<Converter>>,
}

impl ConverterHandle {
    pub(crate) fn pending(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            cell: Arc::new(OnceLock::new()),
        }
    }

    pub(crate) fn ready(descriptor: TypeDescriptor, converter: Converter) -> Self {
        Self {
            descriptor,
            cell: Arc::new(OnceLock::from(converter)),
        }
    }

    /// Returns `false` if the handle was already filled.
    pub(crate) fn fill(&self, converter: Converter) -> bool {
        self.cell.set(converter).is_ok()
    }

    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The converter, or `None` while its synthesis is still in progress.
    #[inline]
    pub fn get(&self) -> Option<&Converter> {
        self.cell.get()
    }

    pub fn converter(&self) -> Result<&Converter> {
        self.cell.get().ok_or_else(|| ConfigError::UnresolvedType {
            name: self.descriptor.to_string(),
        })
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    #[inline]
    pub fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>> {
        self.converter()?.load(registry, holder, path, current)
    }

    #[inline]
    pub fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
        comments: &[String],
    ) -> Result<()> {
        self.converter()?
            .save(registry, value, holder, path, overwrite, comments)
    }

    pub fn to_text(&self, value: &dyn Any) -> Result<String> {
        self.string_convertible()?.to_text(value)
    }

    pub fn from_text(&self, text: &str, path: &str) -> Result<Box<dyn Any>> {
        self.string_convertible()?.from_text(text, path)
    }

    fn string_convertible(&self) -> Result<&Converter> {
        match self.get() {
            Some(converter) if converter.is_string_convertible() => Ok(converter),
            _ => Err(ConfigError::NoStringConverter {
                ty: self.descriptor.to_string().into(),
            }),
        }
    }
}

impl fmt::Debug for ConverterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterHandle")
            .field("descriptor", &self.descriptor)
            .field("converter", &self.get())
            .finish()
    }
}
