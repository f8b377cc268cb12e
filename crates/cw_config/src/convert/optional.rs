use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::any::Any;

use crate::convert::ConverterHandle;
use crate::error::{ConfigError, Result};
use crate::info::OptionalShape;
use crate::registry::ConverterRegistry;
use crate::store::DataHolder;

/// `Option<T>`: an absent key is `None`, anything else goes through `T`.
/// A present key loaded over `Some` merges into the held value where `T`
/// supports it.
///
/// Saving `None` removes the key when overwriting and leaves it alone
/// otherwise.
pub struct OptionalConverter {
    ty: Cow<'static, str>,
    shape: OptionalShape,
    inner: ConverterHandle,
}

impl OptionalConverter {
    pub fn new(ty: impl Into<Cow<'static, str>>, shape: OptionalShape, inner: ConverterHandle) -> Self {
        Self {
            ty: ty.into(),
            shape,
            inner,
        }
    }

    #[inline]
    pub fn inner(&self) -> &ConverterHandle {
        &self.inner
    }

    pub(crate) fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>> {
        if !holder.is_set(path) {
            return Ok(current);
        }
        if let Some(mut current) = current
            && self.merge_into(registry, holder, path, &mut *current)?
        {
            return Ok(Some(current));
        }
        match self.inner.load(registry, holder, path, None)? {
            Some(value) => self.shape.wrap(value).map(Some).ok_or_else(|| self.mismatch()),
            None => Ok(Some((self.shape.none_fn())())),
        }
    }

    /// Merges into the value held by `target`. `false` if `target` is `None`
    /// or the inner converter cannot merge.
    pub(crate) fn merge_into(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        target: &mut dyn Any,
    ) -> Result<bool> {
        if !holder.is_set(path) {
            return Ok(false);
        }
        match self.shape.get_mut(target).ok_or_else(|| self.mismatch())? {
            Some(inner) => self.inner.converter()?.merge_into(registry, holder, path, inner),
            None => Ok(false),
        }
    }

    pub(crate) fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
    ) -> Result<()> {
        match self.shape.get(value).ok_or_else(|| self.mismatch())? {
            Some(inner) => self.inner.save(registry, inner, holder, path, overwrite, &[]),
            None => {
                if overwrite {
                    holder.remove(path);
                }
                Ok(())
            }
        }
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: self.ty.clone(),
        }
    }
}
