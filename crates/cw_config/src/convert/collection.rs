use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;

use crate::convert::ConverterHandle;
use crate::error::{ConfigError, Result};
use crate::info::{CollectionShape, MapShape};
use crate::registry::ConverterRegistry;
use crate::store::DataHolder;

fn not_a(path: &str, expected: &Cow<'static, str>, holder: &dyn DataHolder) -> ConfigError {
    ConfigError::InvalidValue {
        path: path.to_string(),
        expected: expected.clone(),
        found: holder
            .get(path)
            .map_or("nothing", |node| node.kind_name())
            .into(),
    }
}

// -----------------------------------------------------------------------------
// CollectionConverter

/// Persists a collection as a list, one element per positional key.
///
/// Loading reuses the current collection after clearing it; saving always
/// writes a fresh list, whatever `overwrite` says about the elements.
pub struct CollectionConverter {
    ty: Cow<'static, str>,
    shape: CollectionShape,
    element: ConverterHandle,
}

impl CollectionConverter {
    pub fn new(ty: impl Into<Cow<'static, str>>, shape: CollectionShape, element: ConverterHandle) -> Self {
        Self {
            ty: ty.into(),
            shape,
            element,
        }
    }

    #[inline]
    pub fn element(&self) -> &ConverterHandle {
        &self.element
    }

    pub(crate) fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>> {
        let Some(list) = holder.get_list(path) else {
            if holder.is_set(path) {
                return Err(not_a(path, &self.ty, holder));
            }
            return Ok(current);
        };

        let mut target = self.reuse(current);

        for key in list.keys() {
            let item = self
                .element
                .load(registry, list, &key, None)
                .map_err(|err| err.nest(path))?;
            if let Some(item) = item
                && !self.shape.push(&mut *target, item)
            {
                return Err(self.mismatch());
            }
        }
        Ok(Some(target))
    }

    pub(crate) fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
    ) -> Result<()> {
        let items = self.shape.items(value).ok_or_else(|| self.mismatch())?;
        let list = holder.create_list(path);
        for (index, item) in items.into_iter().enumerate() {
            let key = index.to_string();
            self.element
                .save(registry, item, list, &key, true, &[])
                .map_err(|err| err.nest(path))?;
            // Positions are implicit, so an element that writes nothing (a
            // `None`) would shift every element after it.
            if !list.is_set(&key) {
                return Err(ConfigError::InvalidValue {
                    path: key,
                    expected: self.element.descriptor().to_string().into(),
                    found: "nothing".into(),
                }
                .nest(path));
            }
        }
        Ok(())
    }

    fn reuse(&self, current: Option<Box<dyn Any>>) -> Box<dyn Any> {
        match current {
            Some(mut current) => {
                if self.shape.clear(&mut *current) {
                    current
                } else {
                    self.shape.create()
                }
            }
            None => self.shape.create(),
        }
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: self.ty.clone(),
        }
    }
}

// -----------------------------------------------------------------------------
// MapConverter

/// Persists a map as a section; keys go through the key type's string form.
///
/// Saving recreates the section, so stale keys from an earlier save do not
/// survive.
pub struct MapConverter {
    ty: Cow<'static, str>,
    shape: MapShape,
    key: ConverterHandle,
    value: ConverterHandle,
}

impl MapConverter {
    /// `key` must be string-convertible, which the registry checks.
    pub fn new(
        ty: impl Into<Cow<'static, str>>,
        shape: MapShape,
        key: ConverterHandle,
        value: ConverterHandle,
    ) -> Self {
        Self {
            ty: ty.into(),
            shape,
            key,
            value,
        }
    }

    pub(crate) fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>> {
        let Some(section) = holder.get_subsection(path) else {
            if holder.is_set(path) {
                return Err(not_a(path, &self.ty, holder));
            }
            return Ok(current);
        };

        let mut target = self.reuse(current);

        for name in section.keys() {
            let key = self
                .key
                .from_text(&name, &name)
                .map_err(|err| err.nest(path))?;
            let value = self
                .value
                .load(registry, section, &name, None)
                .map_err(|err| err.nest(path))?;
            if let Some(value) = value
                && !self.shape.insert(&mut *target, key, value)
            {
                return Err(self.mismatch());
            }
        }
        Ok(Some(target))
    }

    pub(crate) fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
    ) -> Result<()> {
        let entries = self.shape.entries(value).ok_or_else(|| self.mismatch())?;
        let section = holder.create_subsection(path);
        for (key, value) in entries {
            let name: String = self.key.to_text(key)?;
            self.value
                .save(registry, value, section, &name, true, &[])
                .map_err(|err| err.nest(path))?;
        }
        Ok(())
    }

    fn reuse(&self, current: Option<Box<dyn Any>>) -> Box<dyn Any> {
        match current {
            Some(mut current) => {
                if self.shape.clear(&mut *current) {
                    current
                } else {
                    self.shape.create()
                }
            }
            None => self.shape.create(),
        }
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: self.ty.clone(),
        }
    }
}
