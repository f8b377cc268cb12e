use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;

use crate::error::{ConfigError, Result};
use crate::fields::{FieldInventory, FieldSlot, Instantiator, SlotRole};
use crate::info::BuildFn;
use crate::registry::ConverterRegistry;
use crate::store::DataHolder;

/// Persists a composite type as a section, one key per persisted slot.
///
/// Loading into an existing instance only touches the slots present in the
/// document, so defaults of absent keys survive. Records are no exception:
/// their fields are assigned in place. Saving without `overwrite` merges
/// into an existing section instead of replacing it.
pub struct ObjectConverter {
    inventory: FieldInventory,
}

impl ObjectConverter {
    pub fn new(inventory: FieldInventory) -> Self {
        Self { inventory }
    }

    #[inline]
    pub fn inventory(&self) -> &FieldInventory {
        &self.inventory
    }

    /// Builds a fresh instance from the section at `path`.
    pub fn load_section(
        &self,
        registry: &ConverterRegistry,
        section: &dyn DataHolder,
        path: &str,
    ) -> Result<Box<dyn Any>> {
        self.instantiate(registry, section, path)
            .map_err(|err| err.nest(path))
    }

    /// Loads the section at `path` into `target`, in place.
    ///
    /// Slots whose keys are absent keep their current value, whether the type
    /// is populated or constructor-built.
    pub fn load_into(
        &self,
        registry: &ConverterRegistry,
        section: &dyn DataHolder,
        path: &str,
        target: &mut Box<dyn Any>,
    ) -> Result<()> {
        self.fill(registry, &mut **target, section, path)
            .map_err(|err| err.nest(path))
    }

    /// Writes every persisted slot of `value` into `section`.
    pub fn save_section(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        section: &mut dyn DataHolder,
        overwrite: bool,
    ) -> Result<()> {
        for slot in self.inventory.slots() {
            match slot.role() {
                SlotRole::Value => {
                    let field = slot.get(value)?;
                    slot.converter().save(
                        registry,
                        field,
                        section,
                        slot.name(),
                        overwrite,
                        slot.comments(),
                    )?;
                }
                SlotRole::Flatten => {
                    let field = slot.get(value)?;
                    self.flattened(slot)?
                        .save_section(registry, field, section, overwrite)?;
                }
                SlotRole::Path => {}
            }
        }
        Ok(())
    }

    pub(crate) fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>> {
        let Some(section) = holder.get_subsection(path) else {
            if let Some(node) = holder.get(path) {
                return Err(ConfigError::InvalidValue {
                    path: path.to_string(),
                    expected: self.inventory.owner().clone(),
                    found: node.kind_name().into(),
                });
            }
            return Ok(current);
        };

        match current {
            Some(mut current) => {
                self.load_into(registry, section, path, &mut current)?;
                Ok(Some(current))
            }
            None => self.load_section(registry, section, path).map(Some),
        }
    }

    /// Merges the section at `path` into `target`. `false` if there is no
    /// section to merge.
    pub(crate) fn merge_into(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        target: &mut dyn Any,
    ) -> Result<bool> {
        let Some(section) = holder.get_subsection(path) else {
            return Ok(false);
        };
        self.fill(registry, target, section, path)
            .map_err(|err| err.nest(path))?;
        Ok(true)
    }

    pub(crate) fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
    ) -> Result<()> {
        let exists = holder.get_subsection(path).is_some();
        if !overwrite && !exists && holder.is_set(path) {
            return Ok(());
        }

        let section = if overwrite || !exists {
            holder.create_subsection(path)
        } else {
            holder
                .get_subsection_mut(path)
                .ok_or_else(|| self.mismatch())?
        };
        self.save_section(registry, value, section, overwrite)
            .map_err(|err| err.nest(path))
    }

    // -------------------------------------------------------------------------
    // Internals, errors are nested by the public entry points only.

    fn instantiate(
        &self,
        registry: &ConverterRegistry,
        section: &dyn DataHolder,
        path: &str,
    ) -> Result<Box<dyn Any>> {
        match self.inventory.instantiator() {
            Instantiator::Constructor(build) => self.construct(registry, section, path, *build),
            Instantiator::Populate(empty) => {
                let mut target = empty();
                self.fill(registry, &mut *target, section, path)?;
                Ok(target)
            }
        }
    }

    fn construct(
        &self,
        registry: &ConverterRegistry,
        section: &dyn DataHolder,
        path: &str,
        build: BuildFn,
    ) -> Result<Box<dyn Any>> {
        let slots = self.inventory.slots();
        let mut args = Vec::with_capacity(slots.len());
        for slot in slots {
            let value = match slot.role() {
                SlotRole::Value => slot
                    .converter()
                    .load(registry, section, slot.name(), None)?,
                SlotRole::Path if path.is_empty() => slot.converter().from_text(path, path).ok(),
                SlotRole::Path => Some(slot.converter().from_text(path, path)?),
                SlotRole::Flatten => Some(self.flattened(slot)?.instantiate(registry, section, path)?),
            };
            let value = match (value, slot.fallback()) {
                (Some(value), _) => value,
                (None, Some(fallback)) => fallback(),
                (None, None) => {
                    return Err(ConfigError::MissingValue {
                        ty: self.inventory.owner().clone(),
                        field: slot.member(),
                    });
                }
            };
            args.push(value);
        }

        let mut built = build(args).ok_or_else(|| self.mismatch())?;
        self.post_init(&mut *built)?;
        Ok(built)
    }

    fn fill(
        &self,
        registry: &ConverterRegistry,
        target: &mut dyn Any,
        section: &dyn DataHolder,
        path: &str,
    ) -> Result<()> {
        for slot in self.inventory.slots() {
            match slot.role() {
                SlotRole::Value => self.fill_value(registry, slot, target, section)?,
                SlotRole::Path => {
                    if !path.is_empty() {
                        let value = slot.converter().from_text(path, path)?;
                        slot.set(target, value)?;
                    }
                }
                SlotRole::Flatten => {
                    self.flattened(slot)?
                        .fill(registry, slot.get_mut(target)?, section, path)?;
                }
            }
        }
        self.post_init(target)
    }

    fn fill_value(
        &self,
        registry: &ConverterRegistry,
        slot: &FieldSlot,
        target: &mut dyn Any,
        section: &dyn DataHolder,
    ) -> Result<()> {
        let name = slot.name();
        if let Some(converter) = slot.converter().get()
            && converter.merge_into(registry, section, name, slot.get_mut(target)?)?
        {
            return Ok(());
        }

        if let Some(value) = slot.converter().load(registry, section, name, None)? {
            slot.set(target, value)?;
        }
        Ok(())
    }

    fn post_init(&self, target: &mut dyn Any) -> Result<()> {
        if let Some(hook) = self.inventory.post_init() {
            log::trace!("running `{}` on `{}`", hook.name(), self.inventory.owner());
            if !hook.call(target) {
                return Err(self.mismatch());
            }
        }
        Ok(())
    }

    fn flattened<'a>(&self, slot: &'a FieldSlot) -> Result<&'a ObjectConverter> {
        slot.converter()
            .converter()?
            .as_object()
            .ok_or_else(|| ConfigError::NotComposite {
                ty: slot.converter().descriptor().to_string().into(),
            })
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: self.inventory.owner().clone(),
        }
    }
}

impl core::fmt::Debug for ObjectConverter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<String> = self
            .inventory
            .slots()
            .iter()
            .map(|slot| slot.name().to_string())
            .collect();
        f.debug_struct("ObjectConverter")
            .field("owner", self.inventory.owner())
            .field("slots", &names)
            .finish()
    }
}
