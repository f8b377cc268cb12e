use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;

use crate::convert::ObjectConverter;
use crate::error::{ConfigError, Result};
use crate::info::TypeDescriptor;
use crate::registry::{ConverterRegistry, SubclassEntry};
use crate::store::{DataHolder, Node, TYPE_KEY, Value};

/// Persists a polymorphic value as its implementation's section plus a
/// `=type` key naming the implementation.
///
/// The body is written before the discriminant. A failure in between leaves
/// a section without `=type`, which a later load reports as unresolvable.
pub struct SubclassConverter {
    root: TypeDescriptor,
    ty: Cow<'static, str>,
    concrete: fn(&dyn Any) -> Option<&dyn Any>,
}

impl SubclassConverter {
    /// `concrete` unwraps a value of the root type into the implementation it holds.
    pub fn new(root: TypeDescriptor, concrete: fn(&dyn Any) -> Option<&dyn Any>) -> Self {
        let ty = root.to_string().into();
        Self { root, ty, concrete }
    }

    #[inline]
    pub fn root(&self) -> &TypeDescriptor {
        &self.root
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
                    expected: self.ty.clone(),
                    found: node.kind_name().into(),
                });
            }
            return Ok(current);
        };

        let Some(name) = section.get_string(TYPE_KEY) else {
            return Err(ConfigError::UnresolvableSubclass {
                ty: self.ty.clone(),
                path: path.to_string(),
                name: None,
            });
        };

        let entry = registry
            .subclass_by_name(&self.root, &name)
            .map_err(|err| err.nest(path))?;
        let value = self
            .implementation(registry, &entry)?
            .load_section(registry, section, path)?;
        entry.upcast(value).map(Some).ok_or_else(|| self.mismatch())
    }

    pub(crate) fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
    ) -> Result<()> {
        let concrete = (self.concrete)(value).ok_or_else(|| self.mismatch())?;
        let entry = registry
            .subclass_by_id(&self.root, concrete.type_id())
            .ok_or_else(|| ConfigError::SubclassMismatch {
                declared: self.ty.clone(),
                found: String::from("<unregistered implementation>"),
                path: path.to_string(),
            })?;

        self.implementation(registry, &entry)?
            .save(registry, concrete, holder, path, overwrite)?;

        if let Some(section) = holder.get_subsection_mut(path)
            && (overwrite || !section.is_set(TYPE_KEY))
        {
            section.set(TYPE_KEY, Node::Value(Value::String(entry.name().to_string())));
        }
        Ok(())
    }

    fn implementation(
        &self,
        registry: &ConverterRegistry,
        entry: &SubclassEntry,
    ) -> Result<ObjectHandle> {
        let handle = registry.resolve_object(entry.ty())?;
        Ok(ObjectHandle(handle))
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: self.ty.clone(),
        }
    }
}

/// A resolved handle known to hold an [`ObjectConverter`].
struct ObjectHandle(crate::convert::ConverterHandle);

impl ObjectHandle {
    fn object(&self) -> Result<&ObjectConverter> {
        self.0
            .converter()?
            .as_object()
            .ok_or_else(|| ConfigError::NotComposite {
                ty: self.0.descriptor().to_string().into(),
            })
    }

    fn load_section(
        &self,
        registry: &ConverterRegistry,
        section: &dyn DataHolder,
        path: &str,
    ) -> Result<Box<dyn Any>> {
        self.object()?.load_section(registry, section, path)
    }

    fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
    ) -> Result<()> {
        self.object()?.save(registry, value, holder, path, overwrite)
    }
}
