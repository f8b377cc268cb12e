use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::{Configurable, TypeRef};

type Upcast = Arc<dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>> + Send + Sync>;

/// A registered implementation of a polymorphic root type.
#[derive(Clone)]
pub struct SubclassEntry {
    name: String,
    ty: TypeRef,
    upcast: Upcast,
}

impl SubclassEntry {
    /// `S` stored as `R` through `upcast`.
    pub(crate) fn new<R: Configurable, S: Configurable>(upcast: fn(S) -> R) -> Self {
        Self {
            name: S::descriptor().to_string(),
            ty: TypeRef::of::<S>(),
            upcast: Arc::new(move |value: Box<dyn Any>| {
                let value = value.downcast::<S>().ok()?;
                Some(Box::new(upcast(*value)) as Box<dyn Any>)
            }),
        }
    }

    /// A subclassable composite is an implementation of itself.
    pub(crate) fn identity(ty: TypeRef) -> Self {
        Self {
            name: ty.descriptor().to_string(),
            ty,
            upcast: Arc::new(|value: Box<dyn Any>| Some(value)),
        }
    }

    /// Discriminant written under `=type`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Converts a loaded implementation into a value of the root type.
    #[inline]
    pub fn upcast(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.upcast)(value)
    }
}

impl fmt::Debug for SubclassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubclassEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
