use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::convert::ConverterHandle;
use crate::error::{ConfigError, Result};
use crate::info::{FieldAccess, TypeRef};

/// The part a slot plays when its owner is loaded or saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// Persisted under [`FieldSlot::name`].
    Value,
    /// Receives the owner's document path; never persisted.
    Path,
    /// A nested composite persisted in the owner's own section.
    Flatten,
}

/// One persisted (or path-injected) field of a composite type.
///
/// Two slots are equal iff they belong to the same owner and member.
#[derive(Clone)]
pub struct FieldSlot {
    pub(super) owner: Cow<'static, str>,
    pub(super) member: &'static str,
    pub(super) name: &'static str,
    pub(super) comments: Vec<String>,
    pub(super) role: SlotRole,
    pub(super) ty: TypeRef,
    pub(super) converter: ConverterHandle,
    pub(super) access: FieldAccess,
    pub(super) fallback: Option<fn() -> Box<dyn Any>>,
}

impl FieldSlot {
    /// Declared member name.
    #[inline]
    pub fn member(&self) -> &'static str {
        self.member
    }

    /// Persisted key: the rename if any, otherwise the member name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    #[inline]
    pub fn role(&self) -> SlotRole {
        self.role
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn converter(&self) -> &ConverterHandle {
        &self.converter
    }

    /// Value used by constructors when nothing is stored.
    #[inline]
    pub fn fallback(&self) -> Option<fn() -> Box<dyn Any>> {
        self.fallback
    }

    pub fn get<'a>(&self, owner: &'a dyn Any) -> Result<&'a dyn Any> {
        self.access.get(owner).ok_or_else(|| self.mismatch())
    }

    pub fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> Result<&'a mut dyn Any> {
        self.access.get_mut(owner).ok_or_else(|| self.mismatch())
    }

    pub fn set(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> Result<()> {
        if self.access.set(owner, value) {
            Ok(())
        } else {
            Err(self.mismatch())
        }
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: self.owner.clone(),
        }
    }
}

impl PartialEq for FieldSlot {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.member == other.member
    }
}

impl Eq for FieldSlot {}

impl Hash for FieldSlot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.member.hash(state);
    }
}

impl fmt::Debug for FieldSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSlot")
            .field("owner", &self.owner)
            .field("member", &self.member)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("ty", &self.converter.descriptor())
            .finish()
    }
}
