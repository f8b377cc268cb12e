use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeDescriptor, TypeShape};

// -----------------------------------------------------------------------------
// Configurable

/// A type whose values can be converted to and from a document.
///
/// Implementations describe *what* a type looks like ([`shape`](Self::shape))
/// and *who* it is ([`descriptor`](Self::descriptor)); the registry derives a
/// converter from that description the first time the type is used.
///
/// Do not implement this by hand for structs and enums, use
/// `#[derive(Config)]`. Trait objects are covered by
/// [`impl_polymorphic!`](crate::impl_polymorphic).
pub trait Configurable: Any {
    /// Full path of the type, without generics. Used as descriptor base and
    /// as the subtype discriminant.
    fn type_path() -> &'static str;

    /// Last segment of [`type_path`](Self::type_path).
    fn type_ident() -> &'static str {
        let path = Self::type_path();
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Structural identity, including generic components.
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::leaf(Self::type_path())
    }

    /// How values of this type are laid out.
    fn shape() -> TypeShape;
}

// -----------------------------------------------------------------------------
// TypeRef

/// A type-erased handle to a [`Configurable`] implementation.
///
/// Field and element types are stored as `TypeRef` so that shapes can
/// mention each other lazily, recursive types included.
#[derive(Clone, Copy)]
pub struct TypeRef {
    type_id: TypeId,
    type_path: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    descriptor: fn() -> TypeDescriptor,
    shape: fn() -> TypeShape,
}

impl TypeRef {
    #[inline]
    pub fn of<T: Configurable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path,
            type_ident: T::type_ident,
            descriptor: T::descriptor,
            shape: T::shape,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline]
    pub fn type_ident(&self) -> &'static str {
        (self.type_ident)()
    }

    #[inline]
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.descriptor)()
    }

    /// Builds the shape. Not cached, callers keep what they need.
    #[inline]
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.descriptor())
    }
}
