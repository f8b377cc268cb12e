//! Static description of configurable types.
//!
//! - [`TypeDescriptor`]: structural identity, used as cache key.
//! - [`Configurable`]: implemented by every type the engine converts.
//! - [`TypeShape`]: the layout converter synthesis works from.

// -----------------------------------------------------------------------------
// Modules

mod composite;
mod configurable;
mod descriptor;
mod shape;

// -----------------------------------------------------------------------------
// Exports

pub use composite::{
    BuildFn, CompositeShape, Construction, Constructor, FieldAccess, FieldInfo,
    FieldRole, ParamInfo, PostInit,
};
pub use configurable::{Configurable, TypeRef};
pub use descriptor::{TypeDescriptor, split_signature};
pub use shape::{
    CollectionKind, CollectionShape, EnumShape, ListLike, MapLike, MapShape, NativeShape,
    OptionalShape, PolymorphicShape, Scalar, ScalarShape, TypeShape,
};
