use crate::info::{Configurable, OptionalShape, TypeDescriptor, TypeShape};

impl<T: Configurable> Configurable for Option<T> {
    #[inline]
    fn type_path() -> &'static str {
        "core::option::Option"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [T::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Optional(OptionalShape::of::<T>())
    }
}
