use crate::info::{Configurable, NativeShape, TypeShape};
use crate::store::Node;

impl Configurable for Node {
    #[inline]
    fn type_path() -> &'static str {
        "cw_config::store::Node"
    }

    fn shape() -> TypeShape {
        TypeShape::Native(NativeShape::of::<Self>())
    }
}
