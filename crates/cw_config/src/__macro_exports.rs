//! Items used by `#[derive(Config)]` expansions. Not public API.

pub use alloc::boxed::Box;
pub use alloc::vec::Vec;
pub use core::any::Any;
pub use core::default::Default;
pub use core::option::Option;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use crate::registry::AutoRegistration;
    pub use inventory;
}
