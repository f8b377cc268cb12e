//! The hierarchical document store converters read and write.

// -----------------------------------------------------------------------------
// Modules

mod backend;
mod holder;
mod node;
mod section;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use backend::{Backend, MemoryBackend};
pub use holder::{DataHolder, TYPE_KEY};
pub use node::{Node, Value};
pub use section::{ListSection, Section};

#[cfg(feature = "yaml")]
pub use backend::YamlFileBackend;
