//! `Configurable` implementations for foreign types.
//!
//! ## Implemented Menu
//!
//! - scalars: `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`, `String`
//! - alloc: `Vec<T>`, `VecDeque<T>`, `BTreeSet<T>`, `BTreeMap<K, V>`
//! - std: `HashSet<T>`, `HashMap<K, V>`
//! - indexmap: `IndexSet<T>`, `IndexMap<K, V>`
//! - core: `Option<T>`
//! - store: [`Node`](crate::store::Node), persisted as is
//!
//! Trait objects are declared polymorphic with [`impl_polymorphic!`](crate::impl_polymorphic).

// -----------------------------------------------------------------------------
// Modules

mod alloc;
mod core;
mod indexmap;
mod native;
mod polymorphic;
mod std;
mod store;
