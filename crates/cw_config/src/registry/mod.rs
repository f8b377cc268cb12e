//! The converter cache and the polymorphic implementation tables.

// -----------------------------------------------------------------------------
// Modules

mod converter_registry;
mod subclass;
mod universe;

// -----------------------------------------------------------------------------
// Exports

pub use converter_registry::ConverterRegistry;
pub use subclass::SubclassEntry;

// -----------------------------------------------------------------------------
// AutoRegistration

/// A registration callback collected at link time.
///
/// Submitted by `#[derive(Config)]` for `#[config(auto_register)]` types and
/// `#[config(implements = Trait)]` implementations, and run by
/// [`ConverterRegistry::auto_register`].
#[cfg(feature = "auto_register")]
pub struct AutoRegistration(pub fn(&ConverterRegistry));

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegistration);
