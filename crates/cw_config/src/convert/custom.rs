use alloc::boxed::Box;
use core::any::Any;

use crate::error::Result;
use crate::registry::ConverterRegistry;
use crate::store::DataHolder;

/// A hand-written converter, registered with
/// [`ConverterRegistry::register_custom`].
///
/// Custom converters take part in the same protocol as synthesized ones:
/// an absent path must hand `current` back, and `overwrite == false` must
/// not replace anything already set. The registry is passed along so that
/// nested values can be delegated to their own converters.
///
/// Failures that are not [`ConfigError`](crate::ConfigError) variants should
/// be reported as [`ConfigError::Custom`](crate::ConfigError::Custom).
pub trait CustomConverter: Send + Sync + 'static {
    fn load(
        &self,
        registry: &ConverterRegistry,
        holder: &dyn DataHolder,
        path: &str,
        current: Option<Box<dyn Any>>,
    ) -> Result<Option<Box<dyn Any>>>;

    fn save(
        &self,
        registry: &ConverterRegistry,
        value: &dyn Any,
        holder: &mut dyn DataHolder,
        path: &str,
        overwrite: bool,
    ) -> Result<()>;
}
