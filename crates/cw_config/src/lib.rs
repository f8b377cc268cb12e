#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names `cw_config` paths, which must also resolve inside
// this crate and its doc tests.
extern crate self as cw_config;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod impls;
mod manager;

pub mod convert;
pub mod fields;
pub mod info;
pub mod registry;
pub mod store;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::{BoxError, ConfigError, Result};
pub use manager::ConfigManager;
pub use registry::ConverterRegistry;

#[cfg(feature = "derive")]
pub use cw_config_derive as derive;

#[cfg(feature = "derive")]
pub use cw_config_derive::Config;
