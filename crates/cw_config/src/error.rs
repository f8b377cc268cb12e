use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::error::Error as StdError;

use thiserror::Error;

/// Boxed source error carried by [`ConfigError::Backend`] and [`ConfigError::Custom`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// `Result` alias used throughout the engine.
pub type Result<T, E = ConfigError> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// ConfigError

/// All the ways a conversion, an inventory build or a persistence call can fail.
///
/// These are structural errors: they describe a mismatch between the type
/// graph and either the stored document or the registry configuration, and
/// are surfaced to the caller at the point of first use without any retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("type `{name}` cannot be resolved, all component types must be known when the inventory is built")]
    UnresolvedType { name: String },

    #[error("malformed generic signature `{signature}`")]
    InvalidSignature { signature: String },

    #[error("type `{ty}` has no string converter and cannot be used as a map key or path")]
    NoStringConverter { ty: Cow<'static, str> },

    #[error("`{name}` at `{path}` is not a case of enum `{ty}`")]
    UnknownEnumCase {
        ty: Cow<'static, str>,
        name: String,
        path: String,
    },

    #[error("cannot resolve the implementation of `{ty}` at `{path}` ({})", .name.as_deref().unwrap_or("missing `=type` discriminant"))]
    UnresolvableSubclass {
        ty: Cow<'static, str>,
        path: String,
        name: Option<String>,
    },

    #[error("`{found}` at `{path}` is not a subtype of `{declared}`")]
    SubclassMismatch {
        declared: Cow<'static, str>,
        found: String,
        path: String,
    },

    #[error("type `{ty}` has no constructor matching its field order")]
    NoMatchingConstructor { ty: Cow<'static, str> },

    #[error("type `{ty}` has no zero-argument constructor")]
    NoZeroArgConstructor { ty: Cow<'static, str> },

    #[error("invalid post-construction hook `{hook}` on `{ty}`: {reason}")]
    InvalidHookSignature {
        ty: Cow<'static, str>,
        hook: &'static str,
        reason: &'static str,
    },

    #[error("the config manager is already bound to a target")]
    AlreadyBound,

    #[error("the config manager has no bound target")]
    NotBound,

    #[error("type `{ty}` is not composite-mappable and cannot be a root")]
    NotComposite { ty: Cow<'static, str> },

    #[error("invalid value at `{path}`: expected {expected}, found {found}")]
    InvalidValue {
        path: String,
        expected: Cow<'static, str>,
        found: String,
    },

    #[error("no value for `{field}` of `{ty}` and the slot has no default")]
    MissingValue {
        ty: Cow<'static, str>,
        field: &'static str,
    },

    #[error("value handed to the converter of `{expected}` has a different type")]
    TypeMismatch { expected: Cow<'static, str> },

    #[error("custom converter failed at `{path}`")]
    Custom {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("document backend failed")]
    Backend(#[source] BoxError),
}

impl ConfigError {
    /// Wraps any persistence-layer error.
    #[inline]
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }

    /// Prefixes the document path carried by the error with `parent`.
    ///
    /// Converters read nested holders with relative keys; each level that
    /// propagates an error nests it so the final message names the full path.
    pub fn nest(mut self, parent: &str) -> Self {
        if parent.is_empty() {
            return self;
        }
        match &mut self {
            Self::UnknownEnumCase { path, .. }
            | Self::UnresolvableSubclass { path, .. }
            | Self::SubclassMismatch { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::Custom { path, .. } => {
                *path = if path.is_empty() {
                    parent.into()
                } else {
                    alloc::format!("{parent}.{path}")
                };
            }
            _ => {}
        }
        self
    }

    /// Returns `true` for errors caused by the stored document rather than the type graph.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownEnumCase { .. }
                | Self::UnresolvableSubclass { .. }
                | Self::SubclassMismatch { .. }
                | Self::InvalidValue { .. }
                | Self::MissingValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigError;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_type() {
        let err = ConfigError::NoStringConverter { ty: "demo::Point".into() };
        assert!(err.to_string().contains("demo::Point"));

        let err = ConfigError::UnknownEnumCase {
            ty: "demo::Color".into(),
            name: "PURPLE".into(),
            path: "color".into(),
        };
        assert_eq!(err.to_string(), "`PURPLE` at `color` is not a case of enum `demo::Color`");
        assert!(err.is_document_error());
    }

    #[test]
    fn nesting_builds_full_paths() {
        let err = ConfigError::InvalidValue {
            path: "port".into(),
            expected: "u16".into(),
            found: "\"abc\"".into(),
        };
        let err = err.nest("server").nest("root");
        assert!(matches!(&err, ConfigError::InvalidValue { path, .. } if path == "root.server.port"));

        let err = ConfigError::UnresolvableSubclass {
            ty: "dyn zoo::Animal".into(),
            path: "pet".into(),
            name: None,
        };
        assert!(err.to_string().contains("missing `=type` discriminant"));
        assert!(matches!(ConfigError::AlreadyBound.nest("x"), ConfigError::AlreadyBound));
    }
}
