use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::any::Any;
use core::fmt::Display;

use crate::error::{ConfigError, Result};
use crate::info::{EnumShape, NativeShape, ScalarShape};
use crate::store::{DataHolder, Node, Value};

type ToText = Arc<dyn Fn(&dyn Any) -> Option<String> + Send + Sync>;
type FromText = Arc<dyn Fn(&str) -> Result<Box<dyn Any>, String> + Send + Sync>;

// -----------------------------------------------------------------------------
// StringConverter

/// Persists a value as a single string.
#[derive(Clone)]
pub struct StringConverter {
    ty: Cow<'static, str>,
    enum_cases: bool,
    to_text: ToText,
    from_text: FromText,
}

impl StringConverter {
    /// A converter built from a pair of user functions.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use cw_config::convert::StringConverter;
    ///
    /// let converter = StringConverter::new::<Ipv4Addr, _>(
    ///     "core::net::Ipv4Addr",
    ///     |addr| addr.to_string(),
    ///     |text| text.parse::<Ipv4Addr>(),
    /// );
    /// assert_eq!(converter.to_text(&Ipv4Addr::LOCALHOST).unwrap(), "127.0.0.1");
    /// ```
    pub fn new<T: Any, E: Display>(
        ty: impl Into<Cow<'static, str>>,
        to: impl Fn(&T) -> String + Send + Sync + 'static,
        from: impl Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    ) -> Self {
        Self {
            ty: ty.into(),
            enum_cases: false,
            to_text: Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&to)),
            from_text: Arc::new(move |text: &str| {
                from(text)
                    .map(|value| Box::new(value) as Box<dyn Any>)
                    .map_err(|err| err.to_string())
            }),
        }
    }

    /// Persists enum cases by name.
    pub fn for_enum(ty: impl Into<Cow<'static, str>>, shape: EnumShape) -> Self {
        Self {
            ty: ty.into(),
            enum_cases: true,
            to_text: Arc::new(move |value: &dyn Any| shape.name_of(value).map(String::from)),
            from_text: Arc::new(move |text: &str| {
                shape.from_name(text).ok_or_else(|| String::from("unknown case"))
            }),
        }
    }

    /// Persists a textual scalar such as `String` or `char`.
    pub fn for_scalar(ty: impl Into<Cow<'static, str>>, shape: ScalarShape) -> Self {
        Self {
            ty: ty.into(),
            enum_cases: false,
            to_text: Arc::new(move |value: &dyn Any| shape.to_text(value)),
            from_text: Arc::new(move |text: &str| {
                shape.from_text(text).ok_or_else(|| String::from("unparsable text"))
            }),
        }
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.ty
    }

    pub fn to_text(&self, value: &dyn Any) -> Result<String> {
        (self.to_text)(value).ok_or_else(|| ConfigError::TypeMismatch {
            expected: self.ty.clone(),
        })
    }

    pub fn from_text(&self, text: &str, path: &str) -> Result<Box<dyn Any>> {
        (self.from_text)(text).map_err(|reason| {
            if self.enum_cases {
                ConfigError::UnknownEnumCase {
                    ty: self.ty.clone(),
                    name: text.to_string(),
                    path: path.to_string(),
                }
            } else {
                ConfigError::InvalidValue {
                    path: path.to_string(),
                    expected: self.ty.clone(),
                    found: format!("{text:?} ({reason})"),
                }
            }
        })
    }

    pub(crate) fn load(&self, holder: &dyn DataHolder, path: &str) -> Result<Option<Box<dyn Any>>> {
        match holder.get(path) {
            None => Ok(None),
            Some(Node::Value(value)) => self.from_text(&value.to_text(), path).map(Some),
            Some(other) => Err(ConfigError::InvalidValue {
                path: path.to_string(),
                expected: self.ty.clone(),
                found: other.kind_name().into(),
            }),
        }
    }

    pub(crate) fn save(&self, value: &dyn Any, holder: &mut dyn DataHolder, path: &str) -> Result<()> {
        let text = self.to_text(value)?;
        holder.set(path, Node::Value(Value::String(text)));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PrimitiveConverter

/// Persists numbers and booleans with their native document kind.
///
/// On load a string holding the textual form is accepted as well, since
/// integers outside the document's range are written as text.
#[derive(Clone)]
pub struct PrimitiveConverter {
    ty: Cow<'static, str>,
    shape: ScalarShape,
}

impl PrimitiveConverter {
    pub fn new(ty: impl Into<Cow<'static, str>>, shape: ScalarShape) -> Self {
        Self {
            ty: ty.into(),
            shape,
        }
    }

    pub fn to_text(&self, value: &dyn Any) -> Result<String> {
        self.shape
            .to_text(value)
            .ok_or_else(|| ConfigError::TypeMismatch {
                expected: self.ty.clone(),
            })
    }

    pub fn from_text(&self, text: &str, path: &str) -> Result<Box<dyn Any>> {
        self.shape
            .from_text(text)
            .ok_or_else(|| ConfigError::InvalidValue {
                path: path.to_string(),
                expected: self.ty.clone(),
                found: format!("{text:?}"),
            })
    }

    pub(crate) fn load(&self, holder: &dyn DataHolder, path: &str) -> Result<Option<Box<dyn Any>>> {
        let Some(node) = holder.get(path) else {
            return Ok(None);
        };
        let parsed = node.as_value().and_then(|value| {
            self.shape
                .from_value(value)
                .or_else(|| value.as_str().and_then(|text| self.shape.from_text(text)))
        });
        match parsed {
            Some(value) => Ok(Some(value)),
            None => Err(ConfigError::InvalidValue {
                path: path.to_string(),
                expected: self.ty.clone(),
                found: match node {
                    Node::Value(value) => value.to_string(),
                    other => other.kind_name().into(),
                },
            }),
        }
    }

    pub(crate) fn save(&self, value: &dyn Any, holder: &mut dyn DataHolder, path: &str) -> Result<()> {
        let value = self
            .shape
            .to_value(value)
            .ok_or_else(|| ConfigError::TypeMismatch {
                expected: self.ty.clone(),
            })?;
        holder.set(path, Node::Value(value));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// NativeConverter

/// Passes whole document nodes through unchanged.
#[derive(Clone)]
pub struct NativeConverter {
    ty: Cow<'static, str>,
    shape: NativeShape,
}

impl NativeConverter {
    pub fn new(ty: impl Into<Cow<'static, str>>, shape: NativeShape) -> Self {
        Self {
            ty: ty.into(),
            shape,
        }
    }

    pub(crate) fn load(&self, holder: &dyn DataHolder, path: &str) -> Result<Option<Box<dyn Any>>> {
        let Some(node) = holder.get(path) else {
            return Ok(None);
        };
        self.shape
            .from_node(node)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                path: path.to_string(),
                expected: self.ty.clone(),
                found: node.kind_name().into(),
            })
    }

    pub(crate) fn save(&self, value: &dyn Any, holder: &mut dyn DataHolder, path: &str) -> Result<()> {
        let node = self
            .shape
            .to_node(value)
            .ok_or_else(|| ConfigError::TypeMismatch {
                expected: self.ty.clone(),
            })?;
        holder.set(path, node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PrimitiveConverter, StringConverter};
    use crate::error::ConfigError;
    use crate::info::{EnumShape, ScalarShape};
    use crate::store::{DataHolder, Node, Section, Value};
    use alloc::boxed::Box;
    use core::any::Any;

    #[derive(Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    fn level_shape() -> EnumShape {
        EnumShape::new(
            &["LOW", "HIGH"],
            |value| {
                value.downcast_ref::<Level>().map(|level| match level {
                    Level::Low => 0,
                    Level::High => 1,
                })
            },
            |index| match index {
                0 => Some(Box::new(Level::Low) as Box<dyn Any>),
                1 => Some(Box::new(Level::High) as Box<dyn Any>),
                _ => None,
            },
        )
    }

    #[test]
    fn enum_cases_by_name() {
        let converter = StringConverter::for_enum("demo::Level", level_shape());
        let mut section = Section::new();
        converter.save(&Level::High, &mut section, "level").unwrap();
        assert_eq!(section.get("level"), Some(&Node::from("HIGH")));

        let loaded = converter.load(&section, "level").unwrap().unwrap();
        assert_eq!(loaded.downcast_ref::<Level>(), Some(&Level::High));

        section.set("level", Node::from("PURPLE"));
        let err = converter.load(&section, "level").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnumCase { name, .. } if name == "PURPLE"));
    }

    #[test]
    fn primitive_accepts_text_form() {
        let converter = PrimitiveConverter::new("u16", ScalarShape::of::<u16>());
        let section = Section::new()
            .with("a", 80_i64)
            .with("b", "443")
            .with("c", 70000_i64)
            .with("d", true);

        let a = converter.load(&section, "a").unwrap().unwrap();
        assert_eq!(a.downcast_ref::<u16>(), Some(&80));
        let b = converter.load(&section, "b").unwrap().unwrap();
        assert_eq!(b.downcast_ref::<u16>(), Some(&443));

        for key in ["c", "d"] {
            let err = converter.load(&section, key).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{key}");
        }
        assert!(converter.load(&section, "missing").unwrap().is_none());
    }

    #[test]
    fn primitive_rejects_foreign_values() {
        let converter = PrimitiveConverter::new("u16", ScalarShape::of::<u16>());
        let mut section = Section::new();
        let err = converter.save(&1_i32, &mut section, "x").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));

        converter.save(&7_u16, &mut section, "x").unwrap();
        assert_eq!(section.get("x"), Some(&Node::Value(Value::Int(7))));
    }
}
