use alloc::string::{String, ToString};

use crate::info::{Configurable, Scalar, ScalarShape, TypeShape};
use crate::store::Value;

// Integers beyond the range of `i64` are written as strings.
macro_rules! impl_integer {
    ($($ty:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            fn to_value(&self) -> Value {
                i64::try_from(*self)
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::String(self.to_string()))
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(int) => Self::try_from(*int).ok(),
                    Value::String(text) => Self::from_text(text),
                    _ => None,
                }
            }

            #[inline]
            fn to_text(&self) -> String {
                self.to_string()
            }

            #[inline]
            fn from_text(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }

        impl Configurable for $ty {
            #[inline]
            fn type_path() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }

            fn shape() -> TypeShape {
                TypeShape::Scalar(ScalarShape::of::<Self>())
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($ty:ident),* $(,)?) => {$(
        #[allow(clippy::unnecessary_cast, reason = "shared by f32 and f64")]
        impl Scalar for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Float(*self as f64)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Float(float) => {
                        // Only an infinite input may give an infinite result.
                        let narrowed = *float as Self;
                        (narrowed.is_finite() || !float.is_finite()).then_some(narrowed)
                    }
                    Value::Int(int) => Some(*int as Self),
                    Value::String(text) => Self::from_text(text),
                    Value::Bool(_) => None,
                }
            }

            #[inline]
            fn to_text(&self) -> String {
                self.to_string()
            }

            #[inline]
            fn from_text(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }

        impl Configurable for $ty {
            #[inline]
            fn type_path() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }

            fn shape() -> TypeShape {
                TypeShape::Scalar(ScalarShape::of::<Self>())
            }
        }
    )*};
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_float!(f32, f64);

impl Scalar for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(text) => Self::from_text(text),
            _ => None,
        }
    }

    #[inline]
    fn to_text(&self) -> String {
        self.to_string()
    }

    #[inline]
    fn from_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

impl Configurable for bool {
    #[inline]
    fn type_path() -> &'static str {
        "bool"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "bool"
    }

    fn shape() -> TypeShape {
        TypeShape::Scalar(ScalarShape::of::<Self>())
    }
}

impl Scalar for char {
    const TEXTUAL: bool = true;

    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::from_text)
    }

    #[inline]
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Configurable for char {
    #[inline]
    fn type_path() -> &'static str {
        "char"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "char"
    }

    fn shape() -> TypeShape {
        TypeShape::Scalar(ScalarShape::of::<Self>())
    }
}

impl Scalar for String {
    const TEXTUAL: bool = true;

    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    /// Numbers and booleans are read through their textual form.
    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.to_text())
    }

    #[inline]
    fn to_text(&self) -> String {
        self.clone()
    }

    #[inline]
    fn from_text(text: &str) -> Option<Self> {
        Some(text.into())
    }
}

impl Configurable for String {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::string::String"
    }

    fn shape() -> TypeShape {
        TypeShape::Scalar(ScalarShape::of::<Self>())
    }
}

#[cfg(test)]
mod tests {
    use crate::info::Scalar;
    use crate::store::Value;

    #[test]
    fn wide_integers_fall_back_to_strings() {
        assert_eq!(u64::MAX.to_value(), Value::String("18446744073709551615".into()));
        assert_eq!(u64::from_value(&Value::String("18446744073709551615".into())), Some(u64::MAX));
        assert_eq!(7_u64.to_value(), Value::Int(7));
        assert_eq!(u8::from_value(&Value::Int(300)), None);
        assert_eq!(i32::from_value(&Value::Int(-3)), Some(-3));
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_value(&Value::Int(2)), Some(2.0));
        assert_eq!(f32::from_value(&Value::Float(0.5)), Some(0.5));
        assert_eq!(f64::from_value(&Value::Bool(true)), None);
    }

    #[test]
    fn float_overflow_is_rejected() {
        assert_eq!(f32::from_value(&Value::Float(1e300)), None);
        assert_eq!(f32::from_value(&Value::Float(-1e300)), None);
        assert_eq!(f32::from_value(&Value::Float(f64::INFINITY)), Some(f32::INFINITY));
        assert_eq!(f64::from_value(&Value::Float(1e300)), Some(1e300));
    }

    #[test]
    fn textual_scalars() {
        assert_eq!(char::from_text("x"), Some('x'));
        assert_eq!(char::from_text("xy"), None);
        assert_eq!(String::from_value(&Value::Int(4)).as_deref(), Some("4"));
        assert_eq!(bool::from_value(&Value::String("true".into())), Some(true));
    }
}
