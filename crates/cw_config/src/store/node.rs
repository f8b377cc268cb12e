use alloc::string::{String, ToString};
use core::fmt;

use crate::store::{ListSection, Section};

// -----------------------------------------------------------------------------
// Value

/// A leaf of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form: strings verbatim, other kinds through `Display`.
    pub fn to_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Debug::fmt(v, f),
            Self::String(v) => fmt::Debug::fmt(v, f),
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

// -----------------------------------------------------------------------------
// Node

/// Anything a document path can point at.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(Value),
    List(ListSection),
    Section(Section),
}

impl Node {
    /// Name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Value(v) => v.kind_name(),
            Self::List(_) => "list",
            Self::Section(_) => "section",
        }
    }

    #[inline]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Self::Section(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ListSection> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_mut(&mut self) -> Option<&mut ListSection> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

macro_rules! impl_node_from_value {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Node {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::Value(value.into())
            }
        }
    )*};
}

impl_node_from_value!(Value, bool, i64, f64, String, &str);

impl From<Section> for Node {
    #[inline]
    fn from(value: Section) -> Self {
        Self::Section(value)
    }
}

impl From<ListSection> for Node {
    #[inline]
    fn from(value: ListSection) -> Self {
        Self::List(value)
    }
}
