use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{ConfigError, Result};
use crate::info::Configurable;

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Structural identity of a type: a base path plus ordered generic components.
///
/// `Vec<Point>` is described as base `alloc::vec::Vec` with one component
/// whose base is the path of `Point`. Two descriptors are equal iff their
/// bases are equal and their components are recursively equal, in order.
///
/// Descriptors are immutable and cheap to clone (components are shared),
/// which makes them suitable as cache keys.
///
/// # Examples
///
/// ```
/// use cw_config::info::{Configurable, TypeDescriptor};
///
/// let list = <Vec<i32>>::descriptor();
/// assert_eq!(list.base(), "alloc::vec::Vec");
/// assert_eq!(list.components(), &[TypeDescriptor::leaf("i32")]);
/// assert_eq!(list.to_string(), "alloc::vec::Vec<i32>");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
    base: &'static str,
    components: Arc<[TypeDescriptor]>,
}

impl TypeDescriptor {
    /// Creates a descriptor from a base path and its components.
    #[inline]
    pub fn new(base: &'static str, components: impl Into<Arc<[TypeDescriptor]>>) -> Self {
        Self {
            base,
            components: components.into(),
        }
    }

    /// Creates a descriptor without generic components.
    #[inline]
    pub fn leaf(base: &'static str) -> Self {
        Self::new(base, Vec::new())
    }

    /// Returns the descriptor of `T`.
    #[inline]
    pub fn of<T: Configurable>() -> Self {
        T::descriptor()
    }

    /// Returns the base path, without generics.
    #[inline]
    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Returns the ordered generic components.
    #[inline]
    pub fn components(&self) -> &[TypeDescriptor] {
        &self.components
    }

    /// Returns the component at `index`, if present.
    #[inline]
    pub fn component(&self, index: usize) -> Option<&TypeDescriptor> {
        self.components.get(index)
    }

    /// Returns `true` if the descriptor carries generic components.
    #[inline]
    pub fn is_parameterized(&self) -> bool {
        !self.components.is_empty()
    }

    /// Parses a textual generic signature such as `Map<String, List<Integer>>`.
    ///
    /// The signature is split on its outermost `<...>` bracket and the
    /// argument list is split on commas at nesting depth zero, so commas of
    /// nested generics never separate top-level arguments. Each base name is
    /// resolved through `resolve`, which maps a written name to the canonical
    /// base path known to the caller's type universe.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidSignature`] for unbalanced brackets or empty arguments.
    /// - [`ConfigError::UnresolvedType`] when `resolve` does not know a base name.
    ///
    /// # Examples
    ///
    /// ```
    /// use cw_config::info::TypeDescriptor;
    ///
    /// let resolve = |name: &str| match name {
    ///     "Map" => Some("Map"),
    ///     "List" => Some("List"),
    ///     "String" => Some("String"),
    ///     "Integer" => Some("Integer"),
    ///     _ => None,
    /// };
    ///
    /// let map = TypeDescriptor::parse("Map<String, List<Integer>>", resolve).unwrap();
    /// assert_eq!(map.base(), "Map");
    /// assert_eq!(map.components().len(), 2);
    /// assert_eq!(map.components()[1].base(), "List");
    /// assert_eq!(map.components()[1].components()[0].base(), "Integer");
    /// ```
    pub fn parse(
        signature: &str,
        mut resolve: impl FnMut(&str) -> Option<&'static str>,
    ) -> Result<Self> {
        Self::parse_with(signature, &mut resolve)
    }

    fn parse_with(
        signature: &str,
        resolve: &mut dyn FnMut(&str) -> Option<&'static str>,
    ) -> Result<Self> {
        let (base, arguments) = split_signature(signature)?;
        let base = resolve(base).ok_or_else(|| ConfigError::UnresolvedType {
            name: base.to_string(),
        })?;
        let components = arguments
            .into_iter()
            .map(|argument| Self::parse_with(argument, resolve))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(base, components))
    }
}

/// Splits `Base<A, B<C, D>>` into `("Base", ["A", "B<C, D>"])`.
///
/// Whitespace around names is trimmed. A signature without brackets yields
/// an empty argument list.
pub fn split_signature(signature: &str) -> Result<(&str, Vec<&str>)> {
    let invalid = || ConfigError::InvalidSignature {
        signature: signature.to_string(),
    };

    let trimmed = signature.trim();
    let Some(open) = trimmed.find('<') else {
        if trimmed.is_empty() || trimmed.contains(['>', ',']) {
            return Err(invalid());
        }
        return Ok((trimmed, Vec::new()));
    };

    let base = trimmed[..open].trim();
    let Some(inner) = trimmed[open + 1..].strip_suffix('>') else {
        return Err(invalid());
    };
    if base.is_empty() {
        return Err(invalid());
    }

    let mut arguments = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (index, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1).ok_or_else(invalid)?,
            ',' if depth == 0 => {
                arguments.push(inner[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid());
    }
    arguments.push(inner[start..].trim());

    if arguments.iter().any(|argument| argument.is_empty()) {
        return Err(invalid());
    }
    Ok((base, arguments))
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base)?;
        if let Some((first, rest)) = self.components.split_first() {
            write!(f, "<{first}")?;
            for component in rest {
                write!(f, ", {component}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}

impl From<TypeDescriptor> for String {
    #[inline]
    fn from(value: TypeDescriptor) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeDescriptor, split_signature};
    use crate::error::ConfigError;
    use alloc::string::ToString;
    use alloc::vec;

    fn sample_names(name: &str) -> Option<&'static str> {
        match name {
            "Map" => Some("Map"),
            "List" => Some("List"),
            "String" => Some("String"),
            "Integer" => Some("Integer"),
            _ => None,
        }
    }

    #[test]
    fn nested_commas_do_not_split_outer_arguments() {
        let map = TypeDescriptor::parse("Map<String, List<Integer>>", sample_names).unwrap();

        assert_eq!(map.base(), "Map");
        assert_eq!(map.components().len(), 2);
        assert_eq!(map.components()[0], TypeDescriptor::leaf("String"));

        let list = &map.components()[1];
        assert_eq!(list.base(), "List");
        assert_eq!(list.components(), &[TypeDescriptor::leaf("Integer")]);
    }

    #[test]
    fn deeper_nesting() {
        let sig = "Map<Map<String, Integer>, List<Map<String, List<Integer>>>>";
        let parsed = TypeDescriptor::parse(sig, sample_names).unwrap();
        assert_eq!(parsed.to_string(), sig);
    }

    #[test]
    fn structural_equality() {
        let a = TypeDescriptor::new("List", vec![TypeDescriptor::leaf("Integer")]);
        let b = TypeDescriptor::parse(" List < Integer > ", sample_names).unwrap();
        let c = TypeDescriptor::new("List", vec![TypeDescriptor::leaf("String")]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let ab = TypeDescriptor::new("Map", vec![TypeDescriptor::leaf("String"), TypeDescriptor::leaf("Integer")]);
        let ba = TypeDescriptor::new("Map", vec![TypeDescriptor::leaf("Integer"), TypeDescriptor::leaf("String")]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn unknown_names_are_unresolved() {
        let err = TypeDescriptor::parse("List<Widget>", sample_names).unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvedType { name } if name == "Widget"));
    }

    #[test]
    fn malformed_signatures() {
        for sig in ["", "List<", "List<Integer", "List<Integer>>", "Map<String,>", "<Integer>", "A,B"] {
            assert!(
                matches!(split_signature(sig), Err(ConfigError::InvalidSignature { .. })),
                "{sig} should be rejected"
            );
        }
    }

    #[test]
    fn plain_name() {
        let (base, args) = split_signature("  Integer ").unwrap();
        assert_eq!(base, "Integer");
        assert!(args.is_empty());
        assert_eq!(TypeDescriptor::leaf("Integer").to_string(), "Integer");
    }
}
