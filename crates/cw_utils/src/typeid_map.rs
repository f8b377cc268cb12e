use core::any::TypeId;
use core::fmt;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A memo table keyed by [`TypeId`].
///
/// Keys are hashed with [`NoOpHashState`], the id being well distributed
/// already.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use cw_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// assert_eq!(*names.get_or_insert(TypeId::of::<u32>(), || "u32"), "u32");
/// assert_eq!(*names.get_or_insert(TypeId::of::<u32>(), || "other"), "u32");
/// assert_eq!(names.len(), 1);
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// The value memoised for `type_id`, computing it with `f` on first use.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        self.0.entry(type_id).or_insert_with(f)
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeIdMap;
    use core::any::TypeId;

    #[test]
    fn computed_once() {
        let mut map = TypeIdMap::new();
        let mut calls = 0;
        for _ in 0..3 {
            map.get_or_insert(TypeId::of::<bool>(), || {
                calls += 1;
                10
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(map.get(&TypeId::of::<bool>()), Some(&10));
        assert!(map.get(&TypeId::of::<u8>()).is_none());
    }
}
