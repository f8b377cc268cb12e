use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::info::{
    CollectionKind, CollectionShape, Configurable, ListLike, MapLike, MapShape, TypeDescriptor,
    TypeShape,
};

impl<T: Configurable + Eq + Hash> ListLike for HashSet<T> {
    type Item = T;
    const KIND: CollectionKind = CollectionKind::Set;

    #[inline]
    fn clear(&mut self) {
        HashSet::clear(self);
    }

    #[inline]
    fn push(&mut self, item: T) {
        self.insert(item);
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }
}

impl<T: Configurable + Eq + Hash> Configurable for HashSet<T> {
    #[inline]
    fn type_path() -> &'static str {
        "std::collections::HashSet"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [T::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Collection(CollectionShape::of::<Self>())
    }
}

impl<K: Configurable + Eq + Hash, V: Configurable> MapLike for HashMap<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn clear(&mut self) {
        HashMap::clear(self);
    }

    #[inline]
    fn insert(&mut self, key: K, value: V) {
        HashMap::insert(self, key, value);
    }

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }
}

impl<K: Configurable + Eq + Hash, V: Configurable> Configurable for HashMap<K, V> {
    #[inline]
    fn type_path() -> &'static str {
        "std::collections::HashMap"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [K::descriptor(), V::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Map(MapShape::of::<Self>())
    }
}
