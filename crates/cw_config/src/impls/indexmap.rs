use core::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use crate::info::{
    CollectionKind, CollectionShape, Configurable, ListLike, MapLike, MapShape, TypeDescriptor,
    TypeShape,
};

impl<T: Configurable + Eq + Hash> ListLike for IndexSet<T> {
    type Item = T;
    const KIND: CollectionKind = CollectionKind::Set;

    #[inline]
    fn clear(&mut self) {
        IndexSet::clear(self);
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

impl<T: Configurable + Eq + Hash> Configurable for IndexSet<T> {
    #[inline]
    fn type_path() -> &'static str {
        "indexmap::IndexSet"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [T::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Collection(CollectionShape::of::<Self>())
    }
}

impl<K: Configurable + Eq + Hash, V: Configurable> MapLike for IndexMap<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn clear(&mut self) {
        IndexMap::clear(self);
    }

    #[inline]
    fn insert(&mut self, key: K, value: V) {
        IndexMap::insert(self, key, value);
    }

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }
}

impl<K: Configurable + Eq + Hash, V: Configurable> Configurable for IndexMap<K, V> {
    #[inline]
    fn type_path() -> &'static str {
        "indexmap::IndexMap"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [K::descriptor(), V::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Map(MapShape::of::<Self>())
    }
}
