use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::info::{
    CollectionKind, CollectionShape, Configurable, ListLike, MapLike, MapShape, TypeDescriptor,
    TypeShape,
};

impl<T: Configurable> ListLike for Vec<T> {
    type Item = T;
    const KIND: CollectionKind = CollectionKind::List;

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    #[inline]
    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }
}

impl<T: Configurable> Configurable for Vec<T> {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::vec::Vec"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [T::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Collection(CollectionShape::of::<Self>())
    }
}

impl<T: Configurable> ListLike for VecDeque<T> {
    type Item = T;
    const KIND: CollectionKind = CollectionKind::Queue;

    #[inline]
    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    #[inline]
    fn push(&mut self, item: T) {
        self.push_back(item);
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }
}

impl<T: Configurable> Configurable for VecDeque<T> {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::collections::VecDeque"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [T::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Collection(CollectionShape::of::<Self>())
    }
}

impl<T: Configurable + Ord> ListLike for BTreeSet<T> {
    type Item = T;
    const KIND: CollectionKind = CollectionKind::Set;

    #[inline]
    fn clear(&mut self) {
        BTreeSet::clear(self);
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

impl<T: Configurable + Ord> Configurable for BTreeSet<T> {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::collections::BTreeSet"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [T::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Collection(CollectionShape::of::<Self>())
    }
}

impl<K: Configurable + Ord, V: Configurable> MapLike for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    #[inline]
    fn insert(&mut self, key: K, value: V) {
        BTreeMap::insert(self, key, value);
    }

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }
}

impl<K: Configurable + Ord, V: Configurable> Configurable for BTreeMap<K, V> {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::collections::BTreeMap"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path(), [K::descriptor(), V::descriptor()])
    }

    fn shape() -> TypeShape {
        TypeShape::Map(MapShape::of::<Self>())
    }
}
