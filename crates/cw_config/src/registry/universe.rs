use alloc::string::{String, ToString};
use alloc::vec::Vec;

use cw_utils::hash::{HashMap, HashSet};

use crate::info::{TypeDescriptor, TypeRef, TypeShape};

/// Every type the registry has seen, indexed for name lookups.
///
/// Short names are only usable while they are unambiguous: once two base
/// paths share a last segment, that segment resolves to nothing.
#[derive(Default)]
pub(crate) struct TypeUniverse {
    known: HashMap<TypeDescriptor, TypeRef>,
    by_name: HashMap<String, TypeDescriptor>,
    base_paths: HashSet<&'static str>,
    ident_to_path: HashMap<&'static str, &'static str>,
    ambiguous_idents: HashSet<&'static str>,
}

impl TypeUniverse {
    /// Records a base path, generic or not.
    pub fn add_base(&mut self, path: &'static str, ident: &'static str) {
        if !self.base_paths.insert(path) || self.ambiguous_idents.contains(ident) {
            return;
        }
        match self.ident_to_path.get(ident) {
            Some(existing) if *existing != path => {
                self.ident_to_path.remove(ident);
                self.ambiguous_idents.insert(ident);
            }
            Some(_) => {}
            None => {
                self.ident_to_path.insert(ident, path);
            }
        }
    }

    /// Records `ty` and returns the types its shape mentions, or `None` if
    /// `ty` was already known.
    pub fn insert(&mut self, ty: TypeRef, descriptor: TypeDescriptor) -> Option<Vec<TypeRef>> {
        if self.known.contains_key(&descriptor) {
            return None;
        }
        self.add_base(descriptor.base(), ty.type_ident());
        self.by_name.insert(descriptor.to_string(), descriptor.clone());
        self.known.insert(descriptor, ty);

        let dependencies = match ty.shape() {
            TypeShape::Collection(shape) => alloc::vec![shape.element()],
            TypeShape::Map(shape) => alloc::vec![shape.key(), shape.value()],
            TypeShape::Optional(shape) => alloc::vec![shape.inner()],
            TypeShape::Composite(shape) => shape.fields().iter().map(|f| f.ty()).collect(),
            _ => Vec::new(),
        };
        Some(dependencies)
    }

    #[inline]
    pub fn get(&self, descriptor: &TypeDescriptor) -> Option<TypeRef> {
        self.known.get(descriptor).copied()
    }

    /// Looks a type up by its rendered descriptor, or by its short name when
    /// that is unambiguous.
    pub fn find(&self, name: &str) -> Option<TypeRef> {
        let name = name.trim();
        if let Some(descriptor) = self.by_name.get(name) {
            return self.get(descriptor);
        }
        let path = self.ident_to_path.get(name)?;
        self.by_name.get(*path).and_then(|descriptor| self.get(descriptor))
    }

    /// Maps a written base name to its canonical path.
    pub fn resolve_base(&self, name: &str) -> Option<&'static str> {
        if let Some(path) = self.base_paths.get(name) {
            return Some(*path);
        }
        self.ident_to_path.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.known.keys().map(|descriptor| descriptor.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::TypeUniverse;
    use crate::info::{Configurable, TypeDescriptor, TypeRef};
    use alloc::string::String;
    use alloc::vec::Vec;

    fn add<T: Configurable>(universe: &mut TypeUniverse) {
        universe.insert(TypeRef::of::<T>(), T::descriptor());
    }

    #[test]
    fn short_names_until_ambiguous() {
        let mut universe = TypeUniverse::default();
        add::<String>(&mut universe);
        add::<Vec<i32>>(&mut universe);

        assert_eq!(universe.resolve_base("String"), Some("alloc::string::String"));
        assert_eq!(universe.resolve_base("alloc::vec::Vec"), Some("alloc::vec::Vec"));
        assert!(universe.find("String").unwrap().is::<String>());
        assert!(universe.find("alloc::vec::Vec<i32>").unwrap().is::<Vec<i32>>());

        universe.add_base("other::String", "String");
        assert_eq!(universe.resolve_base("String"), None);
        assert_eq!(universe.resolve_base("other::String"), Some("other::String"));
        assert!(universe.find("alloc::string::String").is_some());
    }

    #[test]
    fn dependencies_are_reported_once() {
        let mut universe = TypeUniverse::default();
        let deps = universe
            .insert(TypeRef::of::<Vec<i32>>(), <Vec<i32>>::descriptor())
            .unwrap();
        assert_eq!(deps, [TypeRef::of::<i32>()]);
        assert!(universe.insert(TypeRef::of::<Vec<i32>>(), <Vec<i32>>::descriptor()).is_none());
        assert_eq!(universe.get(&TypeDescriptor::leaf("i32")), None);
    }
}
