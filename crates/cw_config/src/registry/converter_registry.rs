use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cw_utils::TypeIdMap;
use cw_utils::hash::HashMap;

use crate::convert::{
    CollectionConverter, Converter, ConverterHandle, CustomConverter, MapConverter,
    NativeConverter, ObjectConverter, OptionalConverter, PrimitiveConverter, StringConverter,
    SubclassConverter,
};
use crate::error::{ConfigError, Result};
use crate::fields::FieldInventory;
use crate::info::{CompositeShape, Configurable, ScalarShape, TypeDescriptor, TypeRef, TypeShape};
use crate::registry::SubclassEntry;
use crate::registry::universe::TypeUniverse;

// -----------------------------------------------------------------------------
// ConverterRegistry

/// The process-wide cache of converters, keyed by [`TypeDescriptor`].
///
/// Converters are synthesized on first use from a type's
/// [`shape`](Configurable::shape) and cached forever. Synthesis of a type and
/// all the types it mentions happens in one critical section; a placeholder
/// handle is cached *before* the component converters are resolved, so
/// recursive types resolve to themselves instead of looping. If synthesis
/// fails, every placeholder it inserted is removed again.
///
/// # Examples
///
/// ```
/// use cw_config::ConverterRegistry;
///
/// let registry = ConverterRegistry::new();
///
/// let a = registry.resolve::<Vec<i32>>().unwrap();
/// let b = registry.resolve::<Vec<i32>>().unwrap();
/// assert!(a.ptr_eq(&b));
/// assert_eq!(a.get().unwrap().kind_name(), "collection");
/// ```
pub struct ConverterRegistry {
    state: Mutex<RegistryState>,
}

impl Default for ConverterRegistry {
    /// See [`ConverterRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// A registry without any converter.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// A registry pre-seeded with the converters of the scalar types
    /// (`bool`, `char`, every integer and float, `String`) and aware of the
    /// standard generic containers by name.
    pub fn new() -> Self {
        let registry = Self::empty();
        {
            let mut state = registry.lock();
            state.seed_scalar::<bool>();
            state.seed_scalar::<char>();
            state.seed_scalar::<u8>();
            state.seed_scalar::<u16>();
            state.seed_scalar::<u32>();
            state.seed_scalar::<u64>();
            state.seed_scalar::<u128>();
            state.seed_scalar::<usize>();
            state.seed_scalar::<i8>();
            state.seed_scalar::<i16>();
            state.seed_scalar::<i32>();
            state.seed_scalar::<i64>();
            state.seed_scalar::<i128>();
            state.seed_scalar::<isize>();
            state.seed_scalar::<f32>();
            state.seed_scalar::<f64>();
            state.seed_scalar::<String>();

            state.seed_base::<Vec<bool>>();
            state.seed_base::<alloc::collections::VecDeque<bool>>();
            state.seed_base::<std::collections::HashSet<bool>>();
            state.seed_base::<alloc::collections::BTreeSet<bool>>();
            state.seed_base::<indexmap::IndexSet<bool>>();
            state.seed_base::<std::collections::HashMap<bool, bool>>();
            state.seed_base::<alloc::collections::BTreeMap<bool, bool>>();
            state.seed_base::<indexmap::IndexMap<bool, bool>>();
            state.seed_base::<Option<bool>>();
        }
        registry
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the converter of `T`, synthesizing it on first use.
    ///
    /// # Errors
    ///
    /// Any error raised while building the converters of `T` or of the
    /// types it mentions, see [`FieldInventory::build`].
    #[inline]
    pub fn resolve<T: Configurable>(&self) -> Result<ConverterHandle> {
        self.resolve_ref(TypeRef::of::<T>())
    }

    /// Type-erased [`resolve`](Self::resolve).
    pub fn resolve_ref(&self, ty: TypeRef) -> Result<ConverterHandle> {
        let mut state = self.lock();
        state.transaction(|state, tx| state.resolve(ty, tx))
    }

    /// Resolves a descriptor, which must name a type the registry has seen,
    /// for instance through [`register`](Self::register).
    pub fn resolve_descriptor(&self, descriptor: &TypeDescriptor) -> Result<ConverterHandle> {
        let mut state = self.lock();
        if let Some(handle) = state.converters.get(descriptor) {
            return Ok(handle.clone());
        }
        let ty = state
            .universe
            .get(descriptor)
            .ok_or_else(|| ConfigError::UnresolvedType {
                name: descriptor.to_string(),
            })?;
        state.transaction(|state, tx| state.resolve(ty, tx))
    }

    /// Parses a generic signature against the names this registry knows.
    ///
    /// Both full paths (`alloc::vec::Vec`) and unambiguous short names
    /// (`Vec`) are accepted.
    ///
    /// ```
    /// use cw_config::ConverterRegistry;
    /// use cw_config::info::Configurable;
    /// use std::collections::HashMap;
    ///
    /// let registry = ConverterRegistry::new();
    /// let parsed = registry.parse("HashMap<String, Vec<i32>>").unwrap();
    /// assert_eq!(parsed, <HashMap<String, Vec<i32>>>::descriptor());
    /// ```
    pub fn parse(&self, signature: &str) -> Result<TypeDescriptor> {
        let state = self.lock();
        TypeDescriptor::parse(signature, |name| state.universe.resolve_base(name))
    }

    /// [`parse`](Self::parse), then [`resolve_descriptor`](Self::resolve_descriptor).
    pub fn resolve_signature(&self, signature: &str) -> Result<ConverterHandle> {
        let descriptor = self.parse(signature)?;
        self.resolve_descriptor(&descriptor)
    }

    /// The object converter of a composite type, even when the type itself
    /// is dispatched through a subclass converter.
    pub fn resolve_object(&self, ty: TypeRef) -> Result<ConverterHandle> {
        let mut state = self.lock();
        state.transaction(|state, tx| state.resolve_object(ty, tx))
    }

    /// Makes `T` and every type it mentions known by name, without
    /// synthesizing converters. Returns `false` if `T` was already known.
    pub fn register<T: Configurable>(&self) -> bool {
        self.lock().register_type(TypeRef::of::<T>())
    }

    /// Installs `converter` for `T`. An already cached converter is kept and
    /// `false` is returned.
    pub fn register_converter<T: Configurable>(&self, converter: Converter) -> bool {
        let ty = TypeRef::of::<T>();
        let mut state = self.lock();
        let descriptor = state.descriptor_of(ty);
        if state.converters.contains_key(&descriptor) {
            log::warn!("a converter for `{descriptor}` is already cached, registration ignored");
            return false;
        }
        state.register_type(ty);
        log::debug!("registered {} converter for `{descriptor}`", converter.kind_name());
        let handle = ConverterHandle::ready(descriptor.clone(), converter);
        state.converters.insert(descriptor, handle);
        true
    }

    /// Persists `T` as a single string through `to` and `from`; `T` then
    /// becomes usable as map key and path type.
    pub fn register_string_converter<T: Configurable, E: Display>(
        &self,
        to: impl Fn(&T) -> String + Send + Sync + 'static,
        from: impl Fn(&str) -> core::result::Result<T, E> + Send + Sync + 'static,
    ) -> bool {
        let converter = StringConverter::new(T::descriptor().to_string(), to, from);
        self.register_converter::<T>(Converter::String(converter))
    }

    /// Installs a hand-written converter for `T`.
    pub fn register_custom<T: Configurable>(&self, converter: impl CustomConverter) -> bool {
        self.register_converter::<T>(Converter::Custom(Arc::new(converter)))
    }

    /// Declares `S` as an implementation of the polymorphic type `R`.
    ///
    /// `S` is persisted with `=type` set to its descriptor and, on load,
    /// turned into an `R` through `upcast`. Returns `false` if `S` was
    /// already registered for `R`.
    pub fn register_subclass<R: Configurable, S: Configurable>(&self, upcast: fn(S) -> R) -> bool {
        let mut state = self.lock();
        state.register_type(TypeRef::of::<R>());
        state.register_type(TypeRef::of::<S>());
        let root = state.descriptor_of(TypeRef::of::<R>());
        state.add_subclass(root, SubclassEntry::new(upcast))
    }

    /// Registered implementations of `root`, in registration order.
    pub fn implementations(&self, root: &TypeDescriptor) -> Vec<SubclassEntry> {
        self.lock()
            .subclasses
            .get(root)
            .cloned()
            .unwrap_or_default()
    }

    /// Finds the implementation of `root` named by a `=type` discriminant.
    ///
    /// The full descriptor is matched first, then an unambiguous short name.
    /// The returned errors carry an empty path.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SubclassMismatch`] if `name` is a known type that does not implement `root`.
    /// - [`ConfigError::UnresolvableSubclass`] if `name` is not a known type.
    pub fn subclass_by_name(&self, root: &TypeDescriptor, name: &str) -> Result<SubclassEntry> {
        let state = self.lock();
        let entries = state.subclasses.get(root).map(Vec::as_slice).unwrap_or_default();

        if let Some(entry) = entries.iter().find(|entry| entry.name() == name) {
            return Ok(entry.clone());
        }
        let mut by_ident = entries.iter().filter(|entry| entry.ty().type_ident() == name);
        if let (Some(entry), None) = (by_ident.next(), by_ident.next()) {
            return Ok(entry.clone());
        }

        if state.universe.find(name).is_some() {
            Err(ConfigError::SubclassMismatch {
                declared: root.to_string().into(),
                found: name.to_string(),
                path: String::new(),
            })
        } else {
            Err(ConfigError::UnresolvableSubclass {
                ty: root.to_string().into(),
                path: String::new(),
                name: Some(name.to_string()),
            })
        }
    }

    /// Finds the implementation of `root` whose concrete type is `type_id`.
    pub fn subclass_by_id(&self, root: &TypeDescriptor, type_id: TypeId) -> Option<SubclassEntry> {
        self.lock()
            .subclasses
            .get(root)?
            .iter()
            .find(|entry| entry.ty().type_id() == type_id)
            .cloned()
    }

    /// `true` if a converter for `descriptor` is cached.
    pub fn is_resolved(&self, descriptor: &TypeDescriptor) -> bool {
        self.lock().converters.contains_key(descriptor)
    }

    /// Number of cached converters.
    pub fn len(&self) -> usize {
        self.lock().converters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptors of every type known by name, in no particular order.
    pub fn known_types(&self) -> Vec<String> {
        self.lock().universe.names().collect()
    }

    /// Runs every registration submitted by `#[config(auto_register)]` and
    /// `#[config(implements = Trait)]`.
    ///
    /// Returns the number of registrations run. Always `0` without the
    /// `auto_register` feature.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&self) -> usize {
        #[cfg(feature = "auto_register")]
        {
            let mut count = 0;
            for registration in inventory::iter::<crate::registry::AutoRegistration> {
                (registration.0)(self);
                count += 1;
            }
            log::debug!("ran {count} automatic registrations");
            count
        }
        #[cfg(not(feature = "auto_register"))]
        {
            0
        }
    }
}

// -----------------------------------------------------------------------------
// RegistryState

#[derive(Default)]
struct RegistryState {
    converters: HashMap<TypeDescriptor, ConverterHandle>,
    /// Object converters of composites dispatched through a subclass converter.
    objects: HashMap<TypeDescriptor, ConverterHandle>,
    descriptors: TypeIdMap<TypeDescriptor>,
    universe: TypeUniverse,
    subclasses: HashMap<TypeDescriptor, Vec<SubclassEntry>>,
}

/// Placeholders inserted by one top-level resolution.
#[derive(Default)]
struct Transaction {
    converters: Vec<TypeDescriptor>,
    objects: Vec<TypeDescriptor>,
}

impl RegistryState {
    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut Transaction) -> Result<T>,
    ) -> Result<T> {
        let mut tx = Transaction::default();
        let result = f(self, &mut tx);
        if let Err(err) = &result {
            log::debug!("rolling back {} placeholders: {err}", tx.converters.len() + tx.objects.len());
            for descriptor in tx.converters {
                self.converters.remove(&descriptor);
            }
            for descriptor in tx.objects {
                self.objects.remove(&descriptor);
            }
        }
        result
    }

    fn descriptor_of(&mut self, ty: TypeRef) -> TypeDescriptor {
        self.descriptors
            .get_or_insert(ty.type_id(), || ty.descriptor())
            .clone()
    }

    fn register_type(&mut self, ty: TypeRef) -> bool {
        let descriptor = self.descriptor_of(ty);
        let Some(dependencies) = self.universe.insert(ty, descriptor) else {
            return false;
        };
        for dependency in dependencies {
            self.register_type(dependency);
        }
        true
    }

    fn seed_scalar<T: Configurable>(&mut self) {
        let ty = TypeRef::of::<T>();
        if let TypeShape::Scalar(shape) = T::shape() {
            let descriptor = self.descriptor_of(ty);
            self.register_type(ty);
            let converter = scalar_converter(descriptor.to_string().into(), shape);
            self.converters
                .insert(descriptor.clone(), ConverterHandle::ready(descriptor, converter));
        }
    }

    fn seed_base<T: Configurable>(&mut self) {
        self.universe.add_base(T::type_path(), T::type_ident());
    }

    fn resolve(&mut self, ty: TypeRef, tx: &mut Transaction) -> Result<ConverterHandle> {
        let descriptor = self.descriptor_of(ty);
        if let Some(handle) = self.converters.get(&descriptor) {
            return Ok(handle.clone());
        }

        self.register_type(ty);
        let handle = ConverterHandle::pending(descriptor.clone());
        self.converters.insert(descriptor.clone(), handle.clone());
        tx.converters.push(descriptor.clone());

        let converter = self.synthesize(ty, &descriptor, tx)?;
        log::debug!("synthesized {} converter for `{descriptor}`", converter.kind_name());
        handle.fill(converter);
        Ok(handle)
    }

    /// The decision table: enum, collection, map, subclass, object, then
    /// the leaf kinds.
    fn synthesize(
        &mut self,
        ty: TypeRef,
        descriptor: &TypeDescriptor,
        tx: &mut Transaction,
    ) -> Result<Converter> {
        let name: Cow<'static, str> = descriptor.to_string().into();
        let converter = match ty.shape() {
            TypeShape::Enum(shape) => Converter::String(StringConverter::for_enum(name, shape)),
            TypeShape::Collection(shape) => {
                let element = self.resolve(shape.element(), tx)?;
                Converter::Collection(CollectionConverter::new(name, shape, element))
            }
            TypeShape::Map(shape) => {
                let key = self.resolve(shape.key(), tx)?;
                if !key.get().is_some_and(Converter::is_string_convertible) {
                    return Err(ConfigError::NoStringConverter {
                        ty: key.descriptor().to_string().into(),
                    });
                }
                let value = self.resolve(shape.value(), tx)?;
                Converter::Map(MapConverter::new(name, shape, key, value))
            }
            TypeShape::Composite(shape) if shape.is_subclassable() => {
                self.add_subclass(descriptor.clone(), SubclassEntry::identity(ty));
                Converter::Subclass(SubclassConverter::new(descriptor.clone(), |value| Some(value)))
            }
            TypeShape::Polymorphic(shape) => {
                Converter::Subclass(SubclassConverter::new(descriptor.clone(), shape.concrete_fn()))
            }
            TypeShape::Composite(shape) => {
                Converter::Object(self.build_object(descriptor, shape, tx)?)
            }
            TypeShape::Scalar(shape) => scalar_converter(name, shape),
            TypeShape::Optional(shape) => {
                let inner = self.resolve(shape.inner(), tx)?;
                Converter::Optional(OptionalConverter::new(name, shape, inner))
            }
            TypeShape::Native(shape) => Converter::Native(NativeConverter::new(name, shape)),
        };
        Ok(converter)
    }

    fn build_object(
        &mut self,
        descriptor: &TypeDescriptor,
        shape: CompositeShape,
        tx: &mut Transaction,
    ) -> Result<ObjectConverter> {
        let inventory = FieldInventory::build(descriptor, shape, |field| self.resolve(field, tx))?;
        Ok(ObjectConverter::new(inventory))
    }

    fn resolve_object(&mut self, ty: TypeRef, tx: &mut Transaction) -> Result<ConverterHandle> {
        let descriptor = self.descriptor_of(ty);
        if let Some(handle) = self.converters.get(&descriptor)
            && matches!(handle.get(), Some(Converter::Object(_)))
        {
            return Ok(handle.clone());
        }
        if let Some(handle) = self.objects.get(&descriptor) {
            return Ok(handle.clone());
        }

        let TypeShape::Composite(shape) = ty.shape() else {
            return Err(ConfigError::NotComposite {
                ty: descriptor.to_string().into(),
            });
        };

        self.register_type(ty);
        let handle = ConverterHandle::pending(descriptor.clone());
        self.objects.insert(descriptor.clone(), handle.clone());
        tx.objects.push(descriptor.clone());

        let object = self.build_object(&descriptor, shape, tx)?;
        log::debug!("synthesized implementation converter for `{descriptor}`");
        handle.fill(Converter::Object(object));
        Ok(handle)
    }

    fn add_subclass(&mut self, root: TypeDescriptor, entry: SubclassEntry) -> bool {
        let entries = self.subclasses.entry(root).or_default();
        if entries.iter().any(|existing| existing.ty() == entry.ty()) {
            return false;
        }
        log::debug!("registered implementation `{}`", entry.name());
        entries.push(entry);
        true
    }
}

fn scalar_converter(name: Cow<'static, str>, shape: ScalarShape) -> Converter {
    if shape.is_textual() {
        Converter::String(StringConverter::for_scalar(name, shape))
    } else {
        Converter::Primitive(PrimitiveConverter::new(name, shape))
    }
}

#[cfg(test)]
mod tests {
    use super::ConverterRegistry;
    use crate::convert::Converter;
    use crate::error::ConfigError;
    use crate::info::{
        CompositeShape, Configurable, Constructor, FieldAccess, FieldInfo, ParamInfo, TypeShape,
    };
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::Any;
    use std::collections::HashMap;

    struct Mismatched {
        a: i32,
    }

    impl Configurable for Mismatched {
        fn type_path() -> &'static str {
            "tests::Mismatched"
        }

        fn shape() -> TypeShape {
            TypeShape::Composite(
                CompositeShape::record(Constructor::new(
                    alloc::vec![ParamInfo::new::<String>()],
                    |_| None,
                ))
                .with_field(FieldInfo::new::<i32>(
                    "a",
                    FieldAccess::new(
                        |owner| Some(&owner.downcast_ref::<Mismatched>()?.a as &dyn Any),
                        |owner| Some(&mut owner.downcast_mut::<Mismatched>()?.a as &mut dyn Any),
                        |_, _| false,
                    ),
                )),
            )
        }
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConverterRegistry>();
    }

    #[test]
    fn converters_are_cached() {
        let registry = ConverterRegistry::new();
        let seeded = registry.len();

        let a = registry.resolve::<Vec<i32>>().unwrap();
        let b = registry.resolve::<Vec<i32>>().unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(registry.len(), seeded + 1);

        let Some(Converter::Collection(collection)) = a.get() else {
            panic!("expected a collection converter");
        };
        assert!(collection.element().ptr_eq(&registry.resolve::<i32>().unwrap()));
    }

    #[test]
    fn seeded_kinds() {
        let registry = ConverterRegistry::new();
        let kind = |handle: crate::convert::ConverterHandle| handle.get().unwrap().kind_name();
        assert_eq!(kind(registry.resolve::<String>().unwrap()), "string");
        assert_eq!(kind(registry.resolve::<char>().unwrap()), "string");
        assert_eq!(kind(registry.resolve::<u64>().unwrap()), "primitive");
        assert_eq!(kind(registry.resolve::<Option<bool>>().unwrap()), "optional");
        assert_eq!(kind(registry.resolve::<HashMap<String, f64>>().unwrap()), "map");
        assert_eq!(kind(registry.resolve::<crate::store::Node>().unwrap()), "native");
    }

    #[test]
    fn map_keys_need_a_string_converter() {
        let registry = ConverterRegistry::new();
        let err = registry.resolve::<HashMap<Vec<i32>, i32>>().unwrap_err();
        assert!(matches!(err, ConfigError::NoStringConverter { .. }));

        // Everything synthesized for the failed map is rolled back.
        assert!(!registry.is_resolved(&<Vec<i32>>::descriptor()));
        assert!(!registry.is_resolved(&<HashMap<Vec<i32>, i32>>::descriptor()));
    }

    #[test]
    fn constructor_must_match_fields() {
        let registry = ConverterRegistry::new();
        let err = registry.resolve::<Mismatched>().unwrap_err();
        assert!(matches!(err, ConfigError::NoMatchingConstructor { .. }));
        assert!(!registry.is_resolved(&Mismatched::descriptor()));
    }

    #[test]
    fn late_registration_is_shadowed() {
        let registry = ConverterRegistry::new();
        assert!(!registry.register_string_converter::<i32, core::num::ParseIntError>(
            |v| v.to_string(),
            |text| text.parse(),
        ));
        assert_eq!(registry.resolve::<i32>().unwrap().get().unwrap().kind_name(), "primitive");
    }

    #[test]
    fn parse_and_resolve_signatures() {
        let registry = ConverterRegistry::new();
        let descriptor = registry.parse("HashMap<String, Vec<i32>>").unwrap();
        assert_eq!(descriptor, <HashMap<String, Vec<i32>>>::descriptor());

        let err = registry.resolve_signature("HashMap<String, Vec<i32>>").unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvedType { .. }));

        assert!(registry.register::<HashMap<String, Vec<i32>>>());
        let handle = registry.resolve_signature("HashMap<String, Vec<i32>>").unwrap();
        assert_eq!(handle.descriptor(), &descriptor);

        assert!(registry.parse("Unknown<i32>").is_err());
        assert!(registry.parse("Vec<i32").is_err());
    }

    #[cfg(feature = "derive")]
    mod derived {
        use super::ConverterRegistry;
        use crate::convert::Converter;
        use crate::derive::Config;
        use crate::error::ConfigError;
        use crate::info::Configurable;
        use alloc::string::String;
        use alloc::vec::Vec;

        #[derive(Config, Default)]
        struct Tree {
            label: String,
            children: Vec<Tree>,
        }

        #[derive(Config, Default)]
        #[config(subclassable)]
        struct Base {
            id: u32,
        }

        #[derive(Config)]
        #[config(record, post_init = check)]
        struct Checked {
            value: i32,
        }

        impl Checked {
            fn check(&mut self) {}
        }

        #[derive(Config)]
        #[config(no_default)]
        struct Unbuildable {
            value: i32,
        }

        #[test]
        fn recursive_types_resolve_to_themselves() {
            let registry = ConverterRegistry::new();
            let tree = registry.resolve::<Tree>().unwrap();
            let children = registry.resolve::<Vec<Tree>>().unwrap();

            let Some(Converter::Collection(collection)) = children.get() else {
                panic!("expected a collection converter");
            };
            assert!(collection.element().ptr_eq(&tree));

            let object = tree.get().and_then(Converter::as_object).unwrap();
            assert!(object.inventory().slot("children").unwrap().converter().ptr_eq(&children));
        }

        #[test]
        fn subclassable_composites_dispatch() {
            let registry = ConverterRegistry::new();
            let handle = registry.resolve::<Base>().unwrap();
            assert_eq!(handle.get().unwrap().kind_name(), "subclass");

            let object = registry.resolve_ref(crate::info::TypeRef::of::<Base>()).unwrap();
            assert!(object.ptr_eq(&handle));
            let own = registry.resolve_object(crate::info::TypeRef::of::<Base>()).unwrap();
            assert!(own.get().unwrap().as_object().is_some());

            let root = Base::descriptor();
            let by_name = registry.subclass_by_name(&root, &root.to_string()).unwrap();
            assert!(by_name.ty().is::<Base>());
            assert!(registry.subclass_by_name(&root, "Base").is_ok());
        }

        #[test]
        fn unknown_discriminants() {
            let registry = ConverterRegistry::new();
            registry.resolve::<Base>().unwrap();
            let root = Base::descriptor();

            let err = registry.subclass_by_name(&root, "Nowhere").unwrap_err();
            assert!(matches!(err, ConfigError::UnresolvableSubclass { name: Some(_), .. }));

            let err = registry.subclass_by_name(&root, "alloc::string::String").unwrap_err();
            assert!(matches!(err, ConfigError::SubclassMismatch { .. }));
        }

        #[test]
        fn record_hooks_are_rejected() {
            let registry = ConverterRegistry::new();
            let err = registry.resolve::<Checked>().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidHookSignature { hook: "check", .. }));
        }

        #[test]
        fn missing_zero_arg_constructor() {
            let registry = ConverterRegistry::new();
            let err = registry.resolve::<Unbuildable>().unwrap_err();
            assert!(matches!(err, ConfigError::NoZeroArgConstructor { .. }));
        }
    }
}
