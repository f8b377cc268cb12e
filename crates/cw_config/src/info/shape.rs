use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::info::{CompositeShape, Configurable, TypeRef};
use crate::store::{Node, Value};

// -----------------------------------------------------------------------------
// TypeShape

/// The layout of a [`Configurable`] type, as seen by converter synthesis.
pub enum TypeShape {
    /// A single document value, see [`Scalar`].
    Scalar(ScalarShape),
    /// A closed set of unit cases, persisted by name.
    Enum(EnumShape),
    /// A homogeneous sequence.
    Collection(CollectionShape),
    /// A string-keyed mapping.
    Map(MapShape),
    /// A value that may be absent.
    Optional(OptionalShape),
    /// A struct whose fields are persisted as a section.
    Composite(CompositeShape),
    /// An open set of implementations behind a trait object.
    Polymorphic(PolymorphicShape),
    /// A type the document store holds natively, as a whole [`Node`].
    Native(NativeShape),
}

impl TypeShape {
    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Enum(_) => "enum",
            Self::Collection(_) => "collection",
            Self::Map(_) => "map",
            Self::Optional(_) => "optional",
            Self::Composite(_) => "composite",
            Self::Polymorphic(_) => "polymorphic",
            Self::Native(_) => "native",
        }
    }

    #[inline]
    pub fn as_composite(&self) -> Option<&CompositeShape> {
        match self {
            Self::Composite(shape) => Some(shape),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeShape::{}", self.kind_name())
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// A type stored as one document [`Value`].
///
/// `TEXTUAL` scalars are persisted as strings and may be used as map keys
/// through a string converter; the others are persisted with their native
/// document kind. Every scalar still offers a textual form so that map keys
/// and path slots can use it.
pub trait Scalar: Sized + 'static {
    const TEXTUAL: bool = false;

    fn to_value(&self) -> Value;

    /// Returns `None` if the value has the wrong kind or is out of range.
    fn from_value(value: &Value) -> Option<Self>;

    fn to_text(&self) -> String;

    fn from_text(text: &str) -> Option<Self>;
}

#[derive(Clone, Copy)]
pub struct ScalarShape {
    textual: bool,
    to_value: fn(&dyn Any) -> Option<Value>,
    from_value: fn(&Value) -> Option<Box<dyn Any>>,
    to_text: fn(&dyn Any) -> Option<String>,
    from_text: fn(&str) -> Option<Box<dyn Any>>,
}

impl ScalarShape {
    pub fn of<T: Scalar>() -> Self {
        fn to_value<T: Scalar>(value: &dyn Any) -> Option<Value> {
            value.downcast_ref::<T>().map(T::to_value)
        }
        fn from_value<T: Scalar>(value: &Value) -> Option<Box<dyn Any>> {
            T::from_value(value).map(|v| Box::new(v) as Box<dyn Any>)
        }
        fn to_text<T: Scalar>(value: &dyn Any) -> Option<String> {
            value.downcast_ref::<T>().map(T::to_text)
        }
        fn from_text<T: Scalar>(text: &str) -> Option<Box<dyn Any>> {
            T::from_text(text).map(|v| Box::new(v) as Box<dyn Any>)
        }

        Self {
            textual: T::TEXTUAL,
            to_value: to_value::<T>,
            from_value: from_value::<T>,
            to_text: to_text::<T>,
            from_text: from_text::<T>,
        }
    }

    #[inline]
    pub fn is_textual(&self) -> bool {
        self.textual
    }

    #[inline]
    pub fn to_value(&self, value: &dyn Any) -> Option<Value> {
        (self.to_value)(value)
    }

    #[inline]
    pub fn from_value(&self, value: &Value) -> Option<Box<dyn Any>> {
        (self.from_value)(value)
    }

    #[inline]
    pub fn to_text(&self, value: &dyn Any) -> Option<String> {
        (self.to_text)(value)
    }

    #[inline]
    pub fn from_text(&self, text: &str) -> Option<Box<dyn Any>> {
        (self.from_text)(text)
    }
}

// -----------------------------------------------------------------------------
// Enum

/// Unit-only enumeration, persisted by case name.
#[derive(Clone, Copy)]
pub struct EnumShape {
    variants: &'static [&'static str],
    index_of: fn(&dyn Any) -> Option<usize>,
    from_index: fn(usize) -> Option<Box<dyn Any>>,
}

impl EnumShape {
    /// `variants[i]` is the persisted name of the case whose index is `i`.
    pub const fn new(
        variants: &'static [&'static str],
        index_of: fn(&dyn Any) -> Option<usize>,
        from_index: fn(usize) -> Option<Box<dyn Any>>,
    ) -> Self {
        Self {
            variants,
            index_of,
            from_index,
        }
    }

    #[inline]
    pub fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    pub fn name_of(&self, value: &dyn Any) -> Option<&'static str> {
        (self.index_of)(value).and_then(|index| self.variants.get(index).copied())
    }

    pub fn from_name(&self, name: &str) -> Option<Box<dyn Any>> {
        let index = self.variants.iter().position(|v| *v == name)?;
        (self.from_index)(index)
    }
}

// -----------------------------------------------------------------------------
// Collection

/// Which family a collection belongs to. Persisted identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    Queue,
}

/// Homogeneous containers filled one element at a time.
pub trait ListLike: Default + 'static {
    type Item: Configurable;

    const KIND: CollectionKind;

    fn clear(&mut self);

    fn push(&mut self, item: Self::Item);

    fn items(&self) -> impl Iterator<Item = &Self::Item>;
}

#[derive(Clone, Copy)]
pub struct CollectionShape {
    kind: CollectionKind,
    element: TypeRef,
    new: fn() -> Box<dyn Any>,
    clear: fn(&mut dyn Any) -> bool,
    push: fn(&mut dyn Any, Box<dyn Any>) -> bool,
    items: fn(&dyn Any) -> Option<Vec<&dyn Any>>,
}

impl CollectionShape {
    pub fn of<C: ListLike>() -> Self {
        fn new<C: ListLike>() -> Box<dyn Any> {
            Box::new(C::default())
        }
        fn clear<C: ListLike>(target: &mut dyn Any) -> bool {
            target.downcast_mut::<C>().map(C::clear).is_some()
        }
        fn push<C: ListLike>(target: &mut dyn Any, item: Box<dyn Any>) -> bool {
            match (target.downcast_mut::<C>(), item.downcast::<C::Item>()) {
                (Some(target), Ok(item)) => {
                    target.push(*item);
                    true
                }
                _ => false,
            }
        }
        fn items<C: ListLike>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let value = value.downcast_ref::<C>()?;
            Some(value.items().map(|item| item as &dyn Any).collect())
        }

        Self {
            kind: C::KIND,
            element: TypeRef::of::<C::Item>(),
            new: new::<C>,
            clear: clear::<C>,
            push: push::<C>,
            items: items::<C>,
        }
    }

    #[inline]
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    #[inline]
    pub fn element(&self) -> TypeRef {
        self.element
    }

    #[inline]
    pub fn create(&self) -> Box<dyn Any> {
        (self.new)()
    }

    /// Empties `target`, returning `false` if it has another type.
    #[inline]
    pub fn clear(&self, target: &mut dyn Any) -> bool {
        (self.clear)(target)
    }

    #[inline]
    pub fn push(&self, target: &mut dyn Any, item: Box<dyn Any>) -> bool {
        (self.push)(target, item)
    }

    /// Iteration order of the underlying container.
    #[inline]
    pub fn items<'a>(&self, value: &'a dyn Any) -> Option<Vec<&'a dyn Any>> {
        (self.items)(value)
    }
}

// -----------------------------------------------------------------------------
// Map

/// Key/value containers. Keys are persisted through their textual form.
pub trait MapLike: Default + 'static {
    type Key: Configurable;
    type Value: Configurable;

    fn clear(&mut self);

    fn insert(&mut self, key: Self::Key, value: Self::Value);

    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;
}

type Entries<'a> = Vec<(&'a dyn Any, &'a dyn Any)>;

#[derive(Clone, Copy)]
pub struct MapShape {
    key: TypeRef,
    value: TypeRef,
    new: fn() -> Box<dyn Any>,
    clear: fn(&mut dyn Any) -> bool,
    insert: fn(&mut dyn Any, Box<dyn Any>, Box<dyn Any>) -> bool,
    entries: fn(&dyn Any) -> Option<Entries<'_>>,
}

impl MapShape {
    pub fn of<M: MapLike>() -> Self {
        fn new<M: MapLike>() -> Box<dyn Any> {
            Box::new(M::default())
        }
        fn clear<M: MapLike>(target: &mut dyn Any) -> bool {
            target.downcast_mut::<M>().map(M::clear).is_some()
        }
        fn insert<M: MapLike>(target: &mut dyn Any, key: Box<dyn Any>, value: Box<dyn Any>) -> bool {
            let target = target.downcast_mut::<M>();
            match (target, key.downcast::<M::Key>(), value.downcast::<M::Value>()) {
                (Some(target), Ok(key), Ok(value)) => {
                    target.insert(*key, *value);
                    true
                }
                _ => false,
            }
        }
        fn entries<M: MapLike>(value: &dyn Any) -> Option<Entries<'_>> {
            let value = value.downcast_ref::<M>()?;
            Some(
                value
                    .entries()
                    .map(|(k, v)| (k as &dyn Any, v as &dyn Any))
                    .collect(),
            )
        }

        Self {
            key: TypeRef::of::<M::Key>(),
            value: TypeRef::of::<M::Value>(),
            new: new::<M>,
            clear: clear::<M>,
            insert: insert::<M>,
            entries: entries::<M>,
        }
    }

    #[inline]
    pub fn key(&self) -> TypeRef {
        self.key
    }

    #[inline]
    pub fn value(&self) -> TypeRef {
        self.value
    }

    #[inline]
    pub fn create(&self) -> Box<dyn Any> {
        (self.new)()
    }

    #[inline]
    pub fn clear(&self, target: &mut dyn Any) -> bool {
        (self.clear)(target)
    }

    #[inline]
    pub fn insert(&self, target: &mut dyn Any, key: Box<dyn Any>, value: Box<dyn Any>) -> bool {
        (self.insert)(target, key, value)
    }

    #[inline]
    pub fn entries<'a>(&self, value: &'a dyn Any) -> Option<Entries<'a>> {
        (self.entries)(value)
    }
}

// -----------------------------------------------------------------------------
// Optional

#[derive(Clone, Copy)]
pub struct OptionalShape {
    inner: TypeRef,
    none: fn() -> Box<dyn Any>,
    wrap: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
    get: fn(&dyn Any) -> Option<Option<&dyn Any>>,
    get_mut: fn(&mut dyn Any) -> Option<Option<&mut dyn Any>>,
}

impl OptionalShape {
    /// Shape of `Option<T>`.
    pub fn of<T: Configurable>() -> Self {
        fn none<T: Configurable>() -> Box<dyn Any> {
            Box::new(None::<T>)
        }
        fn wrap<T: Configurable>(value: Box<dyn Any>) -> Option<Box<dyn Any>> {
            let value = value.downcast::<T>().ok()?;
            Some(Box::new(Some(*value)))
        }
        fn get<T: Configurable>(value: &dyn Any) -> Option<Option<&dyn Any>> {
            let value = value.downcast_ref::<Option<T>>()?;
            Some(value.as_ref().map(|v| v as &dyn Any))
        }
        fn get_mut<T: Configurable>(value: &mut dyn Any) -> Option<Option<&mut dyn Any>> {
            let value = value.downcast_mut::<Option<T>>()?;
            Some(value.as_mut().map(|v| v as &mut dyn Any))
        }

        Self {
            inner: TypeRef::of::<T>(),
            none: none::<T>,
            wrap: wrap::<T>,
            get: get::<T>,
            get_mut: get_mut::<T>,
        }
    }

    #[inline]
    pub fn inner(&self) -> TypeRef {
        self.inner
    }

    #[inline]
    pub fn none_fn(&self) -> fn() -> Box<dyn Any> {
        self.none
    }

    #[inline]
    pub fn wrap(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.wrap)(value)
    }

    /// `None` on type mismatch, `Some(None)` for an absent value.
    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        (self.get)(value)
    }

    #[inline]
    pub fn get_mut<'a>(&self, value: &'a mut dyn Any) -> Option<Option<&'a mut dyn Any>> {
        (self.get_mut)(value)
    }
}

// -----------------------------------------------------------------------------
// Polymorphic

/// A trait object whose implementations are registered at runtime.
///
/// `concrete` unwraps the trait object into the implementation it holds,
/// so that the implementation's own converter can be found by type id.
#[derive(Clone, Copy)]
pub struct PolymorphicShape {
    concrete: fn(&dyn Any) -> Option<&dyn Any>,
}

impl PolymorphicShape {
    pub const fn new(concrete: fn(&dyn Any) -> Option<&dyn Any>) -> Self {
        Self { concrete }
    }

    #[inline]
    pub fn concrete<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.concrete)(value)
    }

    #[inline]
    pub fn concrete_fn(&self) -> fn(&dyn Any) -> Option<&dyn Any> {
        self.concrete
    }
}

// -----------------------------------------------------------------------------
// Native

#[derive(Clone, Copy)]
pub struct NativeShape {
    to_node: fn(&dyn Any) -> Option<Node>,
    from_node: fn(&Node) -> Option<Box<dyn Any>>,
}

impl NativeShape {
    pub fn of<T>() -> Self
    where
        T: Clone + Into<Node> + TryFrom<Node> + 'static,
    {
        fn to_node<T: Clone + Into<Node> + 'static>(value: &dyn Any) -> Option<Node> {
            value.downcast_ref::<T>().map(|v| v.clone().into())
        }
        fn from_node<T: TryFrom<Node> + 'static>(node: &Node) -> Option<Box<dyn Any>> {
            let value = T::try_from(node.clone()).ok()?;
            Some(Box::new(value))
        }

        Self {
            to_node: to_node::<T>,
            from_node: from_node::<T>,
        }
    }

    #[inline]
    pub fn to_node(&self, value: &dyn Any) -> Option<Node> {
        (self.to_node)(value)
    }

    #[inline]
    pub fn from_node(&self, node: &Node) -> Option<Box<dyn Any>> {
        (self.from_node)(node)
    }
}
