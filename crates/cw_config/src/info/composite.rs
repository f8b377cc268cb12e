use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::info::{Configurable, TypeRef};

// -----------------------------------------------------------------------------
// FieldRole

/// How a declared field takes part in persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Persisted under its own key.
    Value,
    /// Not persisted; receives the document path (or map key) of its owner.
    Path,
    /// Persisted in the owner's section, as if declared on the owner.
    Flatten,
    /// Neither persisted nor injected.
    Transient,
}

// -----------------------------------------------------------------------------
// FieldAccess

/// Type-erased accessors for one field.
///
/// Every accessor returns `None`/`false` when handed a value of another type.
#[derive(Clone, Copy)]
pub struct FieldAccess {
    get: fn(&dyn Any) -> Option<&dyn Any>,
    get_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
    set: fn(&mut dyn Any, Box<dyn Any>) -> bool,
}

impl FieldAccess {
    pub const fn new(
        get: fn(&dyn Any) -> Option<&dyn Any>,
        get_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
        set: fn(&mut dyn Any, Box<dyn Any>) -> bool,
    ) -> Self {
        Self { get, get_mut, set }
    }

    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(owner)
    }

    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.get_mut)(owner)
    }

    #[inline]
    pub fn set(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> bool {
        (self.set)(owner, value)
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// A declared field, in declaration order.
#[derive(Clone)]
pub struct FieldInfo {
    member: &'static str,
    rename: Option<&'static str>,
    comments: Vec<&'static str>,
    ty: TypeRef,
    role: FieldRole,
    access: FieldAccess,
    default: Option<fn() -> Box<dyn Any>>,
}

impl FieldInfo {
    pub fn new<F: Configurable>(member: &'static str, access: FieldAccess) -> Self {
        Self {
            member,
            rename: None,
            comments: Vec::new(),
            ty: TypeRef::of::<F>(),
            role: FieldRole::Value,
            access,
            default: None,
        }
    }

    /// Persist under `name` instead of the member name.
    pub fn with_rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    pub fn with_comment(mut self, line: &'static str) -> Self {
        self.comments.push(line);
        self
    }

    pub fn with_role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }

    /// Value used when a constructor-built owner finds no stored value.
    pub fn with_default(mut self, default: fn() -> Box<dyn Any>) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub fn member(&self) -> &'static str {
        self.member
    }

    /// Key under which the field is persisted.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.rename.unwrap_or(self.member)
    }

    #[inline]
    pub fn rename(&self) -> Option<&'static str> {
        self.rename
    }

    #[inline]
    pub fn comments(&self) -> &[&'static str] {
        &self.comments
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn role(&self) -> FieldRole {
        self.role
    }

    #[inline]
    pub fn access(&self) -> FieldAccess {
        self.access
    }

    #[inline]
    pub fn default_fn(&self) -> Option<fn() -> Box<dyn Any>> {
        self.default
    }
}

// -----------------------------------------------------------------------------
// Constructor

/// One constructor parameter. Matched positionally against persisted fields.
#[derive(Clone)]
pub struct ParamInfo {
    type_id: TypeId,
    path: bool,
    rename: Option<&'static str>,
    comments: Vec<&'static str>,
}

impl ParamInfo {
    pub fn new<T: Configurable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            path: false,
            rename: None,
            comments: Vec::new(),
        }
    }

    /// Marks the parameter as receiving the owner's document path.
    pub fn path(mut self) -> Self {
        self.path = true;
        self
    }

    pub fn with_rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    pub fn with_comment(mut self, line: &'static str) -> Self {
        self.comments.push(line);
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        self.path
    }

    #[inline]
    pub fn rename(&self) -> Option<&'static str> {
        self.rename
    }

    #[inline]
    pub fn comments(&self) -> &[&'static str] {
        &self.comments
    }
}

/// Builds a value from one argument per persisted field, in field order.
#[derive(Clone)]
pub struct Constructor {
    params: Vec<ParamInfo>,
    build: BuildFn,
}

/// Takes one value per parameter, in order.
pub type BuildFn = fn(Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>;

impl Constructor {
    pub fn new(params: Vec<ParamInfo>, build: BuildFn) -> Self {
        Self { params, build }
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    #[inline]
    pub fn build_fn(&self) -> BuildFn {
        self.build
    }
}

// -----------------------------------------------------------------------------
// Construction

/// How new instances come into existence.
#[derive(Clone)]
pub enum Construction {
    /// Immutable aggregate, only buildable through its canonical constructor.
    Record(Constructor),
    /// Mutable aggregate: an explicit constructor is preferred, otherwise an
    /// empty instance is created and its fields assigned one by one.
    Populate {
        empty: Option<fn() -> Box<dyn Any>>,
        constructor: Option<Constructor>,
    },
}

// -----------------------------------------------------------------------------
// PostInit

/// Zero-argument instance hook run after every load.
#[derive(Clone, Copy)]
pub struct PostInit {
    name: &'static str,
    call: fn(&mut dyn Any) -> bool,
}

impl PostInit {
    pub const fn new(name: &'static str, call: fn(&mut dyn Any) -> bool) -> Self {
        Self { name, call }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `false` if `target` has another type.
    #[inline]
    pub fn call(&self, target: &mut dyn Any) -> bool {
        (self.call)(target)
    }
}

impl core::fmt::Debug for PostInit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("PostInit").field(&self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// CompositeShape

/// The fields and construction strategy of a struct.
///
/// # Examples
///
/// ```
/// use std::any::Any;
/// use cw_config::info::{CompositeShape, FieldAccess, FieldInfo};
///
/// #[derive(Default)]
/// struct Point { x: i32 }
///
/// let shape = CompositeShape::populate(|| Box::new(Point::default()))
///     .with_field(FieldInfo::new::<i32>("x", FieldAccess::new(
///         |v| v.downcast_ref::<Point>().map(|p| &p.x as &dyn Any),
///         |v| v.downcast_mut::<Point>().map(|p| &mut p.x as &mut dyn Any),
///         |v, x| match (v.downcast_mut::<Point>(), x.downcast::<i32>()) {
///             (Some(p), Ok(x)) => { p.x = *x; true }
///             _ => false,
///         },
///     )));
///
/// assert_eq!(shape.fields().len(), 1);
/// assert!(!shape.is_subclassable());
/// ```
#[derive(Clone)]
pub struct CompositeShape {
    fields: Vec<FieldInfo>,
    construction: Construction,
    subclassable: bool,
    post_init: Option<PostInit>,
}

impl CompositeShape {
    pub fn new(construction: Construction) -> Self {
        Self {
            fields: Vec::new(),
            construction,
            subclassable: false,
            post_init: None,
        }
    }

    /// A mutable aggregate with a zero-argument constructor.
    pub fn populate(empty: fn() -> Box<dyn Any>) -> Self {
        Self::new(Construction::Populate {
            empty: Some(empty),
            constructor: None,
        })
    }

    pub fn record(constructor: Constructor) -> Self {
        Self::new(Construction::Record(constructor))
    }

    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an explicit constructor, or replaces the record constructor.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        match &mut self.construction {
            Construction::Record(ctor) => *ctor = constructor,
            Construction::Populate { constructor: ctor, .. } => *ctor = Some(constructor),
        }
        self
    }

    /// Values of this type are persisted with a `=type` discriminant and may
    /// be replaced by registered implementations.
    pub fn subclassable(mut self) -> Self {
        self.subclassable = true;
        self
    }

    pub fn with_post_init(mut self, hook: PostInit) -> Self {
        self.post_init = Some(hook);
        self
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn construction(&self) -> &Construction {
        &self.construction
    }

    #[inline]
    pub fn is_subclassable(&self) -> bool {
        self.subclassable
    }

    #[inline]
    pub fn post_init(&self) -> Option<PostInit> {
        self.post_init
    }

    pub(crate) fn into_parts(self) -> (Vec<FieldInfo>, Construction, Option<PostInit>) {
        (self.fields, self.construction, self.post_init)
    }
}
