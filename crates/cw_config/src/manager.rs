use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::mem;
use std::sync::{PoisonError, RwLock};

use crate::convert::{ConverterHandle, ObjectConverter};
use crate::error::{ConfigError, Result};
use crate::info::{Configurable, TypeRef, TypeShape};
use crate::registry::ConverterRegistry;
use crate::store::{Backend, MemoryBackend, Section};

// -----------------------------------------------------------------------------
// ConfigManager

/// Binds one root object to a document and moves values between the two.
///
/// The root is either an owned value ([`bind_target`](Self::bind_target)) or
/// a static cell ([`bind_static`](Self::bind_static)). Loading merges the
/// document over the bound value; saving writes the bound value into the
/// in-memory document, then hands the document to the backend.
///
/// # Examples
///
/// ```
/// use cw_config::ConfigManager;
/// use cw_config::info::{CompositeShape, Configurable, FieldAccess, FieldInfo, TypeShape};
/// use cw_config::store::{DataHolder, Node, Value};
///
/// #[derive(Default)]
/// struct Settings {
///     port: u16,
/// }
///
/// impl Configurable for Settings {
///     fn type_path() -> &'static str {
///         "demo::Settings"
///     }
///
///     fn shape() -> TypeShape {
///         TypeShape::Composite(
///             CompositeShape::populate(|| Box::new(Settings::default())).with_field(
///                 FieldInfo::new::<u16>(
///                     "port",
///                     FieldAccess::new(
///                         |s| Some(&s.downcast_ref::<Settings>()?.port),
///                         |s| Some(&mut s.downcast_mut::<Settings>()?.port),
///                         |s, v| match (s.downcast_mut::<Settings>(), v.downcast::<u16>()) {
///                             (Some(s), Ok(v)) => { s.port = *v; true }
///                             _ => false,
///                         },
///                     ),
///                 ),
///             ),
///         )
///     }
/// }
///
/// let mut manager = ConfigManager::new();
/// manager.bind_target(Settings { port: 80 }).unwrap();
/// manager.save_all(true).unwrap();
/// assert_eq!(manager.document().get("port"), Some(&Node::Value(Value::Int(80))));
///
/// manager.document_mut().set("port", Node::from(8080_i64));
/// manager.save_all(false).unwrap();
/// manager.reload().unwrap();
/// assert_eq!(manager.target::<Settings>().unwrap().port, 8080);
/// ```
pub struct ConfigManager<B: Backend = MemoryBackend> {
    registry: Arc<ConverterRegistry>,
    backend: B,
    document: Section,
    binding: Option<Binding>,
}

impl ConfigManager {
    /// A manager over an in-memory document.
    #[inline]
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new())
    }
}

impl Default for ConfigManager {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ConfigManager<B> {
    /// A manager with its own registry, after
    /// [`auto_register`](ConverterRegistry::auto_register).
    pub fn with_backend(backend: B) -> Self {
        let registry = ConverterRegistry::new();
        registry.auto_register();
        Self::with_registry(backend, Arc::new(registry))
    }

    /// A manager sharing `registry` with other managers.
    pub fn with_registry(backend: B, registry: Arc<ConverterRegistry>) -> Self {
        Self {
            registry,
            backend,
            document: Section::new(),
            binding: None,
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The in-memory document, as of the last load or save.
    #[inline]
    pub fn document(&self) -> &Section {
        &self.document
    }

    #[inline]
    pub fn document_mut(&mut self) -> &mut Section {
        &mut self.document
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Binds an owned root value.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::AlreadyBound`] if a root is bound already.
    /// - [`ConfigError::NotComposite`] if `T` is not a composite type.
    /// - Any error raised while building the converters of `T`.
    pub fn bind_target<T: Configurable>(&mut self, target: T) -> Result<()> {
        let ty = TypeRef::of::<T>();
        self.prepare_binding(ty)?;
        self.binding = Some(Binding::Target {
            value: Box::new(target),
            ty,
        });
        Ok(())
    }

    /// Binds a static cell as root. Loads replace the cell's content,
    /// saves read it under a shared lock.
    ///
    /// # Errors
    ///
    /// See [`bind_target`](Self::bind_target).
    pub fn bind_static<T>(&mut self, cell: &'static RwLock<T>) -> Result<()>
    where
        T: Configurable + Default + Send + Sync,
    {
        let ty = TypeRef::of::<T>();
        self.prepare_binding(ty)?;
        self.binding = Some(Binding::Static(Box::new(StaticCell(cell))));
        Ok(())
    }

    fn prepare_binding(&self, ty: TypeRef) -> Result<()> {
        if self.binding.is_some() {
            return Err(ConfigError::AlreadyBound);
        }
        if !matches!(ty.shape(), TypeShape::Composite(_)) {
            return Err(ConfigError::NotComposite {
                ty: ty.descriptor().to_string().into(),
            });
        }
        self.registry.resolve_object(ty).map(drop)
    }

    /// The bound owned value, if it is a `T`.
    pub fn target<T: Any>(&self) -> Option<&T> {
        match self.binding.as_ref()? {
            Binding::Target { value, .. } => value.downcast_ref(),
            Binding::Static(_) => None,
        }
    }

    pub fn target_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self.binding.as_mut()? {
            Binding::Target { value, .. } => value.downcast_mut(),
            Binding::Static(_) => None,
        }
    }

    /// Unbinds and returns the owned value, if it is a `T`.
    pub fn into_target<T: Any>(self) -> Option<T> {
        match self.binding? {
            Binding::Target { value, .. } => value.downcast().ok().map(|value| *value),
            Binding::Static(_) => None,
        }
    }

    /// Reads the document from the backend and loads it into the root.
    ///
    /// Keys absent from the document leave the matching fields untouched.
    pub fn load_all(&mut self) -> Result<()> {
        let binding = self.binding.as_mut().ok_or(ConfigError::NotBound)?;
        self.document = self.backend.read()?;

        let handle = self.registry.resolve_object(binding.ty())?;
        let object = object_of(&handle)?;
        let (registry, document) = (&*self.registry, &self.document);
        binding.with_mut(&mut |value| object.load_into(registry, document, "", value))
    }

    /// Writes the root into the document, then the document to the backend.
    ///
    /// Without `overwrite`, keys already present in the document are kept.
    pub fn save_all(&mut self, overwrite: bool) -> Result<()> {
        let binding = self.binding.as_ref().ok_or(ConfigError::NotBound)?;

        let handle = self.registry.resolve_object(binding.ty())?;
        let object = object_of(&handle)?;
        let (registry, document) = (&*self.registry, &mut self.document);
        binding.with_ref(&mut |value| object.save_section(registry, value, document, overwrite))?;

        self.backend.write(&self.document)
    }

    /// Seeds the stored document with the root's values for every key it
    /// does not have yet, leaving the other keys alone.
    pub fn save_defaults(&mut self) -> Result<()> {
        self.document = self.backend.read()?;
        self.save_all(false)
    }

    /// [`load_all`](Self::load_all), after the document changed on the backend.
    pub fn reload(&mut self) -> Result<()> {
        let ty = self.binding.as_ref().ok_or(ConfigError::NotBound)?.ty();
        log::info!("reloading configuration of `{}`", ty.descriptor());
        self.load_all()
    }
}

impl<B: Backend + fmt::Debug> fmt::Debug for ConfigManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("backend", &self.backend)
            .field("document", &self.document)
            .field("bound", &self.binding.as_ref().map(|b| b.ty().descriptor()))
            .finish()
    }
}

fn object_of(handle: &ConverterHandle) -> Result<&ObjectConverter> {
    handle
        .converter()?
        .as_object()
        .ok_or_else(|| ConfigError::NotComposite {
            ty: handle.descriptor().to_string().into(),
        })
}

// -----------------------------------------------------------------------------
// Binding

enum Binding {
    Target { value: Box<dyn Any>, ty: TypeRef },
    Static(Box<dyn StaticRoot>),
}

type LoadFn<'a> = dyn FnMut(&mut Box<dyn Any>) -> Result<()> + 'a;
type SaveFn<'a> = dyn FnMut(&dyn Any) -> Result<()> + 'a;

impl Binding {
    fn ty(&self) -> TypeRef {
        match self {
            Self::Target { ty, .. } => *ty,
            Self::Static(cell) => cell.ty(),
        }
    }

    fn with_mut(&mut self, f: &mut LoadFn<'_>) -> Result<()> {
        match self {
            Self::Target { value, .. } => f(value),
            Self::Static(cell) => cell.with_mut(f),
        }
    }

    fn with_ref(&self, f: &mut SaveFn<'_>) -> Result<()> {
        match self {
            Self::Target { value, .. } => f(&**value),
            Self::Static(cell) => cell.with_ref(f),
        }
    }
}

trait StaticRoot {
    fn ty(&self) -> TypeRef;

    fn with_mut(&self, f: &mut LoadFn<'_>) -> Result<()>;

    fn with_ref(&self, f: &mut SaveFn<'_>) -> Result<()>;
}

struct StaticCell<T: 'static>(&'static RwLock<T>);

impl<T: Configurable + Default + Send + Sync> StaticRoot for StaticCell<T> {
    fn ty(&self) -> TypeRef {
        TypeRef::of::<T>()
    }

    fn with_mut(&self, f: &mut LoadFn<'_>) -> Result<()> {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let mut value: Box<dyn Any> = Box::new(mem::take(&mut *guard));
        let result = f(&mut value);
        match value.downcast::<T>() {
            Ok(value) => {
                *guard = *value;
                result
            }
            Err(_) => Err(ConfigError::TypeMismatch {
                expected: T::descriptor().to_string().into(),
            }),
        }
    }

    fn with_ref(&self, f: &mut SaveFn<'_>) -> Result<()> {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }
}

#[cfg(all(test, feature = "derive"))]
mod tests {
    use super::ConfigManager;
    use crate::derive::Config;
    use crate::error::ConfigError;
    use crate::store::{Backend, DataHolder, MemoryBackend, Node, Section};
    use alloc::string::String;
    use std::sync::RwLock;

    #[derive(Config, Default, Debug, PartialEq)]
    struct Limits {
        #[config(comment = "Maximum connections")]
        connections: u32,
        name: String,
    }

    #[test]
    fn binding_rules() {
        let mut manager = ConfigManager::new();
        assert!(matches!(manager.load_all(), Err(ConfigError::NotBound)));
        assert!(matches!(manager.save_all(true), Err(ConfigError::NotBound)));

        assert!(matches!(
            manager.bind_target(5_i32),
            Err(ConfigError::NotComposite { .. })
        ));
        manager.bind_target(Limits::default()).unwrap();
        assert!(matches!(
            manager.bind_target(Limits::default()),
            Err(ConfigError::AlreadyBound)
        ));
        assert!(manager.is_bound());
    }

    #[test]
    fn defaults_do_not_replace_stored_values() {
        let stored = Section::new().with("connections", 7_i64);
        let mut manager = ConfigManager::with_backend(MemoryBackend::with_document(stored));
        manager
            .bind_target(Limits {
                connections: 100,
                name: "main".into(),
            })
            .unwrap();

        manager.save_defaults().unwrap();
        let written = manager.backend().stored().unwrap();
        assert_eq!(written.get_string("connections").as_deref(), Some("7"));
        assert_eq!(written.get_string("name").as_deref(), Some("main"));
        assert_eq!(written.comments("connections"), None);
        assert_eq!(written.comments("name"), None);

        manager.load_all().unwrap();
        assert_eq!(
            manager.into_target::<Limits>(),
            Some(Limits {
                connections: 7,
                name: "main".into(),
            })
        );
    }

    #[test]
    fn overwrite_writes_comments() {
        let mut manager = ConfigManager::new();
        manager.bind_target(Limits::default()).unwrap();
        manager.save_all(true).unwrap();
        assert_eq!(
            manager.document().comments("connections"),
            Some(&[String::from("Maximum connections")][..])
        );
    }

    #[test]
    fn static_roots() {
        static LIMITS: RwLock<Limits> = RwLock::new(Limits {
            connections: 3,
            name: String::new(),
        });

        let mut backend = MemoryBackend::new();
        backend
            .write(&Section::new().with("name", "shared"))
            .unwrap();

        let mut manager = ConfigManager::with_backend(backend);
        manager.bind_static(&LIMITS).unwrap();
        assert!(manager.target::<Limits>().is_none());

        manager.load_all().unwrap();
        {
            let limits = LIMITS.read().unwrap();
            assert_eq!(limits.connections, 3);
            assert_eq!(limits.name, "shared");
        }

        LIMITS.write().unwrap().connections = 9;
        manager.save_all(true).unwrap();
        assert_eq!(
            manager.document().get("connections"),
            Some(&Node::from(9_i64))
        );
    }
}
