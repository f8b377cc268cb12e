use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;

use crate::convert::ConverterHandle;
use crate::error::{ConfigError, Result};
use crate::fields::{FieldSlot, SlotRole};
use crate::info::{
    BuildFn, CompositeShape, Construction, Constructor, FieldInfo, FieldRole,
    ParamInfo, PostInit, TypeDescriptor, TypeRef, TypeShape,
};

// -----------------------------------------------------------------------------
// Instantiator

/// How an [`ObjectConverter`](crate::convert::ObjectConverter) creates instances.
#[derive(Clone, Copy)]
pub enum Instantiator {
    /// Build from one value per slot, in slot order.
    Constructor(BuildFn),
    /// Create an empty instance, then assign slots one by one.
    Populate(fn() -> Box<dyn Any>),
}

impl core::fmt::Debug for Instantiator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Constructor(_) => f.write_str("Instantiator::Constructor"),
            Self::Populate(_) => f.write_str("Instantiator::Populate"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldInventory

/// The persistence plan of one composite type: its slots in declaration
/// order, the path slot, the post-load hook and the instantiation strategy.
#[derive(Debug, Clone)]
pub struct FieldInventory {
    owner: Cow<'static, str>,
    slots: Vec<FieldSlot>,
    path_slot: Option<usize>,
    post_init: Option<PostInit>,
    instantiator: Instantiator,
}

impl FieldInventory {
    /// Builds the inventory of `owner` from its shape.
    ///
    /// `resolve` supplies the converter of every slot type; it is called in
    /// declaration order and may hand out handles that are still being
    /// synthesized.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidHookSignature`] if a record declares a post-load hook.
    /// - [`ConfigError::NoMatchingConstructor`] if the constructor parameters
    ///   do not match the persisted fields one to one, in order.
    /// - [`ConfigError::NoZeroArgConstructor`] if a mutable type has neither a
    ///   constructor nor an empty instance.
    /// - [`ConfigError::NoStringConverter`] if a path slot type cannot be
    ///   parsed from a string.
    /// - Any error of `resolve`.
    pub fn build(
        owner: &TypeDescriptor,
        shape: CompositeShape,
        mut resolve: impl FnMut(TypeRef) -> Result<ConverterHandle>,
    ) -> Result<Self> {
        let owner_name: Cow<'static, str> = owner.to_string().into();
        let (fields, construction, post_init) = shape.into_parts();

        let (instantiator, constructor) = match construction {
            Construction::Record(constructor) => {
                if let Some(hook) = post_init {
                    return Err(ConfigError::InvalidHookSignature {
                        ty: owner_name,
                        hook: hook.name(),
                        reason: "records cannot be mutated after construction",
                    });
                }
                (Instantiator::Constructor(constructor.build_fn()), Some(constructor))
            }
            Construction::Populate {
                constructor: Some(constructor),
                ..
            } => (Instantiator::Constructor(constructor.build_fn()), Some(constructor)),
            Construction::Populate {
                empty: Some(empty),
                constructor: None,
            } => (Instantiator::Populate(empty), None),
            Construction::Populate {
                empty: None,
                constructor: None,
            } => return Err(ConfigError::NoZeroArgConstructor { ty: owner_name }),
        };

        let fields: Vec<FieldInfo> = fields
            .into_iter()
            .filter(|field| field.role() != FieldRole::Transient)
            .collect();

        let params = match &constructor {
            Some(constructor) => {
                check_params(constructor, &fields, &owner_name)?;
                constructor.params()
            }
            None => &[],
        };

        let mut slots = Vec::with_capacity(fields.len());
        let mut path_slot = None;
        for (index, field) in fields.into_iter().enumerate() {
            let param = params.get(index);
            let converter = resolve(field.ty())?;

            let role = match field.role() {
                FieldRole::Path => {
                    if !converter.get().is_some_and(|c| c.is_string_convertible()) {
                        return Err(ConfigError::NoStringConverter {
                            ty: converter.descriptor().to_string().into(),
                        });
                    }
                    if path_slot.is_some() {
                        log::warn!(
                            "`{owner_name}` declares more than one path field, `{}` is filled too",
                            field.member()
                        );
                    } else {
                        path_slot = Some(index);
                    }
                    SlotRole::Path
                }
                FieldRole::Flatten if flattenable(field.ty()) => SlotRole::Flatten,
                FieldRole::Flatten => {
                    log::debug!(
                        "`{owner_name}.{}` is not a plain composite and is persisted as a value",
                        field.member()
                    );
                    SlotRole::Value
                }
                _ => SlotRole::Value,
            };

            slots.push(make_slot(&owner_name, field, param, role, converter));
        }

        Ok(Self {
            owner: owner_name,
            slots,
            path_slot,
            post_init,
            instantiator,
        })
    }

    /// Type name of the owner, as rendered by its descriptor.
    #[inline]
    pub fn owner(&self) -> &Cow<'static, str> {
        &self.owner
    }

    #[inline]
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&FieldSlot> {
        self.slots.iter().find(|slot| slot.name() == name)
    }

    #[inline]
    pub fn path_slot(&self) -> Option<&FieldSlot> {
        self.path_slot.map(|index| &self.slots[index])
    }

    #[inline]
    pub fn post_init(&self) -> Option<PostInit> {
        self.post_init
    }

    #[inline]
    pub fn instantiator(&self) -> &Instantiator {
        &self.instantiator
    }
}

fn check_params(constructor: &Constructor, fields: &[FieldInfo], owner: &Cow<'static, str>) -> Result<()> {
    let params = constructor.params();
    let matches = params.len() == fields.len()
        && params.iter().zip(fields).all(|(param, field)| {
            param.type_id() == field.ty().type_id()
                && param.is_path() == (field.role() == FieldRole::Path)
        });
    if matches {
        Ok(())
    } else {
        Err(ConfigError::NoMatchingConstructor { ty: owner.clone() })
    }
}

fn flattenable(ty: TypeRef) -> bool {
    matches!(ty.shape(), TypeShape::Composite(shape) if !shape.is_subclassable())
}

fn make_slot(
    owner: &Cow<'static, str>,
    field: FieldInfo,
    param: Option<&ParamInfo>,
    role: SlotRole,
    converter: ConverterHandle,
) -> FieldSlot {
    let name = param
        .and_then(ParamInfo::rename)
        .or(field.rename())
        .unwrap_or(field.member());

    let comments: Vec<String> = field
        .comments()
        .iter()
        .chain(param.map(ParamInfo::comments).unwrap_or_default())
        .map(|line| String::from(*line))
        .collect();

    let fallback = field.default_fn().or_else(|| match field.ty().shape() {
        TypeShape::Optional(optional) => Some(optional.none_fn()),
        _ => None,
    });

    FieldSlot {
        owner: owner.clone(),
        member: field.member(),
        name,
        comments,
        role,
        ty: field.ty(),
        converter,
        access: field.access(),
        fallback,
    }
}
