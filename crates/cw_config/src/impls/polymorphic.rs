/// Implements [`Configurable`](crate::info::Configurable) for `Box<dyn Trait>`.
///
/// The trait must have [`Any`](core::any::Any) as a supertrait and is
/// assumed to be declared in the module invoking the macro, whose path
/// becomes part of the descriptor. Implementations are registered with
/// [`ConverterRegistry::register_subclass`](crate::ConverterRegistry::register_subclass)
/// or `#[config(implements = Trait)]`.
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use cw_config::info::Configurable;
///
/// pub trait Shape: Any {
///     fn area(&self) -> f64;
/// }
///
/// cw_config::impl_polymorphic!(Shape);
///
/// assert_eq!(<Box<dyn Shape>>::type_ident(), "Shape");
/// assert!(<Box<dyn Shape>>::type_path().ends_with("::Shape"));
/// ```
#[macro_export]
macro_rules! impl_polymorphic {
    ($tr:ident) => {
        impl $crate::info::Configurable for ::std::boxed::Box<dyn $tr> {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!("dyn ", ::core::module_path!(), "::", ::core::stringify!($tr))
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!($tr)
            }

            fn shape() -> $crate::info::TypeShape {
                $crate::info::TypeShape::Polymorphic($crate::info::PolymorphicShape::new(
                    |value| {
                        let value = value.downcast_ref::<::std::boxed::Box<dyn $tr>>()?;
                        let concrete: &dyn ::core::any::Any = &**value;
                        ::core::option::Option::Some(concrete)
                    },
                ))
            }
        }
    };
}
