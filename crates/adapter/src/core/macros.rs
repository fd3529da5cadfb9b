//! Declaration macro for capability types.

/// Declares a type as a capability and wires its generalization edges.
///
/// Concrete types list the `dyn Trait` capabilities they directly satisfy;
/// `dyn Trait` declarations list direct supertrait capabilities. Every listed
/// base must itself be declared somewhere in the program, and every edge is
/// checked at compile time: a listed base the type does not actually
/// implement refuses to build.
///
/// ```ignore
/// capability! { dyn LifeForm }
/// capability! { dyn Animal => dyn LifeForm }
/// capability! { Dog => dyn Animal }
/// capability! { Marker }
/// ```
#[macro_export]
macro_rules! capability {
	(dyn $tr:path $(=> $(dyn $base:path),+ $(,)?)?) => {
		impl $crate::core::Capability for dyn $tr {
			fn def() -> &'static $crate::core::CapabilityDef {
				static DEF: ::std::sync::LazyLock<$crate::core::CapabilityDef> =
					::std::sync::LazyLock::new(|| $crate::core::CapabilityDef {
						id: $crate::core::CapabilityId::of::<dyn $tr>(),
						bases: vec![$($(
							$crate::core::BaseDef {
								def: <dyn $base as $crate::core::Capability>::def,
								upcast: |view: &$crate::core::ErasedView| -> $crate::core::ErasedView {
									let source = view
										.downcast_ref::<::std::sync::Arc<dyn $tr>>()
										.expect("upcast source view holds the declaring type");
									let cloned: ::std::sync::Arc<dyn $tr> = ::std::sync::Arc::clone(source);
									let base: ::std::sync::Arc<dyn $base> = cloned;
									::std::boxed::Box::new(base)
								},
							},
						)+)?]
						.into_boxed_slice(),
						reify: ::std::option::Option::None,
					});
				&DEF
			}
		}

		inventory::submit! {
			$crate::core::graph::CapabilityReg(<dyn $tr as $crate::core::Capability>::def)
		}
	};
	($ty:ty $(=> $(dyn $base:path),+ $(,)?)?) => {
		impl $crate::core::Capability for $ty {
			fn def() -> &'static $crate::core::CapabilityDef {
				static DEF: ::std::sync::LazyLock<$crate::core::CapabilityDef> =
					::std::sync::LazyLock::new(|| $crate::core::CapabilityDef {
						id: $crate::core::CapabilityId::of::<$ty>(),
						bases: vec![$($(
							$crate::core::BaseDef {
								def: <dyn $base as $crate::core::Capability>::def,
								upcast: |view: &$crate::core::ErasedView| -> $crate::core::ErasedView {
									let source = view
										.downcast_ref::<::std::sync::Arc<$ty>>()
										.expect("upcast source view holds the declaring type");
									let cloned: ::std::sync::Arc<$ty> = ::std::sync::Arc::clone(source);
									let base: ::std::sync::Arc<dyn $base> = cloned;
									::std::boxed::Box::new(base)
								},
							},
						)+)?]
						.into_boxed_slice(),
						reify: ::std::option::Option::Some(
							|value: &$crate::core::ErasedArc| -> $crate::core::ErasedView {
								let concrete = ::std::sync::Arc::clone(value)
									.downcast::<$ty>()
									.expect("reified value has the declared concrete type");
								::std::boxed::Box::new(concrete)
							},
						),
					});
				&DEF
			}
		}

		inventory::submit! {
			$crate::core::graph::CapabilityReg(<$ty as $crate::core::Capability>::def)
		}
	};
}
