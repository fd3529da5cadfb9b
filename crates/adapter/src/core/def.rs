//! Capability definitions and the erased value currency.
//!
//! # Role
//!
//! Everything the engine moves at runtime is type-erased. A subject or a
//! produced capability travels as an [`ErasedView`]: a boxed `Any` that always
//! holds an `Arc<V>` for some capability type `V`. Moving between capability
//! types goes through thunks monomorphized at declaration sites, so resolution
//! itself never needs more than `TypeId` comparisons and table lookups.

use std::any::Any;
use std::sync::Arc;

use crate::core::CapabilityId;

/// Type-erased capability view. Always holds an `Arc<V>`.
pub type ErasedView = Box<dyn Any + Send + Sync>;

/// Type-erased shared handle to the concrete subject value.
pub type ErasedArc = Arc<dyn Any + Send + Sync>;

/// Re-wraps a view of a deriving type as a view of one of its bases.
pub type UpcastFn = fn(&ErasedView) -> ErasedView;

/// Re-types an [`ErasedArc`] as a view of its concrete type.
///
/// Only concrete declarations carry one; a `dyn Trait` capability is never
/// the concrete type of a value.
pub type ReifyFn = fn(&ErasedArc) -> ErasedView;

/// Lazy accessor for a capability's definition.
///
/// Base edges link definitions through accessor functions rather than direct
/// references so that initializing one definition never walks the graph.
pub type DefFn = fn() -> &'static CapabilityDef;

/// A declared generalization edge from a capability to one of its bases.
pub struct BaseDef {
	/// Definition of the base capability.
	pub def: DefFn,
	/// Thunk producing a base-typed view from a view of the declaring type.
	pub upcast: UpcastFn,
}

/// Static description of one capability type: identity, declared bases, and
/// the thunks that move values between its representations.
pub struct CapabilityDef {
	pub id: CapabilityId,
	pub bases: Box<[BaseDef]>,
	pub reify: Option<ReifyFn>,
}

impl CapabilityDef {
	#[inline]
	pub fn name(&self) -> &'static str {
		self.id.name()
	}
}

/// A type that participates in capability resolution.
///
/// Implemented through the [`capability!`] macro for concrete types and for
/// `dyn Trait` object types alike. The definition is built lazily on first
/// access and lives for the rest of the process.
pub trait Capability: 'static {
	/// Returns the definition declared for this type.
	fn def() -> &'static CapabilityDef;
}
