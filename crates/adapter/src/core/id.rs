//! Capability identity.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a capability type: its [`TypeId`] plus a readable name.
///
/// Equality and hashing consider only the `TypeId`; the name rides along for
/// diagnostics and log output.
#[derive(Clone, Copy, Debug)]
pub struct CapabilityId {
	type_id: TypeId,
	name: &'static str,
}

impl CapabilityId {
	/// Returns the identity of `T`.
	///
	/// `T` may be a concrete type or a `dyn Trait` object type.
	#[inline]
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	#[inline]
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for CapabilityId {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for CapabilityId {}

impl Hash for CapabilityId {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Display for CapabilityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
