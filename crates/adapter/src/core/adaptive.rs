//! Runtime identity for subjects.

use std::any::Any;
use std::sync::Arc;

/// Exposes the concrete runtime identity of a value seen through a capability.
///
/// Generic code cannot unsize `Arc<S>` when `S` is itself a trait object, so
/// the conversion happens through dynamic dispatch instead: the blanket impl
/// is instantiated at the concrete type, and its vtable entry carries the
/// coercion. Capability traits name [`Adaptive`] as a supertrait so that
/// `dyn Trait` subjects expose it as well.
pub trait Adaptive: Any + Send + Sync {
	/// Borrows the value for runtime type inspection.
	fn as_any(&self) -> &(dyn Any + Send + Sync);

	/// Re-wraps the shared handle with the concrete type's vtable.
	fn arc_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> Adaptive for T {
	#[inline]
	fn as_any(&self) -> &(dyn Any + Send + Sync) {
		self
	}

	#[inline]
	fn arc_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
