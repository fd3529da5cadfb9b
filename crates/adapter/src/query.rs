//! Typed query facade.

use std::sync::Arc;

use crate::core::CapabilityId;
use crate::engine::AdapterEngine;
use crate::resolve::Subject;

/// A subject bound to an engine, awaiting a typed request.
///
/// Produced by [`AdapterEngine::adapt`]; carries no state beyond the pairing
/// and is consumed by the query.
#[must_use = "a bound subject does nothing until queried with `to`"]
pub struct Adapt<'e> {
	engine: &'e AdapterEngine,
	subject: Option<Subject>,
}

impl<'e> Adapt<'e> {
	pub(crate) fn bound(engine: &'e AdapterEngine, subject: Subject) -> Self {
		Self {
			engine,
			subject: Some(subject),
		}
	}

	pub(crate) fn hollow(engine: &'e AdapterEngine) -> Self {
		Self {
			engine,
			subject: None,
		}
	}

	/// Resolves the subject as `T`.
	///
	/// `None` means no route exists, which is an expected outcome rather
	/// than an error. An absent subject propagates as `None` without
	/// consulting the engine.
	pub fn to<T>(self) -> Option<Arc<T>>
	where
		T: ?Sized + 'static,
	{
		let subject = self.subject?;
		let requested = CapabilityId::of::<T>();
		let view = self.engine.resolve_erased(subject, requested)?;
		match view.downcast::<Arc<T>>() {
			Ok(resolved) => Some(*resolved),
			Err(_) => {
				debug_assert!(false, "resolved view carries the requested type");
				None
			}
		}
	}
}
