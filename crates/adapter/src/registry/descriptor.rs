//! Converter descriptors.
//!
//! A converter value implements [`Adapter`] once per pair it supports.
//! [`AdapterDef::of`] pins one pair down: it erases the instance, captures
//! both capability identities, and monomorphizes the invocation entry point
//! so that resolution can call the converter without knowing any of the three
//! types involved.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::core::{Capability, CapabilityId, DefFn, ErasedView};

/// A registered conversion from a source capability to a target capability.
///
/// Implementations are infallible: by the time a converter runs, resolution
/// has already proven the subject satisfies `S`. A converter that can fail
/// should target a capability expressing the failure instead.
pub trait Adapter<S: ?Sized, T: ?Sized>: Send + Sync + 'static {
	/// Produces the target view for a subject satisfying `S`.
	fn adapt(&self, source: &Arc<S>) -> Arc<T>;
}

/// Erased invocation entry point, monomorphized per declared pair.
pub(crate) type EntryFn = fn(&(dyn Any + Send + Sync), &ErasedView) -> ErasedView;

fn entry<A, S, T>(instance: &(dyn Any + Send + Sync), source: &ErasedView) -> ErasedView
where
	A: Adapter<S, T>,
	S: Capability + ?Sized,
	T: Capability + Send + Sync + ?Sized,
{
	let adapter = instance
		.downcast_ref::<A>()
		.expect("descriptor instance has the adapter type");
	let source = source
		.downcast_ref::<Arc<S>>()
		.expect("invocation source view has the declared source type");
	Box::new(adapter.adapt(source))
}

/// Descriptor for one declared `(source, target)` conversion.
pub struct AdapterDef {
	pub(crate) source: CapabilityId,
	pub(crate) target: CapabilityId,
	pub(crate) target_def: DefFn,
	pub(crate) adapter: &'static str,
	pub(crate) instance: Arc<dyn Any + Send + Sync>,
	pub(crate) entry: EntryFn,
	/// Registration ordinal; assigned when the index is built.
	pub(crate) ordinal: u32,
}

impl AdapterDef {
	/// Extracts the descriptor for the `S -> T` conversion of `instance`.
	///
	/// A single adapter value may be described for several pairs; every
	/// descriptor shares the instance.
	pub fn of<A, S, T>(instance: &Arc<A>) -> Self
	where
		A: Adapter<S, T>,
		S: Capability + ?Sized,
		T: Capability + Send + Sync + ?Sized,
	{
		let cloned: Arc<A> = Arc::clone(instance);
		let erased: Arc<dyn Any + Send + Sync> = cloned;
		Self {
			source: CapabilityId::of::<S>(),
			target: CapabilityId::of::<T>(),
			target_def: <T as Capability>::def,
			adapter: type_name::<A>(),
			instance: erased,
			entry: entry::<A, S, T>,
			ordinal: 0,
		}
	}

	#[inline]
	pub fn source(&self) -> CapabilityId {
		self.source
	}

	#[inline]
	pub fn target(&self) -> CapabilityId {
		self.target
	}

	/// Type name of the adapter value this conversion came from.
	#[inline]
	pub fn adapter_name(&self) -> &'static str {
		self.adapter
	}

	#[inline]
	pub(crate) fn pair(&self) -> (TypeId, TypeId) {
		(self.source.type_id(), self.target.type_id())
	}

	pub(crate) fn invoke(&self, source: &ErasedView) -> ErasedView {
		(self.entry)(self.instance.as_ref(), source)
	}
}

impl fmt::Debug for AdapterDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdapterDef")
			.field("source", &self.source)
			.field("target", &self.target)
			.field("adapter", &self.adapter)
			.field("ordinal", &self.ordinal)
			.finish_non_exhaustive()
	}
}

impl fmt::Display for AdapterDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -> {} ({})", self.source, self.target, self.adapter)
	}
}
