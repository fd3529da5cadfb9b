//! Engine construction and subject binding.

use std::fmt;
use std::sync::Arc;

use crate::core::{Adaptive, Capability};
use crate::query::Adapt;
use crate::registry::{AdapterDef, AdapterIndex, AdapterReg, RegistryError};
use crate::resolve::Subject;
use crate::resolve::cache::{InvokerCache, ResolutionCache};

/// Conversion engine: a validated adapter index plus its caches.
///
/// Construction validates the whole registration set up front; afterwards the
/// index never changes and every operation is a concurrent read. Engines are
/// self-contained and cheap to share behind an [`Arc`].
pub struct AdapterEngine {
	pub(crate) index: AdapterIndex,
	pub(crate) resolutions: ResolutionCache,
	pub(crate) invokers: InvokerCache,
}

impl AdapterEngine {
	/// Builds an engine from explicit descriptors, usually assembled with
	/// [`adapters!`](crate::adapters).
	pub fn new(defs: impl IntoIterator<Item = AdapterDef>) -> Result<Self, RegistryError> {
		Ok(Self {
			index: AdapterIndex::build(defs)?,
			resolutions: ResolutionCache::new(),
			invokers: InvokerCache::new(),
		})
	}

	/// Builds an engine from every conversion submitted with
	/// [`submit_adapters!`](crate::submit_adapters).
	pub fn from_inventory() -> Result<Self, RegistryError> {
		let mut defs = Vec::new();
		for reg in inventory::iter::<AdapterReg> {
			defs.extend((reg.0)());
		}
		Self::new(defs)
	}

	/// Returns the validated index.
	#[inline]
	pub fn index(&self) -> &AdapterIndex {
		&self.index
	}

	/// Binds `source` for resolution.
	///
	/// Binding pairs the subject with the engine and captures its identities;
	/// all work happens in [`Adapt::to`](crate::Adapt::to).
	pub fn adapt<'e, S>(&'e self, source: &Arc<S>) -> Adapt<'e>
	where
		S: Capability + Adaptive + ?Sized,
	{
		Adapt::bound(self, Subject::bind(source))
	}

	/// Binds an optional subject; an absent subject resolves to nothing.
	pub fn adapt_opt<'e, S>(&'e self, source: Option<&Arc<S>>) -> Adapt<'e>
	where
		S: Capability + Adaptive + ?Sized,
	{
		match source {
			Some(source) => self.adapt(source),
			None => Adapt::hollow(self),
		}
	}
}

impl fmt::Debug for AdapterEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdapterEngine")
			.field("adapters", &self.index.len())
			.field("full_scans", &self.index.full_scans())
			.finish_non_exhaustive()
	}
}
