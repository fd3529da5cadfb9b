//! Resolution and invocation caches.
//!
//! Both caches grow monotonically and never evict; their key spaces are
//! bounded by the distinct type pairs a program can mention, not by subject
//! count. Writers follow compute-outside-the-lock, insert-if-absent
//! discipline: a losing concurrent writer discards its work and adopts the
//! published entry.

use std::any::TypeId;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::core::{CastPath, ErasedView};
use crate::registry::AdapterDef;

/// Outcome of one full resolution, keyed by `(concrete, requested)`.
///
/// Cast paths are typed by construction, so an entry records which search
/// produced it: a runtime-lineage winner fits every subject of the concrete
/// type, while declared-fallback winners and negative outcomes only fit
/// subjects bound through the same declared capability.
#[derive(Clone)]
pub(crate) enum Resolved {
	/// No conversion route; valid for subjects declared as `declared`.
	None { declared: TypeId },
	/// Winner found in the runtime lineage of the concrete type.
	Runtime {
		def: Arc<AdapterDef>,
		source_path: CastPath,
		target_path: CastPath,
	},
	/// Winner found through the declared capability's lineage.
	Declared {
		declared: TypeId,
		def: Arc<AdapterDef>,
		source_path: CastPath,
		target_path: CastPath,
	},
}

impl Resolved {
	/// Whether a subject bound through `declared` can replay this entry.
	pub(crate) fn replayable_for(&self, declared: TypeId) -> bool {
		match self {
			Resolved::Runtime { .. } => true,
			Resolved::Declared { declared: owner, .. } | Resolved::None { declared: owner } => {
				*owner == declared
			}
		}
	}
}

pub(crate) struct ResolutionCache {
	map: RwLock<FxHashMap<(TypeId, TypeId), Resolved>>,
}

impl ResolutionCache {
	pub(crate) fn new() -> Self {
		Self {
			map: RwLock::new(FxHashMap::default()),
		}
	}

	pub(crate) fn get(&self, key: (TypeId, TypeId)) -> Option<Resolved> {
		self.map.read().get(&key).cloned()
	}

	/// Inserts `value` unless the key is already taken. The stored entry is
	/// returned either way; first insert wins.
	pub(crate) fn insert_first(&self, key: (TypeId, TypeId), value: Resolved) -> Resolved {
		let mut map = self.map.write();
		map.entry(key).or_insert(value).clone()
	}
}

/// Memoized erased invoker for one conversion pair.
///
/// The per-pair entry point is monomorphized at registration; the invoker
/// pins it together with its descriptor so every resolution of the pair
/// shares one callable.
pub(crate) struct Invoker {
	def: Arc<AdapterDef>,
}

impl Invoker {
	pub(crate) fn call(&self, source: &ErasedView) -> ErasedView {
		self.def.invoke(source)
	}
}

pub(crate) struct InvokerCache {
	map: RwLock<FxHashMap<(TypeId, TypeId), Arc<Invoker>>>,
}

impl InvokerCache {
	pub(crate) fn new() -> Self {
		Self {
			map: RwLock::new(FxHashMap::default()),
		}
	}

	pub(crate) fn for_def(&self, def: &Arc<AdapterDef>) -> Arc<Invoker> {
		let key = def.pair();
		if let Some(found) = self.map.read().get(&key) {
			return Arc::clone(found);
		}
		let invoker = Arc::new(Invoker {
			def: Arc::clone(def),
		});
		let mut map = self.map.write();
		Arc::clone(map.entry(key).or_insert(invoker))
	}
}
