//! Generalization lineage of capability types.
//!
//! # Role
//!
//! Resolution scores converter candidates by how far their declared source and
//! target capabilities sit from the types actually involved in a query. This
//! module flattens a capability's declared base edges into that metric: a
//! [`Lineage`] lists every reachable base with a distance and the upcast steps
//! needed to re-wrap a view at that base.
//!
//! # Distance rule
//!
//! Traversal is breadth-first over declared edges. Diamond declarations can
//! reach the same base along several routes; when they do, the entry keeps the
//! **greatest** depth seen, not the shortest. Converters declared against a
//! base reached both directly and through an intermediate therefore rank as if
//! only the long route existed. The rule is load-bearing for candidate
//! ordering; see `diamond_keeps_greatest_depth` before changing it.
//!
//! # Invariants
//!
//! - Each reachable base appears exactly once per lineage.
//! - Entry 0 is the origin itself at distance 0 with an empty cast path.
//! - Entries are sorted ascending by distance; ties keep discovery order, so
//!   the sequence is identical across runs of the same binary.
//! - A lineage is computed at most once per origin type per process.

use std::any::TypeId;
use std::collections::VecDeque;
use std::collections::hash_map::Entry;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::CapabilityId;
use crate::core::def::{CapabilityDef, ErasedView, UpcastFn};

/// Chain of upcast thunks that re-wraps a view one base edge at a time.
pub type CastPath = SmallVec<[UpcastFn; 4]>;

/// Applies a cast path to a view, consuming it.
pub(crate) fn apply_path(path: &[UpcastFn], view: ErasedView) -> ErasedView {
	path.iter().fold(view, |view, step| step(&view))
}

/// One reachable base in a capability's lineage.
pub struct LineageEntry {
	pub id: CapabilityId,
	/// Edge count of the winning route from the origin; see the module doc
	/// for which route wins when several exist.
	pub distance: u32,
	/// Upcast steps from an origin-typed view to a view of this base.
	pub path: CastPath,
}

/// Flattened generalization lineage of one capability type.
pub struct Lineage {
	origin: CapabilityId,
	entries: Box<[LineageEntry]>,
	by_type: FxHashMap<TypeId, u32>,
}

static MEMO: LazyLock<RwLock<FxHashMap<TypeId, Arc<Lineage>>>> =
	LazyLock::new(|| RwLock::new(FxHashMap::default()));

impl Lineage {
	/// Returns the memoized lineage for `def`, computing it on first request.
	///
	/// Concurrent first requests may compute in parallel; the first insert
	/// wins and losers discard their work.
	pub fn of(def: &'static CapabilityDef) -> Arc<Lineage> {
		let key = def.id.type_id();
		if let Some(found) = MEMO.read().get(&key) {
			return Arc::clone(found);
		}
		let computed = Arc::new(Self::compute(def));
		let mut memo = MEMO.write();
		Arc::clone(memo.entry(key).or_insert(computed))
	}

	#[inline]
	pub fn origin(&self) -> CapabilityId {
		self.origin
	}

	/// Returns all entries: origin first, then bases ascending by distance.
	#[inline]
	pub fn entries(&self) -> &[LineageEntry] {
		&self.entries
	}

	/// Returns the entry for `type_id` when the origin is assignable to it.
	#[inline]
	pub fn entry_of(&self, type_id: TypeId) -> Option<&LineageEntry> {
		let index = *self.by_type.get(&type_id)?;
		Some(&self.entries[index as usize])
	}

	/// Returns the generalization distance to `type_id`, if reachable.
	#[inline]
	pub fn distance_of(&self, type_id: TypeId) -> Option<u32> {
		self.entry_of(type_id).map(|entry| entry.distance)
	}

	fn compute(origin: &'static CapabilityDef) -> Lineage {
		struct Pending {
			def: &'static CapabilityDef,
			distance: u32,
			path: CastPath,
		}

		// Discovered bases: distance keeps the maximum over every route that
		// reached the base, the path follows the winning route, and the
		// ordinal pins discovery order for deterministic tie sorting.
		struct Found {
			id: CapabilityId,
			distance: u32,
			path: CastPath,
			ordinal: u32,
		}

		let mut found: FxHashMap<TypeId, Found> = FxHashMap::default();
		let mut queue: VecDeque<Pending> = VecDeque::new();
		let mut cycle_reported = false;

		queue.push_back(Pending {
			def: origin,
			distance: 0,
			path: CastPath::new(),
		});

		while let Some(next) = queue.pop_front() {
			for base in next.def.bases.iter() {
				let base_def = (base.def)();
				let distance = next.distance + 1;

				if base_def.id.type_id() == origin.id.type_id() {
					// Declared route back to the origin. The origin is pinned
					// at distance zero, so the route cannot improve anything.
					report_cycle(&mut cycle_reported, origin, base_def);
					continue;
				}

				let mut path = next.path.clone();
				path.push(base.upcast);

				// In an acyclic declaration graph no simple route is longer
				// than the number of distinct bases discovered so far; a
				// distance past that bound means the edges loop.
				let known = found.len() as u32;
				match found.entry(base_def.id.type_id()) {
					Entry::Occupied(mut slot) => {
						let seen = slot.get_mut();
						if distance > seen.distance {
							if distance > known {
								report_cycle(&mut cycle_reported, origin, base_def);
								continue;
							}
							seen.distance = distance;
							seen.path = path.clone();
							queue.push_back(Pending {
								def: base_def,
								distance,
								path,
							});
						}
					}
					Entry::Vacant(slot) => {
						slot.insert(Found {
							id: base_def.id,
							distance,
							path: path.clone(),
							ordinal: known,
						});
						queue.push_back(Pending {
							def: base_def,
							distance,
							path,
						});
					}
				}
			}
		}

		let mut bases: Vec<Found> = found.into_values().collect();
		bases.sort_by(|a, b| {
			a.distance
				.cmp(&b.distance)
				.then_with(|| a.ordinal.cmp(&b.ordinal))
		});

		let mut entries = Vec::with_capacity(bases.len() + 1);
		entries.push(LineageEntry {
			id: origin.id,
			distance: 0,
			path: CastPath::new(),
		});
		entries.extend(bases.into_iter().map(|base| LineageEntry {
			id: base.id,
			distance: base.distance,
			path: base.path,
		}));

		let mut by_type = FxHashMap::default();
		for (index, entry) in entries.iter().enumerate() {
			by_type.insert(entry.id.type_id(), index as u32);
		}

		Lineage {
			origin: origin.id,
			entries: entries.into_boxed_slice(),
			by_type,
		}
	}
}

fn report_cycle(reported: &mut bool, origin: &CapabilityDef, via: &CapabilityDef) {
	if !*reported {
		*reported = true;
		tracing::warn!(
			origin = origin.name(),
			via = via.name(),
			"capability declarations form a cycle; looping routes ignored"
		);
	}
}
