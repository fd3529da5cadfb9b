//! Proximity-ranked conversion resolution.
//!
//! # Purpose
//!
//! Given a bound subject and a requested capability, pick the single best
//! route to it: the subject itself when it already satisfies the request, or
//! the registered converter whose declared pair sits nearest to the types at
//! hand.
//!
//! # Mental Model
//!
//! 1. **Fast path:** if the request is satisfied by the subject's concrete
//!    runtime type or by its declared capability, re-wrap the subject and
//!    return it. No converter is consulted.
//! 2. **Cache replay:** a prior resolution for `(concrete, requested)` is
//!    replayed if its recorded search base fits this subject.
//! 3. **Full scan:** rank every registered converter by source proximity,
//!    then target specificity, against the runtime lineage; fall back to the
//!    declared capability's lineage when the runtime search finds nothing.
//! 4. **Invocation:** the winner runs through a per-pair memoized invoker;
//!    cast paths re-wrap the subject into the converter's declared source and
//!    the produced value into the requested capability.
//!
//! # Ordering Contract
//!
//! Candidates are ordered ascending by source distance, then *descending* by
//! target distance, then by registration order. The descending leg is
//! deliberate: among equally near sources, a converter producing a more
//! derived target outranks an exact target match, because the richer result
//! still satisfies the request.
//!
//! # Invariants
//!
//! - Absence of a route is a normal outcome, never an error.
//! - A resolution consumes exactly one subject view; fast paths return the
//!   bound view itself, preserving identity.
//! - The full-scan counter increments once per computed resolution and never
//!   on fast paths or cache replays.
//! - Replayed entries always fit the replaying subject; entries recorded for
//!   a different declared capability trigger a fresh, uncached resolution.

use std::any::TypeId;
use std::sync::Arc;

use crate::core::lineage::apply_path;
use crate::core::{
	Adaptive, Capability, CapabilityDef, CapabilityId, CastPath, ErasedArc, ErasedView, Lineage,
	graph,
};
use crate::engine::AdapterEngine;
use crate::registry::AdapterDef;
use crate::resolve::cache::Resolved;

pub(crate) mod cache;

#[cfg(test)]
pub(crate) mod invariants;


/// A subject bound for resolution: one erased view plus both identities.
pub(crate) struct Subject {
	/// Capability the subject was bound through.
	declared: CapabilityId,
	declared_def: &'static CapabilityDef,
	/// Concrete runtime type behind the view.
	runtime: TypeId,
	/// View holding `Arc<S>` for the declared `S`.
	view: ErasedView,
	/// Shared handle used to re-type the subject at its concrete type.
	any: ErasedArc,
}

impl Subject {
	pub(crate) fn bind<S>(source: &Arc<S>) -> Self
	where
		S: Capability + Adaptive + ?Sized,
	{
		Self {
			declared: CapabilityId::of::<S>(),
			declared_def: S::def(),
			runtime: (**source).as_any().type_id(),
			view: Box::new(Arc::clone(source)),
			any: Arc::clone(source).arc_any(),
		}
	}

	fn runtime_name(&self) -> &'static str {
		graph::def_of(self.runtime).map_or("<undeclared>", CapabilityDef::name)
	}
}

struct Candidate<'d> {
	def: &'d Arc<AdapterDef>,
	from: u32,
	to: u32,
}

impl AdapterEngine {
	/// Resolves `subject` to `requested`, returning the produced view.
	pub(crate) fn resolve_erased(
		&self,
		subject: Subject,
		requested: CapabilityId,
	) -> Option<ErasedView> {
		let subject = match Self::fast_path(subject, requested) {
			Ok(view) => {
				tracing::trace!(requested = requested.name(), "fast path satisfied the request");
				return Some(view);
			}
			Err(subject) => subject,
		};

		let key = (subject.runtime, requested.type_id());
		let declared = subject.declared.type_id();

		if let Some(cached) = self.resolutions.get(key) {
			if cached.replayable_for(declared) {
				return self.finish(subject, &cached);
			}
			// First resolution of this pair belonged to a different declared
			// capability; its cast paths do not fit this subject. Resolve
			// afresh and leave the cache as it is.
			let computed = self.scan(&subject, requested);
			return self.finish(subject, &computed);
		}

		let computed = self.scan(&subject, requested);
		let published = self.resolutions.insert_first(key, computed.clone());
		if published.replayable_for(declared) {
			self.finish(subject, &published)
		} else {
			self.finish(subject, &computed)
		}
	}

	/// Identity and lineage checks that bypass converters entirely.
	///
	/// The runtime type is tried before the declared capability. On a hit the
	/// subject's own view is returned, re-wrapped when the requested type is
	/// a base; otherwise the subject passes through untouched.
	fn fast_path(subject: Subject, requested: CapabilityId) -> Result<ErasedView, Subject> {
		let want = requested.type_id();

		if want == subject.runtime {
			if subject.declared.type_id() == subject.runtime {
				return Ok(subject.view);
			}
			if let Some(reify) = graph::def_of(subject.runtime).and_then(|def| def.reify) {
				return Ok(reify(&subject.any));
			}
			// Concrete type was never declared; only converters can help.
			return Err(subject);
		}

		if let Some(def) = graph::def_of(subject.runtime) {
			let lineage = Lineage::of(def);
			if let Some(entry) = lineage.entry_of(want) {
				if subject.declared.type_id() == subject.runtime {
					return Ok(apply_path(&entry.path, subject.view));
				}
				if let Some(reify) = def.reify {
					return Ok(apply_path(&entry.path, reify(&subject.any)));
				}
			}
		}

		if want == subject.declared.type_id() {
			return Ok(subject.view);
		}
		let lineage = Lineage::of(subject.declared_def);
		if let Some(entry) = lineage.entry_of(want) {
			return Ok(apply_path(&entry.path, subject.view));
		}

		Err(subject)
	}

	/// Full candidate scan: the uncached worst case, and the only place the
	/// scan counter moves.
	fn scan(&self, subject: &Subject, requested: CapabilityId) -> Resolved {
		self.index.note_scan();
		tracing::trace!(
			concrete = subject.runtime_name(),
			declared = subject.declared.name(),
			requested = requested.name(),
			"full resolution scan"
		);

		// Runtime search runs only when a concrete-typed view can exist for
		// this subject; a winner found here is replayable by any subject of
		// the same concrete type.
		if let Some(def) = graph::def_of(subject.runtime) {
			let usable = subject.declared.type_id() == subject.runtime || def.reify.is_some();
			if usable {
				let lineage = Lineage::of(def);
				if let Some((def, source_path, target_path)) = self.search(&lineage, requested) {
					return Resolved::Runtime {
						def,
						source_path,
						target_path,
					};
				}
			}
		}

		// Declared fallback covers subjects whose concrete type is opaque,
		// e.g. proxies bound through the one capability they forward.
		if subject.declared.type_id() != subject.runtime {
			let lineage = Lineage::of(subject.declared_def);
			if let Some((def, source_path, target_path)) = self.search(&lineage, requested) {
				return Resolved::Declared {
					declared: subject.declared.type_id(),
					def,
					source_path,
					target_path,
				};
			}
		}

		Resolved::None {
			declared: subject.declared.type_id(),
		}
	}

	/// Ranks converters whose source lies in `lineage` and whose target
	/// reaches `requested`; returns the winner with both cast paths.
	fn search(
		&self,
		lineage: &Lineage,
		requested: CapabilityId,
	) -> Option<(Arc<AdapterDef>, CastPath, CastPath)> {
		let want = requested.type_id();

		let mut candidates: Vec<Candidate<'_>> = Vec::new();
		for def in self.index.defs() {
			let Some(from) = lineage.distance_of(def.source().type_id()) else {
				continue;
			};
			let target_lineage = Lineage::of((def.target_def)());
			let Some(to) = target_lineage.distance_of(want) else {
				continue;
			};
			candidates.push(Candidate { def, from, to });
		}

		// Stable sort: equal rankings keep registration order.
		candidates.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| b.to.cmp(&a.to)));
		let winner = candidates.first()?;

		let source_path = lineage.entry_of(winner.def.source().type_id())?.path.clone();
		let target_path = Lineage::of((winner.def.target_def)())
			.entry_of(want)?
			.path
			.clone();

		tracing::trace!(winner = %winner.def, from = winner.from, to = winner.to, "converter selected");
		Some((Arc::clone(winner.def), source_path, target_path))
	}

	/// Invokes a resolved route against the subject.
	fn finish(&self, subject: Subject, resolved: &Resolved) -> Option<ErasedView> {
		match resolved {
			Resolved::None { .. } => None,
			Resolved::Runtime {
				def,
				source_path,
				target_path,
			} => {
				let invoker = self.invokers.for_def(def);
				let base = Self::concrete_view(subject)?;
				let produced = invoker.call(&apply_path(source_path, base));
				Some(apply_path(target_path, produced))
			}
			Resolved::Declared {
				def,
				source_path,
				target_path,
				..
			} => {
				let invoker = self.invokers.for_def(def);
				let produced = invoker.call(&apply_path(source_path, subject.view));
				Some(apply_path(target_path, produced))
			}
		}
	}

	/// Produces a view typed at the subject's concrete type.
	///
	/// Runtime-lineage winners only exist for subjects that can supply one,
	/// so the lookups cannot miss in practice; a miss degrades to "no
	/// result" rather than a panic.
	fn concrete_view(subject: Subject) -> Option<ErasedView> {
		if subject.declared.type_id() == subject.runtime {
			return Some(subject.view);
		}
		let reify = graph::def_of(subject.runtime)?.reify?;
		Some(reify(&subject.any))
	}
}
