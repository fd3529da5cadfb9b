//! Converter registration and indexing.
//!
//! # Role
//!
//! The index is the engine's only source of converters: a flat, validated,
//! immutable list of [`AdapterDef`] in registration order. Validation is
//! all-or-nothing; a duplicate `(source, target)` pair anywhere in the input
//! fails construction with every conflict named, and nothing of the attempt
//! survives.
//!
//! # Invariants
//!
//! - At most one descriptor per `(source, target)` pair.
//! - Descriptor order is registration order; ordinals are dense and stable
//!   for the life of the index.
//! - The index never changes after construction. The only mutable state is
//!   the full-scan counter, which observes resolution cost without
//!   participating in it.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::core::CapabilityId;

mod descriptor;
mod macros;

pub use descriptor::{Adapter, AdapterDef};

/// Inventory submission wrapper for adapter declarations.
pub struct AdapterReg(pub fn() -> Vec<AdapterDef>);

inventory::collect!(AdapterReg);

/// One `(source, target)` pair declared by more than one converter.
#[derive(Debug, Clone)]
pub struct PairConflict {
	pub source: CapabilityId,
	pub target: CapabilityId,
	/// Adapter type names claiming the pair, in registration order.
	pub adapters: Vec<&'static str>,
}

impl fmt::Display for PairConflict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -> {} claimed by ", self.source, self.target)?;
		for (index, name) in self.adapters.iter().enumerate() {
			if index > 0 {
				f.write_str(", ")?;
			}
			f.write_str(name)?;
		}
		Ok(())
	}
}

/// Failure to build an adapter index.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// Two or more converters declared the same conversion pair.
	#[error("duplicate conversion pairs: {}", render_conflicts(.0))]
	DuplicatePairs(Vec<PairConflict>),
}

fn render_conflicts(conflicts: &[PairConflict]) -> String {
	let rendered: Vec<String> = conflicts.iter().map(PairConflict::to_string).collect();
	rendered.join("; ")
}

/// Immutable, validated collection of conversion descriptors.
#[derive(Debug)]
pub struct AdapterIndex {
	defs: Box<[Arc<AdapterDef>]>,
	scans: AtomicU64,
}

impl AdapterIndex {
	/// Builds the index, assigning registration ordinals and rejecting
	/// duplicate pairs.
	pub fn build(defs: impl IntoIterator<Item = AdapterDef>) -> Result<Self, RegistryError> {
		let mut table: Vec<Arc<AdapterDef>> = Vec::new();
		let mut by_pair: FxHashMap<(TypeId, TypeId), Vec<u32>> = FxHashMap::default();

		for (ordinal, mut def) in defs.into_iter().enumerate() {
			def.ordinal = ordinal as u32;
			by_pair.entry(def.pair()).or_default().push(def.ordinal);
			table.push(Arc::new(def));
		}

		let mut conflicts: Vec<PairConflict> = by_pair
			.into_values()
			.filter(|claims| claims.len() > 1)
			.map(|claims| {
				let first = &table[claims[0] as usize];
				PairConflict {
					source: first.source(),
					target: first.target(),
					adapters: claims
						.iter()
						.map(|&ordinal| table[ordinal as usize].adapter_name())
						.collect(),
				}
			})
			.collect();

		if !conflicts.is_empty() {
			// Hash iteration decided the grouping order; report in a stable
			// one instead.
			conflicts.sort_by(|a, b| {
				a.source
					.name()
					.cmp(b.source.name())
					.then_with(|| a.target.name().cmp(b.target.name()))
			});
			return Err(RegistryError::DuplicatePairs(conflicts));
		}

		let converters: FxHashSet<*const ()> = table
			.iter()
			.map(|def| Arc::as_ptr(&def.instance).cast::<()>())
			.collect();
		tracing::debug!(
			descriptors = table.len(),
			converters = converters.len(),
			"adapter index built"
		);
		Ok(Self {
			defs: table.into_boxed_slice(),
			scans: AtomicU64::new(0),
		})
	}

	/// Descriptors in registration order.
	#[inline]
	pub fn defs(&self) -> &[Arc<AdapterDef>] {
		&self.defs
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.defs.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}

	/// Number of full candidate scans performed so far.
	///
	/// Identity fast paths and cache replays never scan, so the counter
	/// exposes resolution cost to tests and diagnostics.
	#[inline]
	pub fn full_scans(&self) -> u64 {
		self.scans.load(Ordering::Relaxed)
	}

	#[inline]
	pub(crate) fn note_scan(&self) {
		self.scans.fetch_add(1, Ordering::Relaxed);
	}
}
