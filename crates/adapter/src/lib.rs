//! Capability adapter engine with proximity-ranked resolution.
//!
//! Subjects are values shared behind `Arc`; capabilities are the types they
//! can be viewed as. The engine answers one question: given a subject and a
//! requested capability, what is the best view of that subject satisfying
//! it? The subject itself when its own type already qualifies, otherwise the
//! product of the registered converter whose declared pair lies nearest to
//! the types involved.
//!
//! # Shape of the API
//!
//! - [`capability!`] declares a type as a capability and wires its
//!   generalization edges into the process-wide graph.
//! - [`Adapter`] is implemented by converter values, once per supported
//!   pair; [`adapters!`] or [`submit_adapters!`] turn those values into
//!   descriptors.
//! - [`AdapterEngine::new`] validates the descriptor set; duplicate pairs
//!   fail construction eagerly and name every conflict.
//! - [`AdapterEngine::adapt`] binds a subject; [`Adapt::to`] resolves it.
//!   "No route" is `None`, never an error.
//!
//! ```ignore
//! let engine = AdapterEngine::new(adapters![
//! 	NodeBadger => { dyn Node => NodeBadge },
//! ])?;
//!
//! let file: Arc<SourceFile> = Arc::new(SourceFile::open(path)?);
//! let badge = engine.adapt(&file).to::<NodeBadge>();
//! ```
//!
//! # Concurrency
//!
//! An engine is immutable after construction; lineage, resolution, and
//! invocation caches fill lazily under compute-once, insert-if-absent
//! discipline. Every operation is a synchronous, CPU-bound read.

pub mod core;

mod engine;
mod query;
pub mod registry;
mod resolve;

#[cfg(feature = "ambient")]
pub mod ambient;

pub use crate::core::{
	Adaptive, Capability, CapabilityDef, CapabilityId, Lineage, LineageEntry,
};
pub use engine::AdapterEngine;
pub use query::Adapt;
pub use registry::{Adapter, AdapterDef, AdapterIndex, AdapterReg, PairConflict, RegistryError};

#[doc(hidden)]
pub use {inventory, paste};

#[cfg(test)]
pub(crate) mod test_fixtures;
