//! Capability vocabulary: identity, declarations, and lineage.
//!
//! A capability is any `'static` type a subject can be viewed as, concrete or
//! `dyn Trait`. Declarations made with [`capability!`](crate::capability)
//! produce a [`CapabilityDef`] per type and submit it to the process-wide
//! [`graph`]; [`Lineage`] flattens the declared edges into the distance
//! metric resolution ranks candidates by.

mod adaptive;
mod def;
pub mod graph;
mod id;
pub mod lineage;
mod macros;

pub use adaptive::Adaptive;
pub use def::{BaseDef, Capability, CapabilityDef, DefFn, ErasedArc, ErasedView, ReifyFn, UpcastFn};
pub use id::CapabilityId;
pub use lineage::{CastPath, Lineage, LineageEntry};
