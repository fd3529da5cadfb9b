//! Process-wide capability graph.
//!
//! Declaration sites submit their definitions through [`inventory`]; the
//! first lookup freezes them into a map keyed by `TypeId` so a subject bound
//! through a capability can recover the definition of its concrete type.

use std::any::TypeId;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::core::CapabilityDef;
use crate::core::def::DefFn;

/// Inventory submission wrapper for capability declarations.
pub struct CapabilityReg(pub DefFn);

inventory::collect!(CapabilityReg);

static BY_TYPE: LazyLock<FxHashMap<TypeId, &'static CapabilityDef>> = LazyLock::new(|| {
	let mut map = FxHashMap::default();
	for reg in inventory::iter::<CapabilityReg> {
		let def = (reg.0)();
		map.insert(def.id.type_id(), def);
	}
	tracing::debug!(capabilities = map.len(), "capability graph frozen");
	map
});

/// Looks up the declared definition for a runtime type, if any.
#[inline]
pub fn def_of(type_id: TypeId) -> Option<&'static CapabilityDef> {
	BY_TYPE.get(&type_id).copied()
}
