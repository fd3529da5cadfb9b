use std::sync::Arc;

use crate::test_fixtures::{
	FileBadger, FileNode, Node, NodeBadge, NodeBadger, SourceFile, VersionBadger, Versioned,
};
use crate::{AdapterEngine, adapters};

fn badge_engine() -> AdapterEngine {
	AdapterEngine::new(adapters![
		NodeBadger => { dyn Node => NodeBadge },
		FileBadger => { dyn FileNode => NodeBadge },
		VersionBadger => { dyn Versioned => NodeBadge },
	])
	.expect("badge engine builds")
}

/// Must replay a recorded pair from the cache instead of rescanning the index.
///
/// * Enforced in: `AdapterIndex::resolve_erased` (cache lookup before `scan`)
/// * Failure symptom: steady-state conversions pay a linear converter scan per call.
#[cfg_attr(test, test)]
pub(crate) fn test_warm_pairs_never_rescan() {
	let engine = badge_engine();
	let file = Arc::new(SourceFile { label: "warm.rs" });

	let badge = engine.adapt(&file).to::<NodeBadge>().expect("badge route");
	assert_eq!(badge.by, "FileBadger");
	assert_eq!(engine.index().full_scans(), 1);

	std::thread::scope(|scope| {
		for _ in 0..8 {
			scope.spawn(|| {
				for _ in 0..50 {
					let badge = engine.adapt(&file).to::<NodeBadge>().expect("cached route");
					assert_eq!(badge.by, "FileBadger");
				}
			});
		}
	});

	assert_eq!(engine.index().full_scans(), 1, "warm queries must replay the cached winner");
}

/// Must hand every racing caller of one cold pair the same converter.
///
/// * Enforced in: deterministic candidate ordering in `AdapterIndex::scan` plus
///   first-insert-wins in `ResolutionCache::insert_first`
/// * Failure symptom: identical queries flip between converters under load.
#[cfg_attr(test, test)]
pub(crate) fn test_racing_callers_agree_on_one_winner() {
	let engine = badge_engine();
	let file = Arc::new(SourceFile { label: "race.rs" });

	let winners: Vec<&'static str> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..8)
			.map(|_| scope.spawn(|| engine.adapt(&file).to::<NodeBadge>().expect("badge route").by))
			.collect();
		handles
			.into_iter()
			.map(|handle| handle.join().expect("resolver threads do not panic"))
			.collect()
	});
	assert!(winners.iter().all(|by| *by == "FileBadger"), "winners diverged: {winners:?}");

	// The race may have scanned more than once, but it leaves the pair warm.
	let settled = engine.index().full_scans();
	let badge = engine.adapt(&file).to::<NodeBadge>().expect("cached route");
	assert_eq!(badge.by, "FileBadger");
	assert_eq!(engine.index().full_scans(), settled);
}

/// Must satisfy lineage-reachable requests without consulting converters.
///
/// * Enforced in: fast-path ordering in `AdapterIndex::resolve_erased`
/// * Failure symptom: plain upcasts inflate the scan counter and contend on the
///   resolution cache.
#[cfg_attr(test, test)]
pub(crate) fn test_lineage_requests_skip_the_converter_index() {
	let engine = badge_engine();
	let file = Arc::new(SourceFile { label: "fast.rs" });
	let node: Arc<dyn FileNode> = file.clone();

	engine.adapt(&file).to::<dyn Node>().expect("declared upcast");
	engine.adapt(&node).to::<SourceFile>().expect("reified concrete type");
	engine.adapt(&node).to::<dyn Versioned>().expect("runtime lineage upcast");

	assert_eq!(engine.index().full_scans(), 0, "lineage requests must not scan");
}
