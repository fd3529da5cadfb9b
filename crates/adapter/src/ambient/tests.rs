use std::sync::Arc;

use super::{InstallError, current, install, overlay, within};
use crate::AdapterEngine;

fn engine() -> Arc<AdapterEngine> {
	Arc::new(AdapterEngine::new([]).expect("empty engine builds"))
}

// The installed fallback is process-global, so every test here except the
// serial install test asserts only relative identity: "ours" versus
// "not ours", never "none installed".

#[test]
fn overlay_wins_and_restores_on_drop() {
	let ours = engine();

	let guard = overlay(Arc::clone(&ours));
	assert!(current().is_some_and(|cur| Arc::ptr_eq(&cur, &ours)));

	drop(guard);
	assert!(
		current().is_none_or(|cur| !Arc::ptr_eq(&cur, &ours)),
		"the overlay must end with its guard"
	);
}

#[test]
fn overlays_nest_and_unwind_in_order() {
	let outer = engine();
	let inner = engine();

	let outer_guard = overlay(Arc::clone(&outer));
	{
		let _inner_guard = overlay(Arc::clone(&inner));
		assert!(current().is_some_and(|cur| Arc::ptr_eq(&cur, &inner)));
	}
	assert!(current().is_some_and(|cur| Arc::ptr_eq(&cur, &outer)));

	drop(outer_guard);
	assert!(current().is_none_or(|cur| !Arc::ptr_eq(&cur, &outer)));
}

#[test]
fn overlays_are_thread_local() {
	let ours = engine();
	let _guard = overlay(Arc::clone(&ours));
	assert!(current().is_some_and(|cur| Arc::ptr_eq(&cur, &ours)));

	let probe = Arc::clone(&ours);
	let escaped = std::thread::spawn(move || {
		current().is_none_or(|cur| !Arc::ptr_eq(&cur, &probe))
	})
	.join()
	.expect("probe thread completes");
	assert!(escaped, "another thread must not see this thread's overlay");
}

/// The only test allowed to install; everything else stays install-agnostic.
#[test]
#[serial_test::serial]
fn install_is_first_come_first_served() {
	let first = engine();
	let second = engine();

	install(Arc::clone(&first)).expect("first install wins");
	assert!(current().is_some_and(|cur| Arc::ptr_eq(&cur, &first)));

	let rejected = install(Arc::clone(&second)).expect_err("second install must fail");
	let InstallError::AlreadyInstalled(returned) = rejected;
	assert!(Arc::ptr_eq(&returned, &second), "the rejected engine comes back to the caller");

	let over = engine();
	let guard = overlay(Arc::clone(&over));
	assert!(current().is_some_and(|cur| Arc::ptr_eq(&cur, &over)), "an overlay outranks the install");
	drop(guard);
	assert!(
		current().is_some_and(|cur| Arc::ptr_eq(&cur, &first)),
		"the fallback returns once the overlay ends"
	);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn within_reenters_the_overlay_across_polls() {
	let ours = engine();

	let seen = within(Arc::clone(&ours), {
		let ours = Arc::clone(&ours);
		async move {
			let before = current().is_some_and(|cur| Arc::ptr_eq(&cur, &ours));
			tokio::task::yield_now().await;
			let after = current().is_some_and(|cur| Arc::ptr_eq(&cur, &ours));
			(before, after)
		}
	})
	.await;
	assert_eq!(seen, (true, true), "every poll runs under the overlay");

	assert!(
		current().is_none_or(|cur| !Arc::ptr_eq(&cur, &ours)),
		"the overlay ends with the future"
	);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_tasks_do_not_inherit_the_overlay() {
	let ours = engine();

	let inherited = within(Arc::clone(&ours), {
		let ours = Arc::clone(&ours);
		async move {
			tokio::spawn(async move { current().is_some_and(|cur| Arc::ptr_eq(&cur, &ours)) })
				.await
				.expect("spawned task completes")
		}
	})
	.await;
	assert!(!inherited, "a plain spawn runs outside the overlay");
}
