//! Ambient engine access with scoped overrides.
//!
//! # Role
//!
//! Call sites that cannot thread an engine handle through their call graph
//! fall back to ambient lookup: an overlay installed for the current scope
//! first, then the process-wide engine. Overlays are thread-local and nest;
//! [`within`] re-enters its overlay on every poll, so an async scope follows
//! its future across worker threads instead of leaking to whatever runs on
//! the original thread next.
//!
//! Prefer passing engines explicitly; ambient lookup exists for the process
//! boundary where that stops being practical.

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use thiserror::Error;

use crate::engine::AdapterEngine;

static INSTALLED: OnceLock<Arc<AdapterEngine>> = OnceLock::new();

thread_local! {
	static OVERLAYS: RefCell<Vec<Arc<AdapterEngine>>> = const { RefCell::new(Vec::new()) };
}

/// Failure to install the process-wide engine.
#[derive(Debug, Error)]
pub enum InstallError {
	/// An engine was already installed; the rejected newcomer is returned.
	#[error("ambient adapter engine already installed")]
	AlreadyInstalled(Arc<AdapterEngine>),
}

/// Installs the process-wide fallback engine. First install wins; there is
/// no replacement, only overlaying.
pub fn install(engine: Arc<AdapterEngine>) -> Result<(), InstallError> {
	INSTALLED.set(engine).map_err(InstallError::AlreadyInstalled)
}

/// Returns the engine visible to the calling thread: the innermost overlay
/// first, then the installed fallback.
pub fn current() -> Option<Arc<AdapterEngine>> {
	let overlaid = OVERLAYS.with(|overlays| overlays.borrow().last().cloned());
	overlaid.or_else(|| INSTALLED.get().cloned())
}

/// Makes `engine` current for the calling thread until the guard drops.
///
/// Overlays nest: the newest wins, and dropping the guard restores whatever
/// was visible before. The guard is deliberately not `Send`; an overlay
/// belongs to the thread that opened it.
#[must_use = "the overlay ends as soon as the guard drops"]
pub fn overlay(engine: Arc<AdapterEngine>) -> OverlayGuard {
	OVERLAYS.with(|overlays| overlays.borrow_mut().push(engine));
	OverlayGuard {
		_not_send: PhantomData,
	}
}

/// Active thread-local overlay; pops its engine on drop.
pub struct OverlayGuard {
	_not_send: PhantomData<*const ()>,
}

impl Drop for OverlayGuard {
	fn drop(&mut self) {
		OVERLAYS.with(|overlays| {
			if overlays.borrow_mut().pop().is_none() {
				tracing::warn!("overlay guard dropped with no overlay active");
			}
		});
	}
}

pin_project_lite::pin_project! {
	/// Future wrapper that re-enters its engine overlay on every poll.
	#[must_use = "futures do nothing unless polled"]
	pub struct Within<F> {
		#[pin]
		inner: F,
		engine: Arc<AdapterEngine>,
	}
}

/// Runs `future` with `engine` current at every poll, on whichever thread
/// polls it. The overlay never outlives an individual poll, so suspended
/// time leaks nothing to unrelated work.
pub fn within<F: Future>(engine: Arc<AdapterEngine>, future: F) -> Within<F> {
	Within {
		inner: future,
		engine,
	}
}

impl<F: Future> Future for Within<F> {
	type Output = F::Output;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.project();
		let _overlay = overlay(Arc::clone(this.engine));
		this.inner.poll(cx)
	}
}

#[cfg(test)]
mod tests;
