//! Global busy indicator.
//!
//! Every outgoing request holds a [`LoadingGuard`] for its lifetime. The console
//! shows its spinner overlay while any guard is alive. Guards release on drop,
//! so a request that fails or panics still clears its share of the counter.

use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Count of in-flight requests. Cloning shares the same counter.
///
/// The epoch advances on every [`LoadingCounter::reset`]; a guard taken in an
/// earlier epoch releases nothing.
#[derive(Clone, Debug, Default)]
pub struct LoadingCounter {
    in_flight: Arc<AtomicUsize>,
    epoch: Arc<AtomicU64>,
}

impl LoadingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as started.
    pub fn begin(&self) -> LoadingGuard {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            counter: self.clone(),
            epoch,
        }
    }

    /// Runs `fut` while counted as in flight.
    pub async fn track<F: Future>(&self, fut: F) -> F::Output {
        let _guard = self.begin();
        fut.await
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Decrements, saturating at zero. Stale guards are ignored.
    fn end(&self, epoch: u64) {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Drops every outstanding count, e.g. on sign-out. Guards taken before
    /// the reset no longer affect the counter.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.in_flight.store(0, Ordering::SeqCst);
    }
}

/// Releases one in-flight count when dropped.
#[derive(Debug)]
#[must_use = "the request is only counted while the guard is alive"]
pub struct LoadingGuard {
    counter: LoadingCounter,
    epoch: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.counter.end(self.epoch);
    }
}
