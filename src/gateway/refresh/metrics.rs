//! Counters describing refresh activity, shared across gateway clones.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Refresh counters kept with relaxed ordering; totals are advisory and never
/// synchronize the flows themselves.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	recoveries: AtomicU64,
	invalidations: AtomicU64,
	transient_failures: AtomicU64,
}
impl RefreshMetrics {
	/// Number of refresh passes started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Number of passes that ended with a usable access credential, including passes
	/// that found the credential already rotated by a concurrent flow.
	pub fn recoveries(&self) -> u64 {
		self.recoveries.load(Ordering::Relaxed)
	}

	/// Number of passes that invalidated the session and redirected to login.
	pub fn invalidations(&self) -> u64 {
		self.invalidations.load(Ordering::Relaxed)
	}

	/// Number of passes that failed without touching stored credentials.
	pub fn transient_failures(&self) -> u64 {
		self.transient_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_recovery(&self) {
		self.recoveries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_invalidation(&self) {
		self.invalidations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_transient_failure(&self) {
		self.transient_failures.fetch_add(1, Ordering::Relaxed);
	}
}
