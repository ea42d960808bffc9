//! Navigation seam delivering forced-login redirects to the host application.

// self
use crate::_prelude::*;

/// Redirect sink the gateway notifies when a session becomes terminally invalid.
///
/// The gateway only ever sends the configured login path; hosts decide what a
/// redirect means for them (swap a view, open a browser window, print a sign-in hint).
/// Delivery is fire-and-forget and must not block.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Delivers a redirect request for the provided path.
	fn redirect(&self, path: &str);
}

/// Navigator that drops every redirect; the default for headless embedders.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn redirect(&self, _path: &str) {}
}

/// Navigator that records redirect paths so hosts and tests can poll them.
#[derive(Debug, Default)]
pub struct RecordingNavigator(Mutex<Vec<String>>);
impl RecordingNavigator {
	/// Returns and clears every recorded redirect path, oldest first.
	pub fn take(&self) -> Vec<String> {
		std::mem::take(&mut *self.0.lock())
	}

	/// Returns the most recent redirect path without clearing the record.
	pub fn last(&self) -> Option<String> {
		self.0.lock().last().cloned()
	}
}
impl Navigator for RecordingNavigator {
	fn redirect(&self, path: &str) {
		self.0.lock().push(path.to_owned());
	}
}
