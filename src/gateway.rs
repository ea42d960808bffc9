//! Authenticated request gateway wrapping a transport with credential handling.

pub mod refresh;
pub mod request;

mod dispatch;

pub use refresh::*;
pub use request::*;

// self
use crate::{
	_prelude::*,
	backend::BackendDescriptor,
	http::Transport,
	nav::{Navigator, NoopNavigator},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Makes every request carry valid authentication and recovers transparently from
/// access-credential expiry.
///
/// The gateway owns the transport, credential store, navigator, and backend descriptor
/// so the dispatch and refresh paths can focus on the decision tree: attach the stored
/// access credential on the way out, detect HTTP 401 on the way in, refresh once
/// through the bare transport path, replay the failed request once, or invalidate the
/// session and point the navigator at the login entry.
#[derive(Clone)]
pub struct Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Transport executing every outbound request.
	pub transport: Arc<T>,
	/// Credential store shared with the session flows.
	pub store: Arc<dyn CredentialStore>,
	/// Navigator notified when the session becomes terminally invalid.
	pub navigator: Arc<dyn Navigator>,
	/// Backend descriptor defining routes and session policy.
	pub descriptor: BackendDescriptor,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_transport(
		descriptor: BackendDescriptor,
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			navigator: Arc::new(NoopNavigator),
			descriptor,
			refresh_metrics: Default::default(),
			refresh_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Sets or replaces the navigator notified on forced logouts.
	pub fn with_navigator(mut self, navigator: impl Into<Arc<dyn Navigator>>) -> Self {
		self.navigator = navigator.into();

		self
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a new gateway for the provided descriptor and credential store.
	///
	/// The gateway provisions its own reqwest-backed transport so callers do not need
	/// to pass HTTP handles explicitly. Use [`Gateway::with_navigator`] to receive
	/// forced-logout redirects when the host renders a login screen.
	pub fn new(descriptor: BackendDescriptor, store: Arc<dyn CredentialStore>) -> Self {
		Self::with_transport(descriptor, store, ReqwestTransport::default())
	}
}
impl<T> Debug for Gateway<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").field("descriptor", &self.descriptor).finish()
	}
}
