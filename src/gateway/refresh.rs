//! Reactive credential refresh with a singleflight guard and terminal fallbacks.
//!
//! An HTTP 401 on the authenticated path lands here. The pass re-reads the store under
//! the guard, calls the refresh endpoint through the bare transport path, persists the
//! minted access credential, and lets the dispatcher replay the failed request exactly
//! once. Sessions that cannot be recovered are invalidated: the relevant credentials
//! are cleared, the navigator is pointed at the login entry, and the original error
//! reaches the caller unchanged.

mod metrics;
pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, CredentialSecret},
	backend::routes,
	error::{ConfigError, TransientError},
	gateway::{ApiRequest, Gateway, dispatch::RawResponse, request},
	http::{Method, Transport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Status signaling an expired or missing access credential.
pub(crate) const UNAUTHORIZED: u16 = 401;
/// Refresh endpoint statuses that mean the refresh credential itself was rejected.
const REFRESH_REJECTION_STATUSES: [u16; 2] = [400, UNAUTHORIZED];

/// Wire body sent to the refresh endpoint.
#[derive(Serialize)]
struct RefreshRequestBody<'a> {
	refresh: &'a str,
}
/// Wire body returned by the refresh endpoint.
#[derive(Deserialize)]
struct RefreshGrant {
	access: CredentialSecret,
}

/// How a refresh pass entered the decision tree.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RefreshMode<'a> {
	/// Fault-handling pass carrying the access value the failed request sent, used to
	/// detect rotations performed by a concurrent flow while this one awaited the
	/// guard.
	Reactive {
		/// Access credential attached to the request that drew the HTTP 401.
		observed_access: Option<&'a str>,
	},
	/// Caller-requested pass that always performs the refresh call.
	Forced,
}

/// Outcome of one pass through the refresh decision tree.
#[derive(Debug)]
pub(crate) enum RefreshOutcome {
	/// A new access credential was minted and persisted.
	Refreshed,
	/// A concurrent flow rotated the credential while this pass awaited the guard.
	AlreadyRotated,
	/// No refresh credential is stored; the session was invalidated.
	MissingRefresh,
	/// The backend rejected the refresh credential; the session was invalidated.
	Rejected {
		/// Status returned by the refresh endpoint.
		status: u16,
	},
	/// The refresh call failed for infrastructure reasons; credentials are untouched.
	Unavailable {
		/// Failure that interrupted the call.
		error: Error,
	},
}

/// Failure of the refresh endpoint call itself, before outcome side effects apply.
enum RefreshCallError {
	Rejected { status: u16 },
	Unavailable { error: Error },
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Refreshes the access credential on demand through the same singleflight path the
	/// fault handler uses.
	///
	/// Returns [`Error::MissingRefreshCredential`] when no refresh credential is stored
	/// and [`Error::RefreshRejected`] when the backend turns the stored one away; both
	/// cases clear credentials and redirect exactly as a failed in-flight recovery
	/// would.
	pub async fn refresh_access(&self) -> Result<()> {
		match self.refresh_once(RefreshMode::Forced).await? {
			RefreshOutcome::Refreshed | RefreshOutcome::AlreadyRotated => Ok(()),
			RefreshOutcome::MissingRefresh => Err(Error::MissingRefreshCredential),
			RefreshOutcome::Rejected { status } => Err(Error::RefreshRejected { status }),
			RefreshOutcome::Unavailable { error } => Err(error),
		}
	}

	/// Handles an HTTP 401 from the authenticated path: refresh once, replay once, or
	/// invalidate the session and surface the original error.
	pub(crate) async fn handle_unauthorized(
		&self,
		request: ApiRequest,
		original: RawResponse,
		sent_access: Option<CredentialSecret>,
	) -> Result<RawResponse> {
		let original_error = original.into_api_error();
		let mode =
			RefreshMode::Reactive { observed_access: sent_access.as_ref().map(|s| s.expose()) };

		match self.refresh_once(mode).await? {
			RefreshOutcome::Refreshed | RefreshOutcome::AlreadyRotated =>
				self.replay(request).await,
			RefreshOutcome::MissingRefresh
			| RefreshOutcome::Rejected { .. }
			| RefreshOutcome::Unavailable { .. } => Err(original_error.into()),
		}
	}

	/// Replays the failed request exactly once, re-reading the store so the retry
	/// carries the credential minted by the refresh pass.
	async fn replay(&self, request: ApiRequest) -> Result<RawResponse> {
		let access = self.store.get(CredentialKind::Access).await?;
		let wire = request.to_transport(&self.descriptor, access.as_ref())?;
		let url = wire.url.clone();
		let response = self.transport.execute(wire).await?;

		Ok(RawResponse::new(request.method, url, response))
	}

	/// Runs one pass through the refresh decision tree under the singleflight guard.
	pub(crate) async fn refresh_once(&self, mode: RefreshMode<'_>) -> Result<RefreshOutcome> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_once");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let _singleflight = self.refresh_guard.lock().await;

				if let RefreshMode::Reactive { observed_access } = mode {
					let stored = self.store.get(CredentialKind::Access).await?;
					let rotated = match (observed_access, stored.as_ref()) {
						(Some(observed), Some(stored)) => stored.expose() != observed,
						(None, Some(_)) => true,
						_ => false,
					};

					if rotated {
						return Ok(RefreshOutcome::AlreadyRotated);
					}
				}

				let Some(refresh) = self.store.get(CredentialKind::Refresh).await? else {
					self.store.remove(CredentialKind::Access).await?;
					self.navigator.redirect(&self.descriptor.login_path);

					return Ok(RefreshOutcome::MissingRefresh);
				};

				match self.call_refresh_endpoint(&refresh).await {
					Ok(grant) => {
						self.store.set(CredentialKind::Access, grant.access).await?;

						Ok(RefreshOutcome::Refreshed)
					},
					Err(RefreshCallError::Rejected { status }) => {
						self.store.remove(CredentialKind::Access).await?;
						self.store.remove(CredentialKind::Refresh).await?;
						self.navigator.redirect(&self.descriptor.login_path);

						Ok(RefreshOutcome::Rejected { status })
					},
					Err(RefreshCallError::Unavailable { error }) =>
						Ok(RefreshOutcome::Unavailable { error }),
				}
			})
			.await;

		match &result {
			Ok(RefreshOutcome::Refreshed | RefreshOutcome::AlreadyRotated) => {
				self.refresh_metrics.record_recovery();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Ok(RefreshOutcome::MissingRefresh | RefreshOutcome::Rejected { .. }) => {
				self.refresh_metrics.record_invalidation();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
			Ok(RefreshOutcome::Unavailable { .. }) | Err(_) => {
				self.refresh_metrics.record_transient_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	/// Calls the refresh endpoint through the bare transport path.
	///
	/// The call deliberately bypasses [`dispatch`](Gateway::dispatch): it must not
	/// re-enter augmentation or fault handling, and it runs under the descriptor's
	/// dedicated refresh timeout.
	async fn call_refresh_endpoint(
		&self,
		refresh: &CredentialSecret,
	) -> Result<RefreshGrant, RefreshCallError> {
		let unavailable = |error: Error| RefreshCallError::Unavailable { error };
		let url = self
			.descriptor
			.endpoint(routes::TOKEN_REFRESH)
			.map_err(|e| unavailable(e.into()))?;
		let body = serde_json::to_vec(&RefreshRequestBody { refresh: refresh.expose() })
			.map_err(|source| unavailable(ConfigError::BodySerialization { source }.into()))?;
		let wire = TransportRequest {
			method: Method::Post,
			url,
			headers: vec![(request::CONTENT_TYPE_JSON.0.into(), request::CONTENT_TYPE_JSON.1.into())],
			body: Some(body),
			timeout: Some(self.descriptor.refresh_timeout),
		};
		let response = self.transport.execute(wire).await.map_err(|e| unavailable(e.into()))?;

		if REFRESH_REJECTION_STATUSES.contains(&response.status) {
			return Err(RefreshCallError::Rejected { status: response.status });
		}
		if !response.is_success() {
			return Err(unavailable(
				TransientError::RefreshEndpoint {
					message: format!("refresh endpoint answered HTTP {}", response.status),
					status: Some(response.status),
				}
				.into(),
			));
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			unavailable(TransientError::ResponseParse { source, status: Some(response.status) }.into())
		})
	}
}
