//! Dispatch path: credential augmentation, send, fault handoff, and decoding.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::CredentialKind,
	error::{ApiError, TransientError},
	gateway::{ApiRequest, Gateway, refresh},
	http::{Method, Transport, TransportResponse},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Completed wire response paired with the request context that produced it.
#[derive(Clone, Debug)]
pub(crate) struct RawResponse {
	pub(crate) status: u16,
	pub(crate) body: Vec<u8>,
	pub(crate) method: Method,
	pub(crate) url: Url,
}
impl RawResponse {
	pub(crate) fn new(method: Method, url: Url, response: TransportResponse) -> Self {
		Self { status: response.status, body: response.body, method, url }
	}

	pub(crate) fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	pub(crate) fn into_api_error(self) -> ApiError {
		ApiError::from_response(self.method, self.url, self.status, &self.body)
	}
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Executes a request through the authenticated path and decodes the JSON response.
	///
	/// Non-2xx responses surface as [`Error::Api`](crate::error::Error::Api) carrying
	/// the backend's diagnostic payload; an HTTP 401 only reaches the caller after the
	/// refresh-and-replay pass has run its course.
	pub async fn execute<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let raw = self.dispatch(request).await?;

		if !raw.is_success() {
			return Err(raw.into_api_error().into());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&raw.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransientError::ResponseParse { source, status: Some(raw.status) }.into()
		})
	}

	/// Executes a request through the authenticated path, discarding the response body.
	pub async fn execute_empty(&self, request: ApiRequest) -> Result<()> {
		let raw = self.dispatch(request).await?;

		if raw.is_success() { Ok(()) } else { Err(raw.into_api_error().into()) }
	}

	/// Sends one request and hands HTTP 401 responses to the fault handler.
	///
	/// Every other status, success or failure, passes through untouched with zero
	/// credential side effects.
	pub(crate) async fn dispatch(&self, request: ApiRequest) -> Result<RawResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "dispatch");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let access = self.store.get(CredentialKind::Access).await?;
				let wire = request.to_transport(&self.descriptor, access.as_ref())?;
				let url = wire.url.clone();
				let response = self.transport.execute(wire).await?;
				let raw = RawResponse::new(request.method, url, response);

				if raw.status != refresh::UNAUTHORIZED {
					return Ok(raw);
				}

				self.handle_unauthorized(request, raw, access).await
			})
			.await;

		match &result {
			Ok(raw) if raw.is_success() => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			_ => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
