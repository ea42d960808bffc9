//! Request templates and credential augmentation.

// self
use crate::{
	_prelude::*,
	auth::CredentialSecret,
	backend::BackendDescriptor,
	error::ConfigError,
	http::{Method, TransportRequest},
};

/// Header carrying the access credential.
pub(crate) const AUTHORIZATION_HEADER: &str = "authorization";
/// Media type sent with every request.
pub(crate) const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");
/// Scheme prefix applied to attached access credentials.
pub(crate) const BEARER_PREFIX: &str = "Bearer";

/// Template of an outgoing request, kept apart from any wire form so fault handling can
/// replay it exactly once.
///
/// The first dispatch and a post-refresh replay both materialize their wire request
/// from this template, which makes the two identical except for the credential read at
/// augmentation time.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Route path relative to the descriptor base, leading slash included.
	pub path: String,
	/// Pre-serialized query string, when present.
	pub query: Option<String>,
	/// JSON body payload, when present.
	pub body: Option<Value>,
	/// Per-call timeout override.
	pub timeout: Option<Duration>,
}
impl ApiRequest {
	/// Creates a template for the provided method and path.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: None, body: None, timeout: None }
	}

	/// Creates a GET template.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Creates a POST template.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Creates a PATCH template.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Creates a DELETE template.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Serializes and attaches query parameters.
	///
	/// The parameters are encoded eagerly so a replayed request carries byte-identical
	/// query arguments.
	pub fn with_query<Q>(mut self, params: &Q) -> Result<Self, ConfigError>
	where
		Q: Serialize,
	{
		let encoded = serde_urlencoded::to_string(params)
			.map_err(|source| ConfigError::QuerySerialization { source })?;

		self.query = if encoded.is_empty() { None } else { Some(encoded) };

		Ok(self)
	}

	/// Serializes and attaches a JSON body.
	pub fn with_json<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: Serialize,
	{
		self.body = Some(
			serde_json::to_value(body).map_err(|source| ConfigError::BodySerialization { source })?,
		);

		Ok(self)
	}

	/// Overrides the per-call timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Materializes the wire request and augments it with the access credential.
	pub(crate) fn to_transport(
		&self,
		descriptor: &BackendDescriptor,
		access: Option<&CredentialSecret>,
	) -> Result<TransportRequest, ConfigError> {
		let mut url = descriptor.endpoint(&self.path)?;

		if let Some(query) = &self.query {
			url.set_query(Some(query));
		}

		let body = self
			.body
			.as_ref()
			.map(serde_json::to_vec)
			.transpose()
			.map_err(|source| ConfigError::BodySerialization { source })?;
		let mut request = TransportRequest {
			method: self.method,
			url,
			headers: vec![(CONTENT_TYPE_JSON.0.into(), CONTENT_TYPE_JSON.1.into())],
			body,
			timeout: self.timeout,
		};

		attach_authorization(&mut request, access);

		Ok(request)
	}
}

/// Sets the `Authorization` header from the optional access credential.
///
/// Replaces any existing entry, so running augmentation again never stacks scheme
/// prefixes, and writes an explicitly empty value when no credential is stored.
pub(crate) fn attach_authorization(
	request: &mut TransportRequest,
	access: Option<&CredentialSecret>,
) {
	let value = match access {
		Some(secret) => format!("{BEARER_PREFIX} {}", secret.expose()),
		None => String::new(),
	};

	request.headers.retain(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
	request.headers.push((AUTHORIZATION_HEADER.into(), value));
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::backend::routes;

	fn descriptor() -> BackendDescriptor {
		BackendDescriptor::new("http://127.0.0.1:8000".parse().expect("URL must be valid."))
			.expect("Descriptor must be valid.")
	}

	fn authorization_values(request: &TransportRequest) -> Vec<&str> {
		request
			.headers
			.iter()
			.filter(|(name, _)| name == AUTHORIZATION_HEADER)
			.map(|(_, value)| value.as_str())
			.collect()
	}

	#[test]
	fn augmentation_attaches_bearer_scheme() {
		let secret = CredentialSecret::from("access.jwt");
		let request = ApiRequest::get(routes::POSTS)
			.to_transport(&descriptor(), Some(&secret))
			.expect("Request must materialize.");

		assert_eq!(authorization_values(&request), ["Bearer access.jwt"]);
	}

	#[test]
	fn augmentation_writes_empty_value_without_credential() {
		let request = ApiRequest::get(routes::POSTS)
			.to_transport(&descriptor(), None)
			.expect("Request must materialize.");

		assert_eq!(authorization_values(&request), [""]);
	}

	#[test]
	fn augmentation_is_idempotent() {
		let secret = CredentialSecret::from("access.jwt");
		let mut request = ApiRequest::get(routes::POSTS)
			.to_transport(&descriptor(), Some(&secret))
			.expect("Request must materialize.");

		attach_authorization(&mut request, Some(&secret));
		attach_authorization(&mut request, Some(&CredentialSecret::from("rotated.jwt")));

		assert_eq!(authorization_values(&request), ["Bearer rotated.jwt"]);
	}

	#[test]
	fn query_is_serialized_eagerly() {
		#[derive(Serialize)]
		struct Filters<'a> {
			search: &'a str,
			page: u32,
		}

		let request = ApiRequest::get(routes::POSTS)
			.with_query(&Filters { search: "rust", page: 2 })
			.expect("Query must serialize.")
			.to_transport(&descriptor(), None)
			.expect("Request must materialize.");

		assert_eq!(request.url.query(), Some("search=rust&page=2"));
	}

	#[test]
	fn empty_query_is_elided() {
		#[derive(Serialize)]
		struct Filters {}

		let request = ApiRequest::get(routes::POSTS)
			.with_query(&Filters {})
			.expect("Query must serialize.");

		assert_eq!(request.query, None);
	}

	#[test]
	fn content_type_is_always_json() {
		let request = ApiRequest::delete(routes::POSTS)
			.to_transport(&descriptor(), None)
			.expect("Request must materialize.");

		assert!(request
			.headers
			.iter()
			.any(|(name, value)| (name.as_str(), value.as_str()) == CONTENT_TYPE_JSON));
	}
}
