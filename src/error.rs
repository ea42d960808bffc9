//! Client-level error types shared across the gateway, stores, and resource APIs.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend answered with a non-success HTTP status.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// No refresh credential is stored, so the session cannot be renewed.
	#[error("Refresh credential is missing; a new sign-in is required.")]
	MissingRefreshCredential,
	/// Backend rejected the stored refresh credential.
	#[error("Backend rejected the refresh credential with HTTP {status}; a new sign-in is required.")]
	RefreshRejected {
		/// Status code returned by the refresh endpoint.
		status: u16,
	},
}
impl Error {
	/// Returns the embedded [`ApiError`] when the failure is a backend response.
	pub fn as_api(&self) -> Option<&ApiError> {
		match self {
			Self::Api(api) => Some(api),
			_ => None,
		}
	}
}

/// Completed backend response carrying a non-success HTTP status.
///
/// The gateway preserves this as the "original error" across refresh handling, so the
/// request context (method, url) stays attached no matter which recovery branch ran.
#[derive(Clone, Debug)]
pub struct ApiError {
	/// HTTP status code of the response.
	pub status: u16,
	/// HTTP method of the originating request.
	pub method: crate::http::Method,
	/// Full URL of the originating request.
	pub url: Url,
	/// Machine-readable error code from the body (`code` field), when present.
	pub code: Option<String>,
	/// Human-readable explanation from the body (`detail` field), when present.
	pub detail: Option<String>,
	/// Truncated raw-body preview for payloads that are not detail-shaped JSON.
	pub body_preview: Option<String>,
}
impl ApiError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Builds an error from a completed response, extracting `detail`/`code` fields from
	/// JSON bodies and falling back to a truncated preview for everything else.
	pub fn from_response(
		method: crate::http::Method,
		url: Url,
		status: u16,
		body: &[u8],
	) -> Self {
		let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
		let field = |name: &str| {
			parsed
				.as_ref()
				.and_then(|value| value.get(name))
				.and_then(serde_json::Value::as_str)
				.map(ToOwned::to_owned)
		};
		let detail = field("detail");
		let code = field("code");
		let body_preview = if detail.is_none() && code.is_none() {
			let text = String::from_utf8_lossy(body);
			let trimmed = text.trim();

			if trimmed.is_empty() { None } else { Some(truncate_preview(trimmed)) }
		} else {
			None
		};

		Self { status, method, url, code, detail, body_preview }
	}

	/// Returns `true` when the response status signals an authentication failure.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}
}
impl Display for ApiError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Backend returned HTTP {} for {} {}", self.status, self.method, self.url)?;

		if let Some(detail) = &self.detail {
			write!(f, ": {detail}")?;
		} else if let Some(preview) = &self.body_preview {
			write!(f, ": {preview}")?;
		}

		f.write_str(".")
	}
}
impl StdError for ApiError {}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Backend descriptor rejected its inputs.
	#[error(transparent)]
	Descriptor(#[from] crate::backend::BackendDescriptorError),
	/// A request path does not form a valid URL against the configured base.
	#[error("Path `{path}` does not form a valid endpoint URL.")]
	InvalidEndpoint {
		/// Path that failed to join.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Query parameters could not be serialized into a query string.
	#[error("Query parameters could not be serialized.")]
	QuerySerialization {
		/// Underlying serializer failure.
		#[source]
		source: serde_urlencoded::ser::Error,
	},
	/// JSON request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialization {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Refresh endpoint returned an unexpected but non-fatal response.
	#[error("Refresh endpoint returned an unexpected response: {message}.")]
	RefreshEndpoint {
		/// Summary of the unexpected response.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Backend responded with JSON that does not match the expected shape.
	#[error("Backend returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Request did not complete within its timeout.
	#[error("Request timed out before the backend responded.")]
	Timeout,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Outbound request could not be constructed from its description.
	#[error("Outbound request is malformed: {message}.")]
	MalformedRequest {
		/// What the transport rejected.
		message: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout
		} else if e.is_builder() {
			Self::MalformedRequest { message: e.to_string() }
		} else {
			Self::network(e)
		}
	}
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= ApiError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ApiError::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::Method;

	fn parse_url(raw: &str) -> Url {
		Url::parse(raw).expect("Test URL must parse.")
	}

	#[test]
	fn api_error_extracts_detail_and_code() {
		let body = br#"{"detail":"Given token not valid for any token type","code":"token_not_valid"}"#;
		let err =
			ApiError::from_response(Method::Get, parse_url("https://zine.test/posts/"), 401, body);

		assert_eq!(err.detail.as_deref(), Some("Given token not valid for any token type"));
		assert_eq!(err.code.as_deref(), Some("token_not_valid"));
		assert!(err.body_preview.is_none());
		assert!(err.is_unauthorized());
		assert!(err.to_string().contains("HTTP 401 for GET https://zine.test/posts/"));
	}

	#[test]
	fn api_error_previews_non_json_bodies() {
		let err = ApiError::from_response(
			Method::Post,
			parse_url("https://zine.test/comments/"),
			502,
			b"<html>bad gateway</html>",
		);

		assert!(err.detail.is_none());
		assert_eq!(err.body_preview.as_deref(), Some("<html>bad gateway</html>"));
		assert!(!err.is_unauthorized());
	}

	#[test]
	fn api_error_truncates_long_previews() {
		let body = "x".repeat(ApiError::BODY_PREVIEW_LIMIT + 64);
		let err = ApiError::from_response(
			Method::Get,
			parse_url("https://zine.test/tags/"),
			500,
			body.as_bytes(),
		);
		let preview = err.body_preview.expect("Long bodies must keep a preview.");

		assert_eq!(preview.chars().count(), ApiError::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}

	#[test]
	fn api_error_skips_preview_for_empty_bodies() {
		let err =
			ApiError::from_response(Method::Delete, parse_url("https://zine.test/posts/a/"), 401, b"");

		assert!(err.detail.is_none());
		assert!(err.body_preview.is_none());
	}
}
