//! Backend descriptor: base URL, route table, and session policy knobs.

/// Route templates exposed by the backend.
pub mod routes {
	//! Fixed route constants, bit-exact to the backend's URL layout. Slug- and
	//! id-parameterized routes are formatted where they are used.

	/// Token issuance (login) endpoint.
	pub const TOKEN: &str = "/auth/token/";
	/// Token refresh endpoint.
	pub const TOKEN_REFRESH: &str = "/auth/token/refresh/";
	/// Account registration endpoint.
	pub const REGISTER: &str = "/auth/register/";
	/// Session logout endpoint.
	pub const LOGOUT: &str = "/auth/logout/";
	/// Post collection endpoint.
	pub const POSTS: &str = "/posts/";
	/// Personalized post feed endpoint.
	pub const POST_FEED: &str = "/posts/feed/";
	/// Favourited posts endpoint.
	pub const POST_FAVOURITES: &str = "/posts/favourites/";
	/// Comment collection endpoint.
	pub const COMMENTS: &str = "/comments/";
	/// Profile collection endpoint.
	pub const PROFILES: &str = "/profiles/";
	/// Tag collection endpoint.
	pub const TAGS: &str = "/tags/";
}

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable backend descriptor consumed by the gateway.
///
/// Defaults mirror the platform's stock deployment; override them only when the
/// backend is mounted elsewhere or the host app owns a different login screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
	/// Base URL every route is resolved against.
	pub base: Url,
	/// Bound for the dedicated refresh call.
	pub refresh_timeout: Duration,
	/// Path the navigator is pointed at on terminal authentication failure.
	pub login_path: String,
}
impl BackendDescriptor {
	/// Default bound for the dedicated refresh call.
	pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::milliseconds(5_000);
	/// Default login entry point.
	pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

	/// Creates a descriptor for the provided base URL with stock policy defaults.
	pub fn new(base: Url) -> Result<Self, BackendDescriptorError> {
		if base.cannot_be_a_base() {
			return Err(BackendDescriptorError::CannotBeABase { url: base.to_string() });
		}
		if !matches!(base.scheme(), "http" | "https") {
			return Err(BackendDescriptorError::UnsupportedScheme {
				scheme: base.scheme().to_owned(),
				url: base.to_string(),
			});
		}

		Ok(Self {
			base,
			refresh_timeout: Self::DEFAULT_REFRESH_TIMEOUT,
			login_path: Self::DEFAULT_LOGIN_PATH.to_owned(),
		})
	}

	/// Overrides the refresh call bound.
	pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = timeout;

		self
	}

	/// Overrides the login entry point path.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Resolves a route path against the base URL.
	///
	/// Plain concatenation instead of [`Url::join`]: a base of `.../api` must keep its
	/// final segment rather than have the route replace it.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let base = self.base.as_str().trim_end_matches('/');
		let route = path.strip_prefix('/').unwrap_or(path);
		let full = format!("{base}/{route}");

		Url::parse(&full)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}
}

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum BackendDescriptorError {
	/// Base URL cannot serve as a base for route resolution.
	#[error("Base URL cannot be a base: {url}.")]
	CannotBeABase {
		/// URL that failed validation.
		url: String,
	},
	/// Base URL scheme is neither `http` nor `https`.
	#[error("Base URL scheme `{scheme}` is unsupported: {url}.")]
	UnsupportedScheme {
		/// Scheme that failed validation.
		scheme: String,
		/// URL that failed validation.
		url: String,
	},
}
