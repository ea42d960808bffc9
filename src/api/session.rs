//! Session lifecycle: sign-in, registration, sign-out, and state inspection.

// self
use crate::{
	_prelude::*,
	auth::{AuthState, CredentialKind, CredentialPair},
	backend::routes,
	gateway::{ApiRequest, Gateway},
	http::Transport,
};

/// Sign-in form.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl LoginCredentials {
	/// Builds the form from its two raw parts.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for LoginCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginCredentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Account registration form.
///
/// `password1`/`password2` mirror the backend's confirmation pair; the backend rejects
/// the registration when they differ.
#[derive(Clone, Serialize)]
pub struct Registration {
	/// Desired unique handle.
	pub username: String,
	/// Account email.
	pub email: String,
	/// Chosen password.
	pub password1: String,
	/// Password confirmation, must match `password1`.
	pub password2: String,
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password1", &"<redacted>")
			.field("password2", &"<redacted>")
			.finish()
	}
}

/// Wire body sent to the logout endpoint.
#[derive(Serialize)]
struct LogoutBody<'a> {
	refresh: &'a str,
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Signs in with email and password, persisting both minted credentials.
	///
	/// Returns the authentication state decoded from the fresh access credential so a
	/// host UI can render the signed-in identity without a second store read.
	pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthState> {
		let pair = self
			.execute::<CredentialPair>(ApiRequest::post(routes::TOKEN).with_json(credentials)?)
			.await?;
		let state = AuthState::from_access(Some(&pair.access));

		self.store.set(CredentialKind::Access, pair.access).await?;
		self.store.set(CredentialKind::Refresh, pair.refresh).await?;

		Ok(state)
	}

	/// Registers a new account.
	///
	/// Registration does not sign the account in; call [`Gateway::login`] afterwards.
	pub async fn register(&self, registration: &Registration) -> Result<()> {
		self.execute_empty(ApiRequest::post(routes::REGISTER).with_json(registration)?).await
	}

	/// Signs out: revokes the stored refresh credential and clears the store.
	///
	/// Local credentials are cleared even when the revocation call fails, so a dead
	/// backend can never pin a client to a stale session; the call's failure still
	/// reaches the caller afterwards.
	pub async fn logout(&self) -> Result<()> {
		let refresh = self.store.get(CredentialKind::Refresh).await?;
		let body = LogoutBody {
			refresh: refresh.as_ref().map(|secret| secret.expose()).unwrap_or_default(),
		};
		let outcome = self.execute_empty(ApiRequest::post(routes::LOGOUT).with_json(&body)?).await;

		self.store.remove(CredentialKind::Access).await?;
		self.store.remove(CredentialKind::Refresh).await?;

		outcome
	}

	/// Reports the authentication state derived from the stored access credential.
	pub async fn auth_state(&self) -> Result<AuthState> {
		let access = self.store.get(CredentialKind::Access).await?;

		Ok(AuthState::from_access(access.as_ref()))
	}
}
