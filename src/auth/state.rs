//! Derived session snapshot.

// self
use crate::{_prelude::*, auth::{AccessClaims, CredentialSecret}};

/// Snapshot of the client session derived from the stored access credential.
///
/// `claims` is best-effort: a present but undecodable access token (opaque format,
/// truncated storage) still counts as authenticated, it just yields no identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
	/// Whether an access credential is currently stored.
	pub authenticated: bool,
	/// Decoded identity claims, when the access token carried a readable payload.
	pub claims: Option<AccessClaims>,
}
impl AuthState {
	/// Snapshot for a session with no stored access credential.
	pub const fn anonymous() -> Self {
		Self { authenticated: false, claims: None }
	}

	/// Derives the snapshot from an optionally stored access credential.
	pub fn from_access(access: Option<&CredentialSecret>) -> Self {
		match access {
			Some(secret) => Self {
				authenticated: true,
				claims: AccessClaims::decode(secret.expose()).ok(),
			},
			None => Self::anonymous(),
		}
	}
}
