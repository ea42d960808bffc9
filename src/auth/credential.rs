//! Credential kinds, redacted secret wrappers, and the issued credential pair.

// self
use crate::_prelude::*;

/// The two credential slots a client session owns.
///
/// The discriminants map 1:1 onto the persistent storage keys (`"access"` and
/// `"refresh"`), which are part of the on-disk contract and must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
	/// Short-lived token carried on every request.
	Access,
	/// Longer-lived token used solely to mint a new access credential.
	Refresh,
}
impl CredentialKind {
	/// Storage key under which this credential kind is persisted.
	pub const fn storage_key(self) -> &'static str {
		match self {
			Self::Access => "access",
			Self::Refresh => "refresh",
		}
	}

	/// Reverse lookup from a persisted storage key.
	pub fn from_storage_key(key: &str) -> Option<Self> {
		match key {
			"access" => Some(Self::Access),
			"refresh" => Some(Self::Refresh),
			_ => None,
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.storage_key())
	}
}

/// Redacted credential wrapper keeping token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSecret(String);
impl CredentialSecret {
	/// Wraps a new credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner credential value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CredentialSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for CredentialSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for CredentialSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for CredentialSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CredentialSecret").field(&"<redacted>").finish()
	}
}
impl Display for CredentialSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access/refresh pair issued by the backend on login.
///
/// Field names mirror the wire body (`{"access": ..., "refresh": ...}`) so the struct
/// deserializes straight from the token endpoint response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived access credential.
	pub access: CredentialSecret,
	/// Longer-lived refresh credential.
	pub refresh: CredentialSecret,
}
impl CredentialPair {
	/// Builds a pair from the two raw token strings.
	pub fn new(access: impl Into<CredentialSecret>, refresh: impl Into<CredentialSecret>) -> Self {
		Self { access: access.into(), refresh: refresh.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn storage_keys_round_trip() {
		for kind in [CredentialKind::Access, CredentialKind::Refresh] {
			assert_eq!(CredentialKind::from_storage_key(kind.storage_key()), Some(kind));
		}

		assert_eq!(CredentialKind::from_storage_key("session"), None);
	}

	#[test]
	fn storage_keys_are_wire_exact() {
		assert_eq!(CredentialKind::Access.storage_key(), "access");
		assert_eq!(CredentialKind::Refresh.storage_key(), "refresh");
	}

	#[test]
	fn secret_formatters_redact() {
		let secret = CredentialSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "CredentialSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn pair_deserializes_from_wire_shape() {
		let pair = serde_json::from_str::<CredentialPair>(r#"{"access":"a.b.c","refresh":"d.e.f"}"#)
			.expect("Login response body must deserialize.");

		assert_eq!(pair.access.expose(), "a.b.c");
		assert_eq!(pair.refresh.expose(), "d.e.f");
	}
}
