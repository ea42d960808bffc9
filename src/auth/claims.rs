//! Unverified access-token claims decoding.
//!
//! The backend issues JWT access tokens whose payload carries the signed-in user's
//! identity. The client never verifies signatures (it has no key material and gains
//! nothing from verification; the backend re-checks every request anyway), it only
//! decodes the claims segment for display and expiry hints.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Identity claims carried in the access token payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
	/// Backend user identifier.
	pub user_id: i64,
	/// Display/user name.
	pub username: String,
	/// Account email address.
	pub email: String,
	/// Expiry instant (`exp`, unix seconds on the wire).
	#[serde(with = "time::serde::timestamp")]
	pub exp: OffsetDateTime,
	/// Issuance instant (`iat`, unix seconds on the wire).
	#[serde(with = "time::serde::timestamp")]
	pub iat: OffsetDateTime,
}
impl AccessClaims {
	/// Decodes the claims segment of a JWT access token without verifying its signature.
	pub fn decode(token: &str) -> Result<Self, ClaimsError> {
		let mut segments = token.split('.');
		let (Some(header), Some(payload), Some(_signature), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(ClaimsError::MalformedToken);
		};

		if header.is_empty() || payload.is_empty() {
			return Err(ClaimsError::MalformedToken);
		}

		let raw = URL_SAFE_NO_PAD.decode(payload)?;
		let mut deserializer = serde_json::Deserializer::from_slice(&raw);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ClaimsError::Json { source })
	}

	/// Returns `true` when the token is expired relative to the provided instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.exp <= now
	}
}

/// Failures raised while decoding access-token claims.
#[derive(Debug, ThisError)]
pub enum ClaimsError {
	/// Token is not a three-segment JWT.
	#[error("Access token is not a three-segment JWT.")]
	MalformedToken,
	/// Claims segment is not valid base64url.
	#[error("Access token claims segment is not valid base64url.")]
	Base64(#[from] base64::DecodeError),
	/// Claims payload is not the expected JSON shape.
	#[error("Access token claims payload is malformed.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
}
