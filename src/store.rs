//! Storage contracts and built-in credential store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, CredentialSecret},
};

/// Future type returned by credential store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the session's credential pair.
///
/// A store holds at most one value per [`CredentialKind`]; `set` always overwrites the
/// prior value. The gateway and the session flows share one store instance, which makes
/// it the in-process coordination point for credential state. Writers in other
/// processes are not coordinated.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the stored value for the credential kind, if present.
	fn get(&self, kind: CredentialKind) -> StoreFuture<'_, Option<CredentialSecret>>;

	/// Persists or replaces the value for the credential kind.
	fn set(&self, kind: CredentialKind, value: CredentialSecret) -> StoreFuture<'_, ()>;

	/// Removes the stored value for the credential kind.
	///
	/// Removing an absent value is a no-op, not an error.
	fn remove(&self, kind: CredentialKind) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures (e.g., serde) surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unreachable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("disk unreachable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
