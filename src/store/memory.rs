//! Thread-safe in-memory [`CredentialStore`] implementation for tests and ephemeral sessions.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, CredentialSecret},
	store::{CredentialStore, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<CredentialKind, CredentialSecret>>>;

/// In-process credential store backing tests, demos, and programs that should not
/// persist sessions across restarts. Operations cannot fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Synchronous read used to seed and inspect state in tests.
	pub fn get_now(&self, kind: CredentialKind) -> Option<CredentialSecret> {
		self.0.read().get(&kind).cloned()
	}

	/// Synchronous write used to seed state in tests.
	pub fn set_now(&self, kind: CredentialKind, value: impl Into<CredentialSecret>) {
		self.0.write().insert(kind, value.into());
	}

	/// Synchronous removal used to reset state in tests.
	pub fn remove_now(&self, kind: CredentialKind) {
		self.0.write().remove(&kind);
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self, kind: CredentialKind) -> StoreFuture<'_, Option<CredentialSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&kind).cloned()) })
	}

	fn set(&self, kind: CredentialKind, value: CredentialSecret) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(kind, value);

			Ok(())
		})
	}

	fn remove(&self, kind: CredentialKind) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(&kind);

			Ok(())
		})
	}
}
