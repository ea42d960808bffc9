//! Shows the transparent 401 recovery path: a stale access credential triggers one
//! refresh call and one replay, and the call site only ever sees the final result.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use zine_client::{
	api::PostFilters,
	auth::CredentialKind,
	backend::BackendDescriptor,
	gateway::Gateway,
	http::ReqwestTransport,
	reqwest::Client,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer stale-access");
			then.status(401)
				.header("content-type", "application/json")
				.json_body(json!({"detail": "Given token not valid for any token type"}));
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/token/refresh/")
				.json_body(json!({"refresh": "valid-refresh"}));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({"access": "fresh-access"}));
		})
		.await;
	let replay_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer fresh-access");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({"count": 0, "previous": null, "next": null, "results": []}));
		})
		.await;
	let descriptor = BackendDescriptor::new(Url::parse(&server.base_url())?)?;
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();

	store_backend.set_now(CredentialKind::Access, "stale-access");
	store_backend.set_now(CredentialKind::Refresh, "valid-refresh");

	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let gateway = Gateway::with_transport(descriptor, store, transport);
	let page = gateway.posts(&PostFilters::default()).await?;

	println!("Listing succeeded with {} result(s); the 401 never reached this call site.", page.count);

	let rotated = store_backend
		.get_now(CredentialKind::Access)
		.map(|secret| secret.expose().to_owned());

	println!("Stored access credential after recovery: {rotated:?}.");
	println!(
		"Refresh metrics: {} attempt(s), {} recovery(ies).",
		gateway.refresh_metrics.attempts(),
		gateway.refresh_metrics.recoveries(),
	);

	stale_mock.assert_async().await;
	refresh_mock.assert_async().await;
	replay_mock.assert_async().await;

	Ok(())
}
