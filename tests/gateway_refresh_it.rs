#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use zine_client::{
	_preludet::*,
	api::{CommentFilters, Page, PostFilters, PostSummary, ProfileFilters, TagFilters},
	auth::CredentialKind,
	backend::BackendDescriptor,
	store::MemoryStore,
};

const STALE_ACCESS: &str = "stale-access";
const FRESH_ACCESS: &str = "fresh-access";
const VALID_REFRESH: &str = "valid-refresh";
const TOKEN_NOT_VALID: &str =
	"{\"detail\":\"Given token not valid for any token type\",\"code\":\"token_not_valid\"}";
const EMPTY_PAGE: &str = "{\"count\":0,\"previous\":null,\"next\":null,\"results\":[]}";

fn build_descriptor(server: &MockServer) -> BackendDescriptor {
	BackendDescriptor::new(
		Url::parse(&server.base_url()).expect("Mock server URL should parse successfully."),
	)
	.expect("Backend descriptor should build successfully.")
}

fn seed_session(store: &MemoryStore, access: &str, refresh: &str) {
	store.set_now(CredentialKind::Access, access);
	store.set_now(CredentialKind::Refresh, refresh);
}

#[tokio::test]
async fn bearer_header_carries_the_stored_access_credential() {
	let server = MockServer::start_async().await;
	let (gateway, store, _) = build_reqwest_test_gateway(build_descriptor(&server));

	store.set_now(CredentialKind::Access, STALE_ACCESS);

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer stale-access");
			then.status(200).header("content-type", "application/json").body(EMPTY_PAGE);
		})
		.await;

	gateway
		.posts(&PostFilters::default())
		.await
		.expect("Request with a stored access credential should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn missing_access_sends_an_explicitly_empty_header() {
	let server = MockServer::start_async().await;
	let (gateway, _, _) = build_reqwest_test_gateway(build_descriptor(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/tags/").header("authorization", "");
			then.status(200).header("content-type", "application/json").body(EMPTY_PAGE);
		})
		.await;

	gateway
		.tags(&TagFilters::default())
		.await
		.expect("Anonymous request should carry an empty authorization header.");

	mock.assert_async().await;
}

#[tokio::test]
async fn expired_access_refreshes_and_replays_exactly_once() {
	let server = MockServer::start_async().await;
	let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer stale-access");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/token/refresh/")
				.json_body(json!({"refresh": VALID_REFRESH}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}");
		})
		.await;
	let replayed = server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(EMPTY_PAGE);
		})
		.await;
	let page = gateway
		.posts(&PostFilters::default())
		.await
		.expect("Refreshed-and-replayed request should succeed.");

	assert!(page.is_empty());

	rejected.assert_async().await;
	refresh.assert_async().await;
	replayed.assert_async().await;

	assert_eq!(
		store.get_now(CredentialKind::Access).map(|secret| secret.expose().to_owned()),
		Some(FRESH_ACCESS.to_owned()),
	);
	assert_eq!(
		store.get_now(CredentialKind::Refresh).map(|secret| secret.expose().to_owned()),
		Some(VALID_REFRESH.to_owned()),
	);
	assert!(navigator.take().is_empty());
	assert_eq!(gateway.refresh_metrics.recoveries(), 1);
}

#[tokio::test]
async fn missing_refresh_invalidates_and_surfaces_the_original_error() {
	let server = MockServer::start_async().await;
	let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

	store.set_now(CredentialKind::Access, STALE_ACCESS);

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/feed/");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}");
		})
		.await;
	let err = gateway
		.post_feed(&PostFilters::default())
		.await
		.expect_err("A session without a refresh credential should fail terminally.");
	let api = err.as_api().expect("The original backend error should surface unchanged.");

	assert_eq!(api.status, 401);
	assert_eq!(api.code.as_deref(), Some("token_not_valid"));

	rejected.assert_async().await;
	refresh.assert_calls_async(0).await;

	assert!(store.get_now(CredentialKind::Access).is_none());
	assert_eq!(navigator.take(), ["/auth/login"]);
	assert_eq!(gateway.refresh_metrics.invalidations(), 1);
}

#[tokio::test]
async fn rejected_refresh_clears_both_credentials() {
	for refresh_status in [400_u16, 401] {
		let server = MockServer::start_async().await;
		let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

		seed_session(&store, STALE_ACCESS, VALID_REFRESH);

		let rejected = server
			.mock_async(|when, then| {
				when.method(GET).path("/posts/");
				then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
			})
			.await;
		let refresh = server
			.mock_async(move |when, then| {
				when.method(POST).path("/auth/token/refresh/");
				then.status(refresh_status)
					.header("content-type", "application/json")
					.body("{\"detail\":\"Token is blacklisted\",\"code\":\"token_not_valid\"}");
			})
			.await;
		let err = gateway
			.posts(&PostFilters::default())
			.await
			.expect_err("A rejected refresh credential should fail terminally.");
		let api = err.as_api().expect("The original backend error should surface unchanged.");

		assert_eq!(api.status, 401);

		// One initial call, no replay.
		rejected.assert_async().await;
		refresh.assert_async().await;

		assert!(store.get_now(CredentialKind::Access).is_none());
		assert!(store.get_now(CredentialKind::Refresh).is_none());
		assert_eq!(navigator.take(), ["/auth/login"]);
		assert_eq!(gateway.refresh_metrics.invalidations(), 1);
	}
}

#[tokio::test]
async fn unreachable_refresh_endpoint_preserves_credentials() {
	let server = MockServer::start_async().await;
	let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/comments/");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token/refresh/");
			then.status(500).body("upstream exploded");
		})
		.await;
	let err = gateway
		.comments(&CommentFilters::default())
		.await
		.expect_err("A transient refresh failure should surface the original error.");
	let api = err.as_api().expect("The original backend error should surface unchanged.");

	assert_eq!(api.status, 401);

	refresh.assert_async().await;

	assert_eq!(
		store.get_now(CredentialKind::Access).map(|secret| secret.expose().to_owned()),
		Some(STALE_ACCESS.to_owned()),
	);
	assert_eq!(
		store.get_now(CredentialKind::Refresh).map(|secret| secret.expose().to_owned()),
		Some(VALID_REFRESH.to_owned()),
	);
	assert!(navigator.take().is_empty());
	assert_eq!(gateway.refresh_metrics.transient_failures(), 1);
}

#[tokio::test]
async fn malformed_refresh_grant_is_transient() {
	let server = MockServer::start_async().await;
	let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token/refresh/");
			then.status(200).header("content-type", "text/html").body("<html>proxy login</html>");
		})
		.await;

	let err = gateway
		.posts(&PostFilters::default())
		.await
		.expect_err("A malformed refresh grant should surface the original error.");

	assert_eq!(err.as_api().map(|api| api.status), Some(401));
	assert_eq!(
		store.get_now(CredentialKind::Refresh).map(|secret| secret.expose().to_owned()),
		Some(VALID_REFRESH.to_owned()),
	);
	assert!(navigator.take().is_empty());
}

#[tokio::test]
async fn slow_refresh_endpoint_times_out_as_transient() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server).with_refresh_timeout(Duration::milliseconds(250));
	let (gateway, store, navigator) = build_reqwest_test_gateway(descriptor);

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}")
				.delay(std::time::Duration::from_millis(1_500));
		})
		.await;

	let err = gateway
		.posts(&PostFilters::default())
		.await
		.expect_err("A refresh slower than its bound should surface the original error.");

	assert_eq!(err.as_api().map(|api| api.status), Some(401));
	assert_eq!(
		store.get_now(CredentialKind::Access).map(|secret| secret.expose().to_owned()),
		Some(STALE_ACCESS.to_owned()),
	);
	assert!(navigator.take().is_empty());
	assert_eq!(gateway.refresh_metrics.transient_failures(), 1);
}

#[tokio::test]
async fn replayed_401_surfaces_without_a_second_refresh() {
	let server = MockServer::start_async().await;
	let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	let unauthorized = server
		.mock_async(|when, then| {
			when.method(GET).path("/profiles/");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}");
		})
		.await;
	let err = gateway
		.profiles(&ProfileFilters::default())
		.await
		.expect_err("A replay that fails again should surface without another recovery pass.");

	assert_eq!(err.as_api().map(|api| api.status), Some(401));

	// Initial dispatch plus exactly one replay.
	unauthorized.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	// The replay failure is terminal for the call but not for the session.
	assert_eq!(
		store.get_now(CredentialKind::Access).map(|secret| secret.expose().to_owned()),
		Some(FRESH_ACCESS.to_owned()),
	);
	assert!(navigator.take().is_empty());
}

#[tokio::test]
async fn concurrent_faults_share_one_refresh_call() {
	let server = MockServer::start_async().await;
	let (gateway, store, _) = build_reqwest_test_gateway(build_descriptor(&server));

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer stale-access");
			then.status(401).header("content-type", "application/json").body(TOKEN_NOT_VALID);
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}");
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/posts/").header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(EMPTY_PAGE);
		})
		.await;

	let filters_a = PostFilters::default();
	let filters_b = PostFilters::default();
	let (first, second): (Result<Page<PostSummary>>, Result<Page<PostSummary>>) =
		tokio::join!(gateway.posts(&filters_a), gateway.posts(&filters_b),);

	first.expect("First concurrent request should succeed after the shared refresh.");
	second.expect("Second concurrent request should succeed after the shared refresh.");

	refresh.assert_calls_async(1).await;

	assert_eq!(
		store.get_now(CredentialKind::Access).map(|secret| secret.expose().to_owned()),
		Some(FRESH_ACCESS.to_owned()),
	);
}

#[tokio::test]
async fn manual_refresh_rotates_the_stored_access() {
	let server = MockServer::start_async().await;
	let (gateway, store, _) = build_reqwest_test_gateway(build_descriptor(&server));

	seed_session(&store, STALE_ACCESS, VALID_REFRESH);

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/token/refresh/")
				.json_body(json!({"refresh": VALID_REFRESH}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}");
		})
		.await;

	gateway.refresh_access().await.expect("Manual refresh should succeed.");

	refresh.assert_async().await;

	assert_eq!(
		store.get_now(CredentialKind::Access).map(|secret| secret.expose().to_owned()),
		Some(FRESH_ACCESS.to_owned()),
	);
}

#[tokio::test]
async fn manual_refresh_requires_a_stored_refresh_credential() {
	let server = MockServer::start_async().await;
	let (gateway, store, navigator) = build_reqwest_test_gateway(build_descriptor(&server));

	store.set_now(CredentialKind::Access, STALE_ACCESS);

	let err = gateway
		.refresh_access()
		.await
		.expect_err("Manual refresh without a refresh credential should fail.");

	assert!(matches!(err, Error::MissingRefreshCredential));
	assert!(store.get_now(CredentialKind::Access).is_none());
	assert_eq!(navigator.take(), ["/auth/login"]);
}
