//! Profile listing, inspection, and follow relationships.

// self
use crate::{
	_prelude::*,
	api::types::{Page, Profile},
	backend::routes,
	gateway::{ApiRequest, Gateway},
	http::Transport,
};

/// Filters accepted by the profile listings; unset fields stay off the wire.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileFilters {
	/// Page number, 1-based.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	/// Items per page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
	/// Exact handle match.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Substring handle match.
	#[serde(rename = "username__icontains", skip_serializing_if = "Option::is_none")]
	pub username_contains: Option<String>,
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Lists profiles.
	pub async fn profiles(&self, filters: &ProfileFilters) -> Result<Page<Profile>> {
		self.execute(ApiRequest::get(routes::PROFILES).with_query(filters)?).await
	}

	/// Fetches one profile by handle.
	pub async fn profile(&self, username: &str) -> Result<Profile> {
		self.execute(ApiRequest::get(format!("{}{username}/", routes::PROFILES))).await
	}

	/// Lists the profiles following the given one.
	pub async fn profile_followers(
		&self,
		username: &str,
		filters: &ProfileFilters,
	) -> Result<Page<Profile>> {
		self.execute(
			ApiRequest::get(format!("{}{username}/followers/", routes::PROFILES))
				.with_query(filters)?,
		)
		.await
	}

	/// Lists the profiles the given one follows.
	pub async fn profile_followed(
		&self,
		username: &str,
		filters: &ProfileFilters,
	) -> Result<Page<Profile>> {
		self.execute(
			ApiRequest::get(format!("{}{username}/followed/", routes::PROFILES))
				.with_query(filters)?,
		)
		.await
	}

	/// Follows a profile on behalf of the signed-in reader.
	pub async fn follow_profile(&self, username: &str) -> Result<Profile> {
		self.execute(ApiRequest::post(format!("{}{username}/follow/", routes::PROFILES))).await
	}

	/// Unfollows a profile on behalf of the signed-in reader.
	pub async fn unfollow_profile(&self, username: &str) -> Result<Profile> {
		self.execute(ApiRequest::delete(format!("{}{username}/follow/", routes::PROFILES))).await
	}
}
