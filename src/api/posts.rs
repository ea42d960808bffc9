//! Post collection, feed, favourites, and per-post comment operations.

// self
use crate::{
	_prelude::*,
	api::types::{Comment, Page, Post, PostSummary},
	backend::routes,
	gateway::{ApiRequest, Gateway},
	http::Transport,
};

/// Result ordering accepted by the post listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostOrdering {
	/// Oldest first.
	#[serde(rename = "created_at")]
	CreatedAt,
	/// Newest first.
	#[serde(rename = "-created_at")]
	CreatedAtDesc,
	/// Least recently updated first.
	#[serde(rename = "updated_at")]
	UpdatedAt,
	/// Most recently updated first.
	#[serde(rename = "-updated_at")]
	UpdatedAtDesc,
}

/// Result ordering accepted by the per-post comment listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentOrdering {
	/// Oldest first.
	#[serde(rename = "created_at")]
	CreatedAt,
	/// Newest first.
	#[serde(rename = "-created_at")]
	CreatedAtDesc,
}

/// Filters accepted by the post listings; unset fields stay off the wire.
///
/// Field names ending in `_contains` map to the backend's case-insensitive substring
/// lookups.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PostFilters {
	/// Page number, 1-based.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	/// Items per page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
	/// Exact slug match.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub slug: Option<String>,
	/// Substring slug match.
	#[serde(rename = "slug__icontains", skip_serializing_if = "Option::is_none")]
	pub slug_contains: Option<String>,
	/// Substring title match.
	#[serde(rename = "title__icontains", skip_serializing_if = "Option::is_none")]
	pub title_contains: Option<String>,
	/// Substring description match.
	#[serde(rename = "description__icontains", skip_serializing_if = "Option::is_none")]
	pub description_contains: Option<String>,
	/// Exact author handle match.
	#[serde(rename = "author__user__username", skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	/// Substring author handle match.
	#[serde(rename = "author__user__username__icontains", skip_serializing_if = "Option::is_none")]
	pub author_contains: Option<String>,
	/// Substring tag label match.
	#[serde(rename = "tags__tag__icontains", skip_serializing_if = "Option::is_none")]
	pub tag_contains: Option<String>,
	/// Lower creation-time bound, inclusive.
	#[serde(
		rename = "created_at__gte",
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub created_at_gte: Option<OffsetDateTime>,
	/// Upper creation-time bound, inclusive.
	#[serde(
		rename = "created_at__lte",
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub created_at_lte: Option<OffsetDateTime>,
	/// Result ordering.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ordering: Option<PostOrdering>,
	/// Free-text search across the backend's configured search fields.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub search: Option<String>,
}

/// Filters accepted by the per-post comment listing.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PostCommentFilters {
	/// Page number, 1-based.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	/// Items per page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
	/// Result ordering.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ordering: Option<CommentOrdering>,
}

/// Payload for creating a post.
#[derive(Clone, Debug, Serialize)]
pub struct PostDraft {
	/// Post title.
	pub title: String,
	/// Short description shown in listings.
	pub description: String,
	/// Markdown body.
	pub body: String,
	/// Tag labels to attach.
	pub tags: Vec<String>,
	/// Whether the post goes live immediately.
	pub is_published: bool,
	/// Thumbnail image URL.
	pub thumbnail: String,
}

/// Partial update applied to an existing post; unset fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PostPatch {
	/// Replacement markdown body.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub body: Option<String>,
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Lists published posts.
	pub async fn posts(&self, filters: &PostFilters) -> Result<Page<PostSummary>> {
		self.execute(ApiRequest::get(routes::POSTS).with_query(filters)?).await
	}

	/// Lists posts authored by profiles the signed-in reader follows.
	pub async fn post_feed(&self, filters: &PostFilters) -> Result<Page<PostSummary>> {
		self.execute(ApiRequest::get(routes::POST_FEED).with_query(filters)?).await
	}

	/// Lists posts the signed-in reader favourited.
	pub async fn favourite_posts(&self, filters: &PostFilters) -> Result<Page<PostSummary>> {
		self.execute(ApiRequest::get(routes::POST_FAVOURITES).with_query(filters)?).await
	}

	/// Fetches one post by slug.
	pub async fn post(&self, slug: &str) -> Result<Post> {
		self.execute(ApiRequest::get(format!("{}{slug}/", routes::POSTS))).await
	}

	/// Publishes a new post.
	pub async fn create_post(&self, draft: &PostDraft) -> Result<Post> {
		self.execute(ApiRequest::post(routes::POSTS).with_json(draft)?).await
	}

	/// Applies a partial update to an existing post.
	pub async fn update_post(&self, slug: &str, patch: &PostPatch) -> Result<Post> {
		self.execute(ApiRequest::patch(format!("{}{slug}/", routes::POSTS)).with_json(patch)?)
			.await
	}

	/// Deletes a post.
	pub async fn delete_post(&self, slug: &str) -> Result<()> {
		self.execute_empty(ApiRequest::delete(format!("{}{slug}/", routes::POSTS))).await
	}

	/// Adds a post to the signed-in reader's favourites.
	pub async fn favourite_post(&self, slug: &str) -> Result<Post> {
		self.execute(ApiRequest::post(format!("{}{slug}/favourite/", routes::POSTS))).await
	}

	/// Removes a post from the signed-in reader's favourites.
	pub async fn unfavourite_post(&self, slug: &str) -> Result<Post> {
		self.execute(ApiRequest::delete(format!("{}{slug}/favourite/", routes::POSTS))).await
	}

	/// Lists the comments under one post.
	pub async fn post_comments(
		&self,
		slug: &str,
		filters: &PostCommentFilters,
	) -> Result<Page<Comment>> {
		self.execute(
			ApiRequest::get(format!("{}{slug}/comments/", routes::POSTS)).with_query(filters)?,
		)
		.await
	}

	/// Deletes one comment under one post.
	pub async fn delete_post_comment(&self, slug: &str, comment_id: i64) -> Result<()> {
		self.execute_empty(ApiRequest::delete(format!(
			"{}{slug}/comments/{comment_id}/",
			routes::POSTS
		)))
		.await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn filters_serialize_in_the_backend_lookup_dialect() {
		let filters = PostFilters {
			page: Some(2),
			title_contains: Some("rust".into()),
			author: Some("ferris".into()),
			ordering: Some(PostOrdering::CreatedAtDesc),
			..Default::default()
		};

		assert_eq!(
			serde_urlencoded::to_string(&filters).expect("Filters must serialize."),
			"page=2&title__icontains=rust&author__user__username=ferris&ordering=-created_at"
		);
	}

	#[test]
	fn creation_time_bounds_serialize_as_rfc3339() {
		let filters = PostFilters {
			created_at_gte: Some(datetime!(2024-01-01 0:00 UTC)),
			..Default::default()
		};

		assert_eq!(
			serde_urlencoded::to_string(&filters).expect("Filters must serialize."),
			"created_at__gte=2024-01-01T00%3A00%3A00Z"
		);
	}

	#[test]
	fn default_filters_stay_off_the_wire() {
		assert_eq!(
			serde_urlencoded::to_string(PostFilters::default())
				.expect("Filters must serialize."),
			""
		);
	}

	#[test]
	fn patch_serializes_only_set_fields() {
		assert_eq!(
			serde_json::to_string(&PostPatch::default()).expect("Patch must serialize."),
			"{}"
		);
		assert_eq!(
			serde_json::to_string(&PostPatch { body: Some("updated".into()) })
				.expect("Patch must serialize."),
			r#"{"body":"updated"}"#
		);
	}
}
