//! Site-wide comment listing and creation.

// self
use crate::{
	_prelude::*,
	api::types::{Comment, Page},
	backend::routes,
	gateway::{ApiRequest, Gateway},
	http::Transport,
};

/// Filters accepted by the site-wide comment listing; unset fields stay off the wire.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CommentFilters {
	/// Page number, 1-based.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	/// Items per page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
	/// Exact post identifier match.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post: Option<i64>,
	/// Exact post title match.
	#[serde(rename = "post__title", skip_serializing_if = "Option::is_none")]
	pub post_title: Option<String>,
	/// Exact post slug match.
	#[serde(rename = "post__slug", skip_serializing_if = "Option::is_none")]
	pub post_slug: Option<String>,
	/// Exact author identifier match.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub author: Option<i64>,
}

/// Payload for creating a comment; `post` is the slug of the commented post.
#[derive(Clone, Debug, Serialize)]
pub struct CommentDraft {
	/// Comment text.
	pub body: String,
	/// Slug of the commented post.
	pub post: String,
}
impl CommentDraft {
	/// Builds a draft commenting on the provided post.
	pub fn new(post_slug: impl Into<String>, body: impl Into<String>) -> Self {
		Self { body: body.into(), post: post_slug.into() }
	}
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Lists comments across all posts.
	pub async fn comments(&self, filters: &CommentFilters) -> Result<Page<Comment>> {
		self.execute(ApiRequest::get(routes::COMMENTS).with_query(filters)?).await
	}

	/// Publishes a comment on a post.
	pub async fn create_comment(&self, draft: &CommentDraft) -> Result<Comment> {
		self.execute(ApiRequest::post(routes::COMMENTS).with_json(draft)?).await
	}
}
