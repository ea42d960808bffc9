//! Entities returned by the backend, bit-exact to its JSON field layout.

// self
use crate::_prelude::*;

/// One page of results in the backend's pagination envelope.
///
/// `previous`/`next` carry the backend's own page URLs; pass the `page` filter instead
/// of dereferencing them so every request flows through the authenticated path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
	/// Total number of matching items across all pages.
	pub count: u64,
	/// URL of the previous page, when one exists.
	pub previous: Option<String>,
	/// URL of the next page, when one exists.
	pub next: Option<String>,
	/// Items on this page.
	pub results: Vec<T>,
}
impl<T> Page<T> {
	/// Returns `true` when no item matched the query at all.
	pub fn is_empty(&self) -> bool {
		self.count == 0
	}
}

/// Fully rendered post, as served by the single-post endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
	/// Backend identifier.
	pub id: i64,
	/// URL-safe identifier used in routes.
	pub slug: String,
	/// Post title.
	pub title: String,
	/// Short description shown in listings.
	pub description: String,
	/// Markdown body.
	pub body: String,
	/// Author of the post.
	pub author: AuthorRef,
	/// Creation timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last-modification timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Whether the signed-in reader favourited this post.
	pub is_favourited: bool,
	/// Number of readers who favourited this post.
	pub favourites_count: u64,
	/// Tags attached to the post.
	pub tags: Vec<Tag>,
	/// Thumbnail image URL.
	pub thumbnail: String,
}

/// Listing-shaped post, as served by the collection endpoints.
///
/// Identical to [`Post`] minus the reader-specific favourite fields, which the backend
/// omits from list serializers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
	/// Backend identifier.
	pub id: i64,
	/// URL-safe identifier used in routes.
	pub slug: String,
	/// Post title.
	pub title: String,
	/// Short description shown in listings.
	pub description: String,
	/// Markdown body.
	pub body: String,
	/// Author of the post.
	pub author: AuthorRef,
	/// Creation timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last-modification timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Tags attached to the post.
	pub tags: Vec<Tag>,
	/// Thumbnail image URL.
	pub thumbnail: String,
}

/// Comment on a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
	/// Backend identifier.
	pub id: i64,
	/// Comment text.
	pub body: String,
	/// Identifier of the commented post.
	pub post: i64,
	/// Author of the comment.
	pub author: AuthorRef,
	/// Creation timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last-modification timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// Author reference embedded in posts and comments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
	/// Backend identifier.
	pub id: i64,
	/// Unique handle.
	pub username: String,
	/// Contact email.
	pub email: String,
	/// Avatar image URL, when one is set.
	pub image: Option<String>,
	/// Whether the signed-in reader follows this author.
	pub is_followed_by_you: bool,
}

/// Full profile, as served by every profile endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Backend identifier.
	pub id: i64,
	/// Unique handle.
	pub username: String,
	/// Contact email.
	pub email: String,
	/// Free-form biography.
	pub bio: String,
	/// Avatar image URL, when one is set.
	pub image: Option<String>,
	/// Whether this profile follows the signed-in reader.
	pub is_following_you: bool,
	/// Whether the signed-in reader follows this profile.
	pub is_followed_by_you: bool,
	/// Number of published posts.
	pub posts_count: u64,
	/// Number of favourited posts.
	pub favourites_count: u64,
	/// Number of profiles this one follows.
	pub followed_count: u64,
	/// Number of followers.
	pub followers_count: u64,
}

/// Content tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	/// Backend identifier.
	pub id: i64,
	/// Tag label.
	pub tag: String,
	/// URL-safe identifier used in filters.
	pub slug: String,
	/// Display color, as a CSS color value.
	pub color: String,
}
