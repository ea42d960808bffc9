//! Tag listing.

// self
use crate::{
	_prelude::*,
	api::types::{Page, Tag},
	backend::routes,
	gateway::{ApiRequest, Gateway},
	http::Transport,
};

/// Filters accepted by the tag listing; unset fields stay off the wire.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TagFilters {
	/// Page number, 1-based.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	/// Items per page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
	/// Exact label match.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tag: Option<String>,
	/// Substring label match.
	#[serde(rename = "tag__icontains", skip_serializing_if = "Option::is_none")]
	pub tag_contains: Option<String>,
}

impl<T> Gateway<T>
where
	T: ?Sized + Transport,
{
	/// Lists tags.
	pub async fn tags(&self, filters: &TagFilters) -> Result<Page<Tag>> {
		self.execute(ApiRequest::get(routes::TAGS).with_query(filters)?).await
	}
}
