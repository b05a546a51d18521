//! The generic, path-addressed resource client.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for arbitrary Data API resource paths.
///
/// Used for endpoints the library does not wrap explicitly; the path is
/// joined onto the API base with or without a leading slash.
///
/// ```rust,no_run
/// # async fn example(yt: youtube_client::YouTube) {
/// use serde_json::Map;
///
/// let mut params = Map::new();
/// params.insert("maxResults".into(), 10.into());
/// params.insert("q".into(), "rust".into());
/// params.insert("type".into(), "video".into());
/// let completion = yt
///     .resources()
///     .list("/search", &["snippet"], &Map::new(), &params)
///     .await;
/// # let _ = completion;
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resources<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Resources<'a> {
    /// Requests a list of resources from `path`.
    pub async fn list(
        &self,
        path: &str,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, path, part, filters, params).await
    }

    /// Streams list results from `path` across page boundaries.
    pub fn stream(
        self,
        path: &'static str,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, path, part, filters, params)
    }

    /// Inserts a new resource at `path`.
    pub async fn insert(
        &self,
        resource: Value,
        path: &str,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::insert(self.yt, path, resource, part, params).await
    }

    /// Updates the resource at `path`.
    pub async fn update(&self, path: &str, resource: Value, part: &[&str]) -> Completion {
        super::update(self.yt, path, resource, part, &QueryMap::new()).await
    }

    /// Deletes the resource identified by `id` at `path`.
    pub async fn delete(&self, id: &str, path: &str) -> Completion {
        super::delete(self.yt, path, id).await
    }
}
