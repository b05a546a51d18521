//! The `search` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for search queries over videos, channels, and playlists.
///
/// See: <https://developers.google.com/youtube/v3/docs/search>
#[derive(Debug, Clone, Copy)]
pub struct Search<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Search<'a> {
    /// Runs a search. Typical parameters are `q`, `type`, `order`, and
    /// `maxResults`.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/search/list>
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/search", part, filters, params).await
    }

    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/search", part, filters, params)
    }
}
