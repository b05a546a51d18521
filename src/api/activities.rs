//! The `activities` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for channel activity resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/activities>
#[derive(Debug, Clone, Copy)]
pub struct Activities<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Activities<'a> {
    /// Requests a list of channel activities.
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/activities", part, filters, params).await
    }

    /// Streams list results across page boundaries.
    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/activities", part, filters, params)
    }

    /// Posts a bulletin on behalf of the authenticated user.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/activities/insert>
    pub async fn insert(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::insert(self.yt, "/activities", resource, part, params).await
    }
}
