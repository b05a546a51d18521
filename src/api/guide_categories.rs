//! The `guideCategories` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for the read-only channel category list.
///
/// See: <https://developers.google.com/youtube/v3/docs/guideCategories>
#[derive(Debug, Clone, Copy)]
pub struct GuideCategories<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> GuideCategories<'a> {
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/guideCategories", part, filters, params).await
    }

    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/guideCategories", part, filters, params)
    }
}
