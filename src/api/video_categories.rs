//! The `videoCategories` resource.

use super::{QueryMap, YouTube};
use crate::error::Completion;

/// Client for the read-only list of categories uploaded videos can be
/// associated with.
///
/// See: <https://developers.google.com/youtube/v3/docs/videoCategories>
#[derive(Debug, Clone, Copy)]
pub struct VideoCategories<'a> {
    pub(crate) yt: &'a YouTube,
}

impl VideoCategories<'_> {
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/videoCategories", part, filters, params).await
    }
}
