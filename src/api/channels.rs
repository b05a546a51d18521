//! The `channels` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for channel resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels>
#[derive(Debug, Clone, Copy)]
pub struct Channels<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Channels<'a> {
    /// Requests a list of channels, e.g. `mine=true` for the
    /// authenticated user's own channels.
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/channels", part, filters, params).await
    }

    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/channels", part, filters, params)
    }

    /// Updates a channel's metadata (branding settings or invideo
    /// promotions).
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/channels/update>
    pub async fn update(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::update(self.yt, "/channels", resource, part, params).await
    }
}
