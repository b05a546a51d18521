//! The `channelSections` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for channel section resources.
///
/// A `channelSection` is one shelf on a channel page: a set of featured
/// videos, playlists, or channels with a type and display position.
///
/// See: <https://developers.google.com/youtube/v3/docs/channelSections>
#[derive(Debug, Clone, Copy)]
pub struct ChannelSections<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> ChannelSections<'a> {
    /// Requests channel sections by `id`, `channelId`, or `mine=true`.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channelSections/list>
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/channelSections", part, filters, params).await
    }

    /// Streams list results across page boundaries.
    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/channelSections", part, filters, params)
    }

    /// Adds a section to the authenticated user's channel.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channelSections/insert>
    pub async fn insert(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::insert(self.yt, "/channelSections", resource, part, params).await
    }

    /// Updates a section's content or position.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channelSections/update>
    pub async fn update(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::update(self.yt, "/channelSections", resource, part, params).await
    }

    /// Removes a section from the authenticated user's channel.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channelSections/delete>
    pub async fn delete(&self, id: &str) -> Completion {
        super::delete(self.yt, "/channelSections", id).await
    }
}
