//! The `playlistItems` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for playlist item resources.
///
/// A `playlistItem` binds one video into one playlist at a position;
/// the same video can appear in many playlists (and several times in
/// one) through distinct items.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems>
#[derive(Debug, Clone, Copy)]
pub struct PlaylistItems<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> PlaylistItems<'a> {
    /// Requests the items of a playlist (`playlistId=<id>`) or specific
    /// items by id.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/list>
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/playlistItems", part, filters, params).await
    }

    /// Streams list results across page boundaries.
    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/playlistItems", part, filters, params)
    }

    /// Adds a resource to a playlist on behalf of the authenticated
    /// user.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/insert>
    pub async fn insert(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::insert(self.yt, "/playlistItems", resource, part, params).await
    }

    /// Modifies a playlist item, e.g. moving it to a different position
    /// within its playlist.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/update>
    pub async fn update(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::update(self.yt, "/playlistItems", resource, part, params).await
    }

    /// Removes an item from a playlist.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/delete>
    pub async fn delete(&self, id: &str) -> Completion {
        super::delete(self.yt, "/playlistItems", id).await
    }
}
