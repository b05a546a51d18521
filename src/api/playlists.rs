//! The `playlists` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for playlist resources.
///
/// A `playlist` resource represents a YouTube playlist: an ordered
/// collection of videos with its own title, description, and privacy
/// status.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists>
#[derive(Debug, Clone, Copy)]
pub struct Playlists<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Playlists<'a> {
    /// Requests a collection of playlists matching the filters, e.g.
    /// `id=<playlist id>`, `channelId=<channel id>`, or `mine=true`.
    ///
    /// Listing public playlists needs only an API key; `mine=true`
    /// requires an access token.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/list>
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/playlists", part, filters, params).await
    }

    /// Streams list results across page boundaries.
    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/playlists", part, filters, params)
    }

    /// Creates a playlist on behalf of the authenticated user.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/insert>
    pub async fn insert(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::insert(self.yt, "/playlists", resource, part, params).await
    }

    /// Modifies a playlist, e.g. its title, description, or privacy
    /// status. Fields absent from `resource` revert to their defaults,
    /// so callers usually fetch-modify-write.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/update>
    pub async fn update(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::update(self.yt, "/playlists", resource, part, params).await
    }

    /// Deletes a playlist on behalf of the authenticated user.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/delete>
    pub async fn delete(&self, id: &str) -> Completion {
        super::delete(self.yt, "/playlists", id).await
    }
}
