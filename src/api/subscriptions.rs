//! The `subscriptions` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use serde_json::Value;
use tokio_stream::Stream;

/// Client for subscription resources.
///
/// A `subscription` resource links a subscriber to a channel; inserting
/// one subscribes the authenticated user, deleting one unsubscribes
/// them.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions>
#[derive(Debug, Clone, Copy)]
pub struct Subscriptions<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Subscriptions<'a> {
    /// Requests subscriptions matching the filters, e.g. `mine=true` for
    /// the authenticated user's own subscriptions or
    /// `channelId=<channel id>` for a channel's public ones.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/subscriptions/list>
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/subscriptions", part, filters, params).await
    }

    /// Streams list results across page boundaries.
    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/subscriptions", part, filters, params)
    }

    /// Subscribes the authenticated user to the channel named in the
    /// resource's `snippet.resourceId`.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/subscriptions/insert>
    pub async fn insert(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::insert(self.yt, "/subscriptions", resource, part, params).await
    }

    /// Unsubscribes from a channel by deleting the subscription resource.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/subscriptions/delete>
    pub async fn delete(&self, id: &str) -> Completion {
        super::delete(self.yt, "/subscriptions", id).await
    }
}
