//! The `videos` resource.

use super::{QueryMap, YouTube};
use crate::error::{Completion, Failure};
use http::Method;
use serde_json::Value;
use tokio_stream::Stream;

/// Client for YouTube video resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos>
#[derive(Debug, Clone, Copy)]
pub struct Videos<'a> {
    pub(crate) yt: &'a YouTube,
}

impl<'a> Videos<'a> {
    /// Requests a list of videos.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/list>
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/videos", part, filters, params).await
    }

    /// Streams list results across page boundaries.
    pub fn stream(
        self,
        part: Vec<String>,
        filters: QueryMap,
        params: QueryMap,
    ) -> impl Stream<Item = Result<Value, Failure>> + 'a {
        super::stream(self.yt, "/videos", part, filters, params)
    }

    /// Updates an existing video on behalf of the authenticated user.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/update>
    pub async fn update(
        &self,
        resource: Value,
        part: &[&str],
        params: &QueryMap,
    ) -> Completion {
        super::update(self.yt, "/videos", resource, part, params).await
    }

    /// Deletes a video on behalf of the authenticated user.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/delete>
    pub async fn delete(&self, id: &str) -> Completion {
        super::delete(self.yt, "/videos", id).await
    }

    /// Rates a video (`like`, `dislike`, or `none`) on behalf of the
    /// authenticated user. The server responds with an empty body on
    /// success.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/rate>
    pub async fn rate(&self, id: &str, rating: &str) -> Completion {
        let Some(mut url) = self.yt.endpoints().resource_url("/videos/rate") else {
            return super::invalid_path("/videos/rate");
        };
        url.query_pairs_mut()
            .append_pair("id", id)
            .append_pair("rating", rating);
        let mut request = self.yt.request();
        request.set_url(url);
        request.execute(Method::POST, true).await
    }

    /// Retrieves the authenticated user's rating of the given video.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/getRating>
    pub async fn get_rating(&self, id: &str, params: &QueryMap) -> Completion {
        let Some(mut url) = self.yt.endpoints().resource_url("/videos/getRating") else {
            return super::invalid_path("/videos/getRating");
        };
        url.query_pairs_mut().append_pair("id", id);
        crate::query::append_query_items(&mut url, params);
        let mut request = self.yt.request();
        request.set_url(url);
        request.execute(Method::GET, true).await
    }
}
