//! The Data API resource clients.
//!
//! [`YouTube`] owns the shared transport, credential store, and endpoint
//! set; each accessor hands out a thin client for one resource collection
//! (`videos`, `playlists`, ...). Every client method parameterizes the
//! request engine with the resource's URL template and verb and resolves
//! to a [`Completion`].
//!
//! `filters` and `params` are free-form maps because the upstream API has
//! hundreds of parameters per endpoint; both flatten into the query
//! string with non-string values JSON-encoded. The distinction between
//! the two is documentation only, they are identical on the wire.
//!
//! # Example
//!
//! ```rust,no_run
//! use youtube_client::{Credentials, YouTube};
//! use serde_json::Map;
//!
//! # async fn example() {
//! let yt = YouTube::new(Credentials {
//!     api_key: "MY_API_KEY".into(),
//!     ..Credentials::default()
//! });
//!
//! let mut filters = Map::new();
//! filters.insert("id".into(), "dQw4w9WgXcQ".into());
//! let completion = yt.videos().list(&["snippet"], &filters, &Map::new()).await;
//! if let Some(result) = completion.ready() {
//!     println!("{result}");
//! }
//! # }
//! ```

pub mod activities;
pub mod channel_sections;
pub mod channels;
pub mod guide_categories;
pub mod i18n;
pub mod playlist_items;
pub mod playlists;
pub mod resources;
pub mod search;
pub mod subscriptions;
pub mod video_categories;
pub mod videos;

use crate::credentials::{CredentialStore, Credentials};
use crate::endpoints::Endpoints;
use crate::error::{Completion, Error, Failure};
use crate::oauth::OAuthRequest;
use crate::paging::{split_list_envelope, PagedStream};
use crate::query;
use crate::request::{self, Body, Request};
use crate::streams::StreamsRequest;
use crate::subtitles::SubtitlesRequest;
use http::Method;
use serde_json::{Map, Value};
use tokio_stream::Stream;

/// Free-form query maps (`filters` and `params`).
pub type QueryMap = Map<String, Value>;

/// Entry point to the YouTube Data API.
///
/// Cheap to share: the transport connection pool, credential store, and
/// endpoints are all handles. Requests created from one `YouTube` value
/// observe each other's access-token refreshes.
#[derive(Debug, Clone)]
pub struct YouTube {
    http: reqwest::Client,
    credentials: CredentialStore,
    endpoints: Endpoints,
}

impl YouTube {
    /// Creates a client for the production Google endpoints.
    pub fn new(credentials: Credentials) -> Self {
        YouTube::with_endpoints(credentials, Endpoints::default())
    }

    /// Creates a client against an explicit endpoint set.
    pub fn with_endpoints(credentials: Credentials, endpoints: Endpoints) -> Self {
        YouTube {
            http: request::transport(),
            credentials: CredentialStore::new(credentials),
            endpoints,
        }
    }

    /// Assembles a client from pre-built parts, e.g. to share one
    /// transport pool and credential store across several clients.
    pub fn from_parts(
        http: reqwest::Client,
        credentials: CredentialStore,
        endpoints: Endpoints,
    ) -> Self {
        YouTube {
            http,
            credentials,
            endpoints,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// A bare request engine bound to this client's transport and
    /// credentials, for endpoints the library does not wrap.
    pub fn request(&self) -> Request {
        Request::new(
            self.http.clone(),
            self.credentials.clone(),
            self.endpoints.clone(),
        )
    }

    /// An OAuth flow driver sharing this client's credentials.
    pub fn oauth(&self) -> OAuthRequest {
        OAuthRequest::new(
            self.http.clone(),
            self.credentials.clone(),
            self.endpoints.clone(),
        )
    }

    /// A stream resolver sharing this client's transport.
    pub fn streams(&self) -> StreamsRequest {
        StreamsRequest::new(
            self.http.clone(),
            self.credentials.clone(),
            self.endpoints.clone(),
        )
    }

    /// A subtitle track lister.
    pub fn subtitles(&self) -> SubtitlesRequest {
        SubtitlesRequest::new(
            self.http.clone(),
            self.credentials.clone(),
            self.endpoints.clone(),
        )
    }

    pub fn activities(&self) -> activities::Activities<'_> {
        activities::Activities { yt: self }
    }

    pub fn channel_sections(&self) -> channel_sections::ChannelSections<'_> {
        channel_sections::ChannelSections { yt: self }
    }

    pub fn channels(&self) -> channels::Channels<'_> {
        channels::Channels { yt: self }
    }

    pub fn guide_categories(&self) -> guide_categories::GuideCategories<'_> {
        guide_categories::GuideCategories { yt: self }
    }

    pub fn i18n_languages(&self) -> i18n::I18nLanguages<'_> {
        i18n::I18nLanguages { yt: self }
    }

    pub fn i18n_regions(&self) -> i18n::I18nRegions<'_> {
        i18n::I18nRegions { yt: self }
    }

    pub fn playlist_items(&self) -> playlist_items::PlaylistItems<'_> {
        playlist_items::PlaylistItems { yt: self }
    }

    pub fn playlists(&self) -> playlists::Playlists<'_> {
        playlists::Playlists { yt: self }
    }

    pub fn search(&self) -> search::Search<'_> {
        search::Search { yt: self }
    }

    pub fn subscriptions(&self) -> subscriptions::Subscriptions<'_> {
        subscriptions::Subscriptions { yt: self }
    }

    pub fn video_categories(&self) -> video_categories::VideoCategories<'_> {
        video_categories::VideoCategories { yt: self }
    }

    pub fn videos(&self) -> videos::Videos<'_> {
        videos::Videos { yt: self }
    }

    /// The generic client for arbitrary resource paths.
    pub fn resources(&self) -> resources::Resources<'_> {
        resources::Resources { yt: self }
    }
}

fn invalid_path(path: &str) -> Completion {
    Completion::Failed(Failure::bare(Error::UnknownContent(format!(
        "invalid resource path: {path}"
    ))))
}

pub(crate) async fn list(
    yt: &YouTube,
    path: &str,
    part: &[&str],
    filters: &QueryMap,
    params: &QueryMap,
) -> Completion {
    let Some(mut url) = yt.endpoints.resource_url(path) else {
        return invalid_path(path);
    };
    query::append_part(&mut url, part);
    query::append_query_items(&mut url, filters);
    query::append_query_items(&mut url, params);
    let mut request = yt.request();
    request.set_url(url);
    request.execute(Method::GET, true).await
}

pub(crate) async fn insert(
    yt: &YouTube,
    path: &str,
    resource: Value,
    part: &[&str],
    params: &QueryMap,
) -> Completion {
    let Some(mut url) = yt.endpoints.resource_url(path) else {
        return invalid_path(path);
    };
    query::append_part(&mut url, part);
    query::append_query_items(&mut url, params);
    let mut request = yt.request();
    request.set_url(url);
    request.set_body(Some(Body::Json(resource)));
    request.execute(Method::POST, true).await
}

pub(crate) async fn update(
    yt: &YouTube,
    path: &str,
    resource: Value,
    part: &[&str],
    params: &QueryMap,
) -> Completion {
    let Some(mut url) = yt.endpoints.resource_url(path) else {
        return invalid_path(path);
    };
    query::append_part(&mut url, part);
    query::append_query_items(&mut url, params);
    let mut request = yt.request();
    request.set_url(url);
    request.set_body(Some(Body::Json(resource)));
    request.execute(Method::PUT, true).await
}

pub(crate) async fn delete(yt: &YouTube, path: &str, id: &str) -> Completion {
    let Some(mut url) = yt.endpoints.resource_url(path) else {
        return invalid_path(path);
    };
    url.query_pairs_mut().append_pair("id", id);
    let mut request = yt.request();
    request.set_url(url);
    request.execute(Method::DELETE, true).await
}

/// The shared implementation behind every resource's `stream` method:
/// a [`PagedStream`] that re-issues the list with the next `pageToken`
/// whenever the current page runs out.
pub(crate) fn stream<'a>(
    yt: &'a YouTube,
    path: &'static str,
    part: Vec<String>,
    filters: QueryMap,
    params: QueryMap,
) -> impl Stream<Item = Result<Value, Failure>> + 'a {
    PagedStream::new(move |token: Option<String>| {
        let part = part.clone();
        let filters = filters.clone();
        let mut params = params.clone();
        async move {
            if let Some(token) = token {
                params.insert("pageToken".to_string(), Value::String(token));
            }
            let part: Vec<&str> = part.iter().map(String::as_str).collect();
            split_list_envelope(list(yt, path, &part, &filters, &params).await)
        }
    })
}
