//! Subtitle track listing.
//!
//! Subtitles are the one resource served outside the Data API: the
//! timedtext endpoint returns an XML `<transcript_list>` whose `<track>`
//! elements describe the available languages. Each emitted track carries
//! the URL that fetches its actual subtitle data.

use crate::credentials::CredentialStore;
use crate::endpoints::Endpoints;
use crate::error::{Error, Failure};
use crate::request::{RawCompletion, Request, RequestHandle, Status};
use http::Method;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use url::Url;

/// One available subtitle track of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub id: String,
    /// The language name in its own language (`lang_original`).
    pub original_language: String,
    /// The language name translated for the requesting locale
    /// (`lang_translated`).
    pub translated_language: String,
    /// The ISO language code (`lang_code`).
    pub language_code: String,
    /// The plain `lang` attribute, when the server sends one.
    pub language: String,
    /// Fetches this track's subtitle data.
    pub url: Url,
}

/// Terminal state of a subtitle listing.
#[derive(Debug, Clone, PartialEq)]
pub enum SubtitlesCompletion {
    Ready(Vec<SubtitleTrack>),
    Canceled,
    Failed(Failure),
}

impl SubtitlesCompletion {
    pub fn ready(self) -> Option<Vec<SubtitleTrack>> {
        match self {
            SubtitlesCompletion::Ready(tracks) => Some(tracks),
            _ => None,
        }
    }
}

/// Lists the subtitle tracks of a video.
pub struct SubtitlesRequest {
    request: Request,
}

impl SubtitlesRequest {
    pub fn new(http: reqwest::Client, credentials: CredentialStore, endpoints: Endpoints) -> Self {
        SubtitlesRequest {
            request: Request::new(http, credentials, endpoints),
        }
    }

    pub fn handle(&self) -> RequestHandle {
        self.request.handle()
    }

    /// Requests the track list for the video identified by `id`.
    ///
    /// Unauthenticated; the response is XML rather than JSON.
    pub async fn list(&mut self, id: &str) -> SubtitlesCompletion {
        let mut url = self.request.endpoints().subtitles_url.clone();
        url.query_pairs_mut()
            .append_pair("hl", "en")
            .append_pair("type", "list")
            .append_pair("v", id);
        self.request.set_url(url);

        self.request.arm();
        self.request.set_status(Status::Loading);
        let completion = match self.request.run_raw(Method::GET, false).await {
            RawCompletion::Ready { body, url } => {
                // Redirects may rewrite the URL; the track URLs use the
                // video id the server actually answered for.
                let video_id = url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_else(|| id.to_string());
                match parse_track_list(&body, &video_id, self.request.endpoints()) {
                    Ok(tracks) => SubtitlesCompletion::Ready(tracks),
                    Err(error) => SubtitlesCompletion::Failed(Failure::bare(error)),
                }
            }
            RawCompletion::Canceled => SubtitlesCompletion::Canceled,
            RawCompletion::Failed(failure) => SubtitlesCompletion::Failed(failure),
        };
        self.request.set_status(match &completion {
            SubtitlesCompletion::Ready(_) => Status::Ready,
            SubtitlesCompletion::Canceled => Status::Canceled,
            SubtitlesCompletion::Failed(_) => Status::Failed,
        });
        completion
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> String {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attribute| attribute.unescape_value().ok())
        .map(|value| value.into_owned())
        .unwrap_or_default()
}

/// Parses the `<track>` elements of a timedtext track list.
pub(crate) fn parse_track_list(
    xml: &str,
    video_id: &str,
    endpoints: &Endpoints,
) -> Result<Vec<SubtitleTrack>, Error> {
    let mut reader = Reader::from_str(xml);
    let mut tracks = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element))
                if element.name().as_ref() == b"track" =>
            {
                let code = attribute(&element, "lang_code");
                let mut url = endpoints.subtitles_url.clone();
                url.query_pairs_mut()
                    .append_pair("v", video_id)
                    .append_pair("lang", &code);
                tracks.push(SubtitleTrack {
                    id: attribute(&element, "id"),
                    original_language: attribute(&element, "lang_original"),
                    translated_language: attribute(&element, "lang_translated"),
                    language_code: code,
                    language: attribute(&element, "lang"),
                    url,
                });
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => return Err(Error::parse()),
        }
    }
    Ok(tracks)
}
