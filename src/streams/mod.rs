//! Playable stream URL resolution.
//!
//! The Data API does not expose media URLs, so [`StreamsRequest::list`]
//! derives them the way a player does: fetch `get_video_info`, fall back
//! to the watch page when the format map is missing or carries scrambled
//! signatures, pull the player script to extract the signature decipher
//! function, and apply it to every stream before emitting the format
//! list.
//!
//! Each stage re-uses the request engine, so network failures and
//! cancellation behave exactly as they do for API requests. Re-resolving
//! the same video performs the full pipeline again; only the decipher
//! cache is shared between runs.

mod decipher;
mod formats;

pub use decipher::{DecipherCache, DecipherFunction};
pub use formats::{lookup as format_info, FormatInfo};

use crate::credentials::CredentialStore;
use crate::endpoints::Endpoints;
use crate::error::{Error, Failure};
use crate::request::{RawCompletion, Request, RequestHandle, Status};
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// The browser-like agent the watch page needs to serve its modern HTML
/// variant.
const WATCH_PAGE_USER_AGENT: &str = "Wget/1.13.4 (linux-gnu)";

/// One playable stream variant of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFormat {
    /// YouTube's encoding identifier.
    pub itag: String,
    /// Human-readable encoding description, e.g. "DASH WebM video".
    /// Empty for itags missing from the format table.
    pub description: String,
    /// Container extension, e.g. "mp4".
    pub container: String,
    pub width: u32,
    pub height: u32,
    /// The resolved, signed media URL.
    pub url: Url,
}

/// Terminal state of a stream resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamsCompletion {
    /// The resolved format list. May be empty when the source contained
    /// nothing parseable; callers treat that the same as "no streams".
    Ready(Vec<StreamFormat>),
    Canceled,
    Failed(Failure),
}

impl StreamsCompletion {
    pub fn ready(self) -> Option<Vec<StreamFormat>> {
        match self {
            StreamsCompletion::Ready(formats) => Some(formats),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            StreamsCompletion::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Resolves the playable streams of a video.
pub struct StreamsRequest {
    request: Request,
    cache: DecipherCache,
}

impl StreamsRequest {
    /// Creates a resolver sharing the process-wide decipher cache.
    pub fn new(http: reqwest::Client, credentials: CredentialStore, endpoints: Endpoints) -> Self {
        Self::with_cache(http, credentials, endpoints, DecipherCache::global())
    }

    /// Creates a resolver with an explicit decipher cache (tests inject a
    /// fresh one).
    pub fn with_cache(
        http: reqwest::Client,
        credentials: CredentialStore,
        endpoints: Endpoints,
        cache: DecipherCache,
    ) -> Self {
        StreamsRequest {
            request: Request::new(http, credentials, endpoints),
            cache,
        }
    }

    pub fn handle(&self) -> RequestHandle {
        self.request.handle()
    }

    /// Resolves the list of streams for the video identified by `id`.
    ///
    /// One terminal completion per call. A missing format map, missing
    /// player URL, or unfindable decipher function fails with a parse
    /// error reading `No video streams found for <id>`.
    pub async fn list(&mut self, id: &str) -> StreamsCompletion {
        self.request.arm();
        self.request.set_status(Status::Loading);
        let completion = self.resolve(id).await;
        self.request.set_status(match &completion {
            StreamsCompletion::Ready(_) => Status::Ready,
            StreamsCompletion::Canceled => Status::Canceled,
            StreamsCompletion::Failed(_) => Status::Failed,
        });
        completion
    }

    async fn resolve(&mut self, id: &str) -> StreamsCompletion {
        let info = match self.fetch_video_info(id).await {
            RawCompletion::Ready { body, .. } => body,
            RawCompletion::Canceled => return StreamsCompletion::Canceled,
            RawCompletion::Failed(failure) => return StreamsCompletion::Failed(failure),
        };

        if let Some(section) = info.split_once("url_encoded_fmt_stream_map=").map(|s| s.1) {
            let prefix = match section.find('%') {
                Some(i) => &section[..i],
                None => section,
            };
            if prefix != "s" && !section.contains("%26s%3D") {
                tracing::debug!(id, "video info carries plain signatures, parsing directly");
                let map = section.split('&').next().unwrap_or("").replace("%2C", ",");
                return self.emit(&map, None, id);
            }
            tracing::debug!(id, "video info signals ciphered signatures, using watch page");
        } else {
            tracing::debug!(id, "no format map in video info, using watch page");
        }

        let page = match self.fetch_watch_page(id).await {
            RawCompletion::Ready { body, .. } => body,
            RawCompletion::Canceled => return StreamsCompletion::Canceled,
            RawCompletion::Failed(failure) => return StreamsCompletion::Failed(failure),
        };

        if !page.contains("url_encoded_fmt_stream_map\":") {
            return no_streams(id);
        }

        static ITAG_NOISE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"itag=\d+").expect("static regex is valid"));
        let Some(raw_map) = page.split_once("url_encoded_fmt_stream_map\":\"").map(|s| s.1) else {
            return no_streams(id);
        };
        // The map is a JSON string value; raw quotes inside it are
        // percent-encoded, so the first quote closes it.
        let raw_map = raw_map
            .split('"')
            .next()
            .unwrap_or(raw_map)
            .trim()
            .replace("\\u0026", "&");
        let map = ITAG_NOISE.replace_all(&raw_map, "").into_owned();

        if map.contains("sig=") {
            tracing::debug!(id, "watch page carries plain signatures");
            return self.emit(&map, None, id);
        }

        let Some(player_url) = player_script_url(&page) else {
            return no_streams(id);
        };

        if let Some(function) = self.cache.get(&player_url) {
            tracing::debug!(id, %player_url, "decipher function cache hit");
            return self.emit(&map, Some(&function), id);
        }

        tracing::debug!(id, %player_url, "fetching player script");
        self.request.set_url(player_url.clone());
        let script = match self.request.run_raw(Method::GET, false).await {
            RawCompletion::Ready { body, .. } => body,
            RawCompletion::Canceled => return StreamsCompletion::Canceled,
            RawCompletion::Failed(failure) => return StreamsCompletion::Failed(failure),
        };
        let Some(function) = DecipherFunction::extract(&script) else {
            return no_streams(id);
        };
        self.cache.insert(player_url, function.clone());
        self.emit(&map, Some(&function), id)
    }

    async fn fetch_video_info(&mut self, id: &str) -> RawCompletion {
        let mut url = self.request.endpoints().video_info_url.clone();
        url.query_pairs_mut()
            .append_pair("video_id", id)
            .append_pair("el", "detailpage")
            .append_pair("ps", "default")
            .append_pair("eurl", "gl")
            .append_pair("gl", "US")
            .append_pair("hl", "en");
        self.request.set_headers(Vec::new());
        self.request.set_url(url);
        self.request.run_raw(Method::GET, false).await
    }

    async fn fetch_watch_page(&mut self, id: &str) -> RawCompletion {
        let mut url = self.request.endpoints().watch_url.clone();
        url.query_pairs_mut()
            .append_pair("v", id)
            .append_pair("gl", "US")
            .append_pair("hl", "en")
            .append_pair("has_verified", "1");
        self.request
            .set_headers(vec![("User-Agent".to_string(), WATCH_PAGE_USER_AGENT.to_string())]);
        self.request.set_url(url);
        let completion = self.request.run_raw(Method::GET, false).await;
        self.request.set_headers(Vec::new());
        completion
    }

    fn emit(
        &self,
        map: &str,
        decipher: Option<&DecipherFunction>,
        id: &str,
    ) -> StreamsCompletion {
        match parse_stream_map(map, decipher) {
            Ok(formats) => {
                tracing::debug!(id, count = formats.len(), "resolved stream formats");
                StreamsCompletion::Ready(formats)
            }
            Err(_) => no_streams(id),
        }
    }
}

fn no_streams(id: &str) -> StreamsCompletion {
    StreamsCompletion::Failed(Failure::bare(Error::Parse(format!(
        "No video streams found for {id}"
    ))))
}

/// Extracts the player-script URL from the watch page's `"assets":` JSON,
/// upgrading the scheme to `http` when the URL is protocol-relative.
fn player_script_url(page: &str) -> Option<Url> {
    let assets = page.split_once("\"assets\":").map(|s| s.1)?;
    let end = assets.find('}')?;
    let assets: serde_json::Value = serde_json::from_str(&assets[..=end]).ok()?;
    let js = assets.get("js").and_then(serde_json::Value::as_str)?;
    let absolute = if js.contains("://") {
        js.to_string()
    } else if let Some(rest) = js.strip_prefix("//") {
        format!("http://{rest}")
    } else {
        format!("http://{js}")
    };
    Url::parse(&absolute).ok()
}

/// Percent-decodes until stable, up to ten passes. Stream map entries are
/// double- or triple-encoded depending on which page served them.
fn unescape(s: &str) -> String {
    let mut out = s.to_string();
    for _ in 0..10 {
        if !out.contains('%') {
            break;
        }
        let decoded = percent_encoding::percent_decode_str(&out)
            .decode_utf8_lossy()
            .into_owned();
        if decoded == out {
            break;
        }
        out = decoded;
    }
    out
}

/// The value following the first `marker` up to the next `&`.
fn value_after<'a>(s: &'a str, marker: &str) -> Option<&'a str> {
    let rest = s.split_once(marker)?.1;
    rest.split('&').next()
}

/// Parses a decoded `url_encoded_fmt_stream_map` value into stream
/// formats.
///
/// Entries are comma-separated. Each is percent-decoded to a fixpoint;
/// plain `sig=` parameters are renamed to `signature=`, while in the
/// ciphered case `s=` is renamed and its value replaced with the
/// deciphered signature. The part after `url=` becomes the stream URL:
/// its query is rebuilt with exact duplicates dropped, and a missing
/// `signature` parameter is recovered from the entry prefix. The itag is
/// taken from the URL query or, failing that, from anywhere in the entry.
pub(crate) fn parse_stream_map(
    map: &str,
    decipher: Option<&DecipherFunction>,
) -> Result<Vec<StreamFormat>, Error> {
    static PLAIN_SIG: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(^|&)sig=").expect("static regex is valid"));
    static CIPHER_SIG: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(^|&)s=").expect("static regex is valid"));
    static ENTRY_ITAG: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"itag=(\d+)").expect("static regex is valid"));

    let mut formats = Vec::new();
    for entry in map.split(',').filter(|entry| !entry.is_empty()) {
        let mut entry = unescape(entry);
        match decipher {
            None => {
                entry = PLAIN_SIG.replace_all(&entry, "&signature=").into_owned();
            }
            Some(function) => {
                entry = CIPHER_SIG.replace_all(&entry, "&signature=").into_owned();
                if let Some(scrambled) = value_after(&entry, "signature=") {
                    let scrambled = scrambled.to_string();
                    if !scrambled.is_empty() {
                        let clear = function.apply(&scrambled)?;
                        entry = entry.replace(&scrambled, &clear);
                    }
                }
            }
        }

        let Some(first_url) = entry.find("url=") else {
            continue;
        };
        let prefix = &entry[..first_url];
        let last_url = entry.rfind("url=").unwrap_or(first_url);
        let url_part = &entry[last_url + "url=".len()..];

        let (base, query_string) = match url_part.find('?') {
            Some(i) => (&url_part[..i], &url_part[i + 1..]),
            None => (url_part, ""),
        };
        let Ok(mut url) = Url::parse(base) else {
            continue;
        };

        let mut seen = HashSet::new();
        let mut itag = None;
        let mut has_signature = false;
        let mut pairs = Vec::new();
        for param in query_string.split('&').filter(|param| !param.is_empty()) {
            if !seen.insert(param) {
                continue;
            }
            let key = param.split('=').next().unwrap_or("");
            let value = param.split('=').next_back().unwrap_or("");
            if key == "itag" {
                itag = Some(value.to_string());
            }
            if key == "signature" {
                has_signature = true;
            }
            pairs.push((key.to_string(), value.to_string()));
        }
        if !has_signature {
            if let Some(signature) = value_after(prefix, "signature=") {
                if !signature.is_empty() {
                    pairs.push(("signature".to_string(), signature.to_string()));
                }
            }
        }
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }

        let itag = itag.or_else(|| {
            ENTRY_ITAG
                .captures(&entry)
                .map(|captures| captures[1].to_string())
        });
        let Some(itag) = itag else {
            continue;
        };

        let info = formats::lookup(&itag);
        formats.push(StreamFormat {
            itag,
            description: info.map(|f| f.description.to_string()).unwrap_or_default(),
            container: info.map(|f| f.container.to_string()).unwrap_or_default(),
            width: info.map(|f| f.width).unwrap_or(0),
            height: info.map(|f| f.height).unwrap_or(0),
            url,
        });
    }
    Ok(formats)
}
