//! The remote endpoints this crate talks to.
//!
//! All URLs live in one injectable [`Endpoints`] value so tests can point
//! the library at a local server. [`Endpoints::default`] is production
//! Google.

use url::Url;

/// OAuth scopes understood by the YouTube Data API.
pub mod scopes {
    /// View a YouTube account.
    pub const READ_ONLY: &str = "https://www.googleapis.com/auth/youtube.readonly";
    /// Manage a YouTube account.
    pub const READ_WRITE: &str = "https://www.googleapis.com/auth/youtube";
    /// Manage a YouTube account over SSL only.
    pub const FORCE_SSL: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
    /// Upload and manage YouTube videos.
    pub const UPLOAD: &str = "https://www.googleapis.com/auth/youtube.upload";
    /// Manage YouTube partner assets.
    pub const PARTNER: &str = "https://www.googleapis.com/auth/youtubepartner";
    /// Retrieve the auditDetails part of a channel resource.
    pub const AUDIT: &str = "https://www.googleapis.com/auth/youtubepartner-channel-audit";
}

/// The out-of-band redirect URI used by the installed-applications flow.
pub const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Every remote URL the library touches.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Root of the Data API, `https://www.googleapis.com/youtube/v3`.
    pub api_base: Url,
    /// The user-facing consent page; exposed so hosts can build the web
    /// view URL for the installed-applications flow.
    pub auth_url: Url,
    /// Token endpoint: code exchange, device polling, and refresh.
    pub token_url: Url,
    /// Device-code issuance endpoint.
    pub device_code_url: Url,
    /// Token revocation endpoint.
    pub revoke_url: Url,
    /// The `get_video_info` endpoint used by stream resolution.
    pub video_info_url: Url,
    /// The watch page, the stream resolver's fallback source.
    pub watch_url: Url,
    /// The timedtext endpoint serving subtitle track lists.
    pub subtitles_url: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        let parse = |s: &str| Url::parse(s).expect("static endpoint URL is valid");
        Endpoints {
            api_base: parse("https://www.googleapis.com/youtube/v3"),
            auth_url: parse("https://accounts.google.com/o/oauth2/auth"),
            token_url: parse("https://accounts.google.com/o/oauth2/token"),
            device_code_url: parse("https://accounts.google.com/o/oauth2/device/code"),
            revoke_url: parse("https://accounts.google.com/o/oauth2/revoke"),
            video_info_url: parse("https://www.youtube.com/get_video_info"),
            watch_url: parse("https://www.youtube.com/watch"),
            subtitles_url: parse("https://video.google.com/timedtext"),
        }
    }
}

impl Endpoints {
    /// Joins a resource path onto the API base, normalizing the leading
    /// slash, e.g. `"videos"` or `"/videos"` both address
    /// `<api_base>/videos`.
    pub(crate) fn resource_url(&self, path: &str) -> Option<Url> {
        let joined = format!(
            "{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).ok()
    }
}
