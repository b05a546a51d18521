//! Client library for the YouTube Data API v3.
//!
//! Three subsystems do the heavy lifting:
//!
//! - the [`request`] engine: a reusable HTTP request with automatic
//!   redirect following (re-issuing the original verb), transparent
//!   access-token refresh on 401, cancellation, and JSON handling. Every
//!   resource client is a thin parameterization of it.
//! - the [`oauth`] pipeline: OAuth 2.0 code exchange, the devices flow
//!   (with `authorization_pending`/`slow_down` back-off and expiry), and
//!   token revocation.
//! - the [`streams`] resolver: derives playable, signed media URLs for a
//!   video ID, including extraction and evaluation of the watch page's
//!   signature decipher function.
//!
//! Resource clients (videos, channels, playlists, subscriptions, search,
//! ...) hang off [`YouTube`]; list endpoints can also be consumed as a
//! paginated [`tokio_stream::Stream`] via their `stream` methods.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::Map;
//! use youtube_client::{Credentials, YouTube};
//!
//! # async fn example() {
//! let yt = YouTube::new(Credentials {
//!     api_key: "MY_API_KEY".into(),
//!     ..Credentials::default()
//! });
//!
//! // Search for videos.
//! let mut params = Map::new();
//! params.insert("q".into(), "crab".into());
//! params.insert("type".into(), "video".into());
//! let results = yt.search().list(&["snippet"], &Map::new(), &params).await;
//!
//! // Resolve playable stream URLs for a video.
//! let mut resolver = yt.streams();
//! if let Some(formats) = resolver.list("dQw4w9WgXcQ").await.ready() {
//!     for format in formats {
//!         println!("{} {}x{} {}", format.itag, format.width, format.height, format.url);
//!     }
//! }
//! # let _ = results;
//! # }
//! ```
//!
//! # Authentication
//!
//! Mutating operations need an OAuth access token. The host application
//! either runs the installed-applications flow (show a consent web view,
//! then [`oauth::OAuthRequest::exchange_code_for_access_token`]) or the
//! devices flow:
//!
//! ```rust,no_run
//! use youtube_client::{endpoints::scopes, Credentials, YouTube};
//!
//! # async fn example() -> Option<()> {
//! let yt = YouTube::new(Credentials {
//!     client_id: "CID".into(),
//!     client_secret: "SECRET".into(),
//!     scopes: vec![scopes::READ_WRITE.into()],
//!     ..Credentials::default()
//! });
//!
//! let flow = yt.oauth().request_authorization_code().await.ready()?;
//! println!(
//!     "visit {} and enter {}",
//!     flow.verification_url()?,
//!     flow.user_code()?,
//! );
//! let token = flow.poll_until_complete().await.ready()?;
//! yt.credentials()
//!     .set_access_token(token["access_token"].as_str()?);
//! yt.credentials()
//!     .set_refresh_token(token["refresh_token"].as_str().unwrap_or_default());
//! # Some(())
//! # }
//! ```
//!
//! Once a refresh token is stored, the engine refreshes expired access
//! tokens on its own: a 401 triggers one refresh-and-replay, the new
//! token is written back to the shared [`CredentialStore`], and a change
//! notification is emitted so the host can persist it.

pub mod api;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod oauth;
pub mod paging;
pub mod query;
pub mod request;
pub mod streams;
pub mod subtitles;

pub use api::{QueryMap, YouTube};
pub use credentials::{CredentialStore, Credentials};
pub use endpoints::Endpoints;
pub use error::{Completion, Error, Failure, NetworkErrorKind};
pub use request::{Body, Request, RequestHandle, Status, MAX_REDIRECTS};
pub use streams::{StreamFormat, StreamsCompletion, StreamsRequest};
pub use subtitles::{SubtitleTrack, SubtitlesCompletion, SubtitlesRequest};
