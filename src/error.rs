//! Error taxonomy and terminal request results.
//!
//! Every operation in this crate resolves to a [`Completion`]: either a
//! parsed JSON result, a cancellation, or a [`Failure`] carrying one
//! [`Error`] plus whatever response body the server sent alongside it.
//! Google wraps errors in a JSON envelope (`{"error": {"code", "message",
//! "errors": [...]}}`), and callers routinely need to inspect it, so a
//! failed request still exposes the parsed body when one was available.

use serde_json::Value;
use thiserror::Error;

/// Classification of a transport- or HTTP-level failure.
///
/// Network-layer kinds come from the underlying client (connection setup,
/// TLS, timeouts); content kinds are derived from the HTTP status code of
/// a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NetworkErrorKind {
    /// The remote server refused the connection.
    ConnectionRefused,
    /// The remote server closed the connection before a full response arrived.
    RemoteHostClosed,
    /// The host name could not be resolved.
    HostNotFound,
    /// The operation timed out at the transport level.
    Timeout,
    /// The TLS handshake failed.
    SslHandshake,
    /// A proxy demanded authentication (HTTP 407).
    ProxyAuthenticationRequired,
    /// The server understood the request but refuses to authorize it (HTTP 403).
    ContentAccessDenied,
    /// The requested resource does not exist (HTTP 404).
    ContentNotFound,
    /// The operation is not permitted on this resource (HTTP 405).
    ContentOperationNotPermitted,
    /// The request conflicts with the current state of the resource (HTTP 409).
    ContentConflict,
    /// The server requires authentication (HTTP 401).
    AuthenticationRequired,
    /// The server failed internally (HTTP 500).
    InternalServerError,
    /// The server is temporarily unavailable (HTTP 503).
    ServiceUnavailable,
    /// A network-layer failure that fits no more specific kind.
    UnknownNetwork,
    /// A 4xx response that fits no more specific kind.
    UnknownContent,
    /// A 5xx response that fits no more specific kind.
    UnknownServer,
}

/// The single error union surfaced by every request in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A transport failure or a non-2xx HTTP response.
    #[error("{1}")]
    Network(NetworkErrorKind, String),
    /// A response body that could not be parsed as expected.
    #[error("{0}")]
    Parse(String),
    /// A well-formed response whose content reports an error, e.g. the
    /// `error` field of a device-code polling response.
    #[error("{0}")]
    UnknownContent(String),
    /// The redirect budget was exhausted.
    #[error("request was redirected too many times")]
    RedirectLimit,
}

impl Error {
    /// A parse error with the standard message.
    pub fn parse() -> Self {
        Error::Parse("Unable to parse response".to_string())
    }
}

/// A terminal failure: the error itself, plus the server's parsed response
/// body when one was available (typically Google's error envelope).
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub error: Error,
    pub result: Option<Value>,
}

impl Failure {
    pub(crate) fn bare(error: Error) -> Self {
        Failure {
            error,
            result: None,
        }
    }
}

/// The terminal state of a JSON request.
///
/// Resolution of the future returned by an execute-style method is the
/// one and only completion event for that submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The request succeeded and the body parsed as JSON. An empty 2xx
    /// body (token revocation returns one) is represented as `Value::Null`.
    Ready(Value),
    /// The request was cancelled. No error is surfaced and no result is
    /// available.
    Canceled,
    /// The request failed terminally.
    Failed(Failure),
}

impl Completion {
    /// Returns the parsed result, discarding failure details.
    pub fn ready(self) -> Option<Value> {
        match self {
            Completion::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Completion::Ready(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Completion::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
