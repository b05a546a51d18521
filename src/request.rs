//! The request engine every client in this crate is built on.
//!
//! A [`Request`] owns one logical HTTP operation at a time: it assembles
//! the transport request (API key, bearer token, headers, body), follows
//! redirects itself (the transport is configured not to), transparently
//! refreshes an expired access token on a 401, and resolves to a
//! [`Completion`] carrying the parsed JSON body.
//!
//! Status is observable through a watch channel: `Null` before the first
//! submission, `Loading` while a transport operation is in flight, then
//! exactly one of `Ready`, `Failed`, or `Canceled`. Re-executing a request
//! after a terminal state resets the machine to `Null` and then `Loading`.

use crate::credentials::CredentialStore;
use crate::endpoints::Endpoints;
use crate::error::{Completion, Error, Failure, NetworkErrorKind};
use http::Method;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use url::Url;

/// The engine never follows more redirects than this per submission.
pub const MAX_REDIRECTS: u32 = 8;

/// Lifecycle of a request submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No submission yet (or a terminal submission was reset).
    Null,
    /// A transport operation is in flight.
    Loading,
    /// The submission was cancelled; no result, no error.
    Canceled,
    /// The submission failed terminally.
    Failed,
    /// The submission succeeded.
    Ready,
}

/// Request body variants.
#[derive(Debug, Clone)]
pub enum Body {
    /// Serialized as `application/json`.
    Json(Value),
    /// Sent verbatim as `application/x-www-form-urlencoded`.
    Form(String),
}

#[derive(Debug, Default)]
struct CancelFlag {
    flag: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    async fn cancelled(&self) {
        loop {
            // Register interest before checking the flag so a concurrent
            // cancel between the check and the await is not lost.
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// A cloneable view onto a request: cancellation and status observation.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    cancel: Arc<CancelFlag>,
    status: watch::Receiver<Status>,
}

impl RequestHandle {
    /// Requests cancellation of the in-flight submission.
    ///
    /// Safe to call from any state. While `Loading` the transport
    /// operation (or a pending device-poll timer) is aborted and the
    /// submission resolves to `Canceled`; in a terminal state this is a
    /// no-op and the next submission starts clean.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The request's current status.
    pub fn current(&self) -> Status {
        *self.status.borrow()
    }

    /// A watch receiver tracking every status transition.
    pub fn status(&self) -> watch::Receiver<Status> {
        self.status.clone()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}

/// Outcome of the transport/redirect/refresh loop, before body
/// interpretation.
pub(crate) enum RunOutcome {
    Canceled,
    Failed(Failure),
    Http {
        status: http::StatusCode,
        body: String,
        url: Url,
    },
}

/// Terminal state of a raw (non-JSON) submission.
#[derive(Debug)]
pub(crate) enum RawCompletion {
    Ready { body: String, url: Url },
    Canceled,
    Failed(Failure),
}

/// A reusable HTTP request with token handling and redirect following.
#[derive(Debug)]
pub struct Request {
    http: reqwest::Client,
    credentials: CredentialStore,
    endpoints: Endpoints,
    url: Option<Url>,
    headers: Vec<(String, String)>,
    body: Option<Body>,
    status_tx: watch::Sender<Status>,
    cancel: Arc<CancelFlag>,
    redirects: u32,
}

impl Request {
    /// Creates an engine bound to a shared transport, credential store and
    /// endpoint set.
    ///
    /// The transport must not follow redirects on its own (build it with
    /// `redirect::Policy::none()`); the engine re-issues the original verb
    /// at each redirect target, which the stream resolver relies on.
    pub fn new(http: reqwest::Client, credentials: CredentialStore, endpoints: Endpoints) -> Self {
        let (status_tx, _) = watch::channel(Status::Null);
        Request {
            http,
            credentials,
            endpoints,
            url: None,
            headers: Vec::new(),
            body: None,
            status_tx,
            cancel: Arc::new(CancelFlag::default()),
            redirects: 0,
        }
    }

    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    /// Replaces the extra headers applied verbatim to every attempt.
    pub fn set_headers(&mut self, headers: Vec<(String, String)>) {
        self.headers = headers;
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    /// A handle for cancelling and observing this request from elsewhere.
    pub fn handle(&self) -> RequestHandle {
        RequestHandle {
            cancel: Arc::clone(&self.cancel),
            status: self.status_tx.subscribe(),
        }
    }

    pub(crate) fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub(crate) fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Submits the request and resolves to its terminal state.
    ///
    /// Exactly one completion is produced per call; the returned future's
    /// resolution is the "finished" event. Because this takes `&mut self`,
    /// a second submission cannot start while one is loading; cancel via
    /// [`RequestHandle::cancel`] and re-execute instead.
    ///
    /// When `auth_required` is true and an access token is present, an
    /// `Authorization: Bearer` header is attached. A 401 response then
    /// triggers one refresh-and-replay cycle if a refresh token is
    /// available; a second 401 is terminal.
    pub async fn execute(&mut self, method: Method, auth_required: bool) -> Completion {
        self.arm();
        self.set_status(Status::Loading);
        let completion = json_completion(self.run(method, auth_required).await);
        self.set_status(completion_status(&completion));
        completion
    }

    /// Resets cancellation and status for a fresh top-level submission.
    ///
    /// Multi-stage drivers (device polling, stream resolution) arm once
    /// and then issue several [`Request::run`] calls under a single
    /// Loading window.
    pub(crate) fn arm(&mut self) {
        self.cancel.reset();
        self.status_tx.send_replace(Status::Null);
    }

    pub(crate) fn set_status(&self, status: Status) {
        self.status_tx.send_replace(status);
    }

    /// The transport loop: build, send, follow redirects, refresh on 401.
    ///
    /// Does not touch status; callers own the Loading/terminal markers.
    pub(crate) async fn run(&mut self, method: Method, auth_required: bool) -> RunOutcome {
        let Some(mut url) = self.url.clone() else {
            return RunOutcome::Failed(Failure::bare(Error::UnknownContent(
                "no URL set".to_string(),
            )));
        };
        self.redirects = 0;
        let mut refreshed = false;
        let cancel = Arc::clone(&self.cancel);
        if cancel.is_cancelled() {
            return RunOutcome::Canceled;
        }

        loop {
            tracing::trace!(%method, %url, auth_required, "issuing transport request");
            let builder = self.build(&method, &url, auth_required);
            let response = tokio::select! {
                _ = cancel.cancelled() => return RunOutcome::Canceled,
                response = builder.send() => response,
            };
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    return RunOutcome::Failed(Failure::bare(Error::Network(
                        transport_kind(&e),
                        e.to_string(),
                    )));
                }
            };

            if let Some(target) = redirect_target(&url, &response) {
                if self.redirects < MAX_REDIRECTS {
                    self.redirects += 1;
                    tracing::debug!(%target, redirects = self.redirects, "following redirect");
                    url = target;
                    continue;
                }
                return RunOutcome::Failed(Failure::bare(Error::RedirectLimit));
            }

            let status = response.status();
            if status == http::StatusCode::UNAUTHORIZED && auth_required && !refreshed {
                let snapshot = self.credentials.snapshot();
                if !snapshot.refresh_token.is_empty() {
                    tracing::debug!("got 401, attempting access token refresh");
                    match self.refresh_access_token(&cancel).await {
                        Refresh::Refreshed => {
                            refreshed = true;
                            self.redirects = 0;
                            continue;
                        }
                        Refresh::Canceled => return RunOutcome::Canceled,
                        Refresh::Failed(failure) => return RunOutcome::Failed(failure),
                    }
                }
            }

            let body = tokio::select! {
                _ = cancel.cancelled() => return RunOutcome::Canceled,
                body = response.text() => body,
            };
            let body = match body {
                Ok(body) => body,
                Err(e) => {
                    return RunOutcome::Failed(Failure::bare(Error::Network(
                        NetworkErrorKind::RemoteHostClosed,
                        e.to_string(),
                    )));
                }
            };
            return RunOutcome::Http { status, body, url };
        }
    }

    /// Like [`Request::run`], but resolves to the decoded body text
    /// instead of parsed JSON. Used for form-encoded, HTML, JavaScript
    /// and XML endpoints.
    pub(crate) async fn run_raw(&mut self, method: Method, auth_required: bool) -> RawCompletion {
        match self.run(method, auth_required).await {
            RunOutcome::Canceled => RawCompletion::Canceled,
            RunOutcome::Failed(failure) => RawCompletion::Failed(failure),
            RunOutcome::Http { status, body, url } => {
                if status.is_success() {
                    RawCompletion::Ready { body, url }
                } else {
                    RawCompletion::Failed(http_failure(status, body))
                }
            }
        }
    }

    fn build(&self, method: &Method, url: &Url, auth_required: bool) -> reqwest::RequestBuilder {
        let credentials = self.credentials.snapshot();
        let mut url = url.clone();
        if !credentials.api_key.is_empty() && !crate::query::has_query_param(&url, "key") {
            url.query_pairs_mut().append_pair("key", &credentials.api_key);
        }

        let mut builder = self.http.request(method.clone(), url);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if auth_required && !credentials.access_token.is_empty() {
            builder = builder.header(
                "Authorization",
                format!("Bearer {}", credentials.access_token),
            );
        }
        match &self.body {
            Some(Body::Json(value)) => builder.json(value),
            Some(Body::Form(form)) => builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(form.clone()),
            None => builder,
        }
    }

    /// Exchanges the refresh token for a new access token and writes it
    /// back to the shared store (notifying observers) on success.
    async fn refresh_access_token(&self, cancel: &CancelFlag) -> Refresh {
        let credentials = self.credentials.snapshot();
        let body = format!(
            "grant_type=refresh_token&client_id={}&client_secret={}&refresh_token={}",
            credentials.client_id, credentials.client_secret, credentials.refresh_token
        );
        let builder = self
            .http
            .post(self.endpoints.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Refresh::Canceled,
            response = builder.send() => response,
        };
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                return Refresh::Failed(Failure::bare(Error::Network(
                    transport_kind(&e),
                    e.to_string(),
                )));
            }
        };
        let status = response.status();
        let body = tokio::select! {
            _ = cancel.cancelled() => return Refresh::Canceled,
            body = response.text() => body,
        };
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                return Refresh::Failed(Failure::bare(Error::Network(
                    NetworkErrorKind::RemoteHostClosed,
                    e.to_string(),
                )));
            }
        };

        if !status.is_success() {
            return Refresh::Failed(http_failure(status, body));
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => match value.get("access_token").and_then(Value::as_str) {
                Some(token) => {
                    tracing::debug!("access token refreshed");
                    self.credentials.set_access_token(token);
                    Refresh::Refreshed
                }
                None => Refresh::Failed(Failure {
                    error: Error::parse(),
                    result: Some(value),
                }),
            },
            Err(_) => Refresh::Failed(Failure::bare(Error::parse())),
        }
    }
}

enum Refresh {
    Refreshed,
    Canceled,
    Failed(Failure),
}

/// Maps a [`RunOutcome`] to the JSON completion contract: 2xx bodies must
/// parse (an empty body becomes `Value::Null`), non-2xx responses fail
/// with the HTTP-level kind while still exposing a parsed error envelope.
pub(crate) fn json_completion(outcome: RunOutcome) -> Completion {
    match outcome {
        RunOutcome::Canceled => Completion::Canceled,
        RunOutcome::Failed(failure) => Completion::Failed(failure),
        RunOutcome::Http { status, body, .. } => {
            if status.is_success() {
                if body.is_empty() {
                    return Completion::Ready(Value::Null);
                }
                match serde_json::from_str(&body) {
                    Ok(value) => Completion::Ready(value),
                    Err(_) => Completion::Failed(Failure::bare(Error::parse())),
                }
            } else {
                Completion::Failed(http_failure(status, body))
            }
        }
    }
}

pub(crate) fn completion_status(completion: &Completion) -> Status {
    match completion {
        Completion::Ready(_) => Status::Ready,
        Completion::Canceled => Status::Canceled,
        Completion::Failed(_) => Status::Failed,
    }
}

fn http_failure(status: http::StatusCode, body: String) -> Failure {
    let result = serde_json::from_str(&body).ok();
    let message = if body.is_empty() {
        format!("request failed with status {status}")
    } else {
        format!("request failed with status {status}: {body}")
    };
    Failure {
        error: Error::Network(status_kind(status), message),
        result,
    }
}

/// The redirect target, when the response names one.
///
/// A `Location` header is taken as a redirect regardless of status code,
/// resolved against the current URL.
fn redirect_target(url: &Url, response: &reqwest::Response) -> Option<Url> {
    let location = response.headers().get(http::header::LOCATION)?;
    let location = location.to_str().ok()?;
    url.join(location).ok()
}

fn transport_kind(error: &reqwest::Error) -> NetworkErrorKind {
    if error.is_timeout() {
        NetworkErrorKind::Timeout
    } else if error.is_connect() {
        NetworkErrorKind::ConnectionRefused
    } else if error.is_body() || error.is_decode() {
        NetworkErrorKind::RemoteHostClosed
    } else {
        NetworkErrorKind::UnknownNetwork
    }
}

fn status_kind(status: http::StatusCode) -> NetworkErrorKind {
    use http::StatusCode;
    match status {
        StatusCode::UNAUTHORIZED => NetworkErrorKind::AuthenticationRequired,
        StatusCode::FORBIDDEN => NetworkErrorKind::ContentAccessDenied,
        StatusCode::NOT_FOUND | StatusCode::GONE => NetworkErrorKind::ContentNotFound,
        StatusCode::METHOD_NOT_ALLOWED => NetworkErrorKind::ContentOperationNotPermitted,
        StatusCode::PROXY_AUTHENTICATION_REQUIRED => NetworkErrorKind::ProxyAuthenticationRequired,
        StatusCode::CONFLICT => NetworkErrorKind::ContentConflict,
        StatusCode::INTERNAL_SERVER_ERROR => NetworkErrorKind::InternalServerError,
        StatusCode::SERVICE_UNAVAILABLE => NetworkErrorKind::ServiceUnavailable,
        s if s.is_client_error() => NetworkErrorKind::UnknownContent,
        _ => NetworkErrorKind::UnknownServer,
    }
}

/// Builds the transport client the engine expects: no automatic redirect
/// following (the engine does that itself, preserving the verb).
pub fn transport() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("building reqwest client should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_onto_the_taxonomy() {
        assert_eq!(
            status_kind(http::StatusCode::UNAUTHORIZED),
            NetworkErrorKind::AuthenticationRequired
        );
        assert_eq!(
            status_kind(http::StatusCode::FORBIDDEN),
            NetworkErrorKind::ContentAccessDenied
        );
        assert_eq!(
            status_kind(http::StatusCode::NOT_FOUND),
            NetworkErrorKind::ContentNotFound
        );
        assert_eq!(
            status_kind(http::StatusCode::IM_A_TEAPOT),
            NetworkErrorKind::UnknownContent
        );
        assert_eq!(
            status_kind(http::StatusCode::BAD_GATEWAY),
            NetworkErrorKind::UnknownServer
        );
    }

    #[test]
    fn failed_envelope_is_parsed_when_json() {
        let failure = http_failure(
            http::StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"quota"}}"#.to_string(),
        );
        assert!(matches!(
            failure.error,
            Error::Network(NetworkErrorKind::ContentAccessDenied, _)
        ));
        let envelope = failure.result.unwrap();
        assert_eq!(envelope["error"]["code"], 403);
    }

    #[test]
    fn empty_json_body_is_ready_null() {
        let completion = json_completion(RunOutcome::Http {
            status: http::StatusCode::OK,
            body: String::new(),
            url: Url::parse("https://example.com/").unwrap(),
        });
        assert_eq!(completion, Completion::Ready(Value::Null));
    }

    #[test]
    fn unparseable_success_body_is_a_parse_failure() {
        let completion = json_completion(RunOutcome::Http {
            status: http::StatusCode::OK,
            body: "<html>not json</html>".to_string(),
            url: Url::parse("https://example.com/").unwrap(),
        });
        let failure = completion.failure().unwrap();
        assert_eq!(failure.error, Error::parse());
        assert_eq!(failure.error.to_string(), "Unable to parse response");
    }
}
