//! OAuth 2.0 flows for the YouTube Data API.
//!
//! Supports the installed-applications flow (the host shows a consent web
//! view and hands the resulting code to
//! [`OAuthRequest::exchange_code_for_access_token`]) and the devices flow
//! ([`OAuthRequest::request_authorization_code`] obtains a user code for
//! out-of-band consent, then the returned [`DeviceFlow`] polls the token
//! endpoint until the user grants access or the code expires). Tokens can
//! be revoked with [`OAuthRequest::revoke_access_token`].

use crate::credentials::CredentialStore;
use crate::endpoints::{Endpoints, REDIRECT_URI};
use crate::error::{Completion, Error, Failure};
use crate::request::{json_completion, Body, Request, RequestHandle, Status};
use http::Method;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// The legacy device grant type Google's device flow uses.
const DEVICE_GRANT_TYPE: &str = "http://oauth.net/grant_type/device/1.0";

/// Drives token acquisition and revocation.
pub struct OAuthRequest {
    request: Request,
}

impl OAuthRequest {
    pub fn new(http: reqwest::Client, credentials: CredentialStore, endpoints: Endpoints) -> Self {
        OAuthRequest {
            request: Request::new(http, credentials, endpoints),
        }
    }

    /// A handle for cancelling and observing the flow from elsewhere.
    pub fn handle(&self) -> RequestHandle {
        self.request.handle()
    }

    /// Exchanges an authorization code obtained from a consent web view
    /// for an access token.
    ///
    /// Posts the code with the out-of-band redirect URI
    /// (`urn:ietf:wg:oauth:2.0:oob`); the terminal result is the token
    /// JSON (`access_token`, `refresh_token`, `expires_in`, ...).
    pub async fn exchange_code_for_access_token(&mut self, code: &str) -> Completion {
        let credentials = self.request.credentials().snapshot();
        let body = format!(
            "code={code}&client_id={}&client_secret={}&redirect_uri={REDIRECT_URI}&grant_type=authorization_code",
            credentials.client_id, credentials.client_secret
        );
        let url = self.request.endpoints().token_url.clone();
        self.request.set_url(url);
        self.request.set_body(Some(Body::Form(body)));
        self.request.execute(Method::POST, true).await
    }

    /// Begins the devices flow by requesting an authorization code for
    /// the configured scopes.
    ///
    /// On success the returned [`DeviceFlow`] carries the payload to show
    /// the user (`user_code`, `verification_url`, `expires_in`,
    /// `interval`); call [`DeviceFlow::poll_until_complete`] to wait for
    /// the user's decision. The flow stays in `Loading` until polling
    /// reaches a terminal state.
    pub async fn request_authorization_code(mut self) -> DeviceCodeOutcome {
        let credentials = self.request.credentials().snapshot();
        let body = format!(
            "scope={}&client_id={}",
            credentials.scopes.join(" "),
            credentials.client_id
        );
        let url = self.request.endpoints().device_code_url.clone();
        self.request.arm();
        self.request.set_status(Status::Loading);
        self.request.set_url(url);
        self.request.set_body(Some(Body::Form(body)));

        match json_completion(self.request.run(Method::POST, true).await) {
            Completion::Ready(payload) => {
                let device_code = payload
                    .get("device_code")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let Some(device_code) = device_code else {
                    self.request.set_status(Status::Failed);
                    return DeviceCodeOutcome::Failed(Failure {
                        error: Error::parse(),
                        result: Some(payload),
                    });
                };
                let expires_in = payload.get("expires_in").and_then(Value::as_i64).unwrap_or(0);
                let interval = payload.get("interval").and_then(Value::as_i64).unwrap_or(0);
                let (expiry, interval) = normalize_timing(expires_in, interval);
                let user_code = payload.get("user_code").and_then(Value::as_str);
                tracing::debug!(
                    user_code,
                    ?interval,
                    ?expiry,
                    "device authorization code obtained, polling for token"
                );
                DeviceCodeOutcome::Ready(DeviceFlow {
                    request: self.request,
                    authorization: payload,
                    device_code,
                    deadline: Instant::now() + expiry,
                    interval,
                })
            }
            Completion::Canceled => {
                self.request.set_status(Status::Canceled);
                DeviceCodeOutcome::Canceled
            }
            Completion::Failed(failure) => {
                self.request.set_status(Status::Failed);
                DeviceCodeOutcome::Failed(failure)
            }
        }
    }

    /// Revokes Data API access for the current access token.
    ///
    /// The revoke endpoint legitimately returns an empty body; the result
    /// is `Ready` on any 2xx. The stored access token is left in place.
    pub async fn revoke_access_token(&mut self) -> Completion {
        let credentials = self.request.credentials().snapshot();
        let mut url = self.request.endpoints().revoke_url.clone();
        url.query_pairs_mut()
            .append_pair("token", &credentials.access_token);
        self.request.set_url(url);
        self.request.set_body(None);
        self.request.execute(Method::GET, false).await
    }
}

/// Terminal outcome of [`OAuthRequest::request_authorization_code`].
pub enum DeviceCodeOutcome {
    /// A device code was issued; poll for the token next.
    Ready(DeviceFlow),
    Canceled,
    Failed(Failure),
}

impl DeviceCodeOutcome {
    pub fn ready(self) -> Option<DeviceFlow> {
        match self {
            DeviceCodeOutcome::Ready(flow) => Some(flow),
            _ => None,
        }
    }
}

/// An in-progress devices flow: the authorization payload for the user,
/// and the polling loop that waits for their decision.
pub struct DeviceFlow {
    request: Request,
    authorization: Value,
    device_code: String,
    deadline: Instant,
    interval: Duration,
}

impl DeviceFlow {
    /// The full device-code payload: `user_code`, `verification_url`,
    /// `expires_in`, `interval`, and the `device_code` itself.
    pub fn authorization(&self) -> &Value {
        &self.authorization
    }

    /// The code the user must enter at the verification URL.
    pub fn user_code(&self) -> Option<&str> {
        self.authorization.get("user_code").and_then(Value::as_str)
    }

    /// Where the user completes consent.
    pub fn verification_url(&self) -> Option<&str> {
        self.authorization
            .get("verification_url")
            .and_then(Value::as_str)
    }

    pub fn handle(&self) -> RequestHandle {
        self.request.handle()
    }

    /// Polls the token endpoint until the user grants or denies access,
    /// the device code expires, or the flow is cancelled.
    ///
    /// `authorization_pending` reschedules after the current interval;
    /// `slow_down` doubles the interval first. Once the expiry deadline
    /// has passed, any response other than success is terminal. The
    /// terminal `Ready` result is the token JSON.
    pub async fn poll_until_complete(mut self) -> Completion {
        let cancel = self.request.handle();
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    self.request.set_status(Status::Canceled);
                    return Completion::Canceled;
                }
            }

            let completion = self.poll_once().await;
            match completion {
                Completion::Ready(payload) => {
                    match payload.get("error") {
                        None | Some(Value::Null) => {
                            self.request.set_status(Status::Ready);
                            return Completion::Ready(payload);
                        }
                        Some(error) => {
                            let error_text = error
                                .as_str()
                                .map(str::to_string)
                                .unwrap_or_else(|| error.to_string());
                            if Instant::now() < self.deadline {
                                if error_text == "authorization_pending" {
                                    tracing::trace!("authorization pending, polling again");
                                    continue;
                                }
                                if error_text == "slow_down" {
                                    self.interval *= 2;
                                    tracing::debug!(interval = ?self.interval, "server asked to slow down");
                                    continue;
                                }
                            }
                            self.request.set_status(Status::Failed);
                            return Completion::Failed(Failure {
                                error: Error::UnknownContent(error_text),
                                result: Some(payload),
                            });
                        }
                    }
                }
                Completion::Canceled => {
                    self.request.set_status(Status::Canceled);
                    return Completion::Canceled;
                }
                Completion::Failed(failure) => {
                    self.request.set_status(Status::Failed);
                    return Completion::Failed(failure);
                }
            }
        }
    }

    async fn poll_once(&mut self) -> Completion {
        let credentials = self.request.credentials().snapshot();
        let body = format!(
            "client_id={}&client_secret={}&code={}&grant_type={DEVICE_GRANT_TYPE}",
            credentials.client_id, credentials.client_secret, self.device_code
        );
        let url = self.request.endpoints().token_url.clone();
        self.request.set_url(url);
        self.request.set_body(Some(Body::Form(body)));
        json_completion(self.request.run(Method::POST, true).await)
    }
}

/// Normalizes the device-code response timing fields.
///
/// A missing or zero `expires_in` falls back to 60 seconds. The polling
/// interval is the server's value in seconds times 1.1 (leaving a little
/// slack), or 5000 ms when missing or zero.
fn normalize_timing(expires_in: i64, interval: i64) -> (Duration, Duration) {
    let expiry = if expires_in > 0 {
        Duration::from_secs(expires_in as u64)
    } else {
        Duration::from_secs(60)
    };
    let interval = if interval > 0 {
        Duration::from_millis(interval as u64 * 1100)
    } else {
        Duration::from_millis(5000)
    };
    (expiry, interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults_apply_when_fields_are_missing_or_zero() {
        let (expiry, interval) = normalize_timing(0, 0);
        assert_eq!(expiry, Duration::from_secs(60));
        assert_eq!(interval, Duration::from_millis(5000));
    }

    #[test]
    fn server_interval_gains_ten_percent_slack() {
        let (expiry, interval) = normalize_timing(1800, 5);
        assert_eq!(expiry, Duration::from_secs(1800));
        assert_eq!(interval, Duration::from_millis(5500));
    }
}
