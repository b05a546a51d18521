//! Device-flow and token-endpoint tests on a paused runtime clock.

mod common;

use common::TestServer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use youtube_client::oauth::OAuthRequest;
use youtube_client::{Completion, CredentialStore, Credentials, Endpoints, Error};

fn credentials() -> Credentials {
    Credentials {
        client_id: "CID".into(),
        client_secret: "SEC".into(),
        access_token: "AT".into(),
        scopes: vec!["youtube.readonly".into()],
        ..Credentials::default()
    }
}

fn oauth(server: &TestServer, credentials: Credentials) -> OAuthRequest {
    let mut endpoints = Endpoints::default();
    endpoints.token_url = server.url("/token");
    endpoints.device_code_url = server.url("/device/code");
    endpoints.revoke_url = server.url("/revoke");
    OAuthRequest::new(
        common::transport(),
        CredentialStore::new(credentials),
        endpoints,
    )
}

const DEVICE_CODE_RESPONSE: &str = r#"{
    "device_code": "DC",
    "user_code": "UC",
    "verification_url": "https://www.google.com/device",
    "expires_in": 1800,
    "interval": 5
}"#;

#[tokio::test(start_paused = true)]
async fn device_flow_happy_path() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_seen = Arc::clone(&polls);
    let server = TestServer::spawn(move |recorded| match recorded.path.as_str() {
        "/device/code" => common::json(200, DEVICE_CODE_RESPONSE),
        "/token" => {
            if polls_seen.fetch_add(1, Ordering::SeqCst) < 2 {
                common::json(200, r#"{"error":"authorization_pending"}"#)
            } else {
                common::json(
                    200,
                    r#"{"access_token":"AT","refresh_token":"RT","expires_in":3600,"token_type":"Bearer"}"#,
                )
            }
        }
        other => panic!("unexpected path {other}"),
    })
    .await;

    let start = tokio::time::Instant::now();
    let flow = oauth(&server, credentials())
        .request_authorization_code()
        .await
        .ready()
        .expect("device code should be issued");

    assert_eq!(flow.user_code(), Some("UC"));
    assert_eq!(flow.verification_url(), Some("https://www.google.com/device"));
    assert_eq!(flow.authorization()["expires_in"], 1800);

    let completion = flow.poll_until_complete().await;
    let token = completion.ready().expect("polling should end Ready");
    assert_eq!(token["access_token"], "AT");
    assert_eq!(token["refresh_token"], "RT");

    let requests = server.requests();
    let device = requests.iter().find(|r| r.path == "/device/code").unwrap();
    assert_eq!(device.method, "POST");
    assert_eq!(device.body, "scope=youtube.readonly&client_id=CID");

    let first_poll = requests.iter().find(|r| r.path == "/token").unwrap();
    assert_eq!(
        first_poll.body,
        "client_id=CID&client_secret=SEC&code=DC&grant_type=http://oauth.net/grant_type/device/1.0"
    );
    // interval=5 means polls are spaced 5500 ms apart.
    assert!(first_poll.at - start >= Duration::from_millis(5500));
    assert_eq!(server.hits("/token"), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_down_doubles_the_polling_interval() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_seen = Arc::clone(&polls);
    let server = TestServer::spawn(move |recorded| match recorded.path.as_str() {
        "/device/code" => common::json(200, DEVICE_CODE_RESPONSE),
        "/token" => match polls_seen.fetch_add(1, Ordering::SeqCst) {
            0 => common::json(200, r#"{"error":"slow_down"}"#),
            _ => common::json(200, r#"{"access_token":"AT","expires_in":3600}"#),
        },
        other => panic!("unexpected path {other}"),
    })
    .await;

    let flow = oauth(&server, credentials())
        .request_authorization_code()
        .await
        .ready()
        .unwrap();
    let completion = flow.poll_until_complete().await;
    assert!(completion.is_ready());

    let token_polls: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|r| r.path == "/token")
        .collect();
    assert_eq!(token_polls.len(), 2);
    // 5500 ms to the first poll, then the doubled 11000 ms gap.
    assert!(token_polls[1].at - token_polls[0].at >= Duration::from_millis(11000));
}

#[tokio::test(start_paused = true)]
async fn pending_after_expiry_is_terminal() {
    let server = TestServer::spawn(|recorded| match recorded.path.as_str() {
        "/device/code" => common::json(
            200,
            r#"{"device_code":"DC","user_code":"UC","verification_url":"u","expires_in":1,"interval":1}"#,
        ),
        "/token" => common::json(200, r#"{"error":"authorization_pending"}"#),
        other => panic!("unexpected path {other}"),
    })
    .await;

    let flow = oauth(&server, credentials())
        .request_authorization_code()
        .await
        .ready()
        .unwrap();
    // The first poll happens 1100 ms in, past the 1 s expiry.
    let completion = flow.poll_until_complete().await;
    let Completion::Failed(failure) = completion else {
        panic!("expected a failure after expiry");
    };
    assert_eq!(
        failure.error,
        Error::UnknownContent("authorization_pending".into())
    );
    assert_eq!(server.hits("/token"), 1);
}

#[tokio::test(start_paused = true)]
async fn a_zero_interval_falls_back_to_five_seconds() {
    let server = TestServer::spawn(|recorded| match recorded.path.as_str() {
        "/device/code" => common::json(
            200,
            r#"{"device_code":"DC","user_code":"UC","expires_in":1800,"interval":0}"#,
        ),
        "/token" => common::json(200, r#"{"access_token":"AT"}"#),
        other => panic!("unexpected path {other}"),
    })
    .await;

    let start = tokio::time::Instant::now();
    let flow = oauth(&server, credentials())
        .request_authorization_code()
        .await
        .ready()
        .unwrap();
    assert!(flow.poll_until_complete().await.is_ready());

    let poll = server
        .requests()
        .into_iter()
        .find(|r| r.path == "/token")
        .unwrap();
    assert!(poll.at - start >= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn unrelated_poll_errors_are_terminal() {
    let server = TestServer::spawn(|recorded| match recorded.path.as_str() {
        "/device/code" => common::json(200, DEVICE_CODE_RESPONSE),
        "/token" => common::json(200, r#"{"error":"access_denied"}"#),
        other => panic!("unexpected path {other}"),
    })
    .await;

    let flow = oauth(&server, credentials())
        .request_authorization_code()
        .await
        .ready()
        .unwrap();
    let Completion::Failed(failure) = flow.poll_until_complete().await else {
        panic!("expected a failure");
    };
    assert_eq!(failure.error, Error::UnknownContent("access_denied".into()));
    assert_eq!(server.hits("/token"), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_the_poll_wait_cancels_the_timer() {
    let server = TestServer::spawn(|recorded| match recorded.path.as_str() {
        "/device/code" => common::json(200, DEVICE_CODE_RESPONSE),
        other => panic!("unexpected path {other}"),
    })
    .await;

    let flow = oauth(&server, credentials())
        .request_authorization_code()
        .await
        .ready()
        .unwrap();
    let handle = flow.handle();
    let task = tokio::spawn(flow.poll_until_complete());
    tokio::task::yield_now().await;

    handle.cancel();
    let completion = task.await.unwrap();
    assert_eq!(completion, Completion::Canceled);
    assert_eq!(server.hits("/token"), 0);
}

#[tokio::test]
async fn a_failed_device_code_request_is_terminal() {
    let server = TestServer::spawn(|_| common::json(400, r#"{"error":"invalid_client"}"#)).await;
    let outcome = oauth(&server, credentials()).request_authorization_code().await;
    assert!(outcome.ready().is_none());
}

#[tokio::test]
async fn a_device_code_payload_without_a_code_is_a_parse_failure() {
    let server = TestServer::spawn(|_| common::json(200, r#"{"unexpected":"shape"}"#)).await;
    let outcome = oauth(&server, credentials()).request_authorization_code().await;
    assert!(outcome.ready().is_none());
}

#[tokio::test]
async fn code_exchange_posts_the_out_of_band_redirect() -> eyre::Result<()> {
    let server = TestServer::spawn(|recorded| {
        assert_eq!(recorded.path, "/token");
        common::json(
            200,
            r#"{"access_token":"AT","refresh_token":"RT","expires_in":3600}"#,
        )
    })
    .await;

    let completion = oauth(&server, credentials())
        .exchange_code_for_access_token("THECODE")
        .await;
    let token = completion
        .ready()
        .ok_or_else(|| eyre::eyre!("exchange should be Ready"))?;
    assert_eq!(token["access_token"], "AT");

    let recorded = &server.requests()[0];
    assert_eq!(recorded.method, "POST");
    let params = recorded.body_params();
    assert!(params.contains(&("code".into(), "THECODE".into())));
    assert!(params.contains(&("client_id".into(), "CID".into())));
    assert!(params.contains(&("client_secret".into(), "SEC".into())));
    assert!(params.contains(&("redirect_uri".into(), "urn:ietf:wg:oauth:2.0:oob".into())));
    assert!(params.contains(&("grant_type".into(), "authorization_code".into())));
    Ok(())
}

#[tokio::test]
async fn revocation_accepts_an_empty_body() {
    let server = TestServer::spawn(|recorded| {
        assert_eq!(recorded.path, "/revoke");
        common::text(200, "")
    })
    .await;

    let store = CredentialStore::new(credentials());
    let mut endpoints = Endpoints::default();
    endpoints.revoke_url = server.url("/revoke");
    let mut oauth = OAuthRequest::new(common::transport(), store.clone(), endpoints);

    let completion = oauth.revoke_access_token().await;
    assert_eq!(completion.ready(), Some(serde_json::Value::Null));

    let recorded = &server.requests()[0];
    assert_eq!(recorded.method, "GET");
    assert!(recorded
        .query_params()
        .contains(&("token".into(), "AT".into())));
    assert!(recorded.body.is_empty());

    // Revocation does not clear the stored token.
    assert_eq!(store.snapshot().access_token, "AT");
}
