//! Subtitle track listing against a local timedtext stand-in.

mod common;

use common::TestServer;
use youtube_client::{CredentialStore, Credentials, Endpoints, SubtitlesRequest};

#[tokio::test]
async fn track_lists_parse_into_subtitle_tracks() {
    let server = TestServer::spawn(|recorded| {
        assert_eq!(recorded.path, "/timedtext");
        common::text(
            200,
            r#"<?xml version="1.0" encoding="utf-8" ?>
<transcript_list docid="42">
  <track id="0" name="" lang_code="en" lang_original="English" lang_translated="English" lang_default="true"/>
  <track id="1" name="" lang_code="fr" lang_original="Fran&#231;ais" lang_translated="French"/>
</transcript_list>"#,
        )
    })
    .await;

    let mut endpoints = Endpoints::default();
    endpoints.subtitles_url = server.url("/timedtext");
    let mut subtitles = SubtitlesRequest::new(
        common::transport(),
        CredentialStore::new(Credentials::default()),
        endpoints,
    );

    let tracks = subtitles
        .list("abcd1234567")
        .await
        .ready()
        .expect("listing should be Ready");

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].language_code, "en");
    assert_eq!(tracks[0].original_language, "English");
    assert_eq!(tracks[1].original_language, "Français");
    assert_eq!(tracks[1].translated_language, "French");
    assert!(tracks[1]
        .url
        .query_pairs()
        .any(|(k, v)| k == "v" && v == "abcd1234567"));
    assert!(tracks[1]
        .url
        .query_pairs()
        .any(|(k, v)| k == "lang" && v == "fr"));

    // The listing itself is unauthenticated.
    let recorded = &server.requests()[0];
    assert_eq!(recorded.header("authorization"), None);
    let params = recorded.query_params();
    assert!(params.contains(&("type".into(), "list".into())));
    assert!(params.contains(&("v".into(), "abcd1234567".into())));
}

#[tokio::test]
async fn an_empty_track_list_is_ready_and_empty() {
    let server = TestServer::spawn(|_| common::text(200, "<transcript_list/>")).await;
    let mut endpoints = Endpoints::default();
    endpoints.subtitles_url = server.url("/timedtext");
    let mut subtitles = SubtitlesRequest::new(
        common::transport(),
        CredentialStore::new(Credentials::default()),
        endpoints,
    );

    let tracks = subtitles.list("x").await.ready().unwrap();
    assert!(tracks.is_empty());
}
