//! Stream resolver tests against a scripted HTTP client.

mod support;

use core_player::resolver::StreamResolver;
use core_player::PlayerError;
use support::{resolve_body, FakeHttpClient};

const ENDPOINT: &str = "https://api.example/resolve";

#[tokio::test]
async fn progressive_transcoding_is_preferred() {
    let http = FakeHttpClient::new();
    http.respond(
        "/resolve?",
        200,
        &resolve_body(&[
            ("https://api.example/locate/hls", "hls"),
            ("https://api.example/locate/prog", "progressive"),
        ]),
    );
    http.respond("/locate/prog", 200, r#"{"url":"https://cdn.example/a.mp3"}"#);

    let resolution = StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1", "client-id")
        .await
        .unwrap();

    assert_eq!(resolution.stream.url, "https://cdn.example/a.mp3");
    assert!(!resolution.stream.is_hls);
    assert_eq!(resolution.title.as_deref(), Some("Resolved Title"));
    assert_eq!(resolution.artist.as_deref(), Some("Resolved Artist"));
}

#[tokio::test]
async fn hls_is_used_when_no_progressive_exists() {
    let http = FakeHttpClient::new();
    http.respond(
        "/resolve?",
        200,
        &resolve_body(&[("https://api.example/locate/hls", "hls")]),
    );
    http.respond("/locate/hls", 200, r#"{"url":"https://cdn.example/a.m3u8"}"#);

    let resolution = StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1", "client-id")
        .await
        .unwrap();

    assert!(resolution.stream.is_hls);
}

#[tokio::test]
async fn failed_locate_retries_the_alternate_family_once() {
    let http = FakeHttpClient::new();
    http.respond(
        "/resolve?",
        200,
        &resolve_body(&[
            ("https://api.example/locate/prog", "progressive"),
            ("https://api.example/locate/hls", "hls"),
        ]),
    );
    // Progressive locate fails; the HLS alternate succeeds.
    http.respond("/locate/prog", 500, "");
    http.respond("/locate/hls", 200, r#"{"url":"https://cdn.example/a.m3u8"}"#);

    let resolution = StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1", "client-id")
        .await
        .unwrap();

    assert!(resolution.stream.is_hls);
    assert_eq!(resolution.stream.url, "https://cdn.example/a.m3u8");

    let urls = http.request_urls();
    assert_eq!(urls.len(), 3, "resolve, failed locate, one alternate locate");
}

#[tokio::test]
async fn failed_locate_without_alternate_surfaces_the_error() {
    let http = FakeHttpClient::new();
    http.respond(
        "/resolve?",
        200,
        &resolve_body(&[("https://api.example/locate/hls", "hls")]),
    );
    http.respond("/locate/hls", 500, "");

    let error = StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1", "client-id")
        .await
        .unwrap_err();

    assert!(matches!(error, PlayerError::ResolveFailed(_)));
    assert_eq!(http.request_urls().len(), 2, "no second locate attempt");
}

#[tokio::test]
async fn missing_transcodings_fail_resolution() {
    let http = FakeHttpClient::new();
    http.respond("/resolve?", 200, &resolve_body(&[]));

    let error = StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1", "client-id")
        .await
        .unwrap_err();

    assert!(matches!(error, PlayerError::NoTranscodings));
}

#[tokio::test]
async fn non_success_resolve_status_fails_resolution() {
    let http = FakeHttpClient::new();
    http.respond("/resolve?", 403, "");

    let error = StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1", "client-id")
        .await
        .unwrap_err();

    assert!(matches!(error, PlayerError::ResolveFailed(_)));
}

#[tokio::test]
async fn resolve_request_carries_credential_and_encoded_page_url() {
    let http = FakeHttpClient::new();
    http.respond(
        "/resolve?",
        200,
        &resolve_body(&[("https://api.example/locate/prog", "progressive")]),
    );
    http.respond("/locate/prog", 200, r#"{"url":"https://cdn.example/a.mp3"}"#);

    StreamResolver::new(&http, ENDPOINT)
        .resolve("https://service.example/tracks/1?ref=x", "client-id")
        .await
        .unwrap();

    let urls = http.request_urls();
    assert!(urls[0].starts_with("https://api.example/resolve?url="));
    assert!(urls[0].contains("https%3A%2F%2Fservice.example%2Ftracks%2F1%3Fref%3Dx"));
    assert!(urls[0].contains("client_id=client-id"));
    assert!(urls[0].contains("&_ts="), "cache-busting parameter present");
    assert!(urls[1].contains("client_id=client-id"));
}
