//! Lookups, pagination and single downloads against a mock tikwm server.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tikwm::{Error, ErrorKind, RateGate, Tikwm};
use tokio_stream::StreamExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

async fn mount_lookup(server: &MockServer, data: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ok(data))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lookup_sends_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("hd=1"))
        .and(body_string_contains("url=https%3A%2F%2Fwww.tiktok.com%2F%40u%2Fvideo%2F111"))
        .respond_with(ok(json!({"id": "111", "play": "http://x/sd.mp4", "create_time": CREATE_TIME})))
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server)
        .get_video_info("https://www.tiktok.com/@u/video/111")
        .await
        .unwrap();
    assert_eq!(record.id, "111");
}

#[tokio::test]
async fn test_resolve_prefers_hd() {
    let server = MockServer::start().await;
    mount_lookup(&server, json!({
        "id": "111",
        "play": "http://x/sd1.mp4",
        "hdplay": "http://x/hd1.mp4",
        "create_time": CREATE_TIME,
        "author": {"unique_id": "u"}
    }))
    .await;

    let resolved = client(&server).resolve("111").await.unwrap();
    assert_eq!(resolved.source_url, "http://x/hd1.mp4");
    assert!(resolved.hd);
    assert_eq!(resolved.record.username(), "u");
}

#[tokio::test]
async fn test_resolve_falls_back_to_sd() {
    let server = MockServer::start().await;
    mount_lookup(&server, json!({
        "id": "111",
        "play": "http://x/sd1.mp4",
        "hdplay": "",
        "create_time": CREATE_TIME,
        "author": {"unique_id": "u"}
    }))
    .await;

    let resolved = client(&server).resolve("111").await.unwrap();
    assert_eq!(resolved.source_url, "http://x/sd1.mp4");
    assert!(!resolved.hd);
}

#[tokio::test]
async fn test_resolve_without_links_is_not_found() {
    let server = MockServer::start().await;
    mount_lookup(&server, json!({"id": "111", "create_time": CREATE_TIME})).await;

    let err = client(&server).resolve("111").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_resolve_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(upstream_error(10000, "rate limited"))
        .mount(&server)
        .await;

    let err = client(&server).resolve("111").await.unwrap_err();
    match err {
        Error::Upstream { code, message } => {
            assert_eq!(code, 10000);
            assert_eq!(message, "rate limited");
        }
        other => panic!("unexpected error: {other:?}")
    }
}

#[tokio::test]
async fn test_http_error_is_network_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).get_video_info("111").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let mut client = Tikwm::new(Arc::new(RateGate::disabled()));
    client.set_base_url("http://127.0.0.1:1");

    let err = client.get_video_info("111").await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}

#[tokio::test]
async fn test_gated_requests_are_spaced() {
    let server = MockServer::start().await;
    mount_lookup(&server, json!({"id": "111", "play": "http://x/sd.mp4"})).await;

    let mut client = Tikwm::new(Arc::new(RateGate::new(Duration::from_millis(300))));
    client.set_base_url(server.uri());
    let clone = client.clone();

    let start = Instant::now();
    client.get_video_info("111").await.unwrap();
    clone.get_video_info("111").await.unwrap();
    client.get_video_info("111").await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_user_posts_follows_cursor() {
    let server = MockServer::start().await;
    mount_page(&server, "0", &["7003", "7002"], "page2", true, 1).await;
    mount_page(&server, "page2", &["7001"], "page3", false, 1).await;
    mount_page(&server, "page3", &["7000"], "", false, 0).await;

    let client = client(&server);
    let pages: Vec<_> = client.user_posts("u").collect().await;

    assert_eq!(pages.len(), 2);
    let first = pages[0].as_ref().unwrap();
    assert_eq!(first.videos.len(), 2);
    assert_eq!(first.cursor, "page2");
    let second = pages[1].as_ref().unwrap();
    assert_eq!(second.videos[0].id, "7001");
    assert!(!second.has_more);
}

#[tokio::test]
async fn test_user_posts_ends_on_error() {
    let server = MockServer::start().await;
    mount_page(&server, "0", &["7002"], "page2", true, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/user/posts/"))
        .and(body_string_contains("cursor=page2"))
        .respond_with(upstream_error(-1, "something went wrong"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut pages = client.user_posts("u");

    assert!(pages.next().await.unwrap().is_ok());
    let err = pages.next().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(pages.next().await.is_none());
}

#[tokio::test]
async fn test_download_into_directory_uses_generated_name() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_video(&server, "111", 1).await;

    let video = client(&server)
        .download("https://www.tiktok.com/@u/video/111", Some(dir.path()))
        .await
        .unwrap();

    assert_eq!(video.path, dir.path().join("u_2023-11-14_111.mp4"));
    assert!(video.hd);
    assert!(video.transcode_error.is_none());
    assert_eq!(std::fs::read(&video.path).unwrap(), media("111"));
}

#[tokio::test]
async fn test_download_to_explicit_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("custom.mp4");
    mount_video(&server, "111", 1).await;

    let video = client(&server)
        .build_download("111")
        .destination(&target)
        .download()
        .await
        .unwrap();

    assert_eq!(video.path, target);
    assert_eq!(std::fs::read(&target).unwrap(), media("111"));
}

#[tokio::test]
async fn test_missing_media_leaves_no_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_lookup(&server, json!({
        "id": "111",
        "hdplay": format!("{}/gone.mp4", server.uri()),
        "create_time": CREATE_TIME,
        "author": {"unique_id": "u"}
    }))
    .await;

    let err = client(&server)
        .download("111", Some(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_fetch_streams_body_to_disk() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let body = vec![7u8; 256 * 1024];
    Mock::given(method("GET"))
        .and(path("/big.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let target = dir.path().join("nested").join("big.mp4");
    let written = tikwm::fetch(
        &reqwest::Client::new(),
        &format!("{}/big.mp4", server.uri()),
        &target
    )
    .await
    .unwrap();

    assert_eq!(written, body.len() as u64);
    assert_eq!(std::fs::read(&target).unwrap(), body);
}

#[cfg(unix)]
#[tokio::test]
async fn test_download_with_failed_conversion_keeps_original() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    let ffmpeg = tikwm::Ffmpeg::with_binary(fake_ffmpeg(bin.path(), BROKEN_FFMPEG));
    mount_video(&server, "111", 1).await;

    let video = client(&server)
        .build_download("111")
        .destination(dir.path())
        .convert_with(ffmpeg)
        .download()
        .await
        .unwrap();

    let err = video.transcode_error.unwrap();
    assert_eq!(err.kind(), ErrorKind::Transcode);
    assert!(err.to_string().contains("Unknown encoder libx264"));
    assert_eq!(std::fs::read(&video.path).unwrap(), media("111"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_check_binary_reports_version() {
    let bin = tempfile::tempdir().unwrap();
    let script = fake_ffmpeg(bin.path(), "echo 'ffmpeg version 6.1 Copyright (c)'\necho 'more'");

    let version = tikwm::Ffmpeg::with_binary(script).check_binary().await.unwrap();
    assert_eq!(version, "ffmpeg version 6.1 Copyright (c)");
}
