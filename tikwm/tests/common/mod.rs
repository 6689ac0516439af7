#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tikwm::{RateGate, Tikwm};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CREATE_TIME: i64 = 1_700_000_000;
pub const DATE: &str = "2023-11-14";

/// Client pointed at the mock server with no delay between calls.
pub fn client(server: &MockServer) -> Tikwm {
    let mut client = Tikwm::new(Arc::new(RateGate::disabled()));
    client.set_base_url(server.uri());
    client
}

pub fn expected_file(dir: &Path, username: &str, id: &str) -> PathBuf {
    dir.join(format!("{username}_{DATE}_{id}.mp4"))
}

pub fn feed_video(id: &str, username: &str) -> Value {
    json!({
        "video_id": id,
        "play": format!("https://cdn.example/{id}.mp4"),
        "wmplay": format!("https://cdn.example/{id}-wm.mp4"),
        "create_time": CREATE_TIME,
        "author": {"unique_id": username}
    })
}

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "msg": "success",
        "processed_time": 0.1,
        "data": data
    }))
}

pub fn upstream_error(code: i64, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": code,
        "msg": msg,
        "processed_time": 0.1,
        "data": []
    }))
}

/// Serves one feed page for `cursor`, expecting it to be requested `calls`
/// times.
pub async fn mount_page(
    server: &MockServer,
    cursor: &str,
    ids: &[&str],
    next_cursor: &str,
    has_more: bool,
    calls: u64
) {
    let videos: Vec<Value> = ids.iter().map(|id| feed_video(id, "u")).collect();
    Mock::given(method("POST"))
        .and(path("/api/user/posts/"))
        .and(body_string_contains(format!("cursor={cursor}")))
        .respond_with(ok(json!({
            "videos": videos,
            "cursor": next_cursor,
            "hasMore": has_more
        })))
        .expect(calls)
        .named(format!("feed page {cursor}"))
        .mount(server)
        .await;
}

/// Serves the lookup for `id` with an HD link on the mock server and the
/// matching media file, expecting `calls` lookups.
pub async fn mount_video(server: &MockServer, id: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains(id))
        .respond_with(ok(json!({
            "id": id,
            "play": format!("{}/sd/{id}.mp4", server.uri()),
            "hdplay": format!("{}/hd/{id}.mp4", server.uri()),
            "create_time": CREATE_TIME,
            "author": {"unique_id": "u"}
        })))
        .expect(calls)
        .named(format!("lookup {id}"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/hd/{id}.mp4")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(media(id)))
        .mount(server)
        .await;
}

pub async fn mount_failing_lookup(server: &MockServer, id: &str, code: i64, msg: &str) {
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains(id))
        .respond_with(upstream_error(code, msg))
        .expect(1)
        .named(format!("failing lookup {id}"))
        .mount(server)
        .await;
}

pub fn media(id: &str) -> Vec<u8> {
    format!("video bytes of {id}").into_bytes()
}

/// Writes an executable shell script standing in for ffmpeg.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-ffmpeg");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// Writes `converted` to the last argument, like a successful encode would.
#[cfg(unix)]
pub const CONVERTING_FFMPEG: &str = "for last; do :; done\nprintf converted > \"$last\"";

#[cfg(unix)]
pub const BROKEN_FFMPEG: &str = "echo 'Unknown encoder libx264' >&2\nexit 1";
