//! Integration tests for the karaoke-queue HTTP API
//!
//! Tests cover:
//! - Health endpoint
//! - Submitting songs, including the `last_added` cooldown cookie
//! - Error kind to status code mapping
//! - Moderator authentication and queue management
//! - Song catalog endpoints

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use karaoke_common::db::{add_song, init_memory_database};
use karaoke_common::NewSong;
use karaoke_queue::queue::QueueEngine;
use karaoke_queue::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

const TOKEN: &str = "let-me-sing";

/// Test helper: in-memory catalog seeded with three songs (ids 1, 2, 3)
async fn setup_app(moderator_token: Option<&str>) -> Router {
    let db = init_memory_database().await.expect("Should open in-memory db");

    for (title, artist, duration_ms) in [
        ("Africa", "Toto", 270_000),
        ("Take On Me", "a-ha", 225_000),
        ("Dancing Queen", "ABBA", 231_000),
    ] {
        add_song(
            &db,
            &NewSong {
                title: title.to_string(),
                artist: artist.to_string(),
                lyrics: None,
                duration_ms: Some(duration_ms),
            },
        )
        .await
        .expect("Should seed song");
    }

    let state = AppState::new(
        Arc::new(QueueEngine::new()),
        db,
        moderator_token.map(str::to_string),
    );
    build_router(state)
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_token(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    request
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

fn submission(song_id: i64, singer: &str) -> Value {
    json!({ "song_id": song_id, "singer": singer })
}

async fn submit_song(app: &Router, song_id: i64, singer: &str) -> (StatusCode, Value) {
    send(app, json_request("POST", "/queue/entries", submission(song_id, singer))).await
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(Some(TOKEN)).await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "karaoke-queue");
    assert_eq!(body["queue_is_open"], true);
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn test_submit_sets_cookie_and_queues_entry() {
    let app = setup_app(None).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/queue/entries", submission(1, "Attila")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("last_added="));
    assert!(cookie.contains("HttpOnly"));

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["singer"], "Attila");
    assert_eq!(body["song"]["title"], "Africa");

    let (status, queue) = send(&app, test_request("GET", "/queue")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue.as_array().unwrap().len(), 1);

    let (_, remaining) = send(&app, test_request("GET", "/queue/time-until-end")).await;
    assert_eq!(remaining["seconds"], 270);
}

#[tokio::test]
async fn test_resubmit_with_cookie_is_too_soon() {
    let app = setup_app(None).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/queue/entries", submission(1, "Attila")))
        .await
        .unwrap();
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let mut request = json_request("POST", "/queue/entries", submission(2, "Attila"));
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "3600");
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "submission_too_soon");
}

#[tokio::test]
async fn test_malformed_cookie_is_ignored() {
    let app = setup_app(None).await;

    let mut request = json_request("POST", "/queue/entries", submission(1, "Attila"));
    request
        .headers_mut()
        .insert(header::COOKIE, "last_added=yesterday".parse().unwrap());

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cookie_lasts_as_long_as_cooldown() {
    let app = setup_app(None).await;

    let (status, _) = send(
        &app,
        json_request("PUT", "/admin/time-between-submissions", json!({ "hours": 72 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/queue/entries", submission(1, "Attila")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=259200"));
}

#[tokio::test]
async fn test_submission_rejections() {
    let app = setup_app(None).await;

    let (status, body) = submit_song(&app, 42, "Attila").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "song_not_found");

    let (status, _) = submit_song(&app, 1, "Attila").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = submit_song(&app, 1, "Mia").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "song_already_queued");
    assert_eq!(body["detail"], "Song Africa by Toto is already in queue");

    let (status, body) = submit_song(&app, 2, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

// =============================================================================
// Moderator authentication
// =============================================================================

#[tokio::test]
async fn test_moderator_routes_require_token() {
    let app = setup_app(Some(TOKEN)).await;

    let (status, body) = send(&app, test_request("GET", "/admin/policy")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&app, with_token(test_request("GET", "/admin/policy"), "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, with_token(test_request("GET", "/admin/policy"), TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_times_song_can_be_sung"], 2);
    assert_eq!(body["time_between_same_song_secs"], 3600);

    // Public routes never need the token
    let (status, _) = send(&app, test_request("GET", "/queue")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = setup_app(Some(TOKEN)).await;

    let mut request = test_request("GET", "/admin/policy");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("bearer {}", TOKEN).parse().unwrap(),
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    // A prefix of the token is not the token
    let short = &TOKEN[..TOKEN.len() - 1];
    let (status, _) = send(&app, with_token(test_request("GET", "/admin/policy"), short)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_moderator_auth_disabled_without_token() {
    let app = setup_app(None).await;

    let (status, _) = send(&app, test_request("GET", "/admin/queue-open")).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Moderator queue management
// =============================================================================

#[tokio::test]
async fn test_moderator_queue_management() {
    let app = setup_app(Some(TOKEN)).await;
    let admin = |request| with_token(request, TOKEN);

    for (song_id, singer) in [(1, "A"), (2, "B"), (3, "C")] {
        let request = json_request("POST", "/admin/entries", submission(song_id, singer));
        let (status, _) = send(&app, admin(request)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let request = json_request("PUT", "/admin/move", json!({ "from": 2, "to": 0 }));
    let (status, pending) = send(&app, admin(request)).await;
    assert_eq!(status, StatusCode::OK);
    let singers: Vec<&str> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["singer"].as_str().unwrap())
        .collect();
    assert_eq!(singers, vec!["C", "A", "B"]);

    let (status, sung) = send(&app, admin(test_request("PUT", "/admin/dequeue-first"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sung["singer"], "C");

    let (status, removed) = send(&app, admin(test_request("DELETE", "/admin/entries/1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["singer"], "B");

    let (status, body) = send(&app, admin(test_request("PUT", "/admin/dequeue/5"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "index_out_of_range");

    let (_, processed) = send(&app, test_request("GET", "/queue/processed")).await;
    assert_eq!(processed.as_array().unwrap().len(), 1);
    assert_eq!(processed[0]["singer"], "C");
    assert!(processed[0]["processed_at"].is_string());

    let (status, _) = send(&app, admin(test_request("DELETE", "/admin/all"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, admin(test_request("PUT", "/admin/dequeue-first"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "queue_empty");
}

#[tokio::test]
async fn test_closed_queue_rejects_submitters() {
    let app = setup_app(Some(TOKEN)).await;

    let (status, body) = send(
        &app,
        with_token(json_request("PUT", "/admin/queue-open", json!({ "open": false })), TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["open"], false);

    let (status, body) = submit_song(&app, 1, "Attila").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "queue_closed");

    // Moderator can still add
    let (status, _) = send(
        &app,
        with_token(json_request("POST", "/admin/entries", submission(1, "Attila")), TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// Moderator policy settings
// =============================================================================

#[tokio::test]
async fn test_policy_setters() {
    let app = setup_app(None).await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/admin/time-between-submissions", json!({ "minutes": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seconds"], 300);

    let (_, body) = send(&app, test_request("GET", "/admin/time-between-submissions")).await;
    assert_eq!(body["seconds"], 300);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/admin/time-between-same-song",
            json!({ "hours": 1, "minutes": 30, "seconds": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seconds"], 5400);

    let (status, body) = send(
        &app,
        json_request("PUT", "/admin/time-between-same-song", json!({ "seconds": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_duration");

    let (status, body) = send(
        &app,
        json_request("PUT", "/admin/max-times-song-can-be-sung", json!({ "value": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_count");

    let (_, body) = send(&app, test_request("GET", "/admin/max-times-song-can-be-sung")).await;
    assert_eq!(body["value"], 2);

    let (_, body) = send(&app, test_request("GET", "/admin/policy")).await;
    assert_eq!(body["time_between_same_song_secs"], 5400);
    assert_eq!(body["time_between_submissions_secs"], 300);
    assert_eq!(body["queue_is_open"], true);
}

// =============================================================================
// Song catalog
// =============================================================================

#[tokio::test]
async fn test_song_catalog_endpoints() {
    let app = setup_app(Some(TOKEN)).await;

    let (status, songs) = send(&app, test_request("GET", "/songs")).await;
    assert_eq!(status, StatusCode::OK);
    // Ordered by artist, then title
    let artists: Vec<&str> = songs
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["artist"].as_str().unwrap())
        .collect();
    assert_eq!(artists, vec!["ABBA", "Toto", "a-ha"]);

    let (status, found) = send(&app, test_request("GET", "/songs/search?artist=Toto")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Africa");

    let (status, song) = send(&app, test_request("GET", "/songs/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(song["title"], "Take On Me");
    assert_eq!(song["duration_ms"], 225_000);

    let (status, body) = send(&app, test_request("GET", "/songs/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let new_song = json!({ "title": "Hallelujah", "artist": "Leonard Cohen" });
    let (status, created) = send(
        &app,
        with_token(json_request("POST", "/admin/songs", new_song.clone()), TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 4);

    let (status, _) = send(&app, json_request("POST", "/admin/songs", new_song)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        with_token(
            json_request("POST", "/admin/songs", json!({ "title": "", "artist": "Nobody" })),
            TOKEN,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}
