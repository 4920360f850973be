//! Integration tests for the Shorts upload and OAuth endpoints.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::*;
use goods_api::domains::uploads::PostgresCredentialStore;
use goods_api::kernel::{
    BaseCredentialStore, InMemoryCredentialStore, InsertCallArgs, MockUploadOutcome,
    MockVideoPlatform,
};
use goods_api::server::build_app;
use serde_json::json;
use test_context::test_context;

fn video_file() -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
    std::fs::write(file.path(), b"not really a video").unwrap();
    file
}

/// Poll until the background upload has reached the platform.
async fn wait_for_insert(platform: &MockVideoPlatform) -> InsertCallArgs {
    for _ in 0..50 {
        if let Some(call) = platform.insert_calls().into_iter().next() {
            return call;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("upload never reached the video platform");
}

#[tokio::test]
async fn upload_is_scheduled_and_runs_in_background() {
    let platform = Arc::new(MockVideoPlatform::new());
    let store = Arc::new(InMemoryCredentialStore::with_credentials(valid_credentials()));
    let app = build_app(deps_with(lazy_pool(), store, platform.clone()));
    let video = video_file();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/uploads/shorts",
            json!({
                "video_path": video.path().to_str().unwrap(),
                "title": "Launch day",
                "tags": ["launch"],
                "publish_at_rfc3339": "2030-01-01T12:00:00Z"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        body,
        json!({ "id": null, "url": null, "status": "scheduled", "message": null })
    );

    let call = wait_for_insert(&platform).await;
    assert_eq!(call.access_token.as_deref(), Some("access-token"));
    assert_eq!(call.media_path, video.path());
    assert_eq!(call.body.snippet.title, "Launch day");
    assert_eq!(
        call.body.snippet.tags,
        vec!["launch".to_string(), "#Shorts".to_string()]
    );
    assert!(call.body.status.publish_at.is_some());
}

#[tokio::test]
async fn failed_background_upload_does_not_affect_response() {
    let platform = Arc::new(MockVideoPlatform::new().with_upload_outcome(
        MockUploadOutcome::Failure {
            status: 403,
            message: "quotaExceeded".to_string(),
        },
    ));
    let store = Arc::new(InMemoryCredentialStore::with_credentials(valid_credentials()));
    let app = build_app(deps_with(lazy_pool(), store, platform.clone()));
    let video = video_file();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/uploads/shorts",
            json!({ "video_path": video.path().to_str().unwrap(), "title": "Clip" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "scheduled");
    wait_for_insert(&platform).await;
}

#[tokio::test]
async fn missing_video_file_is_a_bad_request() {
    let platform = Arc::new(MockVideoPlatform::new());
    let app = build_app(deps_with(
        lazy_pool(),
        Arc::new(InMemoryCredentialStore::new()),
        platform.clone(),
    ));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/uploads/shorts",
            json!({ "video_path": "/definitely/not/here.mp4", "title": "Clip" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Video file not found: /definitely/not/here.mp4"
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(platform.insert_calls().is_empty());
}

#[tokio::test]
async fn invalid_upload_fields_are_unprocessable() {
    let app = build_app(mock_deps(lazy_pool()));
    let video = video_file();
    let path = video.path().to_str().unwrap();

    for body in [
        json!({ "video_path": path, "title": "Clip", "privacy_status": "secret" }),
        json!({ "video_path": path, "title": "Clip", "publish_at_rfc3339": "next week" }),
        json!({ "video_path": path }),
    ] {
        let (status, body) = send(&app, json_request("POST", "/uploads/shorts", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn oauth_flow_persists_credentials(ctx: &TestHarness) {
    let platform = Arc::new(MockVideoPlatform::new());
    let store = Arc::new(PostgresCredentialStore::new(ctx.db_pool.clone()));
    let app = build_app(deps_with(ctx.db_pool.clone(), store.clone(), platform.clone()));

    let (status, body) = send(&app, empty_request("POST", "/uploads/auth/youtube")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    let url = body["authorization_url"].as_str().unwrap();
    let state = url.split("state=").nth(1).unwrap();

    let (status, body) = send(
        &app,
        empty_request(
            "GET",
            &format!("/uploads/auth/youtube/callback?code=abc&state={}", state),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    assert_eq!(platform.exchanged_codes(), vec!["abc".to_string()]);

    let stored = store.read_credentials(&[]).await.unwrap().unwrap();
    assert_eq!(stored.token.as_deref(), Some("token-for-abc"));

    // A state value is single-use
    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            &format!("/uploads/auth/youtube/callback?code=abc&state={}", state),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn callback_rejects_unknown_state_and_denied_consent() {
    let platform = Arc::new(MockVideoPlatform::new());
    let store = Arc::new(InMemoryCredentialStore::new());
    let app = build_app(deps_with(lazy_pool(), store.clone(), platform.clone()));

    let (status, _) = send(
        &app,
        empty_request("GET", "/uploads/auth/youtube/callback?code=abc&state=forged"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, empty_request("POST", "/uploads/auth/youtube")).await;
    let url = body["authorization_url"].as_str().unwrap();
    let state = url.split("state=").nth(1).unwrap();
    let (status, body) = send(
        &app,
        empty_request(
            "GET",
            &format!(
                "/uploads/auth/youtube/callback?error=access_denied&state={}",
                state
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "YouTube authorization denied: access_denied");

    assert!(platform.exchanged_codes().is_empty());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn scheduled_upload_refreshes_expired_credentials() {
    let mut expired = valid_credentials();
    expired.expiry = Some(chrono::Utc::now() - chrono::Duration::minutes(5));
    let platform = Arc::new(MockVideoPlatform::new());
    let store = Arc::new(InMemoryCredentialStore::with_credentials(expired));
    let app = build_app(deps_with(lazy_pool(), store.clone(), platform.clone()));
    let video = video_file();

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/uploads/shorts",
            json!({ "video_path": video.path().to_str().unwrap(), "title": "Clip" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let call = wait_for_insert(&platform).await;
    assert_eq!(call.access_token.as_deref(), Some("refreshed-token"));
    assert_eq!(platform.refresh_count(), 1);
    assert_eq!(
        store.stored().unwrap().token.as_deref(),
        Some("refreshed-token")
    );
}

#[tokio::test]
async fn blank_privacy_and_category_use_defaults() {
    let platform = Arc::new(MockVideoPlatform::new());
    let store = Arc::new(InMemoryCredentialStore::with_credentials(valid_credentials()));
    let app = build_app(deps_with(lazy_pool(), store, platform.clone()));
    let video = video_file();

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/uploads/shorts",
            json!({
                "video_path": video.path().to_str().unwrap(),
                "title": "Clip",
                "privacy_status": "",
                "category_id": ""
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let call = wait_for_insert(&platform).await;
    assert_eq!(call.body.snippet.category_id, "22");
    assert_eq!(
        call.body.status.privacy_status,
        youtube::PrivacyStatus::Private
    );
}
