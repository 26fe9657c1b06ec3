//! E2E tests for watch-history endpoints

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_history_requires_auth() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(&server.url("/watch-history"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = server
        .client
        .post(&server.url("/watch-history/01ARZ3NDEKTSV4RRFFQ69G5FAV"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_record_view_and_list() {
    let server = TestServer::new().await;
    let video = server.create_test_video("creator", "Ferris Goes Surfing").await;

    let response = server
        .client
        .post(&server.url(&format!("/watch-history/{}", video.id)))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = server
        .client
        .get(&server.url("/watch-history"))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    let data = &json["data"];
    assert_eq!(data["total"], 1);
    let entries = data["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["video"]["id"], video.id.as_str());
    assert_eq!(entries[0]["video"]["title"], "Ferris Goes Surfing");
    assert_eq!(entries[0]["video"]["owner"], "creator");
    assert!(entries[0]["watchedAt"].is_string());
}

#[tokio::test]
async fn test_record_view_invalid_video_id() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/watch-history/not-a-ulid"))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["message"], "Invalid video ID");
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_record_view_missing_video() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/watch-history/01ARZ3NDEKTSV4RRFFQ69G5FAV"))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_repeat_view_refreshes_single_entry() {
    let server = TestServer::new().await;
    let video = server.create_test_video("creator", "Rewatched").await;

    for _ in 0..2 {
        let response = server
            .client
            .post(&server.url(&format!("/watch-history/{}", video.id)))
            .header("Authorization", "Bearer viewer")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let (entries, total) = {
        let entries = server
            .state
            .db
            .get_watch_history("viewer", 20, 0)
            .await
            .unwrap();
        let total = server.state.db.count_watch_history("viewer").await.unwrap();
        (entries, total)
    };
    assert_eq!(total, 1);
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_history_most_recent_first() {
    let server = TestServer::new().await;
    let first = server.create_test_video("creator", "First").await;
    let second = server.create_test_video("creator", "Second").await;

    for video_id in [&first.id, &second.id] {
        server
            .client
            .post(&server.url(&format!("/watch-history/{}", video_id)))
            .header("Authorization", "Bearer viewer")
            .send()
            .await
            .unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    // Rewatch the first video so it jumps back to the top
    server
        .client
        .post(&server.url(&format!("/watch-history/{}", first.id)))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(&server.url("/watch-history"))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();
    let json: Value = response.json().await.unwrap();
    let entries = json["data"]["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["video"]["title"], "First");
    assert_eq!(entries[1]["video"]["title"], "Second");
}

#[tokio::test]
async fn test_remove_entry_and_clear() {
    let server = TestServer::new().await;
    let first = server.create_test_video("creator", "First").await;
    let second = server.create_test_video("creator", "Second").await;

    for video_id in [&first.id, &second.id] {
        server
            .client
            .post(&server.url(&format!("/watch-history/{}", video_id)))
            .header("Authorization", "Bearer viewer")
            .send()
            .await
            .unwrap();
    }

    let response = server
        .client
        .delete(&server.url(&format!("/watch-history/{}", first.id)))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        server.state.db.count_watch_history("viewer").await.unwrap(),
        1
    );

    let response = server
        .client
        .delete(&server.url("/watch-history"))
        .header("Authorization", "Bearer viewer")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        server.state.db.count_watch_history("viewer").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_history_is_scoped_per_user() {
    let server = TestServer::new().await;
    let video = server.create_test_video("creator", "Private Watch").await;

    server
        .client
        .post(&server.url(&format!("/watch-history/{}", video.id)))
        .header("Authorization", "Bearer viewer-a")
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(&server.url("/watch-history"))
        .header("Authorization", "Bearer viewer-b")
        .send()
        .await
        .unwrap();
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["data"]["total"], 0);
}
