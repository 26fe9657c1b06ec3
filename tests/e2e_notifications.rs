//! E2E tests for notification endpoints

mod common;

use common::TestServer;
use serde_json::Value;

async fn seed_notifications(server: &TestServer, owner: &str, count: usize) {
    use chrono::Utc;
    use clipnest::data::{EntityId, Notification};

    for i in 0..count {
        let notification = Notification {
            id: EntityId::new().0,
            owner: owner.to_string(),
            title: format!("Notification {}", i),
            content: "content".to_string(),
            notification_type: "comment".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        server.state.db.insert_notification(&notification).await.unwrap();
    }
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let server = TestServer::new().await;

    for (method, path) in [
        ("GET", "/notifications"),
        ("GET", "/notifications/unread-count"),
        ("PATCH", "/notifications/read-all"),
        ("DELETE", "/notifications"),
    ] {
        let request = match method {
            "GET" => server.client.get(&server.url(path)),
            "PATCH" => server.client.patch(&server.url(path)),
            _ => server.client.delete(&server.url(path)),
        };
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), 401, "{} {}", method, path);
    }
}

#[tokio::test]
async fn test_list_notifications_with_pagination() {
    let server = TestServer::new().await;
    seed_notifications(&server, "recipient", 5).await;
    seed_notifications(&server, "someone-else", 2).await;

    let response = server
        .client
        .get(&server.url("/notifications?page=1&limit=2"))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    let data = &json["data"];
    assert_eq!(data["notifications"].as_array().unwrap().len(), 2);
    assert_eq!(data["pagination"]["total"], 5);
    assert_eq!(data["pagination"]["page"], 1);
    assert_eq!(data["pagination"]["limit"], 2);
    assert_eq!(data["pagination"]["pages"], 3);
}

#[tokio::test]
async fn test_unread_count_and_mark_all_read() {
    let server = TestServer::new().await;
    seed_notifications(&server, "recipient", 3).await;

    let response = server
        .client
        .get(&server.url("/notifications/unread-count"))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["data"]["unreadCount"], 3);

    let response = server
        .client
        .patch(&server.url("/notifications/read-all"))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = server
        .client
        .get(&server.url("/notifications/unread-count"))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["data"]["unreadCount"], 0);
}

#[tokio::test]
async fn test_mark_single_notification_read() {
    let server = TestServer::new().await;
    seed_notifications(&server, "recipient", 1).await;

    let notifications = server
        .state
        .db
        .get_notifications("recipient", 10, 0)
        .await
        .unwrap();
    let id = notifications[0].id.clone();

    let response = server
        .client
        .patch(&server.url(&format!("/notifications/{}/read", id)))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["data"]["isRead"], true);
    assert_eq!(json["data"]["id"], id.as_str());
}

#[tokio::test]
async fn test_mark_read_wrong_owner_is_404() {
    let server = TestServer::new().await;
    seed_notifications(&server, "recipient", 1).await;

    let notifications = server
        .state
        .db
        .get_notifications("recipient", 10, 0)
        .await
        .unwrap();
    let id = notifications[0].id.clone();

    let response = server
        .client
        .patch(&server.url(&format!("/notifications/{}/read", id)))
        .header("Authorization", "Bearer intruder")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);

    // No state change for the real owner
    let count = server
        .state
        .db
        .count_unread_notifications("recipient")
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_delete_notification_and_delete_all() {
    let server = TestServer::new().await;
    seed_notifications(&server, "recipient", 3).await;

    let notifications = server
        .state
        .db
        .get_notifications("recipient", 10, 0)
        .await
        .unwrap();
    let id = notifications[0].id.clone();

    // Wrong owner cannot delete
    let response = server
        .client
        .delete(&server.url(&format!("/notifications/{}", id)))
        .header("Authorization", "Bearer intruder")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = server
        .client
        .delete(&server.url(&format!("/notifications/{}", id)))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        server.state.db.count_notifications("recipient").await.unwrap(),
        2
    );

    let response = server
        .client
        .delete(&server.url("/notifications"))
        .header("Authorization", "Bearer recipient")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        server.state.db.count_notifications("recipient").await.unwrap(),
        0
    );
}
