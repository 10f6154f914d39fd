mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use common::{bearer_token, post_json, test_app, GOOGLE_TOKEN, PROJECT_ID, TRIGGER_TOKEN};

const ENDPOINT: &str = "/triggers/user-notifications";

fn user_path(user_id: &str) -> String {
    format!("/v1/projects/{}/databases/(default)/documents/users/{}", PROJECT_ID, user_id)
}

fn send_path() -> String {
    format!("/v1/projects/{}/messages:send", PROJECT_ID)
}

fn created_event(user_id: &str, kind: &str, message: Option<&str>) -> String {
    let mut fields = json!({"type": {"stringValue": kind}});
    if let Some(message) = message {
        fields["message"] = json!({"stringValue": message});
    }
    json!({
        "value": {
            "name": format!(
                "projects/{}/databases/(default)/documents/users/{}/notifications/n-1",
                PROJECT_ID, user_id
            ),
            "fields": fields,
            "createTime": "2024-10-01T12:00:00Z"
        },
        "oldValue": {},
        "updateMask": {}
    })
    .to_string()
}

async fn mount_user(server: &MockServer, user_id: &str, fields: Value) {
    Mock::given(method("GET"))
        .and(path(user_path(user_id)))
        .and(header("authorization", format!("Bearer {}", GOOGLE_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("projects/{}/databases/(default)/documents/users/{}", PROJECT_ID, user_id),
            "fields": fields
        })))
        .mount(server)
        .await;
}

async fn fcm_never_called(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(send_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_follow_notification_is_pushed() {
    let server = MockServer::start().await;
    mount_user(&server, "alice", json!({"fcmToken": {"stringValue": "device-abc"}})).await;
    Mock::given(method("POST"))
        .and(path(send_path()))
        .and(header("authorization", format!("Bearer {}", GOOGLE_TOKEN).as_str()))
        .and(body_partial_json(json!({
            "message": {
                "token": "device-abc",
                "notification": {"title": "New Follower", "body": "bob started following you"},
                "data": {"click_action": "FLUTTER_NOTIFICATION_CLICK"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo-project/messages/0:1700000000000000%abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(
        app,
        ENDPOINT,
        Some(TRIGGER_TOKEN),
        &created_event("alice", "follow", Some("bob started following you")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "sent");
    assert_eq!(body["message_id"], "projects/demo-project/messages/0:1700000000000000%abc");
}

#[tokio::test]
async fn test_unknown_type_gets_generic_title_and_empty_body() {
    let server = MockServer::start().await;
    mount_user(&server, "carol", json!({"fcmToken": {"stringValue": "device-c"}})).await;
    Mock::given(method("POST"))
        .and(path(send_path()))
        .and(body_partial_json(json!({
            "message": {"notification": {"title": "Notification", "body": ""}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "m-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &created_event("carol", "unknown_type", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "sent");
}

#[tokio::test]
async fn test_user_without_token_is_skipped() {
    let server = MockServer::start().await;
    mount_user(&server, "dave", json!({"displayName": {"stringValue": "Dave"}})).await;
    fcm_never_called(&server).await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &created_event("dave", "like", Some("x"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"outcome": "skipped_no_token"}));
}

#[tokio::test]
async fn test_missing_user_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;
    fcm_never_called(&server).await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &created_event("ghost", "like", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "skipped_no_token");
}

#[tokio::test]
async fn test_delivery_failure_still_succeeds() {
    let server = MockServer::start().await;
    mount_user(&server, "erin", json!({"fcmToken": {"stringValue": "stale-token"}})).await;
    Mock::given(method("POST"))
        .and(path(send_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "status": "NOT_FOUND", "message": "Requested entity was not found."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &created_event("erin", "comment", Some("hi"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "delivery_failed");
}

#[tokio::test]
async fn test_user_store_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("frank")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    fcm_never_called(&server).await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &created_event("frank", "like", None)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["message"], "Internal server error.");
}

#[tokio::test]
async fn test_updates_and_foreign_documents_do_not_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    fcm_never_called(&server).await;

    let update = json!({
        "value": {"name": "users/u1/notifications/n1", "fields": {"type": {"stringValue": "like"}}},
        "oldValue": {"name": "users/u1/notifications/n1", "fields": {}},
        "updateMask": {"fieldPaths": ["type"]}
    })
    .to_string();
    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "ignored");

    let foreign = json!({"value": {"name": "users/u1/bookmarks/b1", "fields": {}}}).to_string();
    let app = test_app(&server.uri()).await;
    let (status, _) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), &foreign).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = test_app(&server.uri()).await;
    let (status, _) = post_json(app, ENDPOINT, Some(TRIGGER_TOKEN), "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_event_without_trigger_secret_never_reaches_push() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    fcm_never_called(&server).await;

    let forged = created_event("victim", "follow", Some("click evil.example"));
    let user_jwt = bearer_token("victim");

    for token in [None, Some("wrong-secret"), Some(user_jwt.as_str())] {
        let app = test_app(&server.uri()).await;
        let (status, body) = post_json(app, ENDPOINT, token, &forged).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["status"], "UNAUTHENTICATED");
    }

    // 密钥校验先于请求体解析
    let app = test_app(&server.uri()).await;
    let (status, _) = post_json(app, ENDPOINT, None, "[]").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_id_is_encoded_in_lookup_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("victim")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fields": {"fcmToken": {"stringValue": "victim-device"}}
        })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(user_path("victim%23x")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    fcm_never_called(&server).await;

    let app = test_app(&server.uri()).await;
    let (status, body) = post_json(
        app,
        ENDPOINT,
        Some(TRIGGER_TOKEN),
        &created_event("victim#x", "like", Some("hi")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "skipped_no_token");
}
