#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rainbow_functions::{config::Config, routes, services::auth::Claims, state::AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-secret";
pub const STRIPE_KEY: &str = "sk_test_integration";
pub const PROJECT_ID: &str = "demo-project";
pub const GOOGLE_TOKEN: &str = "owner";
pub const TRIGGER_TOKEN: &str = "trigger-shared-secret";

/// 所有外部服务都指向同一个 wiremock 服务器
pub fn test_config(mock_base: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        stripe_secret_key: STRIPE_KEY.to_string(),
        stripe_api_base: mock_base.to_string(),
        stripe_api_version: "2024-09-30.acacia".to_string(),
        google_project_id: PROJECT_ID.to_string(),
        firestore_base_url: mock_base.to_string(),
        fcm_base_url: mock_base.to_string(),
        google_application_credentials: None,
        google_access_token: Some(GOOGLE_TOKEN.to_string()),
        auth_jwt_secret: JWT_SECRET.to_string(),
        trigger_auth_token: TRIGGER_TOKEN.to_string(),
        notification_click_action: "FLUTTER_NOTIFICATION_CLICK".to_string(),
        http_timeout_secs: 5,
    }
}

pub async fn test_app(mock_base: &str) -> Router {
    let state = AppState::from_config(test_config(mock_base)).await.unwrap();
    routes::app(Arc::new(state))
}

pub fn bearer_token(uid: &str) -> String {
    let claims = Claims {
        sub: uid.to_string(),
        exp: (Utc::now() + Duration::minutes(10)).timestamp(),
        iat: Some(Utc::now().timestamp()),
        email: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// 发送 JSON POST 请求，返回状态码与解析后的响应体
pub async fn post_json(app: Router, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
