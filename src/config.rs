use serde::{Deserialize, Serialize};
use std::env;

use crate::models::notification::DEFAULT_CLICK_ACTION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Stripe payment configuration
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub stripe_api_version: String,

    // Google / Firebase configuration
    pub google_project_id: String,
    pub firestore_base_url: String,
    pub fcm_base_url: String,
    pub google_application_credentials: Option<String>,
    pub google_access_token: Option<String>,

    // Authentication configuration
    pub auth_jwt_secret: String,
    pub trigger_auth_token: String,

    // Notification settings
    pub notification_click_action: String,

    // Outbound HTTP
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "rainbow_functions=debug,tower_http=debug".to_string()),

            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            stripe_api_version: env::var("STRIPE_API_VERSION")
                .unwrap_or_else(|_| "2024-09-30.acacia".to_string()),

            google_project_id: required("GOOGLE_PROJECT_ID")?,
            firestore_base_url: env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| "https://firestore.googleapis.com".to_string()),
            fcm_base_url: env::var("FCM_BASE_URL")
                .unwrap_or_else(|_| "https://fcm.googleapis.com".to_string()),
            google_application_credentials: non_empty("GOOGLE_APPLICATION_CREDENTIALS"),
            google_access_token: non_empty("GOOGLE_ACCESS_TOKEN"),

            auth_jwt_secret: required("AUTH_JWT_SECRET")?,
            trigger_auth_token: required("TRIGGER_AUTH_TOKEN")?,

            notification_click_action: env::var("NOTIFICATION_CLICK_ACTION")
                .unwrap_or_else(|_| DEFAULT_CLICK_ACTION.to_string()),

            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
        };

        if config.google_application_credentials.is_none() && config.google_access_token.is_none() {
            anyhow::bail!("GOOGLE_APPLICATION_CREDENTIALS or GOOGLE_ACCESS_TOKEN must be set");
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    non_empty(key).ok_or_else(|| anyhow::anyhow!("{} must be set", key))
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// 测试用配置，不读取环境变量
    pub fn for_tests() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            stripe_secret_key: "sk_test_dummy".to_string(),
            stripe_api_base: "http://127.0.0.1:1".to_string(),
            stripe_api_version: "2024-09-30.acacia".to_string(),
            google_project_id: "demo-project".to_string(),
            firestore_base_url: "http://127.0.0.1:1".to_string(),
            fcm_base_url: "http://127.0.0.1:1".to_string(),
            google_application_credentials: None,
            google_access_token: Some("owner".to_string()),
            auth_jwt_secret: "test-secret".to_string(),
            trigger_auth_token: "test-trigger-token".to_string(),
            notification_click_action: DEFAULT_CLICK_ACTION.to_string(),
            http_timeout_secs: 5,
        }
    }
}
