use crate::{
    error::{AppError, Result},
    models::notification::{PushPayload, SendReceipt},
    services::google_auth::GoogleTokenSource,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 推送服务接口：向单个设备发送
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send_to_device(&self, token: &str, payload: &PushPayload) -> Result<SendReceipt>;
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    #[serde(flatten)]
    payload: &'a PushPayload,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    name: String,
}

/// FCM HTTP v1 客户端
#[derive(Clone)]
pub struct FcmClient {
    http_client: Client,
    tokens: GoogleTokenSource,
    send_url: String,
}

impl FcmClient {
    pub fn new(http_client: Client, tokens: GoogleTokenSource, base_url: &str, project_id: &str) -> Self {
        Self {
            http_client,
            tokens,
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                base_url.trim_end_matches('/'),
                project_id
            ),
        }
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send_to_device(&self, token: &str, payload: &PushPayload) -> Result<SendReceipt> {
        let access_token = self.tokens.access_token().await?;
        let body = FcmRequest {
            message: FcmMessage { token, payload },
        };

        let response = self
            .http_client
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("FCM request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "FCM send failed with status {}: {}",
                status, error_text
            )));
        }

        let sent: FcmResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse FCM response: {}", e)))?;

        debug!("FCM accepted message {}", sent.name);
        Ok(SendReceipt { message_id: sent.name })
    }
}
