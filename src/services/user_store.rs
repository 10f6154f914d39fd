use crate::{
    error::{AppError, Result},
    models::{firestore::Document, user::UserRecord},
    services::google_auth::GoogleTokenSource,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error};

/// 用户记录的只读查询
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 用户不存在时返回 `Ok(None)`
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;
}

/// 基于 Firestore REST API 的用户存储
#[derive(Clone)]
pub struct FirestoreUserStore {
    http_client: Client,
    tokens: GoogleTokenSource,
    documents_url: String,
}

impl FirestoreUserStore {
    pub fn new(http_client: Client, tokens: GoogleTokenSource, base_url: &str, project_id: &str) -> Self {
        Self {
            http_client,
            tokens,
            documents_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                base_url.trim_end_matches('/'),
                project_id
            ),
        }
    }

    /// 文档 ID 作为单个路径段编码，`#`、`?`、`%` 不会改变请求的文档
    fn user_url(&self, user_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.documents_url)
            .map_err(|e| AppError::Config(format!("Invalid Firestore base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config("Firestore base URL cannot carry a path".to_string()))?
            .push("users")
            .push(user_id);
        Ok(url)
    }
}

#[async_trait]
impl UserStore for FirestoreUserStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        debug!("Loading user record: {}", user_id);

        let url = self.user_url(user_id)?;
        let token = self.tokens.access_token().await?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Firestore request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("User record {} does not exist", user_id);
                Ok(None)
            }
            status if status.is_success() => {
                let document: Document = response.json().await.map_err(|e| {
                    AppError::ExternalService(format!("Failed to parse Firestore document: {}", e))
                })?;
                Ok(Some(UserRecord::from_document(&document)))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!("Firestore returned {} for user {}: {}", status, user_id, error_text);
                Err(AppError::ExternalService(format!(
                    "Firestore lookup failed with status {}",
                    status
                )))
            }
        }
    }
}
