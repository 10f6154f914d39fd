use crate::{
    config::Config,
    error::{AppError, Result},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

const GOOGLE_SCOPES: &str =
    "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// 服务账号密钥文件中用到的字段
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct GoogleClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Firestore / FCM 请求使用的访问令牌来源
#[derive(Clone)]
pub enum GoogleTokenSource {
    /// 固定令牌（模拟器或外部注入）
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        http_client: Client,
        cache: Arc<RwLock<Option<CachedToken>>>,
    },
}

impl GoogleTokenSource {
    pub async fn from_config(config: &Config, http_client: Client) -> Result<Self> {
        if let Some(token) = &config.google_access_token {
            info!("Using statically configured Google access token");
            return Ok(Self::Static(token.clone()));
        }

        let path = config.google_application_credentials.as_ref().ok_or_else(|| {
            AppError::Config("No Google credentials configured".to_string())
        })?;
        let raw = tokio::fs::read_to_string(path).await?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)?;
        info!("Using Google service account {}", key.client_email);

        Ok(Self::service_account(key, http_client))
    }

    pub fn service_account(key: ServiceAccountKey, http_client: Client) -> Self {
        Self::ServiceAccount {
            key,
            http_client,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// 获取访问令牌，缓存到过期前 60 秒
    pub async fn access_token(&self) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount {
                key,
                http_client,
                cache,
            } => {
                if let Some(cached) = cache.read().await.as_ref() {
                    if cached.expires_at > Utc::now() {
                        return Ok(cached.access_token.clone());
                    }
                }

                let mut guard = cache.write().await;
                if let Some(cached) = guard.as_ref() {
                    if cached.expires_at > Utc::now() {
                        return Ok(cached.access_token.clone());
                    }
                }

                let fresh = fetch_token(key, http_client).await?;
                let token = fresh.access_token.clone();
                *guard = Some(fresh);
                Ok(token)
            }
        }
    }
}

fn sign_assertion(key: &ServiceAccountKey, token_uri: &str, now: DateTime<Utc>) -> Result<String> {
    let claims = GoogleClaims {
        iss: &key.client_email,
        scope: GOOGLE_SCOPES,
        aud: token_uri,
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    };
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?)
}

async fn fetch_token(key: &ServiceAccountKey, http_client: &Client) -> Result<CachedToken> {
    let token_uri = key.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
    let now = Utc::now();
    let assertion = sign_assertion(key, token_uri, now)?;

    let response = http_client
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| AppError::ExternalService(format!("Google token request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!("Google token endpoint returned {}: {}", status, error_text);
        return Err(AppError::ExternalService(format!(
            "Google token exchange failed with status {}",
            status
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::ExternalService(format!("Failed to parse Google token: {}", e)))?;

    debug!("Obtained Google access token valid for {}s", token.expires_in);
    Ok(CachedToken {
        access_token: token.access_token,
        expires_at: now + Duration::seconds(token.expires_in - 60),
    })
}
