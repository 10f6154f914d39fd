use crate::{
    config::Config,
    error::{AppError, Result},
    state::AppState,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    headers::{authorization::Bearer, Authorization},
    http::request::Parts,
    RequestPartsExt, TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // 用户ID
    pub exp: i64,              // 过期时间
    pub iat: Option<i64>,      // 签发时间
    pub email: Option<String>, // 邮箱
}

/// 已验证的调用方身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
    pub email: Option<String>,
}

/// 调用方：已认证或匿名
///
/// 由边界层解析后显式传给处理器，处理器自行决定是否要求认证。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Authenticated(CallerIdentity),
    Anonymous,
}

impl Caller {
    pub fn identity(&self) -> Option<&CallerIdentity> {
        match self {
            Caller::Authenticated(identity) => Some(identity),
            Caller::Anonymous => None,
        }
    }
}

/// 已通过共享密钥校验的触发器调用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerInvoker;

#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    trigger_token: String,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
            trigger_token: config.trigger_auth_token.clone(),
        }
    }

    pub fn verify_jwt(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(token_data) => {
                debug!("JWT token verified for user: {}", token_data.claims.sub);
                Ok(token_data.claims)
            }
            Err(e) => {
                warn!("JWT verification failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// 解析 bearer token；缺失或无效时返回匿名调用方
    pub fn resolve_caller(&self, token: Option<&str>) -> Caller {
        match token.map(|t| self.verify_jwt(t)) {
            Some(Ok(claims)) => Caller::Authenticated(CallerIdentity {
                uid: claims.sub,
                email: claims.email,
            }),
            _ => Caller::Anonymous,
        }
    }

    /// 校验触发器基础设施携带的共享密钥
    pub fn verify_trigger(&self, token: Option<&str>) -> Result<TriggerInvoker> {
        match token {
            Some(token) if constant_time_eq(token.as_bytes(), self.trigger_token.as_bytes()) => {
                Ok(TriggerInvoker)
            }
            Some(_) => {
                warn!("Trigger request carried an invalid token");
                Err(AppError::unauthenticated("Trigger request is not authorized."))
            }
            None => {
                warn!("Trigger request without bearer token");
                Err(AppError::unauthenticated("Trigger request is not authorized."))
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

async fn bearer_token(parts: &mut Parts) -> Option<Bearer> {
    parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer)
}

// Axum extractor for the caller identity
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let bearer = bearer_token(parts).await;

        Ok(state
            .auth_service
            .resolve_caller(bearer.as_ref().map(|b| b.token())))
    }
}

// 触发器端点只接受携带共享密钥的调用
#[async_trait]
impl FromRequestParts<Arc<AppState>> for TriggerInvoker {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let bearer = bearer_token(parts).await;

        state
            .auth_service
            .verify_trigger(bearer.as_ref().map(|b| b.token()))
    }
}
