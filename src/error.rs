use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::response::CallableErrorBody;

pub type Result<T> = std::result::Result<T, AppError>;

/// 对调用方公开的通用错误信息
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// callable 协议中的错误码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::InvalidArgument(_) | AppError::BadRequest(_) => "invalid-argument",
            _ => "internal",
        }
    }

    /// 错误是否已经属于 callable 错误词汇（可原样返回给调用方）
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            AppError::Unauthenticated(_) | AppError::InvalidArgument(_) | AppError::Internal(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidArgument(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalService(_) | AppError::Request(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Unauthenticated(msg)
            | AppError::InvalidArgument(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => {
                tracing::error!("Unhandled error: {}", other);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(CallableErrorBody::new(self.code(), message))).into_response()
    }
}

// 便利函数，用于创建常见错误
impl AppError {
    pub fn unauthenticated(msg: &str) -> Self {
        Self::Unauthenticated(msg.to_string())
    }

    pub fn invalid_argument(msg: &str) -> Self {
        Self::InvalidArgument(msg.to_string())
    }

    pub fn internal(msg: &str) -> Self {
        Self::Internal(msg.to_string())
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
