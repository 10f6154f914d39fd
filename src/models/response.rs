use serde::{Deserialize, Serialize};

/// callable 请求信封：`{"data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct CallableRequest<T> {
    #[serde(default)]
    pub data: T,
}

/// callable 成功响应：`{"result": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

impl<T> CallableResponse<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// callable 错误响应：`{"error": {"status": ..., "message": ...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct CallableErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub status: String,
    pub message: String,
}

impl CallableErrorBody {
    /// `code` 为小写连字符形式（如 `invalid-argument`），输出为 `INVALID_ARGUMENT`
    pub fn new(code: &str, message: String) -> Self {
        Self {
            error: ErrorDetail {
                status: code.replace('-', "_").to_uppercase(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_format() {
        let body = CallableErrorBody::new("invalid-argument", "bad".to_string());
        assert_eq!(body.error.status, "INVALID_ARGUMENT");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["message"], "bad");
    }

    #[test]
    fn test_missing_data_defaults() {
        let request: CallableRequest<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(request.data.is_null());
    }
}
