use crate::error::{AppError, Result};
use serde_json::{Number, Value};

/// 取出正数字段；非数字、缺失或 `<= 0` 时返回 `InvalidArgument`
pub fn require_positive_number<'a>(value: Option<&'a Value>, message: &str) -> Result<&'a Number> {
    match value {
        Some(Value::Number(number)) if number.as_f64().map_or(false, |n| n > 0.0) => Ok(number),
        _ => Err(AppError::invalid_argument(message)),
    }
}

/// 取出字符串字段；非字符串或缺失时返回 `InvalidArgument`
pub fn require_string<'a>(value: Option<&'a Value>, message: &str) -> Result<&'a str> {
    match value {
        Some(Value::String(s)) => Ok(s.as_str()),
        _ => Err(AppError::invalid_argument(message)),
    }
}
