use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{
    error::Result,
    utils::validation::{require_positive_number, require_string},
};

pub const AMOUNT_ERROR_MESSAGE: &str = "'amount' must be a positive number.";
pub const CURRENCY_ERROR_MESSAGE: &str = "'currency' must be a valid ISO string.";

/// 已校验的支付请求
///
/// `amount` 按最小货币单位原样透传，不做任何取整；`currency` 已转为小写。
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: Number,
    pub currency: String,
}

impl PaymentRequest {
    /// 按顺序校验 `amount` 与 `currency`
    ///
    /// 非对象的请求数据视为缺少 `amount`。
    pub fn from_data(data: &Value) -> Result<Self> {
        let amount = require_positive_number(data.get("amount"), AMOUNT_ERROR_MESSAGE)?;
        let currency = require_string(data.get("currency"), CURRENCY_ERROR_MESSAGE)?;

        Ok(Self {
            amount: amount.clone(),
            currency: currency.to_lowercase(),
        })
    }
}

/// 返回给客户端的结果，只包含 client secret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResult {
    pub client_secret: String,
}

/// Stripe PaymentIntent 响应中本服务关心的字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Stripe 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub param: Option<String>,
}
