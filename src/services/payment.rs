use crate::{
    error::{AppError, Result, INTERNAL_ERROR_MESSAGE},
    models::payment::{PaymentIntentResult, PaymentRequest},
    services::{auth::Caller, stripe::PaymentProvider},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

const UNAUTHENTICATED_MESSAGE: &str = "The function must be called while authenticated.";

/// 创建支付意图的 callable 处理器
#[derive(Clone)]
pub struct PaymentIntentHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl PaymentIntentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// 校验调用方与请求数据，创建支付意图，仅返回 client secret
    ///
    /// 认证与参数错误原样返回；其他错误（服务商、网络）记录详情后统一替换为 `Internal`。
    pub async fn create(&self, caller: &Caller, data: &Value) -> Result<PaymentIntentResult> {
        let identity = caller
            .identity()
            .ok_or_else(|| AppError::unauthenticated(UNAUTHENTICATED_MESSAGE))?;

        match self.create_for_request(data).await {
            Ok(result) => {
                info!("Created payment intent for user {}", identity.uid);
                Ok(result)
            }
            Err(e) if e.is_callable() => {
                error!("Error creating PaymentIntent: {}", e);
                Err(e)
            }
            Err(e) => {
                error!("Error creating PaymentIntent: {:?}", e);
                Err(AppError::internal(INTERNAL_ERROR_MESSAGE))
            }
        }
    }

    async fn create_for_request(&self, data: &Value) -> Result<PaymentIntentResult> {
        let request = PaymentRequest::from_data(data)?;

        let intent = self
            .provider
            .create_payment_intent(&request.amount, &request.currency)
            .await?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            AppError::ExternalService(format!("Payment intent {} has no client secret", intent.id))
        })?;

        Ok(PaymentIntentResult { client_secret })
    }
}
