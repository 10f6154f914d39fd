use crate::{
    config::Config,
    error::{AppError, Result},
    models::payment::{StripeErrorResponse, StripePaymentIntent},
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::Number;
use std::time::Duration;
use tracing::{debug, error};

/// 支付服务商接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// 以最小货币单位金额和小写币种创建支付意图
    async fn create_payment_intent(
        &self,
        amount: &Number,
        currency: &str,
    ) -> Result<StripePaymentIntent>;
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub api_version: String,
}

impl StripeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            secret_key: config.stripe_secret_key.clone(),
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            api_version: config.stripe_api_version.clone(),
        }
    }
}

#[derive(Clone)]
pub struct StripeClient {
    http_client: Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// 获取Stripe API请求头
    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.config.secret_key))
                .map_err(|_| AppError::Config("Invalid Stripe secret key".to_string()))?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(
            "Stripe-Version",
            HeaderValue::from_str(&self.config.api_version)
                .map_err(|_| AppError::Config("Invalid Stripe API version".to_string()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_payment_intent(
        &self,
        amount: &Number,
        currency: &str,
    ) -> Result<StripePaymentIntent> {
        debug!("Creating Stripe payment intent: {} {}", amount, currency);

        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
        ];

        let response = self
            .http_client
            .post(format!("{}/v1/payment_intents", self.config.api_base))
            .headers(self.get_headers()?)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Stripe API error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<StripeErrorResponse>(&error_text) {
                Ok(body) => format!(
                    "{} ({}): {}",
                    body.error.error_type.unwrap_or_default(),
                    body.error.code.unwrap_or_default(),
                    body.error.message.unwrap_or_default()
                ),
                Err(_) => error_text,
            };
            error!("Stripe payment intent creation failed with {}: {}", status, detail);
            return Err(AppError::ExternalService(format!(
                "Stripe payment intent creation failed: {}",
                detail
            )));
        }

        let intent: StripePaymentIntent = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse Stripe response: {}", e)))?;

        debug!("Stripe payment intent created: {}", intent.id);
        Ok(intent)
    }
}
