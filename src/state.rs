use crate::{
    config::Config,
    error::{AppError, Result},
    services::{
        AuthService, FcmClient, FirestoreUserStore, GoogleTokenSource, NotificationDispatchHandler,
        PaymentIntentHandler, StripeClient, StripeConfig,
    },
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};

/// 应用程序的共享状态
/// 服务商客户端在启动时构造一次，注入到各处理器
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 调用方身份解析
    pub auth_service: AuthService,

    /// 支付意图处理器
    pub payment_handler: PaymentIntentHandler,

    /// 通知推送处理器
    pub notification_handler: NotificationDispatchHandler,
}

impl AppState {
    /// 按配置构造真实的 Stripe / Firestore / FCM 客户端
    pub async fn from_config(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let stripe = StripeClient::new(StripeConfig::from_config(&config), timeout)?;
        let tokens = GoogleTokenSource::from_config(&config, http_client.clone()).await?;
        let users = FirestoreUserStore::new(
            http_client.clone(),
            tokens.clone(),
            &config.firestore_base_url,
            &config.google_project_id,
        );
        let push = FcmClient::new(
            http_client,
            tokens,
            &config.fcm_base_url,
            &config.google_project_id,
        );

        Ok(Self {
            auth_service: AuthService::new(&config),
            payment_handler: PaymentIntentHandler::new(Arc::new(stripe)),
            notification_handler: NotificationDispatchHandler::new(
                Arc::new(users),
                Arc::new(push),
                config.notification_click_action.clone(),
            ),
            config,
        })
    }
}
