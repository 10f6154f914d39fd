//! Rainbow 应用的云函数服务：创建 Stripe 支付意图、为新通知发送 FCM 推送。

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
