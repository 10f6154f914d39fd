pub mod payments;
pub mod triggers;

use axum::{http::Method, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    state::AppState,
    utils::middleware::{request_id_middleware, request_logging_middleware},
};

/// 构建应用路由
pub fn app(state: Arc<AppState>) -> Router {
    // callable 函数允许任意来源的浏览器客户端
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .merge(payments::router())
        .nest("/triggers", triggers::router())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Rainbow-Functions is running!"
}
