use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::{AppError, Result},
    models::{
        payment::PaymentIntentResult,
        response::{CallableRequest, CallableResponse},
    },
    services::auth::Caller,
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/createPaymentIntent", post(create_payment_intent))
}

/// callable: 创建支付意图
///
/// 认证检查先于请求体解析；请求体不是合法信封时返回 `INVALID_ARGUMENT`。
async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    payload: std::result::Result<Json<CallableRequest<Value>>, JsonRejection>,
) -> Result<Json<CallableResponse<PaymentIntentResult>>> {
    debug!("createPaymentIntent called");

    let data = match payload {
        Ok(Json(request)) => request.data,
        Err(rejection) if caller.identity().is_some() => {
            warn!("Rejected malformed callable request: {}", rejection);
            return Err(AppError::invalid_argument("Bad Request"));
        }
        Err(_) => Value::Null,
    };

    let result = state.payment_handler.create(&caller, &data).await?;

    Ok(Json(CallableResponse::new(result)))
}
