use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::{AppError, Result},
    models::{firestore::DocumentEvent, notification::DispatchOutcome},
    services::auth::TriggerInvoker,
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/user-notifications", post(user_notification_created))
}

/// 触发器: `users/{userId}/notifications/{notificationId}` 创建
///
/// 共享密钥校验先于请求体解析。
async fn user_notification_created(
    State(state): State<Arc<AppState>>,
    _invoker: TriggerInvoker,
    payload: std::result::Result<Json<DocumentEvent>, JsonRejection>,
) -> Result<Json<DispatchOutcome>> {
    let Json(event) = payload.map_err(|rejection| {
        warn!("Rejected malformed document event: {}", rejection);
        AppError::bad_request("Malformed document event")
    })?;

    let outcome = state.notification_handler.handle_event(&event).await?;
    debug!("Notification trigger finished: {:?}", outcome);

    Ok(Json(outcome))
}
