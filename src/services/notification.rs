use crate::{
    error::{AppError, Result},
    models::{
        firestore::{DocumentEvent, NotificationPath},
        notification::{DispatchOutcome, NotificationRecord, PushPayload},
    },
    services::{messaging::PushSender, user_store::UserStore},
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 新通知文档触发的推送处理器
#[derive(Clone)]
pub struct NotificationDispatchHandler {
    users: Arc<dyn UserStore>,
    push: Arc<dyn PushSender>,
    click_action: String,
}

impl NotificationDispatchHandler {
    pub fn new(users: Arc<dyn UserStore>, push: Arc<dyn PushSender>, click_action: String) -> Self {
        Self {
            users,
            push,
            click_action,
        }
    }

    /// 处理数据库触发器投递的文档事件
    pub async fn handle_event(&self, event: &DocumentEvent) -> Result<DispatchOutcome> {
        let document = event
            .value
            .as_ref()
            .ok_or_else(|| AppError::bad_request("Document event has no value"))?;
        let path = NotificationPath::parse(&document.name)?;

        if !event.is_create() {
            debug!(
                "Ignoring non-create event for users/{}/notifications/{}",
                path.user_id, path.notification_id
            );
            return Ok(DispatchOutcome::Ignored);
        }

        debug!(
            "New notification {} for user {}",
            path.notification_id, path.user_id
        );
        let record = NotificationRecord::from_document(document);
        self.dispatch(&path.user_id, &record).await
    }

    /// 查找用户设备令牌并发送推送
    ///
    /// 没有令牌或投递失败都只记录日志，不作为错误返回。
    pub async fn dispatch(&self, user_id: &str, record: &NotificationRecord) -> Result<DispatchOutcome> {
        let user = self.users.get_user(user_id).await?;
        let token = match user.as_ref().and_then(|u| u.device_token()) {
            Some(token) => token,
            None => {
                info!("No FCM token for user {}, cannot send notification", user_id);
                return Ok(DispatchOutcome::SkippedNoToken);
            }
        };

        let payload = PushPayload::for_record(record, &self.click_action);

        match self.push.send_to_device(token, &payload).await {
            Ok(receipt) => {
                info!("Successfully sent message: {}", receipt.message_id);
                Ok(DispatchOutcome::Sent {
                    message_id: receipt.message_id,
                })
            }
            Err(e) => {
                error!("Error sending message to user {}: {}", user_id, e);
                Ok(DispatchOutcome::DeliveryFailed)
            }
        }
    }
}
