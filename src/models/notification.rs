use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::firestore::Document;

/// 默认的客户端路由标识
pub const DEFAULT_CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

/// `users/{userId}/notifications/{notificationId}` 下的通知文档
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationRecord {
    pub notification_type: Option<String>,
    pub message: Option<String>,
}

impl NotificationRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            notification_type: document.string_field("type").map(str::to_string),
            message: document.string_field("message").map(str::to_string),
        }
    }

    pub fn kind(&self) -> NotificationType {
        NotificationType::parse(self.notification_type.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Follow,
    Like,
    Comment,
    Other,
}

impl NotificationType {
    pub fn parse(value: &str) -> Self {
        match value {
            "follow" => Self::Follow,
            "like" => Self::Like,
            "comment" => Self::Comment,
            _ => Self::Other,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Follow => "New Follower",
            Self::Like => "New Like",
            Self::Comment => "New Comment",
            Self::Other => "Notification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

/// 发送给单个设备的推送内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub notification: PushNotification,
    pub data: HashMap<String, String>,
}

impl PushPayload {
    pub fn for_record(record: &NotificationRecord, click_action: &str) -> Self {
        let mut data = HashMap::new();
        data.insert("click_action".to_string(), click_action.to_string());

        Self {
            notification: PushNotification {
                title: record.kind().title().to_string(),
                body: record.message.clone().unwrap_or_default(),
            },
            data,
        }
    }
}

/// 推送服务返回的投递回执
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: String,
}

/// 一次通知触发的处理结果；对触发器而言都视为成功
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Sent { message_id: String },
    SkippedNoToken,
    DeliveryFailed,
    Ignored,
}
