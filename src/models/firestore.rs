use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Firestore REST 格式的文档
///
/// `fields` 保留原始的类型化值（`{"stringValue": "..."}` 等），按需读取。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// 读取字符串字段；字段缺失或不是 `stringValue` 时返回 `None`
    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|value| value.get("stringValue"))
            .and_then(Value::as_str)
    }
}

/// 数据库触发器投递的文档变更事件
///
/// `updateMask` 等其余字段不参与判定，反序列化时忽略。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEvent {
    #[serde(default)]
    pub value: Option<Document>,
    #[serde(default)]
    pub old_value: Option<Document>,
}

impl DocumentEvent {
    /// 仅当变更前文档不存在时才是创建事件
    pub fn is_create(&self) -> bool {
        self.value.is_some() && self.old_value.as_ref().map_or(true, |old| old.name.is_empty())
    }
}

/// `users/{userId}/notifications/{notificationId}` 路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPath {
    pub user_id: String,
    pub notification_id: String,
}

impl NotificationPath {
    /// 接受完整资源名（`projects/{p}/databases/{d}/documents/users/...`）或相对路径
    pub fn parse(name: &str) -> Result<Self> {
        let relative = match name.find("/documents/") {
            Some(index) => &name[index + "/documents/".len()..],
            None => name.trim_start_matches('/'),
        };

        let segments: Vec<&str> = relative.split('/').collect();
        match segments.as_slice() {
            ["users", user_id, "notifications", notification_id]
                if !user_id.is_empty() && !notification_id.is_empty() =>
            {
                Ok(Self {
                    user_id: user_id.to_string(),
                    notification_id: notification_id.to_string(),
                })
            }
            _ => Err(AppError::BadRequest(format!(
                "Document {} is not a user notification",
                name
            ))),
        }
    }
}
