use serde::{Deserialize, Serialize};

use super::firestore::Document;

/// `users/{userId}` 文档中本服务读取的部分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub fcm_token: Option<String>,
}

impl UserRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            fcm_token: document.string_field("fcmToken").map(str::to_string),
        }
    }

    /// 可用的设备令牌；空字符串视为没有令牌
    pub fn device_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|token| !token.is_empty())
    }
}
