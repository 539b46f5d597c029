//! Notification DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::NoticeKind;
use domain_notify::Notification;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NoticeKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: usize,
}
