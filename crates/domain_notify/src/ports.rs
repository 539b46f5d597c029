//! Notification repository port

use async_trait::async_trait;

use core_kernel::{NotificationId, PortError, UserId};
use crate::notification::Notification;

/// Filter for listing feed entries
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub recipient_id: Option<UserId>,
    pub unread_only: bool,
}

/// Storage port for notification feeds
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), PortError>;

    async fn fetch(&self, id: NotificationId) -> Result<Notification, PortError>;

    /// Lists entries newest first
    async fn list(&self, filter: &NotificationFilter) -> Result<Vec<Notification>, PortError>;

    /// Sets the read flag; idempotent
    async fn mark_read(&self, id: NotificationId) -> Result<Notification, PortError>;
}
