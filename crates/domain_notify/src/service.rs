//! Notification application service
//!
//! Doubles as the [`NotificationSink`] the other domains emit into, so a
//! single wiring serves both delivery and feed reads.

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{Actor, NoticeKind, NotificationId, NotificationSink, PortError, UserId};
use crate::error::NotifyError;
use crate::notification::Notification;
use crate::ports::{NotificationFilter, NotificationRepository};

pub struct NotifyService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotifyService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Lists the caller's own feed, newest first
    pub async fn list_feed(
        &self,
        actor: &Actor,
        unread_only: bool,
    ) -> Result<Vec<Notification>, NotifyError> {
        let filter = NotificationFilter {
            recipient_id: Some(actor.user_id),
            unread_only,
        };
        Ok(self.notifications.list(&filter).await?)
    }

    /// Count of unread entries in the caller's feed
    pub async fn unread_count(&self, actor: &Actor) -> Result<usize, NotifyError> {
        Ok(self.list_feed(actor, true).await?.len())
    }

    /// Marks one of the caller's entries read
    ///
    /// Entries belonging to other users read as not found. Re-marking an
    /// already-read entry succeeds without change.
    pub async fn mark_read(
        &self,
        actor: &Actor,
        id: NotificationId,
    ) -> Result<Notification, NotifyError> {
        let notification = self.notifications.fetch(id).await?;
        if notification.recipient_id != actor.user_id {
            return Err(NotifyError::NotificationNotFound(id.to_string()));
        }
        Ok(self.notifications.mark_read(id).await?)
    }
}

#[async_trait]
impl NotificationSink for NotifyService {
    async fn push(
        &self,
        recipient: UserId,
        title: &str,
        message: &str,
        kind: NoticeKind,
    ) -> Result<(), PortError> {
        let notification = Notification::new(recipient, title, message, kind);
        self.notifications.insert(&notification).await
    }
}
