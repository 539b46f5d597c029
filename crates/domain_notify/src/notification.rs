//! Notification feed entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{NoticeKind, NotificationId, UserId};

/// A single entry in a user's notification feed
///
/// Entries are immutable apart from the read flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NoticeKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NoticeKind,
    ) -> Self {
        Self {
            id: NotificationId::new_v7(),
            recipient_id,
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Marks the entry read; marking an already-read entry is a no-op
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_starts_unread() {
        let n = Notification::new(
            UserId::new(),
            "Return Submitted",
            "Your 2024 tax return was submitted.",
            NoticeKind::Success,
        );
        assert!(!n.read);
        assert_eq!(n.kind, NoticeKind::Success);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut n = Notification::new(UserId::new(), "t", "m", NoticeKind::Info);
        n.mark_read();
        n.mark_read();
        assert!(n.read);
    }
}
