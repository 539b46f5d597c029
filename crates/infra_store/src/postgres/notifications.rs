//! Notification feed repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::{NoticeKind, NotificationId, PortError, UserId};
use domain_notify::{Notification, NotificationFilter, NotificationRepository};

use crate::error::StoreError;
use super::{enum_from_text, enum_to_text};

const SELECT_COLUMNS: &str = "id, recipient_id, title, message, kind, read, created_at";

/// PostgreSQL-backed notification store
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationStore {
    async fn insert(&self, notification: &Notification) -> Result<(), PortError> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, title, message, kind, read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(*notification.id.as_uuid())
        .bind(*notification.recipient_id.as_uuid())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(enum_to_text(&notification.kind)?)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn fetch(&self, id: NotificationId) -> Result<Notification, PortError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM notifications WHERE id = $1");
        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("Notification", id))?;
        Ok(row.into_entity()?)
    }

    async fn list(&self, filter: &NotificationFilter) -> Result<Vec<Notification>, PortError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SELECT_COLUMNS} FROM notifications WHERE 1 = 1"
        ));
        if let Some(recipient_id) = filter.recipient_id {
            builder.push(" AND recipient_id = ");
            builder.push_bind(*recipient_id.as_uuid());
        }
        if filter.unread_only {
            builder.push(" AND NOT read");
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<NotificationRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter()
            .map(|row| row.into_entity().map_err(PortError::from))
            .collect()
    }

    async fn mark_read(&self, id: NotificationId) -> Result<Notification, PortError> {
        let sql = format!(
            "UPDATE notifications SET read = TRUE WHERE id = $1 RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("Notification", id))?;
        Ok(row.into_entity()?)
    }
}

/// Database row for a notification
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: Uuid,
    title: String,
    message: String,
    kind: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_entity(self) -> Result<Notification, StoreError> {
        let kind: NoticeKind = enum_from_text(&self.kind)?;
        Ok(Notification {
            id: NotificationId::from_uuid(self.id),
            recipient_id: UserId::from_uuid(self.recipient_id),
            title: self.title,
            message: self.message,
            kind,
            read: self.read,
            created_at: self.created_at,
        })
    }
}
