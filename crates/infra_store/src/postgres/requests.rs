//! Info request repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::{PortError, RequestId, ReturnId, UserId};
use domain_requests::{
    InfoRequest, RequestError, RequestFilter, RequestRepository, RequestStatus, ThreadMessage,
};

use crate::error::{request_err, StoreError};
use super::{enum_from_text, enum_to_text, from_json, to_json};

const SELECT_COLUMNS: &str = "id, return_id, client_id, client_name, subject, status, \
     opened_by, messages, created_at, last_updated";

/// PostgreSQL-backed info request store
#[derive(Debug, Clone)]
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn mutate<F>(&self, id: RequestId, f: F) -> Result<InfoRequest, PortError>
    where
        F: FnOnce(&mut InfoRequest) -> Result<(), RequestError> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM info_requests WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("InfoRequest", id))?;

        let mut request = row.into_aggregate()?;
        f(&mut request).map_err(request_err)?;

        let row = RequestRow::from_aggregate(&request)?;
        sqlx::query(
            "UPDATE info_requests SET status = $2, messages = $3, last_updated = $4 WHERE id = $1",
        )
        .bind(row.id)
        .bind(&row.status)
        .bind(&row.messages)
        .bind(row.last_updated)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from)?;

        tx.commit().await.map_err(StoreError::from)?;
        Ok(request)
    }
}

#[async_trait]
impl RequestRepository for PgRequestStore {
    async fn insert(&self, request: &InfoRequest) -> Result<(), PortError> {
        let row = RequestRow::from_aggregate(request)?;
        sqlx::query(
            "INSERT INTO info_requests (id, return_id, client_id, client_name, subject, status, \
             opened_by, messages, created_at, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(row.id)
        .bind(row.return_id)
        .bind(row.client_id)
        .bind(&row.client_name)
        .bind(&row.subject)
        .bind(&row.status)
        .bind(row.opened_by)
        .bind(&row.messages)
        .bind(row.created_at)
        .bind(row.last_updated)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn fetch(&self, id: RequestId) -> Result<InfoRequest, PortError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM info_requests WHERE id = $1");
        let row = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("InfoRequest", id))?;
        Ok(row.into_aggregate()?)
    }

    async fn list(&self, filter: &RequestFilter) -> Result<Vec<InfoRequest>, PortError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SELECT_COLUMNS} FROM info_requests WHERE 1 = 1"
        ));
        if let Some(return_id) = filter.return_id {
            builder.push(" AND return_id = ");
            builder.push_bind(*return_id.as_uuid());
        }
        if let Some(client_id) = filter.client_id {
            builder.push(" AND client_id = ");
            builder.push_bind(*client_id.as_uuid());
        }
        builder.push(" ORDER BY last_updated DESC");

        let rows = builder
            .build_query_as::<RequestRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter()
            .map(|row| row.into_aggregate().map_err(PortError::from))
            .collect()
    }

    async fn append_reply(
        &self,
        id: RequestId,
        message: ThreadMessage,
    ) -> Result<InfoRequest, PortError> {
        self.mutate(id, |r| r.reply(message)).await
    }

    async fn resolve(&self, id: RequestId) -> Result<InfoRequest, PortError> {
        self.mutate(id, |r| r.resolve()).await
    }

    async fn close(&self, id: RequestId) -> Result<InfoRequest, PortError> {
        self.mutate(id, |r| r.close()).await
    }
}

/// Database row for an info request thread
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    return_id: Uuid,
    client_id: Uuid,
    client_name: String,
    subject: String,
    status: String,
    opened_by: Uuid,
    messages: serde_json::Value,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl RequestRow {
    fn from_aggregate(request: &InfoRequest) -> Result<Self, StoreError> {
        Ok(Self {
            id: *request.id.as_uuid(),
            return_id: *request.return_id.as_uuid(),
            client_id: *request.client_id.as_uuid(),
            client_name: request.client_name.clone(),
            subject: request.subject.clone(),
            status: enum_to_text(&request.status)?,
            opened_by: *request.opened_by.as_uuid(),
            messages: to_json(&request.messages)?,
            created_at: request.created_at,
            last_updated: request.last_updated,
        })
    }

    fn into_aggregate(self) -> Result<InfoRequest, StoreError> {
        let status: RequestStatus = enum_from_text(&self.status)?;
        Ok(InfoRequest {
            id: RequestId::from_uuid(self.id),
            return_id: ReturnId::from_uuid(self.return_id),
            client_id: self.client_id.into(),
            client_name: self.client_name,
            subject: self.subject,
            status,
            opened_by: UserId::from_uuid(self.opened_by),
            messages: from_json(self.messages)?,
            created_at: self.created_at,
            last_updated: self.last_updated,
        })
    }
}
