//! Bill repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::{BillId, Currency, Money, PortError, UserId};
use domain_billing::{Bill, BillFilter, BillRepository, BillStatus, BillingError};

use crate::error::{billing_err, StoreError};
use super::{enum_from_text, enum_to_text, from_json, to_json};

const SELECT_COLUMNS: &str = "id, client_id, description, amount, currency, due_date, status, \
     items, generated_by, created_at, last_updated";

/// PostgreSQL-backed bill store
#[derive(Debug, Clone)]
pub struct PgBillStore {
    pool: PgPool,
}

impl PgBillStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn mutate<F>(&self, id: BillId, f: F) -> Result<Bill, PortError>
    where
        F: FnOnce(&mut Bill) -> Result<(), BillingError> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM bills WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, BillRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("Bill", id))?;

        let mut bill = row.into_aggregate()?;
        f(&mut bill).map_err(billing_err)?;

        let row = BillRow::from_aggregate(&bill)?;
        sqlx::query("UPDATE bills SET status = $2, last_updated = $3 WHERE id = $1")
            .bind(row.id)
            .bind(&row.status)
            .bind(row.last_updated)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from)?;

        tx.commit().await.map_err(StoreError::from)?;
        Ok(bill)
    }
}

#[async_trait]
impl BillRepository for PgBillStore {
    async fn insert(&self, bill: &Bill) -> Result<(), PortError> {
        let row = BillRow::from_aggregate(bill)?;
        sqlx::query(
            "INSERT INTO bills (id, client_id, description, amount, currency, due_date, status, \
             items, generated_by, created_at, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(row.id)
        .bind(row.client_id)
        .bind(&row.description)
        .bind(row.amount)
        .bind(&row.currency)
        .bind(row.due_date)
        .bind(&row.status)
        .bind(&row.items)
        .bind(row.generated_by)
        .bind(row.created_at)
        .bind(row.last_updated)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn fetch(&self, id: BillId) -> Result<Bill, PortError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM bills WHERE id = $1");
        let row = sqlx::query_as::<_, BillRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("Bill", id))?;
        Ok(row.into_aggregate()?)
    }

    async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, PortError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM bills WHERE 1 = 1"));
        if let Some(client_id) = filter.client_id {
            builder.push(" AND client_id = ");
            builder.push_bind(*client_id.as_uuid());
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<BillRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter()
            .map(|row| row.into_aggregate().map_err(PortError::from))
            .collect()
    }

    async fn pay(&self, id: BillId) -> Result<Bill, PortError> {
        self.mutate(id, |b| b.pay()).await
    }

    async fn cancel(&self, id: BillId) -> Result<Bill, PortError> {
        self.mutate(id, |b| b.cancel()).await
    }
}

/// Database row for a bill
#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: Uuid,
    client_id: Uuid,
    description: String,
    amount: Decimal,
    currency: String,
    due_date: NaiveDate,
    status: String,
    items: serde_json::Value,
    generated_by: Uuid,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl BillRow {
    fn from_aggregate(bill: &Bill) -> Result<Self, StoreError> {
        Ok(Self {
            id: *bill.id.as_uuid(),
            client_id: *bill.client_id.as_uuid(),
            description: bill.description.clone(),
            amount: bill.amount.amount(),
            currency: bill.amount.currency().code().to_string(),
            due_date: bill.due_date,
            status: enum_to_text(&bill.status)?,
            items: to_json(&bill.items)?,
            generated_by: *bill.generated_by.as_uuid(),
            created_at: bill.created_at,
            last_updated: bill.last_updated,
        })
    }

    fn into_aggregate(self) -> Result<Bill, StoreError> {
        let currency: Currency = enum_from_text(&self.currency)?;
        let status: BillStatus = enum_from_text(&self.status)?;
        Ok(Bill {
            id: BillId::from_uuid(self.id),
            client_id: self.client_id.into(),
            description: self.description,
            amount: Money::new(self.amount, currency),
            due_date: self.due_date,
            status,
            items: from_json(self.items)?,
            generated_by: UserId::from_uuid(self.generated_by),
            created_at: self.created_at,
            last_updated: self.last_updated,
        })
    }
}
