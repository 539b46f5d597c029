//! Tax return repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::{Currency, Money, PortError, ReturnId};
use domain_filing::{
    DecisionRuling, DocumentRef, EmployeeStatus, FbrStatus, FilingError, IncomeEntry,
    ReturnFilter, ReturnRepository, TaxAssessment, TaxReturn, VerificationOutcome,
};

use crate::error::{filing_err, StoreError};
use super::{enum_from_text, enum_to_text, from_json, to_json};

const SELECT_COLUMNS: &str = "id, client_id, client_name, tax_year, employee_status, fbr_status, \
     income_entries, total_income, currency, total_tax, assessment, documents, \
     declaration_acknowledged, submitted_date, created_at, last_updated";

/// PostgreSQL-backed tax return store
#[derive(Debug, Clone)]
pub struct PgReturnStore {
    pool: PgPool,
}

impl PgReturnStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies a transition inside a transaction: the row is locked, the
    /// aggregate method re-checked against the stored state, and the full
    /// row written back.
    async fn mutate<F>(&self, id: ReturnId, f: F) -> Result<TaxReturn, PortError>
    where
        F: FnOnce(&mut TaxReturn) -> Result<(), FilingError> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM tax_returns WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, ReturnRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("TaxReturn", id))?;

        let mut tax_return = row.into_aggregate()?;
        f(&mut tax_return).map_err(filing_err)?;

        let row = ReturnRow::from_aggregate(&tax_return)?;
        sqlx::query(
            "UPDATE tax_returns SET employee_status = $2, fbr_status = $3, income_entries = $4, \
             total_income = $5, total_tax = $6, assessment = $7, documents = $8, \
             declaration_acknowledged = $9, submitted_date = $10, last_updated = $11 \
             WHERE id = $1",
        )
        .bind(row.id)
        .bind(&row.employee_status)
        .bind(&row.fbr_status)
        .bind(&row.income_entries)
        .bind(row.total_income)
        .bind(row.total_tax)
        .bind(&row.assessment)
        .bind(&row.documents)
        .bind(row.declaration_acknowledged)
        .bind(row.submitted_date)
        .bind(row.last_updated)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from)?;

        tx.commit().await.map_err(StoreError::from)?;
        Ok(tax_return)
    }
}

#[async_trait]
impl ReturnRepository for PgReturnStore {
    async fn insert(&self, tax_return: &TaxReturn) -> Result<(), PortError> {
        let row = ReturnRow::from_aggregate(tax_return)?;
        sqlx::query(
            "INSERT INTO tax_returns (id, client_id, client_name, tax_year, employee_status, \
             fbr_status, income_entries, total_income, currency, total_tax, assessment, \
             documents, declaration_acknowledged, submitted_date, created_at, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(row.id)
        .bind(row.client_id)
        .bind(&row.client_name)
        .bind(row.tax_year)
        .bind(&row.employee_status)
        .bind(&row.fbr_status)
        .bind(&row.income_entries)
        .bind(row.total_income)
        .bind(&row.currency)
        .bind(row.total_tax)
        .bind(&row.assessment)
        .bind(&row.documents)
        .bind(row.declaration_acknowledged)
        .bind(row.submitted_date)
        .bind(row.created_at)
        .bind(row.last_updated)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn fetch(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM tax_returns WHERE id = $1");
        let row = sqlx::query_as::<_, ReturnRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| PortError::not_found("TaxReturn", id))?;
        Ok(row.into_aggregate()?)
    }

    async fn list(&self, filter: &ReturnFilter) -> Result<Vec<TaxReturn>, PortError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SELECT_COLUMNS} FROM tax_returns WHERE 1 = 1"
        ));
        if let Some(client_id) = filter.client_id {
            builder.push(" AND client_id = ");
            builder.push_bind(*client_id.as_uuid());
        }
        if filter.decision_eligible {
            builder.push(
                " AND employee_status IN ('in_review', 'approved') \
                 AND fbr_status IN ('submitted', 'under_review')",
            );
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<ReturnRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter()
            .map(|row| row.into_aggregate().map_err(PortError::from))
            .collect()
    }

    async fn attach_document(
        &self,
        id: ReturnId,
        document: DocumentRef,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.attach_document(document)).await
    }

    async fn update_income(
        &self,
        id: ReturnId,
        income_entries: Vec<IncomeEntry>,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.update_income(income_entries)).await
    }

    async fn acknowledge_declaration(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.acknowledge_declaration()).await
    }

    async fn submit(&self, id: ReturnId, now: DateTime<Utc>) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.submit(now)).await
    }

    async fn begin_review(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.begin_review()).await
    }

    async fn verify(
        &self,
        id: ReturnId,
        outcome: VerificationOutcome,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.verify(outcome)).await
    }

    async fn save_assessment(
        &self,
        id: ReturnId,
        assessment: &TaxAssessment,
    ) -> Result<TaxReturn, PortError> {
        let assessment = assessment.clone();
        self.mutate(id, |r| r.record_assessment(assessment)).await
    }

    async fn take_up(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.take_up_review()).await
    }

    async fn decide(&self, id: ReturnId, ruling: DecisionRuling) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.apply_decision(ruling)).await
    }
}

/// Database row for a tax return
#[derive(Debug, sqlx::FromRow)]
struct ReturnRow {
    id: Uuid,
    client_id: Uuid,
    client_name: String,
    tax_year: i32,
    employee_status: String,
    fbr_status: Option<String>,
    income_entries: serde_json::Value,
    total_income: Decimal,
    currency: String,
    total_tax: Option<Decimal>,
    assessment: Option<serde_json::Value>,
    documents: serde_json::Value,
    declaration_acknowledged: bool,
    submitted_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl ReturnRow {
    fn from_aggregate(tax_return: &TaxReturn) -> Result<Self, StoreError> {
        Ok(Self {
            id: *tax_return.id.as_uuid(),
            client_id: *tax_return.client_id.as_uuid(),
            client_name: tax_return.client_name.clone(),
            tax_year: i32::from(tax_return.tax_year),
            employee_status: enum_to_text(&tax_return.employee_status)?,
            fbr_status: tax_return
                .fbr_status
                .as_ref()
                .map(enum_to_text)
                .transpose()?,
            income_entries: to_json(&tax_return.income_entries)?,
            total_income: tax_return.total_income.amount(),
            currency: tax_return.currency().code().to_string(),
            total_tax: tax_return.total_tax.map(|t| t.amount()),
            assessment: tax_return.assessment.as_ref().map(to_json).transpose()?,
            documents: to_json(&tax_return.documents)?,
            declaration_acknowledged: tax_return.declaration_acknowledged,
            submitted_date: tax_return.submitted_date,
            created_at: tax_return.created_at,
            last_updated: tax_return.last_updated,
        })
    }

    fn into_aggregate(self) -> Result<TaxReturn, StoreError> {
        let currency: Currency = enum_from_text(&self.currency)?;
        let employee_status: EmployeeStatus = enum_from_text(&self.employee_status)?;
        let fbr_status: Option<FbrStatus> = self
            .fbr_status
            .as_deref()
            .map(enum_from_text)
            .transpose()?;

        Ok(TaxReturn {
            id: ReturnId::from_uuid(self.id),
            client_id: self.client_id.into(),
            client_name: self.client_name,
            tax_year: self.tax_year as u16,
            employee_status,
            fbr_status,
            income_entries: from_json(self.income_entries)?,
            total_income: Money::new(self.total_income, currency),
            total_tax: self.total_tax.map(|t| Money::new(t, currency)),
            assessment: self.assessment.map(from_json).transpose()?,
            documents: from_json(self.documents)?,
            declaration_acknowledged: self.declaration_acknowledged,
            submitted_date: self.submitted_date,
            created_at: self.created_at,
            last_updated: self.last_updated,
        })
    }
}
