//! Filing repository port
//!
//! Adapters must apply each transition as a conditional update: the
//! transition succeeds only if the stored return still satisfies the
//! aggregate's precondition at write time. Concurrent conflicting
//! transitions against the same return must not both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClientId, PortError, ReturnId};
use crate::assessment::TaxAssessment;
use crate::filing::{DecisionRuling, DocumentRef, IncomeEntry, TaxReturn, VerificationOutcome};

/// Filter for listing returns
#[derive(Debug, Clone, Default)]
pub struct ReturnFilter {
    /// Restrict to one client's returns
    pub client_id: Option<ClientId>,
    /// Restrict to returns eligible for an FBR decision
    pub decision_eligible: bool,
}

impl ReturnFilter {
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::default()
        }
    }

    pub fn fbr_queue() -> Self {
        Self {
            decision_eligible: true,
            ..Self::default()
        }
    }
}

/// Storage port for tax returns
#[async_trait]
pub trait ReturnRepository: Send + Sync {
    /// Persists a freshly drafted return
    async fn insert(&self, tax_return: &TaxReturn) -> Result<(), PortError>;

    /// Fetches one return
    async fn fetch(&self, id: ReturnId) -> Result<TaxReturn, PortError>;

    /// Snapshot listing, newest first
    async fn list(&self, filter: &ReturnFilter) -> Result<Vec<TaxReturn>, PortError>;

    /// Appends a document to a draft
    async fn attach_document(
        &self,
        id: ReturnId,
        document: DocumentRef,
    ) -> Result<TaxReturn, PortError>;

    /// Replaces the income lines of a draft
    async fn update_income(
        &self,
        id: ReturnId,
        income_entries: Vec<IncomeEntry>,
    ) -> Result<TaxReturn, PortError>;

    /// Records the client's declaration on a draft
    async fn acknowledge_declaration(&self, id: ReturnId) -> Result<TaxReturn, PortError>;

    /// Files a draft, conditional on it still being a submittable draft
    async fn submit(&self, id: ReturnId, now: DateTime<Utc>) -> Result<TaxReturn, PortError>;

    /// submitted -> in_review on the employee axis
    async fn begin_review(&self, id: ReturnId) -> Result<TaxReturn, PortError>;

    /// Applies the employee verification outcome
    async fn verify(
        &self,
        id: ReturnId,
        outcome: VerificationOutcome,
    ) -> Result<TaxReturn, PortError>;

    /// Persists a computed assessment
    async fn save_assessment(
        &self,
        id: ReturnId,
        assessment: &TaxAssessment,
    ) -> Result<TaxReturn, PortError>;

    /// fbr submitted -> under_review
    async fn take_up(&self, id: ReturnId) -> Result<TaxReturn, PortError>;

    /// Applies the officer's ruling, conditional on the fbr axis being
    /// non-terminal
    async fn decide(&self, id: ReturnId, ruling: DecisionRuling) -> Result<TaxReturn, PortError>;
}
