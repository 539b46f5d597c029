//! Filing application service
//!
//! Orchestrates the return lifecycle: role checks, ownership checks, the
//! repository transition, and notification fan-out. The caller identity is
//! always explicit; there is no ambient session.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

use core_kernel::{Actor, ClientId, Money, NoticeKind, NotificationSink, Rate, ReturnId, Role};
use crate::assessment::TaxAssessment;
use crate::error::FilingError;
use crate::filing::{DocumentRef, IncomeEntry, TaxReturn, VerificationOutcome};
use crate::ports::{ReturnFilter, ReturnRepository};

/// Input for drafting a new return
#[derive(Debug, Clone)]
pub struct NewDraft {
    pub tax_year: u16,
    pub income_entries: Vec<IncomeEntry>,
}

/// Service for the client- and employee-facing return operations
///
/// Officer decisions go through the review engine, which enforces queue
/// eligibility before touching the fbr axis.
pub struct FilingService {
    returns: Arc<dyn ReturnRepository>,
    notices: Arc<dyn NotificationSink>,
}

impl FilingService {
    pub fn new(returns: Arc<dyn ReturnRepository>, notices: Arc<dyn NotificationSink>) -> Self {
        Self { returns, notices }
    }

    /// Creates a draft return owned by the calling client
    pub async fn create_draft(
        &self,
        actor: &Actor,
        draft: NewDraft,
    ) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Client, "create a draft return")?;

        let tax_return = TaxReturn::draft(
            actor.user_id.into(),
            actor.name.clone(),
            draft.tax_year,
            draft.income_entries,
        )?;
        self.returns.insert(&tax_return).await?;
        Ok(tax_return)
    }

    /// Attaches an uploaded document to the caller's draft
    pub async fn attach_document(
        &self,
        actor: &Actor,
        id: ReturnId,
        file_name: String,
    ) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Client, "attach a document")?;
        self.ensure_owner(actor, id).await?;
        Ok(self
            .returns
            .attach_document(id, DocumentRef::new(file_name))
            .await?)
    }

    /// Replaces the income lines of the caller's draft
    pub async fn update_income(
        &self,
        actor: &Actor,
        id: ReturnId,
        income_entries: Vec<IncomeEntry>,
    ) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Client, "edit a draft return")?;
        self.ensure_owner(actor, id).await?;
        Ok(self.returns.update_income(id, income_entries).await?)
    }

    /// Records the caller's filing declaration
    pub async fn acknowledge_declaration(
        &self,
        actor: &Actor,
        id: ReturnId,
    ) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Client, "acknowledge the declaration")?;
        self.ensure_owner(actor, id).await?;
        Ok(self.returns.acknowledge_declaration(id).await?)
    }

    /// Files the caller's draft return
    pub async fn submit(&self, actor: &Actor, id: ReturnId) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Client, "submit a return")?;
        self.ensure_owner(actor, id).await?;

        let tax_return = self.returns.submit(id, Utc::now()).await?;

        // Fire-and-forget: a failed notice never rolls back the filing.
        if let Err(err) = self
            .notices
            .push(
                tax_return.client_id.into(),
                "Return Submitted",
                &format!(
                    "Your tax return for {} has been successfully submitted.",
                    tax_return.tax_year
                ),
                NoticeKind::Success,
            )
            .await
        {
            warn!(return_id = %id, error = %err, "failed to emit submission notice");
        }

        Ok(tax_return)
    }

    /// Employee takes up verification of a submitted return
    pub async fn begin_review(&self, actor: &Actor, id: ReturnId) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Employee, "begin verification")?;
        Ok(self.returns.begin_review(id).await?)
    }

    /// Records the employee's verification outcome
    pub async fn verify(
        &self,
        actor: &Actor,
        id: ReturnId,
        outcome: VerificationOutcome,
    ) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Employee, "verify a return")?;
        Ok(self.returns.verify(id, outcome).await?)
    }

    /// Computes and persists an assessment from the employee's figures
    pub async fn record_assessment(
        &self,
        actor: &Actor,
        id: ReturnId,
        total_income: Money,
        exemptions: Money,
        tax_rate_percent: Decimal,
        tax_credits: Money,
    ) -> Result<TaxReturn, FilingError> {
        require_role(actor, Role::Employee, "record a tax calculation")?;

        let assessment = TaxAssessment::compute(
            total_income,
            exemptions,
            Rate::from_percentage(tax_rate_percent),
            tax_credits,
        )?;
        Ok(self.returns.save_assessment(id, &assessment).await?)
    }

    /// Fetches one return, restricted to the caller's visibility
    pub async fn get_return(&self, actor: &Actor, id: ReturnId) -> Result<TaxReturn, FilingError> {
        let tax_return = self.returns.fetch(id).await?;
        if actor.role == Role::Client && tax_return.client_id != ClientId::from(actor.user_id) {
            // Do not reveal other clients' returns, not even their existence.
            return Err(FilingError::ReturnNotFound(id.to_string()));
        }
        Ok(tax_return)
    }

    /// Lists returns visible to the caller
    ///
    /// Clients are always scoped to their own returns regardless of the
    /// requested filter.
    pub async fn list_returns(
        &self,
        actor: &Actor,
        client_id: Option<ClientId>,
    ) -> Result<Vec<TaxReturn>, FilingError> {
        let filter = match actor.role {
            Role::Client => ReturnFilter::for_client(actor.user_id.into()),
            _ => ReturnFilter {
                client_id,
                ..ReturnFilter::default()
            },
        };
        Ok(self.returns.list(&filter).await?)
    }

    async fn ensure_owner(&self, actor: &Actor, id: ReturnId) -> Result<(), FilingError> {
        let tax_return = self.returns.fetch(id).await?;
        if tax_return.client_id != ClientId::from(actor.user_id) {
            return Err(FilingError::not_permitted(
                "only the owning client may modify this return",
            ));
        }
        Ok(())
    }
}

fn require_role(actor: &Actor, role: Role, action: &str) -> Result<(), FilingError> {
    if actor.role != role {
        return Err(FilingError::not_permitted(format!(
            "role {} may not {action}",
            actor.role
        )));
    }
    Ok(())
}
