//! Decision engine
//!
//! Rulings are gated twice: the engine checks queue eligibility on the
//! fetched snapshot, and the repository applies the ruling as a
//! conditional update so racing officers cannot both finalize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use core_kernel::{Actor, NoticeKind, NotificationSink, Role, ReturnId};
use domain_filing::{DecisionRuling, ReturnFilter, ReturnRepository, TaxReturn};

use crate::context::ReviewContext;
use crate::error::ReviewError;

/// Record of one officer ruling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub return_id: ReturnId,
    pub ruling: DecisionRuling,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: DateTime<Utc>,
}

/// Service driving the FBR officer workflow
pub struct ReviewEngine {
    returns: Arc<dyn ReturnRepository>,
    notices: Arc<dyn NotificationSink>,
}

impl ReviewEngine {
    pub fn new(returns: Arc<dyn ReturnRepository>, notices: Arc<dyn NotificationSink>) -> Self {
        Self { returns, notices }
    }

    /// Returns the firm has forwarded and the officer has not ruled on
    pub async fn queue(&self, actor: &Actor) -> Result<Vec<TaxReturn>, ReviewError> {
        require_officer(actor)?;
        Ok(self.returns.list(&ReturnFilter::fbr_queue()).await?)
    }

    /// Assembles the read model for one return
    pub async fn review_context(
        &self,
        actor: &Actor,
        id: ReturnId,
    ) -> Result<ReviewContext, ReviewError> {
        if actor.role == Role::Client {
            return Err(ReviewError::not_permitted(
                "clients may not access review contexts",
            ));
        }
        let tax_return = self.returns.fetch(id).await?;
        Ok(ReviewContext::assemble(&tax_return))
    }

    /// Marks a queued return as under review
    pub async fn take_up(&self, actor: &Actor, id: ReturnId) -> Result<TaxReturn, ReviewError> {
        require_officer(actor)?;
        let tax_return = self.returns.fetch(id).await?;
        if !tax_return.is_decision_eligible() {
            return Err(ReviewError::not_eligible(&tax_return));
        }
        Ok(self.returns.take_up(id).await?)
    }

    /// Applies the officer's terminal ruling and notifies the client
    pub async fn decide(
        &self,
        actor: &Actor,
        id: ReturnId,
        ruling: DecisionRuling,
        notes: Option<String>,
    ) -> Result<(TaxReturn, ReviewDecision), ReviewError> {
        require_officer(actor)?;
        let snapshot = self.returns.fetch(id).await?;
        if !snapshot.is_decision_eligible() {
            return Err(ReviewError::not_eligible(&snapshot));
        }

        let tax_return = self.returns.decide(id, ruling).await?;
        let decision = ReviewDecision {
            return_id: id,
            ruling,
            notes,
            decided_by: actor.name.clone(),
            decided_at: Utc::now(),
        };

        let (title, kind) = match ruling {
            DecisionRuling::Approved => ("Return Approved", NoticeKind::Success),
            DecisionRuling::Rejected => ("Return Rejected", NoticeKind::Error),
            DecisionRuling::Objection => ("Objection Raised", NoticeKind::Warning),
        };
        let message = format!(
            "The FBR has ruled on your {} tax return: {}.",
            tax_return.tax_year, ruling
        );
        if let Err(err) = self
            .notices
            .push(tax_return.client_id.into(), title, &message, kind)
            .await
        {
            warn!(return_id = %id, error = %err, "failed to emit decision notice");
        }

        Ok((tax_return, decision))
    }
}

fn require_officer(actor: &Actor) -> Result<(), ReviewError> {
    if actor.role != Role::FbrOfficer {
        return Err(ReviewError::not_permitted(
            "only FBR officers may perform this action",
        ));
    }
    Ok(())
}
