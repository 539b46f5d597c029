//! FBR review DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_filing::{DecisionRuling, IncomeCategory};
use domain_review::{ReviewContext, ReviewDecision};

use crate::dto::returns::{AssessmentResponse, DocumentResponse};

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub ruling: DecisionRuling,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub return_id: String,
    pub ruling: String,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: DateTime<Utc>,
    pub fbr_status: Option<String>,
}

impl DecisionResponse {
    pub fn from_outcome(
        decision: ReviewDecision,
        fbr_status: Option<domain_filing::FbrStatus>,
    ) -> Self {
        Self {
            return_id: decision.return_id.to_string(),
            ruling: decision.ruling.to_string(),
            notes: decision.notes,
            decided_by: decision.decided_by,
            decided_at: decision.decided_at,
            fbr_status: fbr_status.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IncomeBreakdownResponse {
    pub category: IncomeCategory,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ReviewContextResponse {
    pub return_id: String,
    pub client_id: String,
    pub client_name: String,
    pub tax_year: u16,
    pub employee_status: String,
    pub fbr_status: Option<String>,
    pub submitted_date: Option<DateTime<Utc>>,
    pub income_breakdown: Vec<IncomeBreakdownResponse>,
    pub total_income: Decimal,
    pub currency: String,
    pub assessment: Option<AssessmentResponse>,
    pub documents: Vec<DocumentResponse>,
    pub declaration_acknowledged: bool,
}

impl From<ReviewContext> for ReviewContextResponse {
    fn from(context: ReviewContext) -> Self {
        Self {
            return_id: context.return_id.to_string(),
            client_id: context.client_id.to_string(),
            client_name: context.client_name.clone(),
            tax_year: context.tax_year,
            employee_status: context.employee_status.to_string(),
            fbr_status: context.fbr_status.map(|s| s.to_string()),
            submitted_date: context.submitted_date,
            income_breakdown: context
                .income_breakdown
                .iter()
                .map(|line| IncomeBreakdownResponse {
                    category: line.category,
                    amount: line.amount.amount(),
                })
                .collect(),
            total_income: context.total_income.amount(),
            currency: context.total_income.currency().code().to_string(),
            assessment: context.assessment.as_ref().map(Into::into),
            documents: context.documents.iter().map(Into::into).collect(),
            declaration_acknowledged: context.declaration_acknowledged,
        }
    }
}
