//! Tax return DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Currency, Money};
use domain_filing::{
    DocumentRef, IncomeCategory, IncomeEntry, TaxAssessment, TaxReturn, VerificationOutcome,
};

/// One declared income line
///
/// Currency defaults to PKR when omitted.
#[derive(Debug, Deserialize)]
pub struct IncomeEntryDto {
    pub category: IncomeCategory,
    pub amount: Decimal,
    pub currency: Option<Currency>,
}

impl IncomeEntryDto {
    pub fn into_entry(self) -> IncomeEntry {
        IncomeEntry::new(
            self.category,
            Money::new(self.amount, self.currency.unwrap_or(Currency::PKR)),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    pub tax_year: u16,
    #[serde(default)]
    pub income_entries: Vec<IncomeEntryDto>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttachDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIncomeRequest {
    pub income_entries: Vec<IncomeEntryDto>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub outcome: VerificationOutcome,
}

#[derive(Debug, Deserialize)]
pub struct RecordAssessmentRequest {
    pub total_income: Decimal,
    pub exemptions: Decimal,
    pub tax_rate_percent: Decimal,
    pub tax_credits: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ListReturnsQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IncomeEntryResponse {
    pub category: IncomeCategory,
    pub amount: Decimal,
    pub currency: String,
}

impl From<&IncomeEntry> for IncomeEntryResponse {
    fn from(entry: &IncomeEntry) -> Self {
        Self {
            category: entry.category,
            amount: entry.amount.amount(),
            currency: entry.amount.currency().code().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&DocumentRef> for DocumentResponse {
    fn from(doc: &DocumentRef) -> Self {
        Self {
            id: doc.id.to_string(),
            file_name: doc.file_name.clone(),
            uploaded_at: doc.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub total_income: Decimal,
    pub exemptions: Decimal,
    pub taxable_income: Decimal,
    pub tax_rate_percent: Decimal,
    pub gross_tax: Decimal,
    pub tax_credits: Decimal,
    pub net_tax: Decimal,
}

impl From<&TaxAssessment> for AssessmentResponse {
    fn from(assessment: &TaxAssessment) -> Self {
        Self {
            total_income: assessment.total_income.amount(),
            exemptions: assessment.exemptions.amount(),
            taxable_income: assessment.taxable_income.amount(),
            tax_rate_percent: assessment.tax_rate.as_percentage(),
            gross_tax: assessment.gross_tax.amount(),
            tax_credits: assessment.tax_credits.amount(),
            net_tax: assessment.net_tax.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub tax_year: u16,
    pub employee_status: String,
    pub fbr_status: Option<String>,
    pub income_entries: Vec<IncomeEntryResponse>,
    pub total_income: Decimal,
    pub currency: String,
    pub total_tax: Option<Decimal>,
    pub assessment: Option<AssessmentResponse>,
    pub documents: Vec<DocumentResponse>,
    pub declaration_acknowledged: bool,
    pub submitted_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<TaxReturn> for ReturnResponse {
    fn from(tax_return: TaxReturn) -> Self {
        Self {
            id: tax_return.id.to_string(),
            client_id: tax_return.client_id.to_string(),
            client_name: tax_return.client_name.clone(),
            tax_year: tax_return.tax_year,
            employee_status: tax_return.employee_status.to_string(),
            fbr_status: tax_return.fbr_status.map(|s| s.to_string()),
            income_entries: tax_return.income_entries.iter().map(Into::into).collect(),
            total_income: tax_return.total_income.amount(),
            currency: tax_return.currency().code().to_string(),
            total_tax: tax_return.total_tax.map(|t| t.amount()),
            assessment: tax_return.assessment.as_ref().map(Into::into),
            documents: tax_return.documents.iter().map(Into::into).collect(),
            declaration_acknowledged: tax_return.declaration_acknowledged,
            submitted_date: tax_return.submitted_date,
            created_at: tax_return.created_at,
            last_updated: tax_return.last_updated,
        }
    }
}
