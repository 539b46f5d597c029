//! Review context read model
//!
//! Everything an officer sees when ruling on one return, assembled from
//! the return aggregate alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, Money, ReturnId};
use domain_filing::{
    DocumentRef, EmployeeStatus, FbrStatus, IncomeCategory, TaxAssessment, TaxReturn,
};

/// One income category with its declared amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeBreakdownLine {
    pub category: IncomeCategory,
    pub amount: Money,
}

/// Read model for one return under review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewContext {
    pub return_id: ReturnId,
    pub client_id: ClientId,
    pub client_name: String,
    pub tax_year: u16,
    pub employee_status: EmployeeStatus,
    pub fbr_status: Option<FbrStatus>,
    pub submitted_date: Option<DateTime<Utc>>,
    pub income_breakdown: Vec<IncomeBreakdownLine>,
    pub total_income: Money,
    pub assessment: Option<TaxAssessment>,
    pub documents: Vec<DocumentRef>,
    pub declaration_acknowledged: bool,
}

impl ReviewContext {
    pub fn assemble(tax_return: &TaxReturn) -> Self {
        let income_breakdown = tax_return
            .income_entries
            .iter()
            .map(|entry| IncomeBreakdownLine {
                category: entry.category,
                amount: entry.amount,
            })
            .collect();

        Self {
            return_id: tax_return.id,
            client_id: tax_return.client_id,
            client_name: tax_return.client_name.clone(),
            tax_year: tax_return.tax_year,
            employee_status: tax_return.employee_status,
            fbr_status: tax_return.fbr_status,
            submitted_date: tax_return.submitted_date,
            income_breakdown,
            total_income: tax_return.total_income,
            assessment: tax_return.assessment.clone(),
            documents: tax_return.documents.clone(),
            declaration_acknowledged: tax_return.declaration_acknowledged,
        }
    }
}
