//! Tax return aggregate

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use core_kernel::{ClientId, Currency, DocumentId, Money, ReturnId};
use crate::assessment::TaxAssessment;
use crate::error::FilingError;

/// Earliest tax year the portal accepts
const FIRST_SUPPORTED_TAX_YEAR: u16 = 2020;

/// Tax years a new draft may target
pub fn supported_tax_years() -> RangeInclusive<u16> {
    FIRST_SUPPORTED_TAX_YEAR..=(Utc::now().year() as u16)
}

/// Preparer-side status axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Freely editable by the client
    Draft,
    /// Filed by the client, awaiting the firm
    Submitted,
    /// An employee has taken up verification
    InReview,
    /// Verified and forwarded to the FBR queue
    Approved,
    /// Verification failed
    Rejected,
}

impl EmployeeStatus {
    /// Terminal on the employee axis
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmployeeStatus::Approved | EmployeeStatus::Rejected)
    }

    /// True once the return left draft
    pub fn is_filed(&self) -> bool {
        !matches!(self, EmployeeStatus::Draft)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmployeeStatus::Draft => "draft",
            EmployeeStatus::Submitted => "submitted",
            EmployeeStatus::InReview => "in_review",
            EmployeeStatus::Approved => "approved",
            EmployeeStatus::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Revenue-officer status axis
///
/// Starts at `Submitted` when the client files; absent while drafting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FbrStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Objection,
}

impl FbrStatus {
    /// All three decision outcomes are terminal; an objection does not
    /// loop back to review.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FbrStatus::Approved | FbrStatus::Rejected | FbrStatus::Objection
        )
    }
}

impl fmt::Display for FbrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FbrStatus::Submitted => "submitted",
            FbrStatus::UnderReview => "under_review",
            FbrStatus::Approved => "approved",
            FbrStatus::Rejected => "rejected",
            FbrStatus::Objection => "objection",
        };
        write!(f, "{s}")
    }
}

/// Outcome of employee verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Approved,
    Rejected,
}

/// The officer's terminal ruling on a filed return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRuling {
    Approved,
    Rejected,
    Objection,
}

impl DecisionRuling {
    /// The fbr status the ruling resolves to
    pub fn as_status(&self) -> FbrStatus {
        match self {
            DecisionRuling::Approved => FbrStatus::Approved,
            DecisionRuling::Rejected => FbrStatus::Rejected,
            DecisionRuling::Objection => FbrStatus::Objection,
        }
    }
}

impl fmt::Display for DecisionRuling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_status())
    }
}

/// Income source categories on a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Salary,
    Business,
    Rental,
    CapitalGains,
    Agricultural,
    Foreign,
    Other,
}

/// A declared income line on a return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub category: IncomeCategory,
    pub amount: Money,
}

impl IncomeEntry {
    pub fn new(category: IncomeCategory, amount: Money) -> Self {
        Self { category, amount }
    }
}

/// Opaque reference to an uploaded supporting document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentRef {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new_v7(),
            file_name: file_name.into(),
            uploaded_at: Utc::now(),
        }
    }
}

/// A tax return for one client and tax year
///
/// Returns are never deleted; a later tax-year return supersedes an
/// objected or rejected one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxReturn {
    /// Unique identifier
    pub id: ReturnId,
    /// Owning client
    pub client_id: ClientId,
    /// Client display name
    pub client_name: String,
    /// Tax year the return covers
    pub tax_year: u16,
    /// Preparer-side status
    pub employee_status: EmployeeStatus,
    /// Officer-side status, absent until submission
    pub fbr_status: Option<FbrStatus>,
    /// Declared income lines
    pub income_entries: Vec<IncomeEntry>,
    /// Sum of declared income
    pub total_income: Money,
    /// Net tax, absent until an assessment is recorded
    pub total_tax: Option<Money>,
    /// Assessment breakdown once computed
    pub assessment: Option<TaxAssessment>,
    /// Uploaded supporting documents, in upload order
    pub documents: Vec<DocumentRef>,
    /// Whether the client acknowledged the filing declaration
    pub declaration_acknowledged: bool,
    /// When the client filed
    pub submitted_date: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub last_updated: DateTime<Utc>,
}

impl TaxReturn {
    /// Creates a new draft return
    ///
    /// # Errors
    ///
    /// Returns a validation error if the tax year is outside the supported
    /// range or the declared income sums to a negative amount.
    pub fn draft(
        client_id: ClientId,
        client_name: impl Into<String>,
        tax_year: u16,
        income_entries: Vec<IncomeEntry>,
    ) -> Result<Self, FilingError> {
        if !supported_tax_years().contains(&tax_year) {
            return Err(FilingError::validation(format!(
                "tax year {} is outside the supported range {}..={}",
                tax_year,
                supported_tax_years().start(),
                supported_tax_years().end(),
            )));
        }

        let total_income = sum_entries(&income_entries)?;
        if total_income.is_negative() {
            return Err(FilingError::validation(
                "declared income must not sum to a negative amount",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: ReturnId::new_v7(),
            client_id,
            client_name: client_name.into(),
            tax_year,
            employee_status: EmployeeStatus::Draft,
            fbr_status: None,
            income_entries,
            total_income,
            total_tax: None,
            assessment: None,
            documents: Vec::new(),
            declaration_acknowledged: false,
            submitted_date: None,
            created_at: now,
            last_updated: now,
        })
    }

    /// Attaches an uploaded document reference
    ///
    /// Only drafts are editable by the client.
    pub fn attach_document(&mut self, document: DocumentRef) -> Result<(), FilingError> {
        if self.employee_status != EmployeeStatus::Draft {
            return Err(FilingError::transition(
                self.employee_status.to_string(),
                "attach_document",
            ));
        }
        self.documents.push(document);
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Replaces the declared income lines while drafting
    pub fn update_income(&mut self, income_entries: Vec<IncomeEntry>) -> Result<(), FilingError> {
        if self.employee_status != EmployeeStatus::Draft {
            return Err(FilingError::transition(
                self.employee_status.to_string(),
                "update_income",
            ));
        }
        let total = sum_entries(&income_entries)?;
        if total.is_negative() {
            return Err(FilingError::validation(
                "declared income must not sum to a negative amount",
            ));
        }
        self.income_entries = income_entries;
        self.total_income = total;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Records the client's filing declaration
    pub fn acknowledge_declaration(&mut self) -> Result<(), FilingError> {
        if self.employee_status != EmployeeStatus::Draft {
            return Err(FilingError::transition(
                self.employee_status.to_string(),
                "acknowledge_declaration",
            ));
        }
        self.declaration_acknowledged = true;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Files the return: draft -> submitted on the employee axis and the
    /// start of the fbr axis
    ///
    /// Requires at least one attached document and an acknowledged
    /// declaration.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(), FilingError> {
        if self.employee_status != EmployeeStatus::Draft {
            return Err(FilingError::transition(
                self.employee_status.to_string(),
                "submit",
            ));
        }
        if self.documents.is_empty() {
            return Err(FilingError::validation(
                "at least one supporting document must be attached before submission",
            ));
        }
        if !self.declaration_acknowledged {
            return Err(FilingError::validation(
                "the filing declaration must be acknowledged before submission",
            ));
        }
        self.employee_status = EmployeeStatus::Submitted;
        self.fbr_status = Some(FbrStatus::Submitted);
        self.submitted_date = Some(now);
        self.last_updated = now;
        Ok(())
    }

    /// An employee takes up verification: submitted -> in_review
    pub fn begin_review(&mut self) -> Result<(), FilingError> {
        if self.employee_status != EmployeeStatus::Submitted {
            return Err(FilingError::transition(
                self.employee_status.to_string(),
                "begin_review",
            ));
        }
        self.employee_status = EmployeeStatus::InReview;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Records the employee's verification outcome
    ///
    /// Allowed from submitted or in_review; calling again on a terminal
    /// state fails.
    pub fn verify(&mut self, outcome: VerificationOutcome) -> Result<(), FilingError> {
        match self.employee_status {
            EmployeeStatus::Submitted | EmployeeStatus::InReview => {
                self.employee_status = match outcome {
                    VerificationOutcome::Approved => EmployeeStatus::Approved,
                    VerificationOutcome::Rejected => EmployeeStatus::Rejected,
                };
                self.last_updated = Utc::now();
                Ok(())
            }
            other => Err(FilingError::transition(other.to_string(), "verify")),
        }
    }

    /// Persists a computed assessment on the return
    ///
    /// Allowed while the return is with the firm and the officer has not
    /// finalized it.
    pub fn record_assessment(&mut self, assessment: TaxAssessment) -> Result<(), FilingError> {
        if self.employee_status == EmployeeStatus::Draft {
            return Err(FilingError::transition("draft", "record_assessment"));
        }
        if self.employee_status == EmployeeStatus::Rejected {
            return Err(FilingError::transition("rejected", "record_assessment"));
        }
        if let Some(status) = self.fbr_status {
            if status.is_terminal() {
                return Err(FilingError::AlreadyFinalized(status.to_string()));
            }
        }
        self.total_income = assessment.total_income;
        self.total_tax = Some(assessment.net_tax);
        self.assessment = Some(assessment);
        self.last_updated = Utc::now();
        Ok(())
    }

    /// The officer takes up the return: fbr submitted -> under_review
    pub fn take_up_review(&mut self) -> Result<(), FilingError> {
        match self.fbr_status {
            None => Err(FilingError::NotSubmitted),
            Some(FbrStatus::Submitted) => {
                self.fbr_status = Some(FbrStatus::UnderReview);
                self.last_updated = Utc::now();
                Ok(())
            }
            Some(other) => Err(FilingError::transition(other.to_string(), "take_up_review")),
        }
    }

    /// Applies the officer's ruling
    ///
    /// Valid only while the fbr axis is submitted or under_review; the
    /// ruling is terminal once made.
    pub fn apply_decision(&mut self, ruling: DecisionRuling) -> Result<(), FilingError> {
        match self.fbr_status {
            None => Err(FilingError::NotSubmitted),
            Some(status) if status.is_terminal() => {
                Err(FilingError::AlreadyFinalized(status.to_string()))
            }
            Some(_) => {
                self.fbr_status = Some(ruling.as_status());
                self.last_updated = Utc::now();
                Ok(())
            }
        }
    }

    /// True when the return is visible in the FBR decision queue: the firm
    /// has reached in_review or approved and the officer has not ruled.
    pub fn is_decision_eligible(&self) -> bool {
        let forwarded = matches!(
            self.employee_status,
            EmployeeStatus::InReview | EmployeeStatus::Approved
        );
        let open = matches!(self.fbr_status, Some(status) if !status.is_terminal());
        forwarded && open
    }

    /// Currency of the return's monetary fields
    pub fn currency(&self) -> Currency {
        self.total_income.currency()
    }
}

fn sum_entries(entries: &[IncomeEntry]) -> Result<Money, FilingError> {
    let mut total = Money::zero(Currency::PKR);
    for entry in entries {
        total = total.checked_add(&entry.amount)?;
    }
    Ok(total)
}
