//! Test Data Builders
//!
//! Provides builder patterns for constructing test aggregates with
//! sensible defaults. These builders allow tests to specify only the
//! relevant fields while using defaults for everything else, and to
//! drive a return to a chosen lifecycle stage in one call.

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use core_kernel::{ClientId, Money, UserId};
use domain_billing::{Bill, LineItem};
use domain_filing::{
    DocumentRef, IncomeCategory, IncomeEntry, TaxReturn, VerificationOutcome,
};
use domain_requests::{InfoRequest, ThreadMessage};

use crate::fixtures::{MoneyFixtures, StringFixtures, TemporalFixtures};

/// Builder for constructing test tax returns
pub struct TestReturnBuilder {
    client_id: ClientId,
    client_name: String,
    tax_year: u16,
    income_entries: Vec<IncomeEntry>,
    document_names: Vec<String>,
}

impl Default for TestReturnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestReturnBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            client_id: ClientId::new(),
            client_name: StringFixtures::client_name().to_string(),
            tax_year: TemporalFixtures::tax_year(),
            income_entries: vec![IncomeEntry::new(
                IncomeCategory::Salary,
                MoneyFixtures::salary_income(),
            )],
            document_names: vec![StringFixtures::document_name().to_string()],
        }
    }

    /// Sets the owning client
    pub fn with_client_id(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    /// Sets the client display name
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Sets the tax year
    pub fn with_tax_year(mut self, year: u16) -> Self {
        self.tax_year = year;
        self
    }

    /// Replaces the declared income lines
    pub fn with_income_entries(mut self, entries: Vec<IncomeEntry>) -> Self {
        self.income_entries = entries;
        self
    }

    /// Adds one declared income line
    pub fn with_income(mut self, category: IncomeCategory, amount: Money) -> Self {
        self.income_entries.push(IncomeEntry::new(category, amount));
        self
    }

    /// Replaces the attached document names
    pub fn with_documents(mut self, names: Vec<String>) -> Self {
        self.document_names = names;
        self
    }

    /// Removes all documents, for submission validation tests
    pub fn without_documents(mut self) -> Self {
        self.document_names.clear();
        self
    }

    /// Builds a draft return with the documents attached
    pub fn build_draft(self) -> TaxReturn {
        let mut tax_return = TaxReturn::draft(
            self.client_id,
            self.client_name,
            self.tax_year,
            self.income_entries,
        )
        .expect("draft inputs are valid");
        for name in self.document_names {
            tax_return
                .attach_document(DocumentRef::new(name))
                .expect("drafts accept documents");
        }
        tax_return
    }

    /// Builds a return the client has filed
    pub fn build_submitted(self) -> TaxReturn {
        let mut tax_return = self.build_draft();
        tax_return
            .acknowledge_declaration()
            .expect("drafts accept the declaration");
        tax_return.submit(Utc::now()).expect("draft is complete");
        tax_return
    }

    /// Builds a return the firm has taken up for verification
    pub fn build_in_review(self) -> TaxReturn {
        let mut tax_return = self.build_submitted();
        tax_return.begin_review().expect("submitted returns enter review");
        tax_return
    }

    /// Builds a verified return sitting in the FBR decision queue
    pub fn build_forwarded(self) -> TaxReturn {
        let mut tax_return = self.build_in_review();
        tax_return
            .verify(VerificationOutcome::Approved)
            .expect("in-review returns accept verification");
        tax_return
    }
}

/// Builder for constructing test bills
pub struct TestBillBuilder {
    client_id: ClientId,
    description: String,
    amount: Money,
    due_date: NaiveDate,
    items: Vec<LineItem>,
    generated_by: UserId,
}

impl Default for TestBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            client_id: ClientId::new(),
            description: StringFixtures::bill_description().to_string(),
            amount: MoneyFixtures::filing_fee(),
            due_date: TemporalFixtures::due_in_30_days(),
            items: Vec::new(),
            generated_by: UserId::new(),
        }
    }

    /// Sets the billed client
    pub fn with_client_id(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the bill amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Replaces the line items
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Sets the generating employee
    pub fn with_generated_by(mut self, user_id: UserId) -> Self {
        self.generated_by = user_id;
        self
    }

    /// The standard itemised filing-fee bill
    pub fn itemised() -> Self {
        Self::new().with_items(vec![
            LineItem::new("Tax Return Preparation", Money::rupees(dec!(25_000))),
            LineItem::new("Consultation", Money::rupees(dec!(5_000))),
            LineItem::new("Document Processing", Money::rupees(dec!(5_000))),
        ])
    }

    /// Builds the pending bill
    pub fn build(self) -> Bill {
        Bill::generate(
            self.client_id,
            self.description,
            self.amount,
            self.due_date,
            self.items,
            self.generated_by,
            Utc::now().date_naive(),
        )
        .expect("bill inputs are valid")
    }
}

/// Builder for constructing test info requests
pub struct TestRequestBuilder {
    return_id: core_kernel::ReturnId,
    client_id: ClientId,
    client_name: String,
    subject: String,
    opened_by: UserId,
    message: String,
}

impl Default for TestRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRequestBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            return_id: core_kernel::ReturnId::new(),
            client_id: ClientId::new(),
            client_name: StringFixtures::client_name().to_string(),
            subject: StringFixtures::request_subject().to_string(),
            opened_by: UserId::new(),
            message: "Please provide the tenancy agreement.".to_string(),
        }
    }

    /// Sets the return the request clarifies
    pub fn with_return_id(mut self, id: core_kernel::ReturnId) -> Self {
        self.return_id = id;
        self
    }

    /// Sets the addressed client
    pub fn with_client_id(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    /// Sets the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the opening employee
    pub fn with_opened_by(mut self, user_id: UserId) -> Self {
        self.opened_by = user_id;
        self
    }

    /// Sets the initial message body
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Builds the open thread
    pub fn build(self) -> InfoRequest {
        InfoRequest::open(
            self.return_id,
            self.client_id,
            self.client_name,
            self.subject,
            self.opened_by,
            ThreadMessage::new(
                StringFixtures::employee_name(),
                core_kernel::Role::Employee,
                self.message,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_filing::{EmployeeStatus, FbrStatus};

    #[test]
    fn test_return_builder_stages() {
        let draft = TestReturnBuilder::new().build_draft();
        assert_eq!(draft.employee_status, EmployeeStatus::Draft);
        assert!(!draft.documents.is_empty());

        let submitted = TestReturnBuilder::new().build_submitted();
        assert_eq!(submitted.employee_status, EmployeeStatus::Submitted);
        assert_eq!(submitted.fbr_status, Some(FbrStatus::Submitted));

        let forwarded = TestReturnBuilder::new().build_forwarded();
        assert!(forwarded.is_decision_eligible());
    }

    #[test]
    fn test_itemised_bill_sums_to_the_fee() {
        let bill = TestBillBuilder::itemised().build();
        assert_eq!(bill.amount, MoneyFixtures::filing_fee());
        assert_eq!(bill.items.len(), 3);
    }

    #[test]
    fn test_request_builder_opens_with_one_message() {
        let request = TestRequestBuilder::new().build();
        assert_eq!(request.messages.len(), 1);
    }
}
