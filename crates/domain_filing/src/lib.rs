//! Tax Return Filing Domain
//!
//! This crate implements the tax return lifecycle from client drafting
//! through employee verification, tax assessment, and the FBR officer's
//! final decision.
//!
//! # Return Lifecycle
//!
//! The return carries two independent status axes validated together only
//! at the decision point:
//!
//! ```text
//! employee axis:  draft -> submitted -> in_review -> approved/rejected
//! fbr axis:       submitted -> under_review -> approved/rejected/objection
//! ```
//!
//! The fbr axis starts at submission and its three outcomes are terminal:
//! an objection does not loop back, a fresh return for a later tax year
//! supersedes the objected one.

pub mod filing;
pub mod assessment;
pub mod ports;
pub mod service;
pub mod error;

pub use filing::{
    TaxReturn, EmployeeStatus, FbrStatus, VerificationOutcome, DecisionRuling,
    IncomeCategory, IncomeEntry, DocumentRef, supported_tax_years,
};
pub use assessment::TaxAssessment;
pub use ports::{ReturnRepository, ReturnFilter};
pub use service::{FilingService, NewDraft};
pub use error::FilingError;
