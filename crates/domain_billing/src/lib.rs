//! Billing Domain
//!
//! Service-fee bills the firm raises against its clients. Bills are tied
//! to the client, not to a specific return.
//!
//! # Bill Lifecycle
//!
//! ```text
//! pending -> paid
//! pending -> cancelled
//! ```
//!
//! Overdue is a derived state: a pending bill past its due date surfaces
//! as overdue on read, the stored status stays pending until payment or
//! cancellation.

pub mod bill;
pub mod ports;
pub mod service;
pub mod error;

pub use bill::{Bill, BillStatus, LineItem};
pub use ports::{BillFilter, BillRepository};
pub use service::{BillingService, NewBill};
pub use error::BillingError;
