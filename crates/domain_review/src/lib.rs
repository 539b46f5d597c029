//! FBR review domain
//!
//! The revenue officer's side of the portal: a queue of returns the firm
//! has forwarded, a read model assembling everything an officer needs to
//! rule, and the terminal ruling itself. Rulings move only the officer
//! status axis; the firm's verification axis is owned by `domain_filing`.

pub mod context;
pub mod engine;
pub mod error;

pub use context::{IncomeBreakdownLine, ReviewContext};
pub use engine::{ReviewDecision, ReviewEngine};
pub use error::ReviewError;
