//! Information Request Domain
//!
//! An info request is a clarification thread an employee opens against a
//! specific return. Its message log is append-only and its status machine
//! is independent of the return's lifecycle:
//!
//! ```text
//! open -> in_progress -> resolved (terminal)
//! ```
//!
//! The first reply moves an open thread to in_progress; resolution is an
//! explicit employee action and threads never reopen automatically.

pub mod request;
pub mod ports;
pub mod service;
pub mod error;

pub use request::{InfoRequest, RequestStatus, ThreadMessage};
pub use ports::{RequestFilter, RequestRepository};
pub use service::{NewRequest, RequestService};
pub use error::RequestError;
