//! Core Kernel - Foundational types and utilities for the tax filing portal
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers for portal entities
//! - Caller identity (who is acting, in which role)
//! - Port abstractions shared by the storage and notification adapters

pub mod money;
pub mod identifiers;
pub mod actor;
pub mod ports;

pub use money::{Money, Currency, Rate, MoneyError};
pub use identifiers::{
    ReturnId, ClientId, UserId, DocumentId,
    RequestId, MessageId, BillId, NotificationId,
    ParseIdError,
};
pub use actor::{Actor, Role};
pub use ports::{PortError, NoticeKind, NotificationSink};
