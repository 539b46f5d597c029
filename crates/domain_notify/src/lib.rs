//! Notification domain
//!
//! Every workflow transition that concerns a user lands here as an
//! immutable feed entry. Delivery is fire-and-forget from the emitting
//! service's point of view; this crate owns persistence and read
//! tracking of the feed itself.

pub mod error;
pub mod notification;
pub mod ports;
pub mod service;

pub use error::NotifyError;
pub use notification::Notification;
pub use ports::{NotificationFilter, NotificationRepository};
pub use service::NotifyService;
