//! Data transfer objects

pub mod bills;
pub mod notify;
pub mod requests;
pub mod returns;
pub mod review;
