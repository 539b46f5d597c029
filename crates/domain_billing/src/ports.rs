//! Bill repository port

use async_trait::async_trait;

use core_kernel::{BillId, ClientId, PortError};
use crate::bill::Bill;

/// Filter for listing bills
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    pub client_id: Option<ClientId>,
}

/// Storage port for bills
///
/// `pay` and `cancel` are conditional updates: exactly one of two racing
/// settlements can succeed.
#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn insert(&self, bill: &Bill) -> Result<(), PortError>;

    async fn fetch(&self, id: BillId) -> Result<Bill, PortError>;

    async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, PortError>;

    /// Marks a bill paid, conditional on it still being pending
    async fn pay(&self, id: BillId) -> Result<Bill, PortError>;

    /// Cancels a bill, conditional on it still being pending
    async fn cancel(&self, id: BillId) -> Result<Bill, PortError>;
}
