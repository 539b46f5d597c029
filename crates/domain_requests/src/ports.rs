//! Info request repository port

use async_trait::async_trait;

use core_kernel::{ClientId, PortError, RequestId, ReturnId};
use crate::request::{InfoRequest, ThreadMessage};

/// Filter for listing threads
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub return_id: Option<ReturnId>,
    pub client_id: Option<ClientId>,
}

/// Storage port for info request threads
///
/// Reply and resolve are conditional updates against the thread's current
/// status; two racing replies may both land, but a reply can never land on
/// a thread that resolved first.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert(&self, request: &InfoRequest) -> Result<(), PortError>;

    async fn fetch(&self, id: RequestId) -> Result<InfoRequest, PortError>;

    async fn list(&self, filter: &RequestFilter) -> Result<Vec<InfoRequest>, PortError>;

    /// Appends a reply, conditional on the thread still being open
    async fn append_reply(
        &self,
        id: RequestId,
        message: ThreadMessage,
    ) -> Result<InfoRequest, PortError>;

    /// Resolves the thread, conditional on it not already being resolved
    async fn resolve(&self, id: RequestId) -> Result<InfoRequest, PortError>;

    /// Archives a resolved thread
    async fn close(&self, id: RequestId) -> Result<InfoRequest, PortError>;
}
