//! Info request application service

use std::sync::Arc;
use tracing::warn;

use core_kernel::{Actor, ClientId, NoticeKind, NotificationSink, RequestId, ReturnId, Role, UserId};
use crate::error::RequestError;
use crate::ports::{RequestFilter, RequestRepository};
use crate::request::{InfoRequest, ThreadMessage};

/// Input for opening a new thread
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub return_id: ReturnId,
    pub client_id: ClientId,
    pub client_name: String,
    pub subject: String,
    pub message: String,
}

/// Service for info request threads
pub struct RequestService {
    requests: Arc<dyn RequestRepository>,
    notices: Arc<dyn NotificationSink>,
}

impl RequestService {
    pub fn new(requests: Arc<dyn RequestRepository>, notices: Arc<dyn NotificationSink>) -> Self {
        Self { requests, notices }
    }

    /// Opens a thread against a return; employee only
    pub async fn open_request(
        &self,
        actor: &Actor,
        new_request: NewRequest,
    ) -> Result<InfoRequest, RequestError> {
        if actor.role != Role::Employee {
            return Err(RequestError::not_permitted(
                "only employees may open info requests",
            ));
        }
        if new_request.subject.trim().is_empty() {
            return Err(RequestError::validation("subject must not be empty"));
        }
        if new_request.message.trim().is_empty() {
            return Err(RequestError::validation("initial message must not be empty"));
        }

        let request = InfoRequest::open(
            new_request.return_id,
            new_request.client_id,
            new_request.client_name,
            new_request.subject,
            actor.user_id,
            ThreadMessage::new(actor.name.clone(), actor.role, new_request.message),
        );
        self.requests.insert(&request).await?;

        self.notify(
            request.client_id.into(),
            "Information Request",
            &format!(
                "New information request from your tax preparer: {}",
                request.subject
            ),
            NoticeKind::Warning,
        )
        .await;

        Ok(request)
    }

    /// Appends a reply to a thread
    ///
    /// Clients may reply only to their own threads. The store enforces the
    /// closed-thread rule regardless of what any UI disables.
    pub async fn reply(
        &self,
        actor: &Actor,
        id: RequestId,
        body: String,
        attachments: Vec<String>,
    ) -> Result<InfoRequest, RequestError> {
        if body.trim().is_empty() {
            return Err(RequestError::validation("reply must not be empty"));
        }

        let existing = self.fetch_visible(actor, id).await?;

        let message =
            ThreadMessage::new(actor.name.clone(), actor.role, body).with_attachments(attachments);
        let updated = self.requests.append_reply(id, message).await?;

        // Counterpart notification: client replies go to the opening
        // employee, staff replies go to the client.
        let (recipient, kind) = match actor.role {
            Role::Client => (existing.opened_by, NoticeKind::Info),
            _ => (existing.client_id.into(), NoticeKind::Warning),
        };
        self.notify(
            recipient,
            "Info Request Reply",
            &format!("New reply on: {}", updated.subject),
            kind,
        )
        .await;

        Ok(updated)
    }

    /// Resolves a thread; employee only, terminal
    pub async fn resolve(&self, actor: &Actor, id: RequestId) -> Result<InfoRequest, RequestError> {
        if actor.role != Role::Employee {
            return Err(RequestError::not_permitted(
                "only employees may resolve info requests",
            ));
        }
        Ok(self.requests.resolve(id).await?)
    }

    /// Archives a resolved thread; employee only
    pub async fn close(&self, actor: &Actor, id: RequestId) -> Result<InfoRequest, RequestError> {
        if actor.role != Role::Employee {
            return Err(RequestError::not_permitted(
                "only employees may close info requests",
            ));
        }
        Ok(self.requests.close(id).await?)
    }

    /// Fetches one thread, restricted to the caller's visibility
    pub async fn get_request(&self, actor: &Actor, id: RequestId) -> Result<InfoRequest, RequestError> {
        self.fetch_visible(actor, id).await
    }

    /// Lists threads visible to the caller
    pub async fn list_requests(
        &self,
        actor: &Actor,
        return_id: Option<ReturnId>,
    ) -> Result<Vec<InfoRequest>, RequestError> {
        let filter = match actor.role {
            Role::Client => RequestFilter {
                return_id,
                client_id: Some(actor.user_id.into()),
            },
            _ => RequestFilter {
                return_id,
                client_id: None,
            },
        };
        Ok(self.requests.list(&filter).await?)
    }

    async fn fetch_visible(&self, actor: &Actor, id: RequestId) -> Result<InfoRequest, RequestError> {
        let request = self.requests.fetch(id).await?;
        if actor.role == Role::Client && request.client_id != ClientId::from(actor.user_id) {
            return Err(RequestError::RequestNotFound(id.to_string()));
        }
        Ok(request)
    }

    async fn notify(&self, recipient: UserId, title: &str, message: &str, kind: NoticeKind) {
        if let Err(err) = self.notices.push(recipient, title, message, kind).await {
            warn!(error = %err, "failed to emit info request notice");
        }
    }
}
