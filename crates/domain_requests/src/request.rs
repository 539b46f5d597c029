//! Info request aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClientId, MessageId, RequestId, ReturnId, Role, UserId};
use crate::error::RequestError;

/// Thread status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Opened by an employee, no reply yet
    Open,
    /// At least one reply received
    InProgress,
    /// Explicitly resolved by an employee
    Resolved,
    /// Archived after resolution
    Closed,
}

impl RequestStatus {
    /// True once the thread no longer accepts replies
    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Resolved | RequestStatus::Closed)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Open => "open",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Resolved => "resolved",
            RequestStatus::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// One message on the thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: MessageId,
    /// Display name of the sender
    pub sender_name: String,
    /// Role the sender held when writing
    pub sender_role: Role,
    pub body: String,
    /// Opaque references to uploaded attachments
    pub attachments: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

impl ThreadMessage {
    pub fn new(sender_name: impl Into<String>, sender_role: Role, body: impl Into<String>) -> Self {
        Self {
            id: MessageId::new_v7(),
            sender_name: sender_name.into(),
            sender_role,
            body: body.into(),
            attachments: Vec::new(),
            sent_at: Utc::now(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// A clarification thread against one return
///
/// The message log is append-only: replies only ever grow the list and a
/// failed reply leaves it untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoRequest {
    pub id: RequestId,
    /// The return this request clarifies
    pub return_id: ReturnId,
    /// Client the request is addressed to
    pub client_id: ClientId,
    pub client_name: String,
    pub subject: String,
    pub status: RequestStatus,
    /// Employee who opened the thread; replies from the client notify them
    pub opened_by: UserId,
    pub messages: Vec<ThreadMessage>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl InfoRequest {
    /// Opens a new thread with its initial message
    pub fn open(
        return_id: ReturnId,
        client_id: ClientId,
        client_name: impl Into<String>,
        subject: impl Into<String>,
        opened_by: UserId,
        initial_message: ThreadMessage,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RequestId::new_v7(),
            return_id,
            client_id,
            client_name: client_name.into(),
            subject: subject.into(),
            status: RequestStatus::Open,
            opened_by,
            messages: vec![initial_message],
            created_at: now,
            last_updated: now,
        }
    }

    /// Appends a reply
    ///
    /// The first reply moves an open thread to in_progress. Replies to a
    /// resolved or closed thread fail and leave the log unchanged.
    pub fn reply(&mut self, message: ThreadMessage) -> Result<(), RequestError> {
        if self.status.is_closed() {
            return Err(RequestError::ThreadClosed(self.status.to_string()));
        }
        if self.status == RequestStatus::Open {
            self.status = RequestStatus::InProgress;
        }
        self.messages.push(message);
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Resolves the thread; terminal
    pub fn resolve(&mut self) -> Result<(), RequestError> {
        match self.status {
            RequestStatus::Open | RequestStatus::InProgress => {
                self.status = RequestStatus::Resolved;
                self.last_updated = Utc::now();
                Ok(())
            }
            other => Err(RequestError::transition(other.to_string(), "resolve")),
        }
    }

    /// Archives a resolved thread
    pub fn close(&mut self) -> Result<(), RequestError> {
        if self.status != RequestStatus::Resolved {
            return Err(RequestError::transition(self.status.to_string(), "close"));
        }
        self.status = RequestStatus::Closed;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// The most recent message on the thread
    pub fn latest_message(&self) -> Option<&ThreadMessage> {
        self.messages.last()
    }
}
