//! Info request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_requests::{InfoRequest, ThreadMessage};

#[derive(Debug, Deserialize, Validate)]
pub struct OpenRequestRequest {
    pub return_id: String,
    pub client_id: String,
    #[validate(length(min = 1, max = 255))]
    pub client_name: String,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub return_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub sender_name: String,
    pub sender_role: String,
    pub body: String,
    pub attachments: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

impl From<&ThreadMessage> for MessageResponse {
    fn from(message: &ThreadMessage) -> Self {
        Self {
            id: message.id.to_string(),
            sender_name: message.sender_name.clone(),
            sender_role: message.sender_role.to_string(),
            body: message.body.clone(),
            attachments: message.attachments.clone(),
            sent_at: message.sent_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub id: String,
    pub return_id: String,
    pub client_id: String,
    pub client_name: String,
    pub subject: String,
    pub status: String,
    pub opened_by: String,
    pub messages: Vec<MessageResponse>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<InfoRequest> for RequestResponse {
    fn from(request: InfoRequest) -> Self {
        Self {
            id: request.id.to_string(),
            return_id: request.return_id.to_string(),
            client_id: request.client_id.to_string(),
            client_name: request.client_name.clone(),
            subject: request.subject.clone(),
            status: request.status.to_string(),
            opened_by: request.opened_by.to_string(),
            messages: request.messages.iter().map(Into::into).collect(),
            created_at: request.created_at,
            last_updated: request.last_updated,
        }
    }
}
