//! Strongly-typed identifiers for portal entities
//!
//! Every aggregate id is a UUID behind a newtype so a bill id cannot be
//! handed to an operation expecting a return id. The display form carries
//! a short prefix ("TRN-", "BIL-") which is what the API and the audit
//! log show; parsing accepts either the prefixed form or a bare UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Failure to parse an identifier from its string form
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {kind} identifier '{raw}'")]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Time-ordered identifier, used for feed-like entities so
            /// insertion order survives a sort on the id
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Uuid::parse_str(bare).map(Self).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                    raw: s.to_string(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Filing domain identifiers
define_id!(ReturnId, "TRN");
define_id!(DocumentId, "DOC");

// Info request identifiers
define_id!(RequestId, "IRQ");
define_id!(MessageId, "MSG");

// Billing identifiers
define_id!(BillId, "BIL");

// Notification identifiers
define_id!(NotificationId, "NTF");

// Identity identifiers
define_id!(ClientId, "CLT");
define_id!(UserId, "USR");

// A client is a portal user: the client id carries the user id of the
// account holder, so notifications can address clients directly.
impl From<ClientId> for UserId {
    fn from(id: ClientId) -> UserId {
        UserId::from_uuid(*id.as_uuid())
    }
}

impl From<UserId> for ClientId {
    fn from(id: UserId) -> ClientId {
        ClientId::from_uuid(*id.as_uuid())
    }
}
