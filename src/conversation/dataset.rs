//! Typed rows handed to analyzers.
//!
//! CHANGELOG:
//! - 10/18/2026 - Datasets carry their target zone
//! - 10/18/2026 - Initial dataset types

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::filter::TargetZone;
use crate::contacts::ContactRecord;

/// Display name used for the owner of the database.
pub const ME: &str = "Me";

/// Display name for rows whose sender cannot be determined.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// One inbound or outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub rowid: i64,
    /// Plain `text`, or the decoded `attributedBody` when `text` is empty.
    pub text: Option<String>,
    /// Timestamp in the requested time zone.
    pub timestamp: DateTime<FixedOffset>,
    pub is_from_me: bool,
    pub is_reaction: bool,
    /// `handle` ROWID of the row; 0 or NULL for some outgoing messages.
    pub handle_id: Option<i64>,
    /// Handle stored on the row. For outgoing 1:1 messages this is the
    /// recipient, so it must not be read as the sender when `is_from_me`.
    pub sender_handle: Option<String>,
    pub sender_display_name: String,
}

/// One file attached to a message.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub rowid: i64,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub message_id: i64,
    pub timestamp: DateTime<FixedOffset>,
    pub is_from_me: bool,
    pub sender_handle: Option<String>,
    pub sender_display_name: String,
}

/// A handle taking part in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub handle_id: i64,
    /// Phone number or email address of the handle.
    pub identifier: String,
    /// Name fields of the owning contact, if any.
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Display name of the owning contact, else the identifier.
    pub name: String,
}

/// Everything an analyzer gets to see about one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationDataset {
    pub messages: Vec<Message>,
    pub attachments: Vec<Attachment>,
    pub participants: Vec<Participant>,
    /// The resolved contacts the conversation was located from.
    pub contacts: Vec<ContactRecord>,
    /// Chat threads the rows were read from.
    pub chat_ids: Vec<i64>,
    /// Zone every timestamp was converted to.
    #[serde(skip)]
    pub zone: TargetZone,
}

impl ConversationDataset {
    /// Messages that are not reactions.
    pub fn non_reactions(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_reaction)
    }
}
