//! Pull messages and attachments for located chats into a typed dataset.
//!
//! CHANGELOG:
//! - 10/18/2026 - Sender display names and participant table
//! - 10/18/2026 - Initial extractor (typedstream bodies, reactions, zones)

use rusqlite::{params_from_iter, Connection};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::dataset::{Attachment, ConversationDataset, Message, Participant, ME, UNKNOWN_SENDER};
use super::filter::{filter, DateRange, PersonFilter, TargetZone};
use super::reaction::is_reaction;
use crate::contacts::ContactRecord;
use crate::db::decode_legacy_body;
use crate::db::queries;
use crate::error::{IcaError, Result};

/// Extract every message and attachment of `chat_ids`, restricted to `range`.
///
/// Fails with `ConversationNotFound` when there are no chats, or when the
/// chats hold no messages at all (before the date range is applied).
pub fn extract(
    conn: &Connection,
    chat_ids: &[i64],
    contacts: &[ContactRecord],
    zone: TargetZone,
    range: &DateRange,
) -> Result<ConversationDataset> {
    if chat_ids.is_empty() {
        return Err(conversation_not_found(contacts));
    }

    let mut names = SenderNames::new(contacts);
    let messages = load_messages(conn, chat_ids, zone, &mut names)?;
    if messages.is_empty() {
        return Err(conversation_not_found(contacts));
    }
    let attachments = load_attachments(conn, chat_ids, zone, &mut names)?;
    let participants = load_participants(conn, chat_ids, &mut names)?;

    debug!(
        chats = chat_ids.len(),
        messages = messages.len(),
        attachments = attachments.len(),
        "extracted conversation"
    );

    let dataset = ConversationDataset {
        messages,
        attachments,
        participants,
        contacts: contacts.to_vec(),
        chat_ids: chat_ids.to_vec(),
        zone,
    };
    Ok(filter(dataset, range, &PersonFilter::all()))
}

fn conversation_not_found(contacts: &[ContactRecord]) -> IcaError {
    IcaError::ConversationNotFound(
        contacts
            .iter()
            .map(|contact| contact.full_name().unwrap_or_else(|| contact.display_name(contacts)))
            .collect(),
    )
}

// ============================================================================
// ROW LOADING
// ============================================================================

fn load_messages(
    conn: &Connection,
    chat_ids: &[i64],
    zone: TargetZone,
    names: &mut SenderNames,
) -> Result<Vec<Message>> {
    let sql = queries::with_chat_ids(queries::CONVERSATION_MESSAGES, chat_ids.len());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(chat_ids), |row| {
        Ok((
            row.get::<_, i64>("ROWID")?,
            row.get::<_, Option<String>>("text")?,
            row.get::<_, Option<Vec<u8>>>("attributedBody")?,
            row.get::<_, Option<i64>>("date")?,
            row.get::<_, Option<bool>>("is_from_me")?,
            row.get::<_, Option<i64>>("handle_id")?,
            row.get::<_, Option<String>>("sender_handle")?,
        ))
    })?;

    let mut messages = Vec::new();
    for row in rows {
        let (rowid, text, body, date, is_from_me, handle_id, sender_handle) = row?;
        let Some(timestamp) = zone.from_cocoa(date.unwrap_or_default()) else {
            warn!(rowid, "skipping message with out-of-range date");
            continue;
        };

        let text = text
            .filter(|t| !t.is_empty())
            .or_else(|| body.map(|b| decode_legacy_body(&b)).filter(|t| !t.is_empty()));
        let is_from_me = is_from_me.unwrap_or(false);

        messages.push(Message {
            rowid,
            is_reaction: text.as_deref().is_some_and(is_reaction),
            text,
            timestamp,
            is_from_me,
            handle_id,
            sender_display_name: names.sender(is_from_me, sender_handle.as_deref()),
            sender_handle,
        });
    }
    Ok(messages)
}

fn load_attachments(
    conn: &Connection,
    chat_ids: &[i64],
    zone: TargetZone,
    names: &mut SenderNames,
) -> Result<Vec<Attachment>> {
    let sql = queries::with_chat_ids(queries::CONVERSATION_ATTACHMENTS, chat_ids.len());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(chat_ids), |row| {
        Ok((
            row.get::<_, i64>("ROWID")?,
            row.get::<_, Option<String>>("mime_type")?,
            row.get::<_, Option<String>>("filename")?,
            row.get::<_, i64>("message_id")?,
            row.get::<_, Option<i64>>("date")?,
            row.get::<_, Option<bool>>("is_from_me")?,
            row.get::<_, Option<String>>("sender_handle")?,
        ))
    })?;

    let mut attachments = Vec::new();
    for row in rows {
        let (rowid, mime_type, filename, message_id, date, is_from_me, sender_handle) = row?;
        let Some(timestamp) = zone.from_cocoa(date.unwrap_or_default()) else {
            warn!(rowid, "skipping attachment with out-of-range date");
            continue;
        };
        let is_from_me = is_from_me.unwrap_or(false);

        attachments.push(Attachment {
            rowid,
            mime_type,
            filename,
            message_id,
            timestamp,
            is_from_me,
            sender_display_name: names.sender(is_from_me, sender_handle.as_deref()),
            sender_handle,
        });
    }
    Ok(attachments)
}

fn load_participants(
    conn: &Connection,
    chat_ids: &[i64],
    names: &mut SenderNames,
) -> Result<Vec<Participant>> {
    let sql = queries::with_chat_ids(queries::CONVERSATION_HANDLES, chat_ids.len());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(chat_ids), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut participants: Vec<Participant> = Vec::new();
    for row in rows {
        let (handle_id, identifier) = row?;
        let owner = names.owner(&identifier);
        participants.push(Participant {
            handle_id,
            first_name: owner.and_then(|c| c.first_name.clone()),
            last_name: owner.and_then(|c| c.last_name.clone()),
            name: names.for_handle(&identifier),
            identifier,
        });
    }
    Ok(participants)
}

// ============================================================================
// DISPLAY NAMES
// ============================================================================

/// Memoized handle -> display name lookup.
struct SenderNames<'a> {
    contacts: &'a [ContactRecord],
    cache: HashMap<String, String>,
}

impl<'a> SenderNames<'a> {
    fn new(contacts: &'a [ContactRecord]) -> Self {
        Self {
            contacts,
            cache: HashMap::new(),
        }
    }

    fn sender(&mut self, is_from_me: bool, handle: Option<&str>) -> String {
        match (is_from_me, handle) {
            (true, _) => ME.to_string(),
            (false, Some(handle)) => self.for_handle(handle),
            (false, None) => UNKNOWN_SENDER.to_string(),
        }
    }

    fn owner(&self, handle: &str) -> Option<&'a ContactRecord> {
        self.contacts.iter().find(|contact| contact.owns_identifier(handle))
    }

    /// The owning contact's display name, or the raw handle.
    fn for_handle(&mut self, handle: &str) -> String {
        if let Some(name) = self.cache.get(handle) {
            return name.clone();
        }
        let name = self
            .owner(handle)
            .map(|contact| contact.display_name(self.contacts))
            .unwrap_or_else(|| handle.to_string());
        self.cache.insert(handle.to_string(), name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_read_only;
    use crate::fixtures;

    fn utc() -> TargetZone {
        TargetZone::Named(chrono_tz::UTC)
    }

    fn daniel() -> ContactRecord {
        ContactRecord::new("a:1", Some("Daniel"), Some("Brightingale")).with_phone("+12123456789")
    }

    fn jane() -> ContactRecord {
        ContactRecord::new("a:2", Some("Jane"), Some("Fernbrook"))
            .with_phone("+12234567890")
            .with_email("jane@example.com")
    }

    #[test]
    fn test_empty_chat_list_is_conversation_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();
        let err = extract(&conn, &[], &[jane()], utc(), &DateRange::default()).unwrap_err();
        assert!(matches!(err, IcaError::ConversationNotFound(_)));
    }

    #[test]
    fn test_group_thread_messages_and_sender_names() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();
        let contacts = [daniel(), jane()];
        let data = extract(&conn, &[fixtures::GROUP_CHAT_ID], &contacts, utc(), &DateRange::default())
            .unwrap();

        let hello = data
            .messages
            .iter()
            .find(|m| m.text.as_deref() == Some("Hello everyone!"))
            .unwrap();
        assert!(hello.is_from_me);
        assert_eq!(hello.sender_display_name, "Me");

        let senders: Vec<&str> = data
            .messages
            .iter()
            .filter(|m| !m.is_from_me)
            .map(|m| m.sender_display_name.as_str())
            .collect();
        assert!(senders.contains(&"Daniel"));
        assert!(senders.contains(&"Jane"));

        let mut participants: Vec<&str> = data.participants.iter().map(|p| p.name.as_str()).collect();
        participants.sort();
        assert_eq!(participants, vec!["Daniel", "Jane"]);
        assert!(data
            .participants
            .iter()
            .all(|p| p.last_name.as_deref().is_some_and(|last| !last.is_empty())));
        assert_eq!(data.chat_ids, vec![fixtures::GROUP_CHAT_ID]);
    }

    #[test]
    fn test_attributed_body_and_reactions() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();
        let data = extract(&conn, &[fixtures::JANE_CHAT_ID], &[jane()], utc(), &DateRange::default())
            .unwrap();

        let decoded = data
            .messages
            .iter()
            .find(|m| m.rowid == fixtures::ATTRIBUTED_BODY_MESSAGE_ID)
            .unwrap();
        assert_eq!(decoded.text.as_deref(), Some(fixtures::ATTRIBUTED_BODY_TEXT));
        assert!(!decoded.is_reaction);

        let reactions: Vec<i64> = data.messages.iter().filter(|m| m.is_reaction).map(|m| m.rowid).collect();
        assert_eq!(reactions, vec![fixtures::REACTION_MESSAGE_ID]);
    }

    #[test]
    fn test_date_range_applies_to_messages_and_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();
        let range = DateRange::parse(Some("2024-01-11"), Some("2024-01-17"), utc()).unwrap();
        let data = extract(&conn, &[fixtures::JANE_CHAT_ID], &[jane()], utc(), &range).unwrap();

        let mut days: Vec<String> = data
            .messages
            .iter()
            .map(|m| m.timestamp.format("%Y-%m-%d").to_string())
            .collect();
        days.dedup();
        assert_eq!(days, vec!["2024-01-11", "2024-01-14", "2024-01-16"]);
        assert!(data.attachments.iter().all(|a| range.contains(&a.timestamp)));
        assert_eq!(data.attachments.len(), 1);
    }

    #[test]
    fn test_unknown_handle_falls_back_to_raw_identifier() {
        let mut names = SenderNames::new(&[]);
        assert_eq!(names.sender(false, Some("+19998887777")), "+19998887777");
        assert_eq!(names.sender(false, None), "Unknown");
        assert_eq!(names.sender(true, Some("+19998887777")), "Me");
    }
}
