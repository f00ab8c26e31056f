//! Find the chat threads whose participants are exactly a set of contacts.
//!
//! CHANGELOG:
//! - 10/18/2026 - Exact participant-set matching for 1:1 and group threads

use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::contacts::normalize::normalize_identifier;
use crate::contacts::ContactRecord;
use crate::db::queries;
use crate::error::Result;

/// Chat ROWIDs (ascending) whose participant handles are exactly `contacts`.
///
/// A thread matches when it has as many distinct handles as there are
/// contacts, every contact owns at least one of them, and every handle
/// belongs to one of the contacts. No match is an empty vector, not an
/// error.
pub fn locate(conn: &Connection, contacts: &[ContactRecord]) -> Result<Vec<i64>> {
    if contacts.is_empty() {
        return Ok(Vec::new());
    }

    let wanted: Vec<BTreeSet<String>> = contacts
        .iter()
        .map(|contact| {
            contact
                .identifiers()
                .iter()
                .map(|id| normalize_identifier(id))
                .collect()
        })
        .collect();

    let mut handles_by_chat: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
    let mut stmt = conn.prepare(queries::CHAT_PARTICIPANTS)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
    })?;
    for row in rows {
        let (chat_id, handle) = row?;
        if let Some(handle) = handle {
            handles_by_chat
                .entry(chat_id)
                .or_default()
                .insert(normalize_identifier(&handle));
        }
    }

    let chat_ids: Vec<i64> = handles_by_chat
        .into_iter()
        .filter(|(_, handles)| is_exact_match(handles, &wanted))
        .map(|(chat_id, _)| chat_id)
        .collect();

    debug!(contacts = contacts.len(), chats = ?chat_ids, "located chats");
    Ok(chat_ids)
}

fn is_exact_match(handles: &BTreeSet<String>, wanted: &[BTreeSet<String>]) -> bool {
    handles.len() == wanted.len()
        && wanted
            .iter()
            .all(|identifiers| !identifiers.is_disjoint(handles))
        && handles
            .iter()
            .all(|handle| wanted.iter().any(|identifiers| identifiers.contains(handle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_read_only;
    use crate::fixtures;

    fn daniel() -> ContactRecord {
        ContactRecord::new("a:1", Some("Daniel"), Some("Brightingale")).with_phone("+12123456789")
    }

    fn jane() -> ContactRecord {
        ContactRecord::new("a:2", Some("Jane"), Some("Fernbrook"))
            .with_phone("+12234567890")
            .with_email("jane@example.com")
    }

    #[test]
    fn test_locates_group_thread_only_for_full_participant_set() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();

        let group = locate(&conn, &[daniel(), jane()]).unwrap();
        assert_eq!(group, vec![fixtures::GROUP_CHAT_ID]);

        // Daniel alone is a different (1:1) thread, never the group
        let solo = locate(&conn, &[daniel()]).unwrap();
        assert_eq!(solo, vec![fixtures::DANIEL_CHAT_ID]);
    }

    #[test]
    fn test_contact_with_several_threads_gets_all_of_them() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();

        // Jane has one thread by phone and one by email
        let chats = locate(&conn, &[jane()]).unwrap();
        assert_eq!(chats, vec![fixtures::JANE_CHAT_ID, fixtures::JANE_EMAIL_CHAT_ID]);
    }

    #[test]
    fn test_no_matching_thread_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_read_only(&fixtures::chat_db(dir.path())).unwrap();
        let evelyn = ContactRecord::new("a:5", Some("Evelyn"), Some("Oakhaven")).with_phone("+14567890123");
        assert!(locate(&conn, &[evelyn]).unwrap().is_empty());
        assert!(locate(&conn, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_is_exact_match_rejects_supersets() {
        let handles: BTreeSet<String> = ["+12123456789", "+12234567890", "+13456789012"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let wanted: Vec<BTreeSet<String>> = vec![
            ["+12123456789".to_string()].into_iter().collect(),
            ["+12234567890".to_string()].into_iter().collect(),
        ];
        assert!(!is_exact_match(&handles, &wanted));
    }
}
