//! Temporary Messages and AddressBook databases for tests.
//!
//! People in the fixture:
//! - Daniel Brightingale: +12123456789 (1:1 thread and group thread)
//! - Jane Fernbrook: +12234567890, split across two contact sources that
//!   share the phone number; the second source adds jane@example.com
//! - Thomas Riverstone: thomas@example.com only
//! - Evelyn Oakhaven: has a phone number, but no conversation
//! - Matthew Whisperton: no phone numbers or email addresses
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial fixtures

use chrono::{DateTime, FixedOffset};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SourcePaths;
use crate::conversation::dataset::{Attachment, ConversationDataset, Message, ME};
use crate::conversation::TargetZone;
use crate::db::queries::COCOA_EPOCH_OFFSET;

pub const DANIEL_CHAT_ID: i64 = 1;
pub const JANE_CHAT_ID: i64 = 2;
pub const GROUP_CHAT_ID: i64 = 3;
pub const THOMAS_CHAT_ID: i64 = 4;
pub const JANE_EMAIL_CHAT_ID: i64 = 5;
pub const STRANGER_GROUP_CHAT_ID: i64 = 6;

pub const ATTRIBUTED_BODY_MESSAGE_ID: i64 = 103;
pub const ATTRIBUTED_BODY_TEXT: &str = "Sent from the attributed body";
pub const REACTION_MESSAGE_ID: i64 = 104;

const CHAT_SCHEMA: &str = r#"
CREATE TABLE handle (ROWID INTEGER PRIMARY KEY AUTOINCREMENT, id TEXT NOT NULL, service TEXT);
CREATE TABLE chat (ROWID INTEGER PRIMARY KEY AUTOINCREMENT, chat_identifier TEXT, display_name TEXT);
CREATE TABLE chat_handle_join (chat_id INTEGER, handle_id INTEGER);
CREATE TABLE message (
    ROWID INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT,
    attributedBody BLOB,
    date INTEGER,
    is_from_me INTEGER DEFAULT 0,
    handle_id INTEGER DEFAULT 0
);
CREATE TABLE chat_message_join (chat_id INTEGER, message_id INTEGER);
CREATE TABLE attachment (ROWID INTEGER PRIMARY KEY AUTOINCREMENT, mime_type TEXT, filename TEXT);
CREATE TABLE message_attachment_join (message_id INTEGER, attachment_id INTEGER);
"#;

const CONTACTS_SCHEMA: &str = r#"
CREATE TABLE ZABCDRECORD (Z_PK INTEGER PRIMARY KEY, ZFIRSTNAME TEXT, ZLASTNAME TEXT);
CREATE TABLE ZABCDPHONENUMBER (Z_PK INTEGER PRIMARY KEY, ZOWNER INTEGER, ZFULLNUMBER TEXT);
CREATE TABLE ZABCDEMAILADDRESS (Z_PK INTEGER PRIMARY KEY, ZOWNER INTEGER, ZADDRESS TEXT);
"#;

/// How a message's `date` column is stored.
#[derive(Clone, Copy)]
enum Stored {
    Nanoseconds,
    Seconds,
}

struct MessageRow {
    rowid: i64,
    chat_id: i64,
    at: &'static str,
    is_from_me: bool,
    handle_id: i64,
    text: Option<&'static str>,
    body: Option<&'static str>,
    stored: Stored,
}

const fn msg(
    rowid: i64,
    chat_id: i64,
    at: &'static str,
    is_from_me: bool,
    handle_id: i64,
    text: &'static str,
) -> MessageRow {
    MessageRow {
        rowid,
        chat_id,
        at,
        is_from_me,
        handle_id,
        text: Some(text),
        body: None,
        stored: Stored::Nanoseconds,
    }
}

fn message_rows() -> Vec<MessageRow> {
    vec![
        // Daniel 1:1
        msg(401, DANIEL_CHAT_ID, "2023-12-25T09:00:00Z", true, 1, "Merry Christmas!"),
        msg(402, DANIEL_CHAT_ID, "2023-12-25T09:30:00Z", false, 1, "Merry Christmas to you too"),
        // Jane 1:1 (outgoing rows carry Jane's handle)
        msg(101, JANE_CHAT_ID, "2024-01-07T10:00:00Z", false, 2, "Hey there"),
        msg(102, JANE_CHAT_ID, "2024-01-08T10:00:00Z", true, 2, "Hi Jane"),
        MessageRow {
            text: None,
            body: Some(ATTRIBUTED_BODY_TEXT),
            ..msg(ATTRIBUTED_BODY_MESSAGE_ID, JANE_CHAT_ID, "2024-01-08T10:05:00Z", false, 2, "")
        },
        msg(REACTION_MESSAGE_ID, JANE_CHAT_ID, "2024-01-09T09:00:00Z", true, 2, "Loved “Hey there”"),
        msg(105, JANE_CHAT_ID, "2024-01-11T00:00:00Z", false, 2, "Start of the range"),
        msg(106, JANE_CHAT_ID, "2024-01-14T15:00:00Z", true, 2, "Midweek check-in 😀😀👍🏽"),
        msg(107, JANE_CHAT_ID, "2024-01-16T23:59:59Z", false, 2, "Almost done 👍"),
        msg(108, JANE_CHAT_ID, "2024-01-17T00:00:00Z", false, 2, "Exactly at the end"),
        msg(109, JANE_CHAT_ID, "2024-01-19T12:00:00Z", true, 2, "See you soon"),
        // Jane by email
        msg(301, JANE_EMAIL_CHAT_ID, "2024-01-05T08:00:00Z", false, 4, "Emailing from my laptop"),
        // Group
        msg(201, GROUP_CHAT_ID, "2024-02-01T18:00:00Z", true, 0, "Hello everyone!"),
        msg(202, GROUP_CHAT_ID, "2024-02-01T18:01:00Z", false, 1, "Hi all"),
        msg(203, GROUP_CHAT_ID, "2024-02-01T18:02:00Z", false, 2, "Hey! 👋"),
        msg(204, GROUP_CHAT_ID, "2024-02-01T18:03:00Z", false, 2, "Laughed at “Hi all”"),
        // Thomas, one row in the pre-High Sierra seconds format
        msg(501, THOMAS_CHAT_ID, "2024-03-01T12:00:00Z", false, 3, "Did you get my email?"),
        MessageRow {
            stored: Stored::Seconds,
            ..msg(502, THOMAS_CHAT_ID, "2024-03-01T12:05:00Z", true, 3, "Yes, thanks")
        },
        // Group with someone not in contacts
        msg(601, STRANGER_GROUP_CHAT_ID, "2024-02-02T08:00:00Z", false, 5, "Who is this?"),
    ]
}

/// Raw Messages `date` value for an RFC 3339 timestamp.
pub fn cocoa_date(rfc3339: &str) -> i64 {
    let unix = DateTime::parse_from_rfc3339(rfc3339).unwrap().timestamp();
    (unix - COCOA_EPOCH_OFFSET) * 1_000_000_000
}

/// Minimal `attributedBody` blob holding `text` (under 128 bytes).
pub fn attributed_body(text: &str) -> Vec<u8> {
    let mut blob = b"\x04\x0bstreamtyped\x81\xe8\x03\x84\x01@".to_vec();
    blob.extend_from_slice(b"\x84\x84\x84\x12NSAttributedString\x00\x84\x84\x08NSObject\x00\x85");
    blob.extend_from_slice(b"\x92\x84\x84\x84\x08NSString\x01\x94\x84\x01+");
    blob.push(text.len() as u8);
    blob.extend_from_slice(text.as_bytes());
    blob.extend_from_slice(b"\x86\x86");
    blob
}

/// Create `chat.db` in `dir` and return its path.
pub fn chat_db(dir: &Path) -> PathBuf {
    let path = dir.join("chat.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(CHAT_SCHEMA).unwrap();

    let handles = [
        (1, "+12123456789"),
        (2, "+12234567890"),
        (3, "thomas@example.com"),
        (4, "jane@example.com"),
        (5, "+19998887777"),
    ];
    for (rowid, id) in handles {
        conn.execute(
            "INSERT INTO handle (ROWID, id, service) VALUES (?1, ?2, 'iMessage')",
            params![rowid, id],
        )
        .unwrap();
    }

    let chats: [(i64, &[i64]); 6] = [
        (DANIEL_CHAT_ID, &[1]),
        (JANE_CHAT_ID, &[2]),
        (GROUP_CHAT_ID, &[1, 2]),
        (THOMAS_CHAT_ID, &[3]),
        (JANE_EMAIL_CHAT_ID, &[4]),
        (STRANGER_GROUP_CHAT_ID, &[1, 2, 5]),
    ];
    for (chat_id, members) in chats {
        conn.execute(
            "INSERT INTO chat (ROWID, chat_identifier) VALUES (?1, ?2)",
            params![chat_id, format!("chat{}", chat_id)],
        )
        .unwrap();
        for handle_id in members {
            conn.execute(
                "INSERT INTO chat_handle_join (chat_id, handle_id) VALUES (?1, ?2)",
                params![chat_id, handle_id],
            )
            .unwrap();
        }
    }

    for row in message_rows() {
        let date = match row.stored {
            Stored::Nanoseconds => cocoa_date(row.at),
            Stored::Seconds => cocoa_date(row.at) / 1_000_000_000,
        };
        conn.execute(
            "INSERT INTO message (ROWID, text, attributedBody, date, is_from_me, handle_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.rowid,
                row.text,
                row.body.map(attributed_body),
                date,
                row.is_from_me,
                row.handle_id
            ],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chat_message_join (chat_id, message_id) VALUES (?1, ?2)",
            params![row.chat_id, row.rowid],
        )
        .unwrap();
    }

    let attachments: [(i64, Option<&str>, Option<&str>, i64); 4] = [
        (1, Some("image/gif"), Some("~/Library/Messages/Attachments/party.gif"), 106),
        (2, Some("audio/x-caf"), Some("~/Library/Messages/Attachments/Audio Message.caf"), 109),
        (3, None, None, 101),
        (4, Some("video/quicktime"), Some("~/Library/Messages/Attachments/clip.mov"), 203),
    ];
    for (rowid, mime_type, filename, message_id) in attachments {
        conn.execute(
            "INSERT INTO attachment (ROWID, mime_type, filename) VALUES (?1, ?2, ?3)",
            params![rowid, mime_type, filename],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO message_attachment_join (message_id, attachment_id) VALUES (?1, ?2)",
            params![message_id, rowid],
        )
        .unwrap();
    }

    path
}

/// Create two AddressBook sources under `dir/Sources` and return their paths.
pub fn contact_sources(dir: &Path) -> Vec<PathBuf> {
    let primary = contact_source(
        &dir.join("Sources").join("A0000000-PRIMARY"),
        &[
            (1, Some("Daniel"), Some("Brightingale")),
            (2, Some("Jane"), Some("Fernbrook")),
            (3, Some("Thomas"), Some("Riverstone")),
            (4, Some("Matthew"), Some("Whisperton")),
            (5, Some("Evelyn"), Some("Oakhaven")),
            (6, None, None),
        ],
        &[
            (1, "+1 212-345-6789"),
            (2, "(223) 456-7890"),
            (5, "456-789-0123"),
            (6, "123"),
        ],
        &[(3, "thomas@example.com")],
    );
    let secondary = contact_source(
        &dir.join("Sources").join("B0000000-ICLOUD"),
        &[(1, None, Some("Fernbrook"))],
        &[(1, "223.456.7890")],
        &[(1, " jane@example.com ")],
    );
    vec![primary, secondary]
}

fn contact_source(
    dir: &Path,
    records: &[(i64, Option<&str>, Option<&str>)],
    phones: &[(i64, &str)],
    emails: &[(i64, &str)],
) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join("AddressBook-v22.abcddb");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(CONTACTS_SCHEMA).unwrap();

    for (pk, first, last) in records {
        conn.execute(
            "INSERT INTO ZABCDRECORD (Z_PK, ZFIRSTNAME, ZLASTNAME) VALUES (?1, ?2, ?3)",
            params![pk, first, last],
        )
        .unwrap();
    }
    for (owner, number) in phones {
        conn.execute(
            "INSERT INTO ZABCDPHONENUMBER (ZOWNER, ZFULLNUMBER) VALUES (?1, ?2)",
            params![owner, number],
        )
        .unwrap();
    }
    for (owner, address) in emails {
        conn.execute(
            "INSERT INTO ZABCDEMAILADDRESS (ZOWNER, ZADDRESS) VALUES (?1, ?2)",
            params![owner, address],
        )
        .unwrap();
    }
    path
}

/// Both fixture stores under `dir`.
pub fn source_paths(dir: &Path) -> SourcePaths {
    SourcePaths::new(chat_db(dir), contact_sources(dir))
}

// ============================================================================
// IN-MEMORY DATASETS
// ============================================================================

/// A message at `rfc3339` from me or from `+15550000001`.
pub fn message(rowid: i64, rfc3339: &str, is_from_me: bool, text: &str) -> Message {
    let is_reaction = crate::conversation::is_reaction(text);
    Message {
        rowid,
        text: Some(text.to_string()),
        timestamp: timestamp(rfc3339),
        is_from_me,
        is_reaction,
        handle_id: Some(1),
        sender_handle: Some("+15550000001".to_string()),
        sender_display_name: if is_from_me { ME } else { "Sam Lakewood" }.to_string(),
    }
}

pub fn attachment(rowid: i64, mime_type: Option<&str>, filename: Option<&str>) -> Attachment {
    Attachment {
        rowid,
        mime_type: mime_type.map(str::to_string),
        filename: filename.map(str::to_string),
        message_id: rowid,
        timestamp: timestamp("2024-01-08T12:00:00-05:00"),
        is_from_me: false,
        sender_handle: Some("+15550000001".to_string()),
        sender_display_name: "Sam Lakewood".to_string(),
    }
}

pub fn dataset(messages: Vec<Message>, attachments: Vec<Attachment>) -> ConversationDataset {
    ConversationDataset {
        messages,
        attachments,
        participants: Vec::new(),
        contacts: Vec::new(),
        chat_ids: Vec::new(),
        zone: TargetZone::Named(chrono_tz::UTC),
    }
}

pub fn timestamp(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}
