//! SQL queries for Messages.db and the AddressBook source databases.
//!
//! CHANGELOG:
//! - 10/18/2026 - Conversation extraction and contact source queries
//! - 01/10/2026 - Initial stub with query constants

// ============================================================================
// ADDRESSBOOK QUERIES
// ============================================================================

/// Every record (person) in one contact source.
pub const CONTACT_RECORDS: &str = r#"
SELECT
    r.Z_PK,
    r.ZFIRSTNAME,
    r.ZLASTNAME
FROM ZABCDRECORD r
ORDER BY r.Z_PK
"#;

/// Phone numbers, grouped by owning record.
pub const CONTACT_PHONE_NUMBERS: &str = r#"
SELECT
    p.ZOWNER,
    p.ZFULLNUMBER
FROM ZABCDPHONENUMBER p
WHERE p.ZFULLNUMBER IS NOT NULL
ORDER BY p.ZOWNER, p.rowid
"#;

/// Email addresses, grouped by owning record.
pub const CONTACT_EMAIL_ADDRESSES: &str = r#"
SELECT
    e.ZOWNER,
    e.ZADDRESS
FROM ZABCDEMAILADDRESS e
WHERE e.ZADDRESS IS NOT NULL
ORDER BY e.ZOWNER, e.rowid
"#;

// ============================================================================
// CHAT QUERIES
// ============================================================================

/// Participant handles of every chat.
pub const CHAT_PARTICIPANTS: &str = r#"
SELECT
    chj.chat_id,
    h.id
FROM chat_handle_join chj
JOIN handle h ON h.ROWID = chj.handle_id
ORDER BY chj.chat_id
"#;

/// Messages of the selected chats. `{chat_ids}` is replaced with a
/// placeholder list by [`with_chat_ids`].
pub const CONVERSATION_MESSAGES: &str = r#"
SELECT DISTINCT
    m.ROWID,
    m.text,
    m.attributedBody,
    m.date,
    m.is_from_me,
    m.handle_id,
    h.id AS sender_handle
FROM message m
JOIN chat_message_join cmj ON cmj.message_id = m.ROWID
LEFT JOIN handle h ON h.ROWID = m.handle_id
WHERE cmj.chat_id IN ({chat_ids})
ORDER BY m.date, m.ROWID
"#;

/// Attachments of the selected chats.
pub const CONVERSATION_ATTACHMENTS: &str = r#"
SELECT DISTINCT
    a.ROWID,
    a.mime_type,
    a.filename,
    maj.message_id,
    m.date,
    m.is_from_me,
    h.id AS sender_handle
FROM attachment a
JOIN message_attachment_join maj ON maj.attachment_id = a.ROWID
JOIN message m ON m.ROWID = maj.message_id
JOIN chat_message_join cmj ON cmj.message_id = m.ROWID
LEFT JOIN handle h ON h.ROWID = m.handle_id
WHERE cmj.chat_id IN ({chat_ids})
ORDER BY m.date, a.ROWID
"#;

/// Handles taking part in the selected chats.
pub const CONVERSATION_HANDLES: &str = r#"
SELECT DISTINCT
    h.ROWID,
    h.id
FROM handle h
JOIN chat_handle_join chj ON chj.handle_id = h.ROWID
WHERE chj.chat_id IN ({chat_ids})
ORDER BY h.ROWID
"#;

/// Expand the `{chat_ids}` marker into `count` positional placeholders.
pub fn with_chat_ids(query: &str, count: usize) -> String {
    let placeholders = vec!["?"; count.max(1)].join(", ");
    query.replace("{chat_ids}", &placeholders)
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Cocoa epoch offset (2001-01-01 in Unix time).
pub const COCOA_EPOCH_OFFSET: i64 = 978_307_200;

/// Raw `date` values above this magnitude are nanoseconds; below, seconds.
///
/// 10^11 seconds is over 3000 years, so no real seconds value reaches it.
pub const NANOSECOND_THRESHOLD: i64 = 100_000_000_000;

/// Convert a raw Cocoa `date` value to Unix seconds plus subsecond nanos.
///
/// macOS High Sierra and later store nanoseconds; older databases store
/// seconds.
pub fn cocoa_to_unix(raw: i64) -> (i64, u32) {
    if raw.unsigned_abs() > NANOSECOND_THRESHOLD as u64 {
        let secs = raw.div_euclid(1_000_000_000);
        let nanos = raw.rem_euclid(1_000_000_000) as u32;
        (secs + COCOA_EPOCH_OFFSET, nanos)
    } else {
        (raw + COCOA_EPOCH_OFFSET, 0)
    }
}
