//! Contact resolver - load AddressBook sources and resolve identifiers.
//!
//! CHANGELOG:
//! - 10/18/2026 - Exact full-name matches outrank prefix matches
//! - 10/18/2026 - Load every AddressBook source and coalesce before matching
//! - 10/18/2026 - Strict resolution: unmatched and ambiguous identifiers are errors
//! - 01/10/2026 - Initial stub

use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::normalize::{
    normalize_email_address, normalize_phone_number, parse_phone_identifier,
    phone_matches_national,
};
use super::record::{coalesce, ContactRecord};
use crate::db::connection::open_read_only;
use crate::db::queries;
use crate::error::{IcaError, Result};

/// Coalesced view over every contact source.
pub struct ContactsManager {
    records: Vec<ContactRecord>,
}

impl ContactsManager {
    /// Load and coalesce every AddressBook database in `sources`.
    ///
    /// Each source is opened read-only and closed before the next one is
    /// read.
    pub fn load(sources: &[PathBuf]) -> Result<Self> {
        let mut records = Vec::new();
        for source in sources {
            let conn = open_read_only(source)?;
            let loaded = load_source(&conn, &source_label(source))?;
            debug!(source = %source.display(), count = loaded.len(), "loaded contact source");
            records.extend(loaded);
        }
        Ok(Self::from_records(records))
    }

    /// Build a manager from already-loaded records.
    pub fn from_records(records: Vec<ContactRecord>) -> Self {
        Self {
            records: coalesce(records),
        }
    }

    /// Get all (coalesced) contacts.
    pub fn all(&self) -> &[ContactRecord] {
        &self.records
    }

    /// Every contact an identifier refers to.
    ///
    /// Phone numbers are compared by national number; anything containing
    /// `@` is compared against email addresses; any identifier is also tried
    /// as a word-boundary prefix of the full name. A contact whose full name
    /// equals the query outranks prefix matches. Contacts without
    /// identifiers never match.
    pub fn find_matches(&self, identifier: &str) -> Vec<&ContactRecord> {
        let query = identifier.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let national = parse_phone_identifier(query);
        let query_lower = query.to_lowercase();

        let found: Vec<&ContactRecord> = self
            .records
            .iter()
            .filter(|record| record.has_identifiers())
            .filter(|record| match &national {
                Some(national) => record
                    .phone_numbers
                    .iter()
                    .any(|phone| phone_matches_national(phone, national)),
                None => {
                    (query.contains('@')
                        && record
                            .email_addresses
                            .iter()
                            .any(|email| email.to_lowercase() == query_lower))
                        || record
                            .full_name()
                            .is_some_and(|name| name_has_prefix(&name, &query_lower))
                }
            })
            .collect();

        let exact: Vec<&ContactRecord> = found
            .iter()
            .copied()
            .filter(|record| {
                record
                    .full_name()
                    .is_some_and(|name| name.to_lowercase() == query_lower)
            })
            .collect();
        if exact.is_empty() {
            found
        } else {
            exact
        }
    }

    /// Resolve every identifier to exactly one contact.
    ///
    /// Fails with `ContactNotFound` naming all identifiers that matched
    /// nothing, before considering ambiguity. The result holds each person
    /// once, in request order.
    pub fn resolve(&self, identifiers: &[String]) -> Result<Vec<ContactRecord>> {
        let matches: Vec<(&String, Vec<&ContactRecord>)> = identifiers
            .iter()
            .map(|identifier| (identifier, self.find_matches(identifier)))
            .collect();

        let unmatched: Vec<String> = matches
            .iter()
            .filter(|(_, found)| found.is_empty())
            .map(|(identifier, _)| (*identifier).clone())
            .collect();
        if !unmatched.is_empty() {
            return Err(IcaError::ContactNotFound(unmatched));
        }

        let mut resolved: Vec<ContactRecord> = Vec::new();
        for (identifier, found) in matches {
            if found.len() > 1 {
                return Err(IcaError::AmbiguousContact {
                    query: identifier.clone(),
                    names: found
                        .iter()
                        .map(|record| record.display_name(self.all()))
                        .collect(),
                });
            }
            let record = found[0];
            if !resolved.iter().any(|r| r.id == record.id) {
                resolved.push(record.clone());
            }
        }

        debug!(
            requested = identifiers.len(),
            resolved = resolved.len(),
            "resolved contacts"
        );
        Ok(resolved)
    }
}

/// Load every contact source and resolve `identifiers` against them.
///
/// All source connections are closed by the time this returns.
pub fn resolve(sources: &[PathBuf], identifiers: &[String]) -> Result<Vec<ContactRecord>> {
    ContactsManager::load(sources)?.resolve(identifiers)
}

/// Resolve `identifiers` against records that are already in memory.
pub fn resolve_identifiers(
    records: Vec<ContactRecord>,
    identifiers: &[String],
) -> Result<Vec<ContactRecord>> {
    ContactsManager::from_records(records).resolve(identifiers)
}

// ============================================================================
// SOURCE LOADING
// ============================================================================

fn load_source(conn: &Connection, label: &str) -> Result<Vec<ContactRecord>> {
    let mut order: Vec<i64> = Vec::new();
    let mut by_pk: HashMap<i64, ContactRecord> = HashMap::new();

    let mut stmt = conn.prepare(queries::CONTACT_RECORDS)?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;
    for row in rows {
        let (pk, first, last) = row?;
        let record = ContactRecord::new(
            format!("{}:{}", label, pk),
            first.as_deref(),
            last.as_deref(),
        );
        order.push(pk);
        by_pk.insert(pk, record);
    }

    let mut stmt = conn.prepare(queries::CONTACT_PHONE_NUMBERS)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (owner, raw) = row?;
        let Some(record) = by_pk.get_mut(&owner) else {
            continue;
        };
        match normalize_phone_number(&raw) {
            Ok(phone) => record.add_phone(phone),
            Err(e) => warn!(source = label, owner, "skipping phone number: {}", e),
        }
    }

    let mut stmt = conn.prepare(queries::CONTACT_EMAIL_ADDRESSES)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (owner, raw) = row?;
        let email = normalize_email_address(&raw);
        if email.is_empty() {
            continue;
        }
        if let Some(record) = by_pk.get_mut(&owner) {
            record.add_email(email);
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|pk| by_pk.remove(&pk))
        .collect())
}

/// Label a source by its directory and file stem, e.g. `<UUID>/AddressBook-v22`.
fn source_label(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "contacts".to_string());
    match path.parent().and_then(Path::file_name) {
        Some(parent) => format!("{}/{}", parent.to_string_lossy(), stem),
        None => stem,
    }
}

/// Whether `query` (lowercase) starts at a word boundary of `name`.
fn name_has_prefix(name: &str, query: &str) -> bool {
    let name = name.to_lowercase();
    name.char_indices()
        .filter(|(i, _)| {
            *i == 0
                || name[..*i]
                    .chars()
                    .next_back()
                    .is_some_and(|prev| !prev.is_alphanumeric())
        })
        .any(|(i, _)| name[i..].starts_with(query))
}
