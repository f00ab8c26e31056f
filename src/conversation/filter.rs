//! Time zones, date ranges, and sender filters.
//!
//! Date ranges are half-open: `from` is inclusive, `to` is exclusive, so
//! `--to-date 2024-01-17` stops right before midnight on the 17th.
//!
//! CHANGELOG:
//! - 10/18/2026 - Union semantics for repeated --from-person values
//! - 10/18/2026 - Initial filter engine

use chrono::{
    Datelike, DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use chrono_tz::Tz;

use super::dataset::ConversationDataset;
use crate::contacts::{ContactRecord, ContactsManager};
use crate::db::queries::cocoa_to_unix;
use crate::error::{IcaError, Result};

// ============================================================================
// TIME ZONES
// ============================================================================

/// The zone timestamps are presented (and naive dates interpreted) in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetZone {
    /// The host's local zone.
    Local,
    /// An IANA zone such as `America/New_York`.
    Named(Tz),
}

impl TargetZone {
    /// Parse an IANA zone name; `None` selects the host's local zone.
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Self::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| IcaError::InvalidTimezone(name.to_string())),
        }
    }

    /// Convert a UTC instant into this zone.
    pub fn from_utc(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => utc.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => utc.with_timezone(tz).fixed_offset(),
        }
    }

    /// Convert a raw Messages `date` value into this zone.
    ///
    /// Returns `None` for values outside the representable range.
    pub fn from_cocoa(&self, raw: i64) -> Option<DateTime<FixedOffset>> {
        let (secs, nanos) = cocoa_to_unix(raw);
        DateTime::<Utc>::from_timestamp(secs, nanos).map(|utc| self.from_utc(utc))
    }

    /// Interpret a wall-clock time in this zone.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant;
    /// times skipped by a DST jump are rejected.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Local => earliest(Local.from_local_datetime(&naive)),
            Self::Named(tz) => earliest(tz.from_local_datetime(&naive)),
        }
    }
}

fn earliest<T: TimeZone>(result: LocalResult<DateTime<T>>) -> Option<DateTime<FixedOffset>> {
    result.earliest().map(|dt| dt.fixed_offset())
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Half-open `[from, to)` interval; either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl DateRange {
    /// Parse and validate user-supplied bounds.
    ///
    /// Fails with `DateRangeInvalid` when `from` is after `to`.
    pub fn parse(from: Option<&str>, to: Option<&str>, zone: TargetZone) -> Result<Self> {
        let range = Self {
            from: from.map(|s| parse_datetime(s, zone)).transpose()?,
            to: to.map(|s| parse_datetime(s, zone)).transpose()?,
        };

        if let (Some(from_dt), Some(to_dt)) = (range.from, range.to) {
            if from_dt > to_dt {
                return Err(IcaError::DateRangeInvalid {
                    from: from.unwrap_or_default().to_string(),
                    to: to.unwrap_or_default().to_string(),
                });
            }
        }

        Ok(range)
    }

    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        self.from.map_or(true, |from| *timestamp >= from)
            && self.to.map_or(true, |to| *timestamp < to)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 date or date-time. Naive values are taken to be in
/// `zone`; a bare date means midnight.
pub fn parse_datetime(input: &str, zone: TargetZone) -> Result<DateTime<FixedOffset>> {
    let trimmed = input.trim();
    let invalid = || IcaError::InvalidDate(input.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    zone.localize(naive).ok_or_else(invalid)
}

// ============================================================================
// SENDER FILTER
// ============================================================================

/// One `--from-person` value.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonToken {
    /// Messages sent by the database owner.
    Me,
    /// Messages sent by anyone else.
    Them,
    /// No filtering.
    All,
    /// Messages sent by one specific participant.
    Person(ContactRecord),
}

impl PersonToken {
    fn matches(&self, is_from_me: bool, sender_handle: Option<&str>) -> bool {
        match self {
            Self::Me => is_from_me,
            Self::Them => !is_from_me,
            Self::All => true,
            // Outgoing rows carry the recipient's handle in 1:1 threads
            Self::Person(contact) => {
                !is_from_me && sender_handle.is_some_and(|h| contact.owns_identifier(h))
            }
        }
    }
}

/// Union of `--from-person` values; empty means no filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonFilter {
    tokens: Vec<PersonToken>,
}

impl PersonFilter {
    /// A filter that keeps everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse tokens against the conversation's contacts.
    ///
    /// A person reference must match exactly one contact; zero or several
    /// matches fail with `ContactNotFound` naming the token.
    pub fn parse(tokens: &[String], contacts: &[ContactRecord]) -> Result<Self> {
        let manager = ContactsManager::from_records(contacts.to_vec());
        let tokens = tokens
            .iter()
            .map(|token| match token.trim().to_lowercase().as_str() {
                "me" => Ok(PersonToken::Me),
                "them" => Ok(PersonToken::Them),
                "all" | "both" => Ok(PersonToken::All),
                _ => match manager.find_matches(token).as_slice() {
                    [contact] => Ok(PersonToken::Person((*contact).clone())),
                    _ => Err(IcaError::ContactNotFound(vec![token.clone()])),
                },
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tokens })
    }

    pub fn matches(&self, is_from_me: bool, sender_handle: Option<&str>) -> bool {
        self.tokens.is_empty()
            || self
                .tokens
                .iter()
                .any(|token| token.matches(is_from_me, sender_handle))
    }
}

/// Keep only the messages and attachments inside `range` and sent by one of
/// `persons`.
pub fn filter(
    mut dataset: ConversationDataset,
    range: &DateRange,
    persons: &PersonFilter,
) -> ConversationDataset {
    dataset.messages.retain(|m| {
        range.contains(&m.timestamp) && persons.matches(m.is_from_me, m.sender_handle.as_deref())
    });
    dataset.attachments.retain(|a| {
        range.contains(&a.timestamp) && persons.matches(a.is_from_me, a.sender_handle.as_deref())
    });
    dataset
}
