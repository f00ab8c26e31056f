//! Resolve → locate → extract → filter, for one conversation request.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial pipeline entrypoint

use tracing::info;

use crate::config::SourcePaths;
use crate::contacts::resolve;
use crate::conversation::{extract, filter, locate, ConversationDataset, DateRange, PersonFilter, TargetZone};
use crate::db::connection::open_read_only;
use crate::error::Result;

/// Already-parsed user options for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationRequest {
    /// Names, phone numbers, or email addresses of every other participant.
    pub contacts: Vec<String>,
    /// IANA zone name; `None` means the host's local zone.
    pub timezone: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    /// `me`, `them`, `all`/`both`, or a participant reference.
    pub from_person: Vec<String>,
}

impl ConversationRequest {
    pub fn new<I, S>(contacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contacts: contacts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Build the filtered dataset for `request`.
///
/// Time zone and date range are validated before any database is opened.
/// Contact sources are closed before the Messages database is opened.
pub fn get_conversation_data(
    paths: &SourcePaths,
    request: &ConversationRequest,
) -> Result<ConversationDataset> {
    let zone = TargetZone::parse(request.timezone.as_deref())?;
    let range = DateRange::parse(
        request.from_date.as_deref(),
        request.to_date.as_deref(),
        zone,
    )?;

    let contacts = resolve(&paths.contact_dbs, &request.contacts)?;

    let dataset = {
        let conn = open_read_only(&paths.chat_db)?;
        let chat_ids = locate(&conn, &contacts)?;
        extract(&conn, &chat_ids, &contacts, zone, &range)?
    };

    let persons = PersonFilter::parse(&request.from_person, &dataset.contacts)?;
    let dataset = filter(dataset, &range, &persons);

    info!(
        messages = dataset.messages.len(),
        attachments = dataset.attachments.len(),
        "conversation ready"
    );
    Ok(dataset)
}
