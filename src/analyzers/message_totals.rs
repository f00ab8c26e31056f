//! Message and reaction totals, by person and overall.
//!
//! CHANGELOG:
//! - 10/18/2026 - "Today" follows the dataset's zone, not the first message's offset
//! - 10/18/2026 - Ported analytics counts to the analyzer interface

use chrono::{DateTime, NaiveDate, Utc};
use clap::ArgMatches;
use std::collections::BTreeMap;

use super::Analyzer;
use crate::conversation::{ConversationDataset, TargetZone};
use crate::error::Result;
use crate::output::TabularResult;

pub struct MessageTotals;

impl Analyzer for MessageTotals {
    fn name(&self) -> &'static str {
        "message_totals"
    }

    fn about(&self) -> &'static str {
        "Message and reaction counts by person, plus days messaged, missed, and unanswered"
    }

    fn analyze(&self, dataset: &ConversationDataset, _args: &ArgMatches) -> Result<TabularResult> {
        Ok(totals(dataset, today_in(dataset.zone, Utc::now())))
    }
}

/// The calendar date of `now` in the zone the timestamps were converted to.
fn today_in(zone: TargetZone, now: DateTime<Utc>) -> NaiveDate {
    zone.from_utc(now).date_naive()
}

#[derive(Default)]
struct DayCounts {
    from_me: usize,
    from_them: usize,
}

fn totals(dataset: &ConversationDataset, today: NaiveDate) -> TabularResult {
    let count = |reaction: bool, from_me: Option<bool>| {
        dataset
            .messages
            .iter()
            .filter(|m| m.is_reaction == reaction)
            .filter(|m| from_me.map_or(true, |me| m.is_from_me == me))
            .count()
    };

    let mut days: BTreeMap<NaiveDate, DayCounts> = BTreeMap::new();
    for message in &dataset.messages {
        let day = days.entry(message.timestamp.date_naive()).or_default();
        if message.is_from_me {
            day.from_me += 1;
        } else {
            day.from_them += 1;
        }
    }

    let days_messaged = days.len() as i64;
    let total_days = days
        .keys()
        .next()
        .map_or(0, |first| (today - *first).num_days() + 1);
    let days_with_no_reply = days
        .values()
        .filter(|d| (d.from_me == 0) != (d.from_them == 0))
        .count();

    let rows: [(&str, i64); 9] = [
        ("messages", count(false, None) as i64),
        ("messages_from_me", count(false, Some(true)) as i64),
        ("messages_from_them", count(false, Some(false)) as i64),
        ("reactions", count(true, None) as i64),
        ("reactions_from_me", count(true, Some(true)) as i64),
        ("reactions_from_them", count(true, Some(false)) as i64),
        ("days_messaged", days_messaged),
        ("days_missed", (total_days - days_messaged).max(0)),
        ("days_with_no_reply", days_with_no_reply as i64),
    ];

    let mut result = TabularResult::new(["metric", "total"]);
    for (metric, total) in rows {
        result.push_row(vec![metric.into(), total.into()]);
    }
    result.set_index("metric")
}
