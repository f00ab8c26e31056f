//! Per-day message counts.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial totals by day

use chrono::NaiveDate;
use clap::ArgMatches;
use std::collections::BTreeMap;

use super::Analyzer;
use crate::conversation::ConversationDataset;
use crate::error::Result;
use crate::output::TabularResult;

pub struct TotalsByDay;

impl Analyzer for TotalsByDay {
    fn name(&self) -> &'static str {
        "totals_by_day"
    }

    fn about(&self) -> &'static str {
        "Messages sent per day, by each side, for every day with at least one message"
    }

    fn analyze(&self, dataset: &ConversationDataset, _args: &ArgMatches) -> Result<TabularResult> {
        // (sent, sent by me)
        let mut days: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        for message in &dataset.messages {
            let day = days.entry(message.timestamp.date_naive()).or_default();
            day.0 += 1;
            if message.is_from_me {
                day.1 += 1;
            }
        }

        let mut result = TabularResult::new(["date", "#_sent", "#_sent_by_me", "#_sent_by_them"]);
        for (date, (sent, by_me)) in days {
            result.push_row(vec![date.into(), sent.into(), by_me.into(), (sent - by_me).into()]);
        }
        Ok(result.set_index("date"))
    }
}
