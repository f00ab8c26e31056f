//! Built-in analyzers.
//!
//! An analyzer sees one extracted [`ConversationDataset`] plus its own
//! command-line arguments and returns a [`TabularResult`]. Analyzers are
//! compiled in and looked up by name; there is no loading from files.
//!
//! CHANGELOG:
//! - 10/18/2026 - Analyzer trait and registry; replaced analytics commands

pub mod attachment_totals;
pub mod count_phrases;
pub mod message_totals;
pub mod most_frequent_emojis;
pub mod totals_by_day;
pub mod transcript;

use clap::{ArgMatches, Command};
use std::collections::BTreeMap;

use crate::conversation::ConversationDataset;
use crate::error::Result;
use crate::output::TabularResult;

/// One report over a conversation.
pub trait Analyzer {
    /// Subcommand name, also the name a symlinked binary is invoked under.
    fn name(&self) -> &'static str;

    /// One-line description for `--help`.
    fn about(&self) -> &'static str;

    /// Add analyzer-specific arguments. Most analyzers take none.
    fn args(&self, command: Command) -> Command {
        command
    }

    fn analyze(&self, dataset: &ConversationDataset, args: &ArgMatches) -> Result<TabularResult>;
}

/// Name -> analyzer, for every analyzer shipped with ica.
pub fn builtin() -> BTreeMap<&'static str, Box<dyn Analyzer>> {
    let analyzers: Vec<Box<dyn Analyzer>> = vec![
        Box::new(attachment_totals::AttachmentTotals),
        Box::new(count_phrases::CountPhrases),
        Box::new(message_totals::MessageTotals),
        Box::new(most_frequent_emojis::MostFrequentEmojis),
        Box::new(totals_by_day::TotalsByDay),
        Box::new(transcript::Transcript),
    ];
    analyzers.into_iter().map(|a| (a.name(), a)).collect()
}

/// Look up a built-in analyzer.
pub fn find(name: &str) -> Option<Box<dyn Analyzer>> {
    builtin().remove(name)
}

/// Parse `argv` against `analyzer`'s own arguments. Test helper.
#[cfg(test)]
pub(crate) fn matches_for(analyzer: &dyn Analyzer, argv: &[&str]) -> ArgMatches {
    let command = analyzer.args(Command::new(analyzer.name()));
    let argv = std::iter::once(analyzer.name()).chain(argv.iter().copied());
    command.try_get_matches_from(argv).unwrap()
}
