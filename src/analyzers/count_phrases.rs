//! Occurrence counts for one or more phrases.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial phrase counter

use clap::{Arg, ArgAction, ArgMatches, Command};
use regex::RegexBuilder;

use super::Analyzer;
use crate::conversation::ConversationDataset;
use crate::error::{IcaError, Result};
use crate::output::TabularResult;

pub struct CountPhrases;

impl Analyzer for CountPhrases {
    fn name(&self) -> &'static str {
        "count_phrases"
    }

    fn about(&self) -> &'static str {
        "How often each phrase appears, in total and from each side"
    }

    fn args(&self, command: Command) -> Command {
        command
            .arg(
                Arg::new("phrases")
                    .help("One or more phrases to count")
                    .required(true)
                    .num_args(1..)
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("use_regex")
                    .long("use-regex")
                    .short('r')
                    .help("Treat phrases as regular expressions")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("case_sensitive")
                    .long("case-sensitive")
                    .short('s')
                    .help("Match case exactly")
                    .action(ArgAction::SetTrue),
            )
    }

    fn analyze(&self, dataset: &ConversationDataset, args: &ArgMatches) -> Result<TabularResult> {
        let phrases: Vec<&String> = args
            .get_many::<String>("phrases")
            .map(|values| values.collect())
            .unwrap_or_default();
        let use_regex = args.get_flag("use_regex");
        let case_sensitive = args.get_flag("case_sensitive");

        let mut result = TabularResult::new(["phrase", "count", "count_from_me", "count_from_them"]);
        for phrase in phrases {
            let pattern = if use_regex {
                phrase.clone()
            } else {
                regex::escape(phrase)
            };
            let matcher = RegexBuilder::new(&pattern)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|e| IcaError::Analyzer(format!("Invalid phrase pattern \"{}\": {}", phrase, e)))?;

            let (mut from_me, mut from_them) = (0i64, 0i64);
            for message in dataset.non_reactions() {
                let Some(text) = message.text.as_deref() else {
                    continue;
                };
                let hits = matcher.find_iter(text).count() as i64;
                if message.is_from_me {
                    from_me += hits;
                } else {
                    from_them += hits;
                }
            }
            result.push_row(vec![
                phrase.as_str().into(),
                (from_me + from_them).into(),
                from_me.into(),
                from_them.into(),
            ]);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::matches_for;
    use crate::fixtures::{dataset, message};
    use crate::output::Cell;

    fn sample() -> ConversationDataset {
        dataset(
            vec![
                message(1, "2024-01-01T09:00:00Z", true, "Haha that's great, haha"),
                message(2, "2024-01-01T09:01:00Z", false, "HAHA ok. Call me at 5.30?"),
                message(3, "2024-01-01T09:02:00Z", false, "Laughed at “Haha that's great, haha”"),
            ],
            Vec::new(),
        )
    }

    fn counts(result: &TabularResult, row: usize) -> [Cell; 3] {
        [
            result.get(row, "count").cloned().unwrap(),
            result.get(row, "count_from_me").cloned().unwrap(),
            result.get(row, "count_from_them").cloned().unwrap(),
        ]
    }

    #[test]
    fn test_case_insensitive_by_default_and_skips_reactions() {
        let analyzer = CountPhrases;
        let result = analyzer
            .analyze(&sample(), &matches_for(&analyzer, &["haha", "great"]))
            .unwrap();
        assert_eq!(result.get(0, "phrase"), Some(&Cell::Text("haha".into())));
        assert_eq!(counts(&result, 0), [Cell::Int(3), Cell::Int(2), Cell::Int(1)]);
        assert_eq!(counts(&result, 1), [Cell::Int(1), Cell::Int(1), Cell::Int(0)]);
    }

    #[test]
    fn test_case_sensitive_flag() {
        let analyzer = CountPhrases;
        let result = analyzer
            .analyze(&sample(), &matches_for(&analyzer, &["-s", "haha"]))
            .unwrap();
        assert_eq!(counts(&result, 0), [Cell::Int(1), Cell::Int(1), Cell::Int(0)]);
    }

    #[test]
    fn test_literal_phrases_are_escaped() {
        let analyzer = CountPhrases;
        let result = analyzer
            .analyze(&sample(), &matches_for(&analyzer, &["5.30", "."]))
            .unwrap();
        assert_eq!(counts(&result, 0), [Cell::Int(1), Cell::Int(0), Cell::Int(1)]);
        // "HAHA ok." and "5.30?"
        assert_eq!(counts(&result, 1), [Cell::Int(2), Cell::Int(0), Cell::Int(2)]);
    }

    #[test]
    fn test_regex_phrases() {
        let analyzer = CountPhrases;
        let result = analyzer
            .analyze(&sample(), &matches_for(&analyzer, &["--use-regex", r"\d+"]))
            .unwrap();
        assert_eq!(counts(&result, 0), [Cell::Int(2), Cell::Int(0), Cell::Int(2)]);
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let analyzer = CountPhrases;
        let err = analyzer
            .analyze(&sample(), &matches_for(&analyzer, &["-r", "(unclosed"]))
            .unwrap_err();
        assert!(matches!(err, IcaError::Analyzer(message) if message.contains("(unclosed")));
    }

    #[test]
    fn test_phrases_are_required() {
        let analyzer = CountPhrases;
        let command = analyzer.args(Command::new("count_phrases"));
        assert!(command.try_get_matches_from(["count_phrases"]).is_err());
    }
}
