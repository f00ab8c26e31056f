//! Most frequently used emojis.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial emoji ranking

use clap::{value_parser, Arg, ArgMatches, Command};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::Analyzer;
use crate::conversation::ConversationDataset;
use crate::error::Result;
use crate::output::TabularResult;

const DEFAULT_RESULT_COUNT: usize = 10;

/// Fitzpatrick modifiers U+1F3FB..=U+1F3FF.
const SKIN_TONES: [char; 5] = ['🏻', '🏼', '🏽', '🏾', '🏿'];

/// Flags, keycaps, and pictographs with their modifiers and ZWJ sequences.
const EMOJI_PATTERN: &str = r"(?x)
    \p{Regional_Indicator}{2}
    | [0-9\#*]\x{FE0F}?\x{20E3}
    | \p{Extended_Pictographic}[\x{FE0F}\p{Emoji_Modifier}]*
      (?:\x{200D}\p{Extended_Pictographic}[\x{FE0F}\p{Emoji_Modifier}]*)*
";

fn emoji_regex() -> Option<&'static Regex> {
    static EMOJI: OnceLock<Option<Regex>> = OnceLock::new();
    EMOJI.get_or_init(|| Regex::new(EMOJI_PATTERN).ok()).as_ref()
}

pub struct MostFrequentEmojis;

impl Analyzer for MostFrequentEmojis {
    fn name(&self) -> &'static str {
        "most_frequent_emojis"
    }

    fn about(&self) -> &'static str {
        "The most frequently used emojis across the conversation"
    }

    fn args(&self, command: Command) -> Command {
        command.arg(
            Arg::new("result_count")
                .long("result-count")
                .help("Number of emojis to rank")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
    }

    fn analyze(&self, dataset: &ConversationDataset, args: &ArgMatches) -> Result<TabularResult> {
        let limit = args
            .get_one::<usize>("result_count")
            .copied()
            .unwrap_or(DEFAULT_RESULT_COUNT);

        let mut result = TabularResult::new(["emoji", "count"]);
        for (emoji, count) in rank_emojis(dataset).into_iter().take(limit) {
            result.push_row(vec![emoji.into(), count.into()]);
        }
        Ok(result)
    }
}

/// Every emoji in non-reaction messages with skin tones removed, most
/// common first. Ties keep first-seen order.
fn rank_emojis(dataset: &ConversationDataset) -> Vec<(String, usize)> {
    let Some(pattern) = emoji_regex() else {
        return Vec::new();
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for text in dataset.non_reactions().filter_map(|m| m.text.as_deref()) {
        for found in pattern.find_iter(text) {
            let emoji: String = found.as_str().chars().filter(|c| !SKIN_TONES.contains(c)).collect();
            let count = counts.entry(emoji.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(emoji);
            }
            *count += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|emoji| {
            let count = counts.get(&emoji).copied().unwrap_or(0);
            (emoji, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
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
                message(1, "2024-01-01T09:00:00Z", true, "Midweek check-in 😀😀👍🏽"),
                message(2, "2024-01-01T09:01:00Z", false, "Almost done 👍 🇺🇸"),
                message(3, "2024-01-01T09:02:00Z", false, "Party 🎉 👨‍👩‍👧"),
                message(4, "2024-01-01T09:03:00Z", false, "Loved “🎉🎉🎉”"),
                message(5, "2024-01-01T09:04:00Z", false, "No emoji 123 here #1"),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_ranking_strips_skin_tones() {
        let ranked = rank_emojis(&sample());
        assert_eq!(
            ranked,
            vec![
                ("😀".to_string(), 2),
                ("👍".to_string(), 2),
                ("🇺🇸".to_string(), 1),
                ("🎉".to_string(), 1),
                ("👨‍👩‍👧".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_result_count_limits_rows() {
        let analyzer = MostFrequentEmojis;
        let result = analyzer
            .analyze(&sample(), &matches_for(&analyzer, &["--result-count", "2"]))
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(1, "emoji"), Some(&Cell::Text("👍".into())));
        assert_eq!(result.get(1, "count"), Some(&Cell::Int(2)));

        let all = analyzer.analyze(&sample(), &matches_for(&analyzer, &[])).unwrap();
        assert_eq!(all.len(), 5);
    }
}
