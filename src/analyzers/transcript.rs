//! Full transcript of the conversation, reactions included.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial transcript

use clap::ArgMatches;

use super::Analyzer;
use crate::conversation::ConversationDataset;
use crate::error::Result;
use crate::output::{Cell, TabularResult};

/// Placeholder character Messages puts where an attachment sits in the text.
const OBJECT_REPLACEMENT: char = '\u{fffc}';

pub struct Transcript;

impl Analyzer for Transcript {
    fn name(&self) -> &'static str {
        "transcript"
    }

    fn about(&self) -> &'static str {
        "Every message and reaction in order (attachment files not included)"
    }

    fn analyze(&self, dataset: &ConversationDataset, _args: &ArgMatches) -> Result<TabularResult> {
        let mut messages: Vec<_> = dataset.messages.iter().collect();
        messages.sort_by_key(|m| m.timestamp);

        let yes_no = |flag: bool| Cell::from(if flag { "Yes" } else { "No" });
        let mut result = TabularResult::new(["timestamp", "is_from_me", "is_reaction", "message"]);
        for message in messages {
            let text = message
                .text
                .as_deref()
                .map(|t| t.replace(OBJECT_REPLACEMENT, "(attachment)"));
            result.push_row(vec![
                message.timestamp.into(),
                yes_no(message.is_from_me),
                yes_no(message.is_reaction),
                text.into(),
            ]);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::matches_for;
    use crate::fixtures::{dataset, message, timestamp};
    use crate::output::{render_to_bytes, OutputFormat, RenderOptions};

    fn sample() -> ConversationDataset {
        let mut late = message(2, "2024-01-01T10:00:00-05:00", false, "Loved “Photo \u{fffc}”");
        late.is_reaction = true;
        let mut empty = message(3, "2024-01-01T09:30:00-05:00", true, "");
        empty.text = None;
        dataset(
            vec![
                late,
                message(1, "2024-01-01T09:00:00-05:00", true, "Photo \u{fffc}"),
                empty,
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_rows_sorted_with_placeholders_replaced() {
        let analyzer = Transcript;
        let result = analyzer.analyze(&sample(), &matches_for(&analyzer, &[])).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(
            result.get(0, "timestamp"),
            Some(&Cell::Timestamp(timestamp("2024-01-01T09:00:00-05:00")))
        );
        assert_eq!(result.get(0, "message"), Some(&Cell::Text("Photo (attachment)".into())));
        assert_eq!(result.get(0, "is_from_me"), Some(&Cell::Text("Yes".into())));
        assert_eq!(result.get(1, "message"), Some(&Cell::Null));
        assert_eq!(result.get(2, "is_reaction"), Some(&Cell::Text("Yes".into())));
        assert_eq!(result.get(2, "is_from_me"), Some(&Cell::Text("No".into())));
    }

    #[test]
    fn test_csv_keeps_offset() {
        let analyzer = Transcript;
        let result = analyzer.analyze(&sample(), &matches_for(&analyzer, &[])).unwrap();
        let bytes = render_to_bytes(&result, OutputFormat::Csv, &RenderOptions::default()).unwrap();
        let csv = String::from_utf8(bytes).unwrap();
        assert!(csv.starts_with(
            "Timestamp,Is From Me,Is Reaction,Message\n2024-01-01 09:00:00-05:00,Yes,No,Photo (attachment)\n"
        ));
    }
}
