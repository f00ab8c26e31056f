//! Attachment and shared-link counts by kind.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial attachment totals

use clap::ArgMatches;
use regex::Regex;
use std::sync::OnceLock;

use super::Analyzer;
use crate::conversation::ConversationDataset;
use crate::error::Result;
use crate::output::TabularResult;

pub struct AttachmentTotals;

struct LinkPatterns {
    youtube: Regex,
    apple_music: Regex,
    spotify: Regex,
}

fn link_patterns() -> Option<&'static LinkPatterns> {
    static PATTERNS: OnceLock<Option<LinkPatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(LinkPatterns {
                youtube: Regex::new(r"https?://(?:www\.)?(?:youtube\.com|youtu\.be)/\S*").ok()?,
                apple_music: Regex::new(r"https?://music\.apple\.com/\S*").ok()?,
                spotify: Regex::new(r"https?://open\.spotify\.com/\S*").ok()?,
            })
        })
        .as_ref()
}

impl Analyzer for AttachmentTotals {
    fn name(&self) -> &'static str {
        "attachment_totals"
    }

    fn about(&self) -> &'static str {
        "Counts of GIFs, voice and video recordings, and YouTube, Apple Music, and Spotify links"
    }

    fn analyze(&self, dataset: &ConversationDataset, _args: &ArgMatches) -> Result<TabularResult> {
        let links = |pick: fn(&LinkPatterns) -> &Regex| -> i64 {
            let Some(patterns) = link_patterns() else {
                return 0;
            };
            let pattern = pick(patterns);
            dataset
                .non_reactions()
                .filter_map(|m| m.text.as_deref())
                .map(|text| pattern.find_iter(text).count() as i64)
                .sum()
        };
        let attachments = |matches: fn(Option<&str>, Option<&str>) -> bool| -> i64 {
            dataset
                .attachments
                .iter()
                .filter(|a| matches(a.mime_type.as_deref(), a.filename.as_deref()))
                .count() as i64
        };

        let rows: [(&str, i64); 6] = [
            ("gifs", attachments(|mime, _| mime == Some("image/gif"))),
            ("youtube_videos", links(|p| &p.youtube)),
            ("apple_music", links(|p| &p.apple_music)),
            ("spotify", links(|p| &p.spotify)),
            (
                "audio_messages",
                attachments(|_, file| file.is_some_and(|f| f.ends_with(".caf"))),
            ),
            (
                "recorded_videos",
                attachments(|mime, _| mime == Some("video/quicktime")),
            ),
        ];

        let mut result = TabularResult::new(["type", "total"]);
        for (kind, total) in rows {
            result.push_row(vec![kind.into(), total.into()]);
        }
        Ok(result.set_index("type").sort_descending_by("total"))
    }
}
