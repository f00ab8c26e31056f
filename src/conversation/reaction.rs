//! Tapback (reaction) detection.
//!
//! Reactions arrive as ordinary messages whose text follows a fixed
//! template, e.g. `Loved “see you soon”` or `Laughed at an image`.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial reaction heuristic

use regex::Regex;
use std::sync::OnceLock;

const REACTION_PATTERN: &str =
    r"^(Loved|Liked|Disliked|Laughed at|Emphasized|Questioned|Reacted) (“.*?”|an \w+|.*? to “.*?”)$";

static REACTION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Whether the full message text is a reaction template.
pub fn is_reaction(text: &str) -> bool {
    REACTION_REGEX
        .get_or_init(|| Regex::new(REACTION_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}
