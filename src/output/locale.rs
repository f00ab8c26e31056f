//! Host-locale digit grouping for the plain-text renderer.
//!
//! The locale is detected once, on first use, from the numeric locale
//! environment and then the system locale. A locale configured
//! explicitly before that is kept; later calls never replace it.
//!
//! CHANGELOG:
//! - 10/18/2026 - LC_ALL, LC_NUMERIC, then LANG before the system locale
//! - 10/18/2026 - Initial locale detection

use num_format::{Locale, ToFormattedString};
use std::sync::OnceLock;
use tracing::debug;

static LOCALE: OnceLock<Locale> = OnceLock::new();

/// Use `locale` for grouping unless one is already in effect.
///
/// Returns whether `locale` was applied.
pub fn configure_locale(locale: Locale) -> bool {
    LOCALE.set(locale).is_ok()
}

/// The locale in effect, detecting the host's on first call.
pub fn current_locale() -> Locale {
    *LOCALE.get_or_init(detect_locale)
}

/// Group an integer's digits with the locale in effect.
pub fn format_integer(value: i64) -> String {
    format_integer_with(value, &current_locale())
}

pub fn format_integer_with(value: i64, locale: &Locale) -> String {
    value.to_formatted_string(locale)
}

/// Environment variables that pick the numeric locale, highest priority
/// first.
const NUMERIC_LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_NUMERIC", "LANG"];

fn detect_locale() -> Locale {
    let from_env = if cfg!(unix) {
        numeric_locale_from(|var| std::env::var(var).ok())
    } else {
        None
    };
    let detected = from_env.or_else(|| sys_locale::get_locale().and_then(|name| parse_locale_name(&name)));
    debug!(locale = ?detected.map(|l| l.name()), "detected host locale");
    detected.unwrap_or(Locale::en)
}

/// The numeric locale named by the first non-empty variable among
/// `LC_ALL`, `LC_NUMERIC` and `LANG`, as looked up by `lookup`.
fn numeric_locale_from(lookup: impl Fn(&str) -> Option<String>) -> Option<Locale> {
    NUMERIC_LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.trim().is_empty())
        .and_then(|value| parse_locale_name(value.trim()))
}

/// Map a POSIX or BCP 47 locale name (`de_DE.UTF-8`, `en-US`) to a
/// `num_format` locale, falling back to the bare language.
pub fn parse_locale_name(name: &str) -> Option<Locale> {
    let base = name
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-");
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }

    Locale::from_name(&base).ok().or_else(|| {
        let language = base.split('-').next().unwrap_or_default();
        Locale::from_name(language).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_follows_locale() {
        assert_eq!(format_integer_with(1_234_567, &Locale::en), "1,234,567");
        assert_eq!(format_integer_with(1_234_567, &Locale::de), "1.234.567");
        assert_eq!(format_integer_with(999, &Locale::en), "999");
    }

    #[test]
    fn test_parse_locale_name() {
        let group = |name: &str| parse_locale_name(name).map(|l| format_integer_with(1234, &l));
        assert_eq!(group("de_DE.UTF-8").as_deref(), Some("1.234"));
        assert_eq!(group("en-US").as_deref(), Some("1,234"));
        assert_eq!(parse_locale_name("C"), None);
        assert_eq!(parse_locale_name(""), None);
    }

    #[test]
    fn test_numeric_locale_env_precedence() {
        let env = |pairs: &'static [(&'static str, &'static str)]| {
            move |var: &str| {
                pairs
                    .iter()
                    .find(|(name, _)| *name == var)
                    .map(|(_, value)| value.to_string())
            }
        };
        let group = |locale: Option<Locale>| locale.map(|l| format_integer_with(1_234_567, &l));

        let numeric_over_lang = numeric_locale_from(env(&[
            ("LANG", "en_US.UTF-8"),
            ("LC_NUMERIC", "de_DE.UTF-8"),
        ]));
        assert_eq!(group(numeric_over_lang).as_deref(), Some("1.234.567"));

        let all_over_numeric = numeric_locale_from(env(&[
            ("LC_ALL", "en_US.UTF-8"),
            ("LC_NUMERIC", "de_DE.UTF-8"),
        ]));
        assert_eq!(group(all_over_numeric).as_deref(), Some("1,234,567"));

        let empty_is_skipped = numeric_locale_from(env(&[("LC_ALL", ""), ("LANG", "de_DE.UTF-8")]));
        assert_eq!(group(empty_is_skipped).as_deref(), Some("1.234.567"));

        assert_eq!(numeric_locale_from(env(&[])), None);
    }

    #[test]
    fn test_configured_locale_is_never_overridden() {
        let first = current_locale();
        assert!(!configure_locale(Locale::fr));
        assert_eq!(current_locale(), first);
    }
}
