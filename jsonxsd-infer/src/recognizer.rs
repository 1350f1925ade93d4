//! A concrete `StringFormatRecognizer` (the capability `jsonxsd-core`
//! declares but never implements — it only consumes one). Built on
//! `chrono` (already a dependency elsewhere in this workspace's ancestry),
//! configurable by locale: the reference recognizer's date/time parsing
//! was implicitly Russian; this exposes the choice instead of
//! hard-coding it.

use chrono::NaiveDate;
use jsonxsd_core::StringFormatRecognizer;
use regex::Regex;
use std::sync::OnceLock;

/// Which day/month textual conventions and AM/PM spellings a recognizer
/// accepts. Both locales accept the same `dd[/.]mm[/.]yyyy` and
/// `HH:MM`/`hh:mm AM|PM` shapes; they differ only in
/// which literal AM/PM markers (`a.m.`/`p.m.` vs their transliterations)
/// are recognized, since the underlying date patterns carry no month
/// names to localize.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Locale {
    En,
    Ru,
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(0?[1-9]|[12][0-9]|3[01])[/.](0?[1-9]|1[0-2])[/.]\d{4}$").unwrap()
    })
}

fn time_24h_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").unwrap())
}

fn time_12h_re(locale: Locale) -> &'static Regex {
    static EN: OnceLock<Regex> = OnceLock::new();
    static RU: OnceLock<Regex> = OnceLock::new();
    match locale {
        Locale::En => EN.get_or_init(|| {
            Regex::new(r"^(0?[0-9]|1[01]):([0-5][0-9]) (AM|PM|a\.m\.|p\.m\.)$").unwrap()
        }),
        // Russian has no native AM/PM convention; accept the same markers
        // plus the "утра"/"вечера" glosses a transliterated sample might use.
        Locale::Ru => RU.get_or_init(|| {
            Regex::new(r"^(0?[0-9]|1[01]):([0-5][0-9]) (AM|PM|a\.m\.|p\.m\.|утра|вечера)$").unwrap()
        }),
    }
}

fn date_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(0?[1-9]|[12][0-9]|3[01])[/.](0?[1-9]|1[0-2])[/.]\d{4}[T ]",
            r"([0-1]?[0-9]|2[0-3]):([0-5][0-9])$"
        ))
        .unwrap()
    })
}

fn uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(https?|ftp)://[^{}]+\.[^{}]+$").unwrap())
}

/// Recognizes the four string formats the format converter's coercion
/// tables branch on, in the accepted formats documented on
/// [`Self::new`].
pub struct ChronoFormatRecognizer {
    locale: Locale,
}

impl ChronoFormatRecognizer {
    /// Accepted formats:
    /// - date: `dd/mm/yyyy` or `dd.mm.yyyy`, or an ISO `yyyy-mm-dd` (parsed
    ///   via `chrono::NaiveDate` as a concession to inputs the pattern-only
    ///   reference recognizer never saw).
    /// - time: `HH:MM` (24h) or `h:MM AM|PM|a.m.|p.m.` (12h).
    /// - date-time: a date and a time joined by `T` or a space.
    /// - uri: `http://`, `https://` or `ftp://` followed by a host and path
    ///   containing no `{}` placeholders.
    pub fn new(locale: Locale) -> Self {
        ChronoFormatRecognizer { locale }
    }
}

impl Default for ChronoFormatRecognizer {
    fn default() -> Self {
        ChronoFormatRecognizer::new(Locale::En)
    }
}

impl StringFormatRecognizer for ChronoFormatRecognizer {
    fn is_date(&self, value: &str) -> bool {
        date_re().is_match(value) || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
    }

    fn is_time(&self, value: &str) -> bool {
        time_24h_re().is_match(value) || time_12h_re(self.locale).is_match(value)
    }

    fn is_date_time(&self, value: &str) -> bool {
        date_time_re().is_match(value)
    }

    fn is_uri(&self, value: &str) -> bool {
        uri_re().is_match(value)
    }
}
