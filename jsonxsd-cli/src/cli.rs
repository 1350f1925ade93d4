//! Argument parsing, kept out of `jsonxsd-core` since flag parsing has
//! nothing to do with lowering a type graph into a schema.

use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LocaleArg {
    En,
    Ru,
}

impl From<LocaleArg> for jsonxsd::Locale {
    fn from(value: LocaleArg) -> Self {
        match value {
            LocaleArg::En => jsonxsd::Locale::En,
            LocaleArg::Ru => jsonxsd::Locale::Ru,
        }
    }
}

/// Infers an XSD from a JSON sample and emits it alongside a validating
/// XML serialization of that same sample.
#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    /// Path to the source JSON sample.
    pub input: String,

    /// Output basename; writes `<output>.xsd` and `<output>.xml`.
    pub output: String,

    /// Name of the top-level XSD element (and XML root tag).
    #[clap(long, default_value = "Root")]
    pub root_name: String,

    /// Locale accepted by the date/time string-format recognizer.
    #[clap(long, default_value = "en", value_enum)]
    pub locale: LocaleArg,
}
