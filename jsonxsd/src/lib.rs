//! Public facade wiring `jsonxsd-infer`'s type inference into
//! `jsonxsd-core`'s synthesis engine: the one-call entry point a CLI (or
//! any other host) needs to go from JSON samples to an XSD/XML pair, and
//! back.

pub use jsonxsd_core::{JsonXsdError, Result};
pub use jsonxsd_infer::{ChronoFormatRecognizer, Locale};

use jsonxsd_core::Rendered;
use serde_json::Value;

/// Infers a type graph from `samples`, then renders `representative`
/// against it: an XSD document plus the XML serialization that validates
/// against it.
///
/// `xsd_file_name` is the basename written into the XML's
/// `xsd:noNamespaceSchemaLocation` attribute — callers writing
/// `<name>.xsd`/`<name>.xml` to disk should pass `<name>.xsd`.
pub fn generate(
    root_name: &str,
    samples: &[Value],
    representative: &Value,
    xsd_file_name: &str,
    locale: Locale,
) -> Result<Rendered> {
    let recognizer = ChronoFormatRecognizer::new(locale);
    let root_type = jsonxsd_infer::infer_type_graph(samples, &recognizer);
    jsonxsd_core::render(root_name, &root_type, representative, xsd_file_name, &recognizer)
}

/// Parses an XML document back into JSON, driven by the XSD text a prior
/// [`generate`] call produced.
pub fn parse(xsd_text: &str, xml_text: &str, root_name: &str, locale: Locale) -> Result<Value> {
    let recognizer = ChronoFormatRecognizer::new(locale);
    jsonxsd_core::parse_xml(xsd_text, xml_text, root_name, &recognizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_and_round_trips_a_mixed_sample() {
        let samples = vec![
            serde_json::json!({"id": 1, "name": "a", "tags": ["x", "y"], "created": "01.02.2023"}),
            serde_json::json!({"id": "legacy-7", "name": "b", "tags": [], "created": "03.04.2024"}),
        ];
        let representative = samples[0].clone();

        let rendered = generate("Record", &samples, &representative, "record.xsd", Locale::En).unwrap();
        assert!(rendered.xsd.contains("xsd:schema"));
        assert!(rendered.xml.contains("<created>01.02.2023</created>"));

        let back = parse(&rendered.xsd, &rendered.xml, "Record", Locale::En).unwrap();
        assert_eq!(back, representative);
    }
}
