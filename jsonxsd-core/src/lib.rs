//! `jsonxsd-core`: the XSD synthesis engine and bidirectional JSON/XML
//! format converter. Consumes a [`typegraph::TypeRef`] and a parsed JSON
//! document; produces an XSD document and a validating XML serialization,
//! and can run the conversion in reverse.
//!
//! Each render is a fresh, self-contained call: a new lowerer, a new index,
//! a new converter. Nothing here keeps state across calls.

pub mod convert;
pub mod error;
pub mod indexer;
pub mod lower;
pub mod registry;
pub mod resolve;
pub mod string_format;
pub mod typegraph;

pub use error::{JsonXsdError, Result};
pub use string_format::{NeverRecognizer, StringFormatRecognizer};
pub use typegraph::{ClassProperty, TypeNode, TypeRef};

use convert::RootKind;
use indexer::XsdIndex;
use log::{debug, info};
use xmltree::EmitterConfig;

/// The output of a full render: the XSD document text and the matching XML
/// serialization of the input value, pretty-printed with indentation.
pub struct Rendered {
    pub xsd: String,
    pub xml: String,
}

/// Runs the full pipeline: lower the type graph, resolve top-level
/// elements, emit the schema text, re-parse it into the path-indexed
/// dictionaries, then convert `value` into XML against those dictionaries.
pub fn render(
    root_name: &str,
    root_type: &TypeRef,
    value: &serde_json::Value,
    xsd_file_name: &str,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<Rendered> {
    info!("lowering type graph rooted at '{root_name}'");
    let (mut schema, registry, types) = lower::lower_schema(root_name, root_type)?;
    resolve::resolve_elements(&mut schema, &registry, &types)?;

    let xsd = emit_pretty(&schema)?;
    debug!("emitted {} bytes of XSD", xsd.len());

    let index = XsdIndex::build(&xsd)?;
    let root_kind = root_kind_of(&index, root_name)?;

    let xml_root = convert::json_to_xml(&index, root_name, root_kind, value, xsd_file_name, recognizer)?;
    let xml = emit_pretty(&xml_root)?;

    Ok(Rendered { xsd, xml })
}

/// Parses `xml_text` back into a JSON value, driven by the same
/// path-indexed dictionaries a prior call to [`render`] would have built
/// from `xsd_text`. Exposed separately so callers can round-trip without
/// re-running the lowerer.
pub fn parse_xml(
    xsd_text: &str,
    xml_text: &str,
    root_name: &str,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<serde_json::Value> {
    let index = XsdIndex::build(xsd_text)?;
    let root_kind = root_kind_of(&index, root_name)?;
    let root = xmltree::Element::parse(xml_text.as_bytes())?;
    convert::xml_to_json(&index, root_name, root_kind, &root, recognizer)
}

fn root_kind_of(index: &XsdIndex, root_name: &str) -> Result<RootKind> {
    let type_name = index.elements.get(root_name).ok_or_else(|| {
        JsonXsdError::InternalError(format!("no top-level element named '{root_name}' in index"))
    })?;
    if index.array_by_path.contains_key(root_name) {
        return Ok(RootKind::Array);
    }
    if index.object_by_path.contains_key(root_name) {
        return Ok(RootKind::Class);
    }
    if index.union_by_path.contains_key(root_name) {
        return Ok(RootKind::Union);
    }
    if jsonxsd_types::PrimitiveKind::from_type_name(type_name).is_some() {
        return Ok(RootKind::Primitive);
    }
    Err(JsonXsdError::InternalError(format!(
        "top-level element '{root_name}' resolves to unclassifiable type '{type_name}'"
    )))
}

fn emit_pretty(el: &xmltree::Element) -> Result<String> {
    let mut out = Vec::new();
    el.write_with_config(&mut out, EmitterConfig::new().perform_indent(true))?;
    Ok(String::from_utf8(out).expect("xmltree only ever writes UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use string_format::NeverRecognizer;
    use typegraph::{ClassProperty, TypeNode};

    #[test]
    fn renders_primitive_class_end_to_end() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![
                ("a".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::Integer), optional: false }),
                ("b".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::String), optional: true }),
            ],
        });
        let value = serde_json::json!({"a": 1, "b": "x"});
        let rendered = render("Root", &root, &value, "root.xsd", &NeverRecognizer).unwrap();

        assert!(rendered.xsd.contains("complexType1"));
        assert!(rendered.xml.contains("<a>1</a>"));
        assert!(rendered.xml.contains("<b>x</b>"));
        assert!(rendered.xml.contains("xsd:noNamespaceSchemaLocation=\"root.xsd\""));

        let back = parse_xml(&rendered.xsd, &rendered.xml, "Root", &NeverRecognizer).unwrap();
        assert_eq!(back, value);
    }
}
