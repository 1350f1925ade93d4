//! A thin wrapper around `xmltree::Element` construction. Its only
//! non-trivial behavior is rewriting `base`/`type` attribute values that
//! name an XMLSchema builtin into their `xsd:`-prefixed form, and prefixing
//! every element name it creates with `xsd:`. Keeping this in one place
//! means the type lowerer and element resolver never have to think about
//! namespace prefixes.

use jsonxsd_types::XSD_BUILTIN_BASES;
use xmltree::{Element, XMLNode};

/// Factory + attribute-rewrite helpers for the `<xsd:schema>` tree.
/// Zero-sized: every method operates on a caller-owned `xmltree::Element`.
pub struct XsdBuilder;

impl XsdBuilder {
    /// Builds a standalone `<xsd:{local_name}>` element, not yet attached to
    /// any parent.
    pub fn element(local_name: &str) -> Element {
        Element::new(&format!("xsd:{local_name}"))
    }

    /// Creates a `<xsd:{local_name}>` child under `parent` and returns a
    /// mutable reference to it so callers can keep chaining attribute/child
    /// calls on the freshly created node.
    pub fn append<'a>(parent: &'a mut Element, local_name: &str) -> &'a mut Element {
        parent.children.push(XMLNode::Element(Self::element(local_name)));
        match parent.children.last_mut().expect("just pushed") {
            XMLNode::Element(e) => e,
            XMLNode::Text(_) | XMLNode::Comment(_) | XMLNode::CData(_) | XMLNode::ProcessingInstruction(..) => {
                unreachable!("last child is always the element just pushed")
            }
        }
    }

    /// Sets an attribute, rewriting `base`/`type` values that name an
    /// XMLSchema builtin base into their `xsd:`-prefixed form.
    pub fn set_attr(element: &mut Element, key: &str, value: impl Into<String>) {
        let mut value = value.into();
        if matches!(key, "base" | "type") && XSD_BUILTIN_BASES.contains(&value.as_str()) {
            value = format!("xsd:{value}");
        }
        element.attributes.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_element_names() {
        let el = XsdBuilder::element("complexType");
        assert_eq!(el.name, "xsd:complexType");
    }

    #[test]
    fn rewrites_builtin_base_but_not_arbitrary_type() {
        let mut el = XsdBuilder::element("element");
        XsdBuilder::set_attr(&mut el, "type", "string");
        assert_eq!(el.attributes.get("type").unwrap(), "xsd:string");

        let mut el2 = XsdBuilder::element("element");
        XsdBuilder::set_attr(&mut el2, "type", "complexType1");
        assert_eq!(el2.attributes.get("type").unwrap(), "complexType1");
    }

    #[test]
    fn append_returns_attachable_child() {
        let mut parent = XsdBuilder::element("schema");
        let child = XsdBuilder::append(&mut parent, "element");
        XsdBuilder::set_attr(child, "name", "Root");
        assert_eq!(parent.children.len(), 1);
    }
}
