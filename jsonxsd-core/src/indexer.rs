//! The XSD indexer: re-parses the freshly emitted XSD text, classifies
//! every named type, then walks from each top-level `<xsd:element>` to
//! build the path-indexed dictionaries the format converter drives off of.
//!
//! `xmltree::Element::parse` resolves the document's `xmlns:xsd` binding
//! and strips it from every element's `name`, so this module matches
//! local names (`"element"`, `"all"`, …) rather than the `"xsd:element"`
//! literals the builder/lowerer write before serialization.

use crate::error::{JsonXsdError, Result};
use jsonxsd_types::PrimitiveKind;
use log::debug;
use std::collections::{HashMap, HashSet};
use xmltree::Element;

#[derive(Clone, Debug, PartialEq)]
pub enum StructuralKind {
    Primitive(PrimitiveKind),
    Array,
    Class,
    Union,
    None,
}

#[derive(Clone, Debug)]
pub struct PropEntry {
    pub type_name: String,
    pub optional: bool,
    pub kind: StructuralKind,
}

#[derive(Clone, Debug)]
pub struct ArrayEntry {
    pub item_tag: String,
    pub item_type_name: String,
    pub item_kind: StructuralKind,
}

/// The three by-path dictionaries the format converter consults, plus the
/// by-type-name tables retained straight out of the re-parsed document for
/// deduplicating named types.
#[derive(Default)]
pub struct XsdIndex {
    pub object_by_path: HashMap<String, Vec<(String, PropEntry)>>,
    pub array_by_path: HashMap<String, ArrayEntry>,
    pub union_by_path: HashMap<String, Vec<PrimitiveKind>>,
    pub elements: HashMap<String, String>,
    simple_types: HashMap<String, Element>,
    complex_types: HashMap<String, Element>,
}

impl XsdIndex {
    /// Builds the index by re-parsing `xsd_text`. Re-parsing rather than
    /// threading the dictionaries straight out of the lowerer keeps the
    /// indexer decoupled from the in-memory type graph: it only ever needs
    /// to understand the schema it's handed, never the graph behind it.
    pub fn build(xsd_text: &str) -> Result<Self> {
        debug!("re-parsing emitted schema ({} bytes) to build path-indexed dictionaries", xsd_text.len());
        let schema = Element::parse(xsd_text.as_bytes())?;
        let mut index = XsdIndex::default();

        for child in &schema.children {
            let Some(el) = child.as_element() else { continue };
            match el.name.as_str() {
                "simpleType" => {
                    if let Some(name) = el.attributes.get("name") {
                        index.simple_types.insert(name.clone(), el.clone());
                    }
                }
                "complexType" => {
                    if let Some(name) = el.attributes.get("name") {
                        index.complex_types.insert(name.clone(), el.clone());
                    }
                }
                "element" => {
                    if let (Some(name), Some(ty)) =
                        (el.attributes.get("name"), el.attributes.get("type"))
                    {
                        index.elements.insert(name.clone(), ty.clone());
                    }
                }
                _ => {}
            }
        }

        let roots: Vec<(String, String)> =
            index.elements.iter().map(|(tag, ty)| (tag.clone(), ty.clone())).collect();
        for (tag, type_name) in roots {
            let mut visiting = HashSet::new();
            index.descend(&tag, &type_name, &mut visiting)?;
        }

        Ok(index)
    }

    /// Kind classification of a referenced type name.
    fn classify(&self, type_name: &str) -> StructuralKind {
        if let Some(primitive) = PrimitiveKind::from_type_name(type_name) {
            return StructuralKind::Primitive(primitive);
        }
        if let Some(simple) = self.simple_types.get(type_name) {
            if union_members(simple).is_some() {
                return StructuralKind::Union;
            }
        }
        if let Some(complex) = self.complex_types.get(type_name) {
            if complex.get_child("sequence").is_some() {
                return StructuralKind::Array;
            }
            if complex.get_child("all").is_some() {
                return StructuralKind::Class;
            }
        }
        StructuralKind::None
    }

    fn union_kinds(&self, type_name: &str) -> Vec<PrimitiveKind> {
        self.simple_types
            .get(type_name)
            .and_then(union_members)
            .unwrap_or_default()
    }

    /// Recursive descent from a declared element (or array item, or class
    /// property) down into its structure, extending `path` by `.childTag`
    /// at each step. `visiting` breaks cycles that a self-referential type
    /// graph can introduce (e.g. a class whose array property's item type
    /// is the class itself): once a type name reappears on the current
    /// descent chain, its immediate kind is still recorded but recursion
    /// stops instead of re-walking the same structure forever.
    fn descend(&mut self, path: &str, type_name: &str, visiting: &mut HashSet<String>) -> Result<()> {
        if !visiting.insert(type_name.to_string()) {
            return Ok(());
        }

        match self.classify(type_name) {
            StructuralKind::Union => {
                let kinds = self.union_kinds(type_name);
                self.union_by_path.insert(path.to_string(), kinds);
            }
            StructuralKind::Array => {
                let complex = self.complex_types.get(type_name).cloned().ok_or_else(|| {
                    JsonXsdError::InternalError(format!("array type '{type_name}' vanished during indexing"))
                })?;
                let sequence = complex.get_child("sequence").ok_or_else(|| {
                    JsonXsdError::InternalError(format!("array type '{type_name}' has no sequence"))
                })?;
                let item = sequence
                    .children
                    .iter()
                    .find_map(|c| c.as_element())
                    .ok_or_else(|| {
                        JsonXsdError::InternalError(format!("array type '{type_name}' sequence has no item element"))
                    })?;
                let item_tag = item
                    .attributes
                    .get("name")
                    .cloned()
                    .ok_or_else(|| JsonXsdError::InternalError("array item element has no name".to_string()))?;
                let item_type = item
                    .attributes
                    .get("type")
                    .cloned()
                    .ok_or_else(|| JsonXsdError::InternalError("array item element has no type".to_string()))?;
                let item_kind = self.classify(&item_type);
                self.array_by_path.insert(
                    path.to_string(),
                    ArrayEntry { item_tag: item_tag.clone(), item_type_name: item_type.clone(), item_kind },
                );
                let item_path = format!("{path}.{item_tag}");
                self.descend(&item_path, &item_type, visiting)?;
            }
            StructuralKind::Class => {
                let complex = self.complex_types.get(type_name).cloned().ok_or_else(|| {
                    JsonXsdError::InternalError(format!("class type '{type_name}' vanished during indexing"))
                })?;
                let all = complex.get_child("all").ok_or_else(|| {
                    JsonXsdError::InternalError(format!("class type '{type_name}' has no all"))
                })?;
                let mut props = Vec::new();
                for child in &all.children {
                    let Some(el) = child.as_element() else { continue };
                    if el.name != "element" {
                        continue;
                    }
                    let prop_name = el
                        .attributes
                        .get("name")
                        .cloned()
                        .ok_or_else(|| JsonXsdError::InternalError("class property has no name".to_string()))?;
                    let prop_type = el
                        .attributes
                        .get("type")
                        .cloned()
                        .ok_or_else(|| JsonXsdError::InternalError("class property has no type".to_string()))?;
                    let optional = el.attributes.get("minOccurs").map(|v| v == "0").unwrap_or(false);
                    let kind = self.classify(&prop_type);
                    props.push((prop_name.clone(), PropEntry { type_name: prop_type.clone(), optional, kind }));

                    let prop_path = format!("{path}.{prop_name}");
                    self.descend(&prop_path, &prop_type, visiting)?;
                }
                self.object_by_path.insert(path.to_string(), props);
            }
            StructuralKind::Primitive(_) | StructuralKind::None => {}
        }

        visiting.remove(type_name);
        Ok(())
    }
}

/// If `simple_type` is a `<union>` of `<simpleType><restriction base=…/></simpleType>`
/// members each naming a known primitive, returns the ordered kind list;
/// `None` otherwise.
fn union_members(simple_type: &Element) -> Option<Vec<PrimitiveKind>> {
    let union_el = simple_type.get_child("union")?;
    let mut kinds = Vec::new();
    for child in &union_el.children {
        let member = child.as_element()?;
        if member.name != "simpleType" {
            return None;
        }
        let restriction = member.get_child("restriction")?;
        let base = restriction.attributes.get("base")?;
        kinds.push(PrimitiveKind::from_type_name(base)?);
    }
    Some(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_schema;
    use crate::resolve::resolve_elements;
    use crate::typegraph::{ClassProperty, TypeNode, TypeRef};
    use xmltree::EmitterConfig;

    fn render_schema_text(root_name: &str, root: &TypeRef) -> String {
        let (mut schema, registry, types) = lower_schema(root_name, root).unwrap();
        resolve_elements(&mut schema, &registry, &types).unwrap();
        let mut out = Vec::new();
        schema
            .write_with_config(&mut out, EmitterConfig::new().perform_indent(true))
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn indexes_a_primitive_class() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![
                ("a".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::Integer), optional: false }),
                ("b".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::String), optional: true }),
            ],
        });
        let text = render_schema_text("Root", &root);
        let index = XsdIndex::build(&text).unwrap();

        assert_eq!(index.elements.get("Root").unwrap(), "complexType1");
        let props = index.object_by_path.get("Root").unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].0, "a");
        assert!(matches!(props[0].1.kind, StructuralKind::Primitive(PrimitiveKind::Integer)));
        assert!(!props[0].1.optional);
        assert_eq!(props[1].0, "b");
        assert!(props[1].1.optional);
    }

    #[test]
    fn indexes_an_array_of_integers() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![(
                "xs".to_string(),
                ClassProperty {
                    ty: TypeRef::new(TypeNode::Array { items: TypeRef::new(TypeNode::Integer) }),
                    optional: false,
                },
            )],
        });
        let text = render_schema_text("Root", &root);
        let index = XsdIndex::build(&text).unwrap();

        let array = index.array_by_path.get("Root.xs").unwrap();
        assert_eq!(array.item_tag, "xsItem");
        assert!(matches!(array.item_kind, StructuralKind::Primitive(PrimitiveKind::Integer)));
    }

    #[test]
    fn cyclic_class_indexes_without_infinite_recursion() {
        let node_ref = TypeRef::placeholder();
        let children = TypeRef::new(TypeNode::Array { items: node_ref.clone() });
        node_ref.backfill(TypeNode::Class {
            props: vec![("children".to_string(), ClassProperty { ty: children, optional: true })],
        });
        let text = render_schema_text("Node", &node_ref);
        let index = XsdIndex::build(&text).unwrap();

        assert!(index.object_by_path.contains_key("Node"));
        assert!(index.array_by_path.contains_key("Node.children"));
    }
}
