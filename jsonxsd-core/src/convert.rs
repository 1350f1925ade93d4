//! The format converter: a single, path-driven walker shared by both
//! directions. `json_to_xml` and `xml_to_json` are mirror images of each
//! other, each consulting the same `XsdIndex` at the current dotted path
//! to decide whether it is looking at a union, array, class or primitive
//! position.

use crate::error::{JsonXsdError, Result};
use crate::indexer::{StructuralKind, XsdIndex};
use crate::string_format::StringFormatRecognizer;
use jsonxsd_types::PrimitiveKind;
use log::warn;
use serde_json::Value;
use xmltree::{Element, XMLNode};

/// The structural kind of the top-level element itself, inferred from the
/// index the same way the indexer classifies any other referenced type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RootKind {
    Array,
    Class,
    Union,
    Primitive,
}

/// JSON → XML. The outermost element additionally carries the
/// `xmlns:xsd`/`xsd:noNamespaceSchemaLocation` attributes naming the
/// schema it validates against.
pub fn json_to_xml(
    index: &XsdIndex,
    root_name: &str,
    root_kind: RootKind,
    value: &Value,
    xsd_file_name: &str,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<Element> {
    let kind = root_structural_kind(index, root_name, root_kind)?;
    let mut root = build_node(index, root_name, root_name, &kind, value, recognizer)?;
    root.attributes.insert(
        "xmlns:xsd".to_string(),
        "http://www.w3.org/2001/XMLSchema-instance".to_string(),
    );
    root.attributes.insert("xsd:noNamespaceSchemaLocation".to_string(), xsd_file_name.to_string());
    Ok(root)
}

/// XML → JSON, the inverse of [`json_to_xml`].
pub fn xml_to_json(
    index: &XsdIndex,
    root_name: &str,
    root_kind: RootKind,
    root_el: &Element,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<Value> {
    let kind = root_structural_kind(index, root_name, root_kind)?;
    read_node(index, root_name, &kind, root_el, recognizer)
}

fn root_structural_kind(index: &XsdIndex, root_name: &str, root_kind: RootKind) -> Result<StructuralKind> {
    match root_kind {
        RootKind::Array => Ok(StructuralKind::Array),
        RootKind::Class => Ok(StructuralKind::Class),
        RootKind::Union => Ok(StructuralKind::Union),
        RootKind::Primitive => {
            let type_name = index.elements.get(root_name).ok_or_else(|| {
                JsonXsdError::InternalError(format!("element '{root_name}' missing from index"))
            })?;
            let primitive = PrimitiveKind::from_type_name(type_name).ok_or_else(|| {
                JsonXsdError::InternalError(format!("'{type_name}' is not a primitive kind"))
            })?;
            Ok(StructuralKind::Primitive(primitive))
        }
    }
}

fn build_node(
    index: &XsdIndex,
    path: &str,
    tag: &str,
    kind: &StructuralKind,
    value: &Value,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<Element> {
    let mut el = Element::new(tag);
    match kind {
        StructuralKind::Primitive(primitive) => {
            let text = coerce_to_xml(*primitive, value, recognizer).ok_or_else(|| {
                warn!("value at '{path}' does not coerce to {primitive:?}: {value}");
                JsonXsdError::MalformedInput {
                    path: path.to_string(),
                    msg: format!("value {value} does not coerce to {primitive:?}"),
                }
            })?;
            if !text.is_empty() {
                el.children.push(XMLNode::Text(text));
            }
        }
        StructuralKind::Union => {
            let members = index.union_by_path.get(path).ok_or_else(|| {
                JsonXsdError::InternalError(format!("no union entry indexed at path '{path}'"))
            })?;
            let (_, text) = members
                .iter()
                .find_map(|kind| coerce_to_xml(*kind, value, recognizer).map(|t| (*kind, t)))
                .ok_or_else(|| JsonXsdError::MalformedInput {
                    path: path.to_string(),
                    msg: format!("value {value} matches no union member at '{path}'"),
                })?;
            if !text.is_empty() {
                el.children.push(XMLNode::Text(text));
            }
        }
        StructuralKind::Array => {
            let entry = index.array_by_path.get(path).ok_or_else(|| {
                JsonXsdError::InternalError(format!("no array entry indexed at path '{path}'"))
            })?;
            let items = value.as_array().ok_or_else(|| JsonXsdError::MalformedInput {
                path: path.to_string(),
                msg: "expected a JSON array".to_string(),
            })?;
            let item_path = format!("{path}.{}", entry.item_tag);
            for item in items {
                let child = build_node(index, &item_path, &entry.item_tag, &entry.item_kind, item, recognizer)?;
                el.children.push(XMLNode::Element(child));
            }
        }
        StructuralKind::Class => {
            let props = index.object_by_path.get(path).ok_or_else(|| {
                JsonXsdError::InternalError(format!("no class entry indexed at path '{path}'"))
            })?;
            let obj = value.as_object().ok_or_else(|| JsonXsdError::MalformedInput {
                path: path.to_string(),
                msg: "expected a JSON object".to_string(),
            })?;
            for (prop_name, entry) in props {
                let prop_path = format!("{path}.{prop_name}");
                match obj.get(prop_name) {
                    Some(prop_value) => {
                        let child = build_node(index, &prop_path, prop_name, &entry.kind, prop_value, recognizer)?;
                        el.children.push(XMLNode::Element(child));
                    }
                    None if entry.optional => {}
                    None => {
                        return Err(JsonXsdError::MalformedInput {
                            path: prop_path,
                            msg: format!("missing required property '{prop_name}'"),
                        })
                    }
                }
            }
        }
        StructuralKind::None => {
            return Err(JsonXsdError::InternalError(format!("unclassifiable position at '{path}'")))
        }
    }
    Ok(el)
}

fn read_node(
    index: &XsdIndex,
    path: &str,
    kind: &StructuralKind,
    el: &Element,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<Value> {
    match kind {
        StructuralKind::Primitive(primitive) => {
            let text = element_text(el);
            coerce_from_xml(*primitive, &text, recognizer).ok_or_else(|| JsonXsdError::MalformedInput {
                path: path.to_string(),
                msg: format!("text '{text}' does not coerce from {primitive:?}"),
            })
        }
        StructuralKind::Union => {
            let members = index.union_by_path.get(path).ok_or_else(|| {
                JsonXsdError::InternalError(format!("no union entry indexed at path '{path}'"))
            })?;
            let text = element_text(el);
            members
                .iter()
                .find_map(|kind| coerce_from_xml(*kind, &text, recognizer))
                .ok_or_else(|| JsonXsdError::MalformedInput {
                    path: path.to_string(),
                    msg: format!("text '{text}' matches no union member at '{path}'"),
                })
        }
        StructuralKind::Array => {
            let entry = index.array_by_path.get(path).ok_or_else(|| {
                JsonXsdError::InternalError(format!("no array entry indexed at path '{path}'"))
            })?;
            let item_path = format!("{path}.{}", entry.item_tag);
            let mut items = Vec::new();
            for child in children_named(el, &entry.item_tag) {
                items.push(read_node(index, &item_path, &entry.item_kind, child, recognizer)?);
            }
            Ok(Value::Array(items))
        }
        StructuralKind::Class => {
            let props = index.object_by_path.get(path).ok_or_else(|| {
                JsonXsdError::InternalError(format!("no class entry indexed at path '{path}'"))
            })?;
            let mut obj = serde_json::Map::new();
            for (prop_name, entry) in props {
                let prop_path = format!("{path}.{prop_name}");
                match el.get_child(prop_name.as_str()) {
                    Some(child) => {
                        let value = read_node(index, &prop_path, &entry.kind, child, recognizer)?;
                        obj.insert(prop_name.clone(), value);
                    }
                    None if entry.optional => {}
                    None => {
                        return Err(JsonXsdError::MalformedInput {
                            path: prop_path,
                            msg: format!("missing required property '{prop_name}'"),
                        })
                    }
                }
            }
            Ok(Value::Object(obj))
        }
        StructuralKind::None => {
            Err(JsonXsdError::InternalError(format!("unclassifiable position at '{path}'")))
        }
    }
}

fn children_named<'a>(el: &'a Element, name: &str) -> impl Iterator<Item = &'a Element> {
    el.children.iter().filter_map(|c| c.as_element()).filter(move |e| e.name == name)
}

fn element_text(el: &Element) -> String {
    el.get_text().map(|c| c.into_owned()).unwrap_or_default()
}

/// Tolerant numeric read: accepts a JSON number outright, or a JSON string
/// that itself parses as a number (the type graph may carry either,
/// depending on how the upstream inference pipeline typed the sample).
fn numeric_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn render_decimal(value: &Value) -> Option<String> {
    let n = numeric_of(value)?;
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Some(format!("{}", n as i64))
    } else {
        Some(n.to_string())
    }
}

/// JSON → XML coercion for one primitive position. `None` signals a
/// mismatch the caller turns into *malformed-input*.
fn coerce_to_xml(kind: PrimitiveKind, value: &Value, recognizer: &dyn StringFormatRecognizer) -> Option<String> {
    match kind {
        PrimitiveKind::Integer | PrimitiveKind::Double => render_decimal(value),
        PrimitiveKind::IntegerString => render_decimal(value),
        PrimitiveKind::Bool => match value {
            Value::Bool(b) => Some(b.to_string()),
            Value::String(s) if s == "true" || s == "false" => Some(s.clone()),
            _ => None,
        },
        PrimitiveKind::BoolString => match value {
            Value::Bool(b) => Some(b.to_string()),
            Value::String(s) if s == "true" || s == "false" => Some(s.clone()),
            _ => None,
        },
        PrimitiveKind::Date => string_if(value, |s| recognizer.is_date(s)),
        PrimitiveKind::Time => string_if(value, |s| recognizer.is_time(s)),
        PrimitiveKind::DateTime => string_if(value, |s| recognizer.is_date_time(s)),
        PrimitiveKind::Uri => string_if(value, |s| recognizer.is_uri(s)),
        PrimitiveKind::Null => {
            if value.is_null() {
                Some(String::new())
            } else {
                None
            }
        }
        PrimitiveKind::String => value.as_str().map(|s| s.to_string()),
    }
}

fn string_if(value: &Value, predicate: impl Fn(&str) -> bool) -> Option<String> {
    let s = value.as_str()?;
    predicate(s).then(|| s.to_string())
}

/// XML → JSON coercion for one primitive position, the inverse table of
/// [`coerce_to_xml`].
fn coerce_from_xml(kind: PrimitiveKind, text: &str, recognizer: &dyn StringFormatRecognizer) -> Option<Value> {
    match kind {
        PrimitiveKind::Integer => {
            let n = text.trim().parse::<i64>().ok().or_else(|| text.trim().parse::<f64>().ok().map(|f| f as i64))?;
            Some(Value::Number(n.into()))
        }
        PrimitiveKind::Double => {
            let f: f64 = text.trim().parse().ok()?;
            serde_json::Number::from_f64(f).map(Value::Number)
        }
        PrimitiveKind::IntegerString => {
            let f: f64 = text.trim().parse().ok()?;
            let canonical = if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                f.to_string()
            };
            Some(Value::String(canonical))
        }
        PrimitiveKind::Bool => match text {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        PrimitiveKind::BoolString => match text {
            "true" | "false" => Some(Value::String(text.to_string())),
            _ => None,
        },
        PrimitiveKind::Date if recognizer.is_date(text) => Some(Value::String(text.to_string())),
        PrimitiveKind::Time if recognizer.is_time(text) => Some(Value::String(text.to_string())),
        PrimitiveKind::DateTime if recognizer.is_date_time(text) => Some(Value::String(text.to_string())),
        PrimitiveKind::Uri if recognizer.is_uri(text) => Some(Value::String(text.to_string())),
        PrimitiveKind::Date | PrimitiveKind::Time | PrimitiveKind::DateTime | PrimitiveKind::Uri => None,
        PrimitiveKind::Null => {
            if text.is_empty() {
                Some(Value::Null)
            } else {
                None
            }
        }
        PrimitiveKind::String => Some(Value::String(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_schema;
    use crate::resolve::resolve_elements;
    use crate::string_format::NeverRecognizer;
    use crate::typegraph::{ClassProperty, TypeNode, TypeRef};
    use xmltree::EmitterConfig;

    fn index_for(root_name: &str, root: &TypeRef) -> XsdIndex {
        let (mut schema, registry, types) = lower_schema(root_name, root).unwrap();
        resolve_elements(&mut schema, &registry, &types).unwrap();
        let mut out = Vec::new();
        schema.write_with_config(&mut out, EmitterConfig::new().perform_indent(true)).unwrap();
        XsdIndex::build(&String::from_utf8(out).unwrap()).unwrap()
    }

    #[test]
    fn round_trips_primitive_class() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![
                ("a".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::Integer), optional: false }),
                ("b".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::String), optional: true }),
            ],
        });
        let index = index_for("Root", &root);
        let value = serde_json::json!({"a": 1, "b": "x"});

        let xml = json_to_xml(&index, "Root", RootKind::Class, &value, "root.xsd", &NeverRecognizer).unwrap();
        let a = xml.get_child("a").unwrap();
        assert_eq!(element_text(a), "1");

        let back = xml_to_json(&index, "Root", RootKind::Class, &xml, &NeverRecognizer).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn null_value_becomes_empty_element_and_back() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![("x".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::Null), optional: false })],
        });
        let index = index_for("Root", &root);
        let value = serde_json::json!({"x": null});

        let xml = json_to_xml(&index, "Root", RootKind::Class, &value, "root.xsd", &NeverRecognizer).unwrap();
        let x = xml.get_child("x").unwrap();
        assert!(element_text(x).is_empty());

        let back = xml_to_json(&index, "Root", RootKind::Class, &xml, &NeverRecognizer).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn array_of_integers_round_trips() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![(
                "xs".to_string(),
                ClassProperty {
                    ty: TypeRef::new(TypeNode::Array { items: TypeRef::new(TypeNode::Integer) }),
                    optional: false,
                },
            )],
        });
        let index = index_for("Root", &root);
        let value = serde_json::json!({"xs": [1, 2, 3]});

        let xml = json_to_xml(&index, "Root", RootKind::Class, &value, "root.xsd", &NeverRecognizer).unwrap();
        let xs = xml.get_child("xs").unwrap();
        assert_eq!(children_named(xs, "xsItem").count(), 3);

        let back = xml_to_json(&index, "Root", RootKind::Class, &xml, &NeverRecognizer).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn union_picks_first_matching_member() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![(
                "id".to_string(),
                ClassProperty {
                    ty: TypeRef::new(TypeNode::Union {
                        members: vec![TypeRef::new(TypeNode::Integer), TypeRef::new(TypeNode::String)],
                    }),
                    optional: false,
                },
            )],
        });
        let index = index_for("Root", &root);

        let as_int = serde_json::json!({"id": 7});
        let xml = json_to_xml(&index, "Root", RootKind::Class, &as_int, "root.xsd", &NeverRecognizer).unwrap();
        assert_eq!(element_text(xml.get_child("id").unwrap()), "7");
        let back = xml_to_json(&index, "Root", RootKind::Class, &xml, &NeverRecognizer).unwrap();
        assert_eq!(back, as_int);

        let as_str = serde_json::json!({"id": "A"});
        let xml = json_to_xml(&index, "Root", RootKind::Class, &as_str, "root.xsd", &NeverRecognizer).unwrap();
        assert_eq!(element_text(xml.get_child("id").unwrap()), "A");
        let back = xml_to_json(&index, "Root", RootKind::Class, &xml, &NeverRecognizer).unwrap();
        assert_eq!(back, as_str);
    }

    #[test]
    fn missing_required_property_is_malformed_input() {
        let root = TypeRef::new(TypeNode::Class {
            props: vec![("a".to_string(), ClassProperty { ty: TypeRef::new(TypeNode::Integer), optional: false })],
        });
        let index = index_for("Root", &root);
        let value = serde_json::json!({});
        let err = json_to_xml(&index, "Root", RootKind::Class, &value, "root.xsd", &NeverRecognizer).unwrap_err();
        assert!(matches!(err, JsonXsdError::MalformedInput { .. }));
    }
}
