//! Merges one or more `serde_json::Value` samples into the `TypeRef`/
//! `TypeNode` graph `jsonxsd-core` consumes. This is the one crate
//! allowed to construct type graphs from scratch; everywhere else
//! treats them as read-only.
//!
//! Inference runs in two passes: each sample is turned into an
//! intermediate [`Shape`] independently (`shape_of`), then every sample's
//! shape is folded together with [`merge`]. Only after every sample has
//! been folded in is the final `Shape` lowered into a `TypeRef` tree
//! (`into_typeref`) — this keeps the widening rules (mismatched sibling
//! kinds becoming a primitive union, optional-detection across samples)
//! in one small, testable place instead of threaded through graph
//! construction.

use jsonxsd_core::typegraph::{ClassProperty, TypeNode, TypeRef};
use jsonxsd_core::StringFormatRecognizer;
use jsonxsd_types::TransformFormat;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn integer_string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(0|-?[1-9][0-9]*)$").unwrap())
}

/// A single sample's (or a partial merge's) inferred shape. Structurally
/// close to [`TypeNode`], but classes carry presence information
/// (`seen_in_all`) so repeated merges can keep widening optionality
/// without losing earlier rounds' results (the eventual `optional: bool`
/// on a class property is derived from this once merging is complete).
#[derive(Clone, Debug)]
enum Shape {
    Any,
    Null,
    Bool,
    Integer,
    Double,
    String,
    TransformedString(TransformFormat),
    Array(Box<Shape>),
    Class(Vec<(String, Shape, bool)>),
    /// Primitive-only union members, deduplicated by kind.
    Union(Vec<Shape>),
}

fn shape_discriminant(shape: &Shape) -> u8 {
    match shape {
        Shape::Any => 0,
        Shape::Null => 1,
        Shape::Bool => 2,
        Shape::Integer => 3,
        Shape::Double => 4,
        Shape::String => 5,
        Shape::TransformedString(_) => 6,
        Shape::Array(_) => 7,
        Shape::Class(_) => 8,
        Shape::Union(_) => 9,
    }
}

fn recognize_transform(s: &str, recognizer: &dyn StringFormatRecognizer) -> Option<TransformFormat> {
    if recognizer.is_date_time(s) {
        Some(TransformFormat::DateTime)
    } else if recognizer.is_date(s) {
        Some(TransformFormat::Date)
    } else if recognizer.is_time(s) {
        Some(TransformFormat::Time)
    } else if recognizer.is_uri(s) {
        Some(TransformFormat::Uri)
    } else if s == "true" || s == "false" {
        Some(TransformFormat::BoolString)
    } else if integer_string_re().is_match(s) {
        Some(TransformFormat::IntegerString)
    } else {
        None
    }
}

fn shape_of(value: &Value, recognizer: &dyn StringFormatRecognizer) -> Shape {
    match value {
        Value::Null => Shape::Null,
        Value::Bool(_) => Shape::Bool,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Shape::Integer
            } else {
                Shape::Double
            }
        }
        Value::String(s) => match recognize_transform(s, recognizer) {
            Some(format) => Shape::TransformedString(format),
            None => Shape::String,
        },
        Value::Array(items) => {
            let mut acc: Option<Shape> = None;
            for item in items {
                let item_shape = shape_of(item, recognizer);
                acc = Some(match acc {
                    None => item_shape,
                    Some(existing) => merge(existing, item_shape),
                });
            }
            Shape::Array(Box::new(acc.unwrap_or(Shape::Any)))
        }
        Value::Object(map) => {
            let props = map.iter().map(|(k, v)| (k.clone(), shape_of(v, recognizer), true)).collect();
            Shape::Class(props)
        }
    }
}

/// Widens two members for union membership, deduplicating by kind and
/// widening `Integer`/`Double` pairs the same way [`merge`] does for plain
/// fields. Only ever called with primitive-family shapes: [`merge`] is the
/// only caller, and it only reaches here once it has already rejected
/// complex shapes.
fn union_insert(mut members: Vec<Shape>, next: Shape) -> Vec<Shape> {
    for existing in members.iter_mut() {
        match (&existing, &next) {
            (Shape::Integer, Shape::Double) => {
                *existing = Shape::Double;
                return members;
            }
            (Shape::Double, Shape::Integer) => return members,
            (a, b) if shape_discriminant(a) == shape_discriminant(b) => return members,
            _ => {}
        }
    }
    members.push(next);
    members
}

/// Folds two shapes (each already the result of one or more samples) into
/// one, applying the widening rules `jsonxsd-infer` contributes on top of
/// the closed kind set: numeric widening to `Double`, mismatched
/// primitives widening to a primitive union, irreconcilable complex
/// shapes falling back to `Any`.
fn merge(a: Shape, b: Shape) -> Shape {
    match (a, b) {
        (Shape::Any, other) | (other, Shape::Any) => other,
        (Shape::Null, Shape::Null) => Shape::Null,
        (Shape::Bool, Shape::Bool) => Shape::Bool,
        (Shape::Integer, Shape::Integer) => Shape::Integer,
        (Shape::Double, Shape::Double) => Shape::Double,
        (Shape::Integer, Shape::Double) | (Shape::Double, Shape::Integer) => Shape::Double,
        (Shape::String, Shape::String) => Shape::String,
        (Shape::TransformedString(x), Shape::TransformedString(y)) if x == y => Shape::TransformedString(x),
        (Shape::TransformedString(_), Shape::TransformedString(_)) => Shape::String,
        (Shape::TransformedString(_), Shape::String) | (Shape::String, Shape::TransformedString(_)) => Shape::String,
        (Shape::Array(x), Shape::Array(y)) => Shape::Array(Box::new(merge(*x, *y))),
        (Shape::Class(x), Shape::Class(y)) => Shape::Class(merge_class(x, y)),
        (Shape::Union(a_members), Shape::Union(b_members)) => {
            let mut members = a_members;
            for member in b_members {
                members = union_insert(members, member);
            }
            Shape::Union(members)
        }
        (Shape::Union(members), other) | (other, Shape::Union(members)) => {
            if matches!(other, Shape::Array(_) | Shape::Class(_)) {
                Shape::Any
            } else {
                Shape::Union(union_insert(members, other))
            }
        }
        (a, b) if matches!(a, Shape::Array(_) | Shape::Class(_)) || matches!(b, Shape::Array(_) | Shape::Class(_)) => {
            Shape::Any
        }
        (a, b) => Shape::Union(union_insert(vec![a], b)),
    }
}

/// Merges two already-merged class prop lists, widening optionality to
/// `true` for any property absent from either side, detected across
/// samples.
fn merge_class(
    a: Vec<(String, Shape, bool)>,
    b: Vec<(String, Shape, bool)>,
) -> Vec<(String, Shape, bool)> {
    let mut result: Vec<(String, Shape, bool)> = Vec::new();
    let mut seen_from_b = vec![false; b.len()];

    for (name, a_shape, a_optional) in a {
        match b.iter().position(|(n, _, _)| *n == name) {
            Some(idx) => {
                seen_from_b[idx] = true;
                let (_, b_shape, b_optional) = &b[idx];
                result.push((name, merge(a_shape, b_shape.clone()), a_optional || *b_optional));
            }
            None => result.push((name, a_shape, true)),
        }
    }
    for (idx, (name, shape, _)) in b.into_iter().enumerate() {
        if !seen_from_b[idx] {
            result.push((name, shape, true));
        }
    }
    result
}

fn into_typeref(shape: Shape) -> TypeRef {
    let node = match shape {
        Shape::Any => TypeNode::Any,
        Shape::Null => TypeNode::Null,
        Shape::Bool => TypeNode::Bool,
        Shape::Integer => TypeNode::Integer,
        Shape::Double => TypeNode::Double,
        Shape::String => TypeNode::String,
        Shape::TransformedString(format) => TypeNode::TransformedString { format },
        Shape::Array(items) => TypeNode::Array { items: into_typeref(*items) },
        Shape::Class(props) => TypeNode::Class {
            props: props
                .into_iter()
                .map(|(name, shape, optional)| (name, ClassProperty { ty: into_typeref(shape), optional }))
                .collect(),
        },
        Shape::Union(members) => TypeNode::Union { members: members.into_iter().map(into_typeref).collect() },
    };
    TypeRef::new(node)
}

/// Infers a single type graph covering every sample in `samples`.
/// Panics-free: irreconcilable shapes fall back to `Any` rather than
/// failing.
pub fn infer_type_graph(samples: &[Value], recognizer: &dyn StringFormatRecognizer) -> TypeRef {
    let mut acc: Option<Shape> = None;
    for sample in samples {
        let shape = shape_of(sample, recognizer);
        acc = Some(match acc {
            None => shape,
            Some(existing) => merge(existing, shape),
        });
    }
    into_typeref(acc.unwrap_or(Shape::Any))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonxsd_core::NeverRecognizer;

    #[test]
    fn infers_simple_class() {
        let sample = serde_json::json!({"a": 1, "b": "x"});
        let root = infer_type_graph(&[sample], &NeverRecognizer);
        match &*root.kind() {
            TypeNode::Class { props } => {
                assert_eq!(props.len(), 2);
                assert!(!props[0].1.optional);
            }
            _ => panic!("expected class"),
        }
    }

    #[test]
    fn property_absent_in_some_samples_becomes_optional() {
        let s1 = serde_json::json!({"a": 1, "b": "x"});
        let s2 = serde_json::json!({"a": 2});
        let root = infer_type_graph(&[s1, s2], &NeverRecognizer);
        match &*root.kind() {
            TypeNode::Class { props } => {
                let b = props.iter().find(|(n, _)| n == "b").unwrap();
                assert!(b.1.optional);
                let a = props.iter().find(|(n, _)| n == "a").unwrap();
                assert!(!a.1.optional);
            }
            _ => panic!("expected class"),
        }
    }

    #[test]
    fn mismatched_primitive_siblings_widen_to_union() {
        let s1 = serde_json::json!({"id": 1});
        let s2 = serde_json::json!({"id": "x"});
        let root = infer_type_graph(&[s1, s2], &NeverRecognizer);
        match &*root.kind() {
            TypeNode::Class { props } => match &*props[0].1.ty.kind() {
                TypeNode::Union { members } => assert_eq!(members.len(), 2),
                _ => panic!("expected union"),
            },
            _ => panic!("expected class"),
        }
    }

    #[test]
    fn integer_and_double_widen_to_double_not_union() {
        let s1 = serde_json::json!({"n": 1});
        let s2 = serde_json::json!({"n": 1.5});
        let root = infer_type_graph(&[s1, s2], &NeverRecognizer);
        match &*root.kind() {
            TypeNode::Class { props } => assert!(matches!(&*props[0].1.ty.kind(), TypeNode::Double)),
            _ => panic!("expected class"),
        }
    }

    #[test]
    fn array_items_merge_across_elements() {
        let sample = serde_json::json!({"xs": [1, 2.5, 3]});
        let root = infer_type_graph(&[sample], &NeverRecognizer);
        match &*root.kind() {
            TypeNode::Class { props } => match &*props[0].1.ty.kind() {
                TypeNode::Array { items } => assert!(matches!(&*items.kind(), TypeNode::Double)),
                _ => panic!("expected array"),
            },
            _ => panic!("expected class"),
        }
    }

    #[test]
    fn class_vs_array_sibling_falls_back_to_any() {
        let s1 = serde_json::json!({"x": {"a": 1}});
        let s2 = serde_json::json!({"x": [1, 2]});
        let root = infer_type_graph(&[s1, s2], &NeverRecognizer);
        match &*root.kind() {
            TypeNode::Class { props } => assert!(matches!(&*props[0].1.ty.kind(), TypeNode::Any)),
            _ => panic!("expected class"),
        }
    }
}
