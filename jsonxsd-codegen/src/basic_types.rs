//! The Basic Types Emitter: the fixed library of derived simple types,
//! defined once per schema, immediately under `<xsd:schema>`.

use crate::builder::XsdBuilder;
use xmltree::Element;

/// A union member: either a native XMLSchema base (`base="date"`, rewritten
/// to `xsd:date` by the builder) or a string restricted by `pattern`.
enum UnionMember {
    Native(&'static str),
    Pattern(&'static str),
}

fn emit_union(schema: &mut Element, name: &str, members: &[UnionMember]) {
    let simple_type = XsdBuilder::append(schema, "simpleType");
    XsdBuilder::set_attr(simple_type, "name", name);
    let union = XsdBuilder::append(simple_type, "union");
    for member in members {
        let member_simple_type = XsdBuilder::append(union, "simpleType");
        let restriction = XsdBuilder::append(member_simple_type, "restriction");
        match member {
            UnionMember::Native(base) => XsdBuilder::set_attr(restriction, "base", *base),
            UnionMember::Pattern(pattern) => {
                XsdBuilder::set_attr(restriction, "base", "string");
                XsdBuilder::set_attr(restriction, "pattern", *pattern);
            }
        }
    }
}

fn emit_string_restriction(schema: &mut Element, name: &str, pattern: &str) {
    let simple_type = XsdBuilder::append(schema, "simpleType");
    XsdBuilder::set_attr(simple_type, "name", name);
    let restriction = XsdBuilder::append(simple_type, "restriction");
    XsdBuilder::set_attr(restriction, "base", "string");
    XsdBuilder::set_attr(restriction, "pattern", pattern);
}

const DATE_PATTERN: &str =
    r"(0?[1-9]|[12][0-9]|3[01])[/.](0?[1-9]|1[0-2])[/.]\d{4}";
const TIME_24H_PATTERN: &str = r"([0-1]?[0-9]|2[0-3]):([0-5][0-9])";
const TIME_12H_PATTERN: &str = r"(0?[0-9]|1[01]):([0-5][0-9]) (AM|PM|a\.m\.|p\.m\.)";
const INTEGER_STRING_PATTERN: &str = r"(0|-?[1-9]*)";
const BOOLEAN_STRING_PATTERN: &str = r"true|false";
const URI_PATTERN: &str = r"(https?|ftp):\/\/[^{}]+\.[^{}]+";

/// Emits the library's six base derived types, plus `dateTimeType` (see
/// DESIGN.md for why a combined date-time transform format gets its own
/// entry), under `schema` (the `<xsd:schema>` root element). Each is
/// defined exactly once.
pub fn emit_basic_types(schema: &mut Element) {
    emit_union(
        schema,
        "dateType",
        &[UnionMember::Native("date"), UnionMember::Pattern(DATE_PATTERN)],
    );
    emit_union(
        schema,
        "timeType",
        &[
            UnionMember::Native("time"),
            UnionMember::Pattern(TIME_24H_PATTERN),
            UnionMember::Pattern(TIME_12H_PATTERN),
        ],
    );
    emit_union(
        schema,
        "dateTimeType",
        &[
            UnionMember::Native("dateTime"),
            UnionMember::Pattern(concat!(
                r"(0?[1-9]|[12][0-9]|3[01])[/.](0?[1-9]|1[0-2])[/.]\d{4}[T ]",
                r"([0-1]?[0-9]|2[0-3]):([0-5][0-9])"
            )),
        ],
    );
    emit_string_restriction(schema, "integerStringType", INTEGER_STRING_PATTERN);
    emit_string_restriction(schema, "booleanStringType", BOOLEAN_STRING_PATTERN);
    emit_string_restriction(schema, "uriType", URI_PATTERN);

    let simple_type = XsdBuilder::append(schema, "simpleType");
    XsdBuilder::set_attr(simple_type, "name", "nullType");
    let restriction = XsdBuilder::append(simple_type, "restriction");
    XsdBuilder::set_attr(restriction, "base", "string");
    XsdBuilder::set_attr(restriction, "length", "0");
}
