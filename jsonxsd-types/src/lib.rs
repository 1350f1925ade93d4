//! Shared, dependency-light value types used by every `jsonxsd-*` crate:
//! the primitive kind lattice, the XSD builtin-base rewrite table, and the
//! title-casing helper used by the element resolver's disambiguation rule.

use heck::ToUpperCamelCase;
use thiserror::Error;

/// Base names the XMLSchema namespace defines natively. `jsonxsd-codegen`'s
/// builder rewrites any `base`/`type` attribute carrying one of these into
/// its `xsd:`-prefixed form.
pub const XSD_BUILTIN_BASES: &[&str] = &[
    "string", "integer", "decimal", "dateTime", "date", "time", "boolean",
];

/// Every kind a leaf (primitive) position in the emitted schema can take.
/// This is the restricted kind set unions are allowed to range over, and
/// the set the format converter's coercion tables are total functions
/// over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Null,
    Bool,
    Integer,
    Double,
    String,
    Date,
    Time,
    DateTime,
    Uri,
    IntegerString,
    BoolString,
}

/// The `transformed-string{format}` payload from the type graph. A strict
/// subset of `PrimitiveKind` — every transform format is a
/// primitive kind, but `Null`/`Bool`/`Integer`/`Double`/`String` are not
/// transform formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransformFormat {
    Date,
    Time,
    DateTime,
    Uri,
    IntegerString,
    BoolString,
}

impl TransformFormat {
    pub fn as_primitive(self) -> PrimitiveKind {
        match self {
            TransformFormat::Date => PrimitiveKind::Date,
            TransformFormat::Time => PrimitiveKind::Time,
            TransformFormat::DateTime => PrimitiveKind::DateTime,
            TransformFormat::Uri => PrimitiveKind::Uri,
            TransformFormat::IntegerString => PrimitiveKind::IntegerString,
            TransformFormat::BoolString => PrimitiveKind::BoolString,
        }
    }
}

impl PrimitiveKind {
    /// The `type`/`base` attribute value used when a leaf of this kind is
    /// lowered, before the builder's `xsd:` rewrite rule runs.
    pub fn xsd_type_name(self) -> &'static str {
        match self {
            PrimitiveKind::Null => "nullType",
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Double => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Date => "dateType",
            PrimitiveKind::Time => "timeType",
            PrimitiveKind::DateTime => "dateTimeType",
            PrimitiveKind::Uri => "uriType",
            PrimitiveKind::IntegerString => "integerStringType",
            PrimitiveKind::BoolString => "booleanStringType",
        }
    }

    /// Inverse of [`Self::xsd_type_name`], tolerant of both the raw name and
    /// its `xsd:`-prefixed form, used by the indexer's kind classification.
    pub fn from_type_name(name: &str) -> Option<PrimitiveKind> {
        let bare = name.strip_prefix("xsd:").unwrap_or(name);
        match bare {
            "nullType" => Some(PrimitiveKind::Null),
            "boolean" => Some(PrimitiveKind::Bool),
            "integer" => Some(PrimitiveKind::Integer),
            "decimal" => Some(PrimitiveKind::Double),
            "string" => Some(PrimitiveKind::String),
            "dateType" => Some(PrimitiveKind::Date),
            "timeType" => Some(PrimitiveKind::Time),
            "dateTimeType" => Some(PrimitiveKind::DateTime),
            "uriType" => Some(PrimitiveKind::Uri),
            "integerStringType" => Some(PrimitiveKind::IntegerString),
            "booleanStringType" => Some(PrimitiveKind::BoolString),
            _ => None,
        }
    }
}

/// Title-cases a user key for the element resolver's prefix-disambiguation
/// rule (`Prefix_j + TitleCase(T)`), the same casing `xsd_types::to_struct_name`
/// applies to a schema type name.
pub fn title_case(name: &str) -> String {
    let camel = name.replace('.', "_").to_upper_camel_case();
    if camel.chars().next().is_some_and(|c| c.is_numeric()) {
        format!("_{camel}")
    } else {
        camel
    }
}

#[derive(Error, Debug)]
#[error("error parsing xml node [{node_name}]: {msg}")]
pub struct XmlParseError {
    pub node_name: String,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_every_primitive_kind_name() {
        let kinds = [
            PrimitiveKind::Null,
            PrimitiveKind::Bool,
            PrimitiveKind::Integer,
            PrimitiveKind::Double,
            PrimitiveKind::String,
            PrimitiveKind::Date,
            PrimitiveKind::Time,
            PrimitiveKind::DateTime,
            PrimitiveKind::Uri,
            PrimitiveKind::IntegerString,
            PrimitiveKind::BoolString,
        ];
        for kind in kinds {
            let name = kind.xsd_type_name();
            assert_eq!(PrimitiveKind::from_type_name(name), Some(kind));
        }
    }

    #[test]
    fn title_case_handles_leading_digits() {
        assert_eq!(title_case("address"), "Address");
        assert!(title_case("2fa_code").starts_with('_'));
    }
}
