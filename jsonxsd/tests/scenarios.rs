//! End-to-end scenario coverage: render a sample, check the emitted XSD
//! shape, then round-trip the XML back to JSON.

use jsonxsd::Locale;
use serde_json::json;

#[test]
fn primitive_class_scenario() {
    let value = json!({"a": 1, "b": "x"});
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();

    assert!(rendered.xsd.contains(r#"name="complexType1""#));
    assert!(rendered.xsd.contains(r#"name="a""#));
    assert!(rendered.xsd.contains(r#"type="xsd:integer""#));
    assert!(rendered.xsd.contains(r#"name="b""#));
    assert!(rendered.xsd.contains(r#"type="xsd:string""#));
    assert!(rendered.xsd.contains(r#"minOccurs="0""#));
    assert!(rendered.xsd.contains(r#"name="Root""#));
    assert!(rendered.xsd.contains(r#"type="complexType1""#));

    assert!(rendered.xml.contains("<a>1</a>"));
    assert!(rendered.xml.contains("<b>x</b>"));

    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn array_of_primitives_scenario() {
    let value = json!({"xs": [1, 2, 3]});
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();

    assert!(rendered.xsd.contains(r#"name="xsItem""#));
    assert!(rendered.xsd.contains(r#"maxOccurs="unbounded""#));
    assert!(rendered.xml.contains("<xsItem>1</xsItem>"));
    assert!(rendered.xml.contains("<xsItem>2</xsItem>"));
    assert!(rendered.xml.contains("<xsItem>3</xsItem>"));

    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn primitive_union_scenario() {
    let samples = vec![json!({"id": 7}), json!({"id": "A"})];

    let as_int = json!({"id": 7});
    let rendered = jsonxsd::generate("Root", &samples, &as_int, "root.xsd", Locale::En).unwrap();
    assert!(rendered.xsd.contains("xsd:union"));
    assert!(rendered.xml.contains("<id>7</id>"));
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, as_int);

    let as_str = json!({"id": "A"});
    let rendered = jsonxsd::generate("Root", &samples, &as_str, "root.xsd", Locale::En).unwrap();
    assert!(rendered.xml.contains("<id>A</id>"));
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, as_str);
}

#[test]
fn date_transform_scenario() {
    let value = json!({"d": "01.02.2023"});
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();

    assert!(rendered.xsd.contains("dateType"));
    assert!(rendered.xml.contains("<d>01.02.2023</d>"));
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn null_scenario() {
    let value = json!({"x": null});
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();

    assert!(rendered.xml.contains("<x/>") || rendered.xml.contains("<x></x>"));
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn name_collision_scenario_disambiguates_elements() {
    let value = json!({
        "person": {"address": {"street": "Main St"}},
        "out": {"address": {"po_box": "123"}},
    });
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();

    assert!(rendered.xsd.contains("PersonAddress"));
    assert!(rendered.xsd.contains("OutAddress"));

    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn empty_class_emits_empty_all() {
    let value = json!({"nested": {}});
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn empty_array_round_trips() {
    let value = json!({"xs": []});
    let samples = vec![json!({"xs": [1]}), value.clone()];
    let rendered = jsonxsd::generate("Root", &samples, &value, "root.xsd", Locale::En).unwrap();
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}

#[test]
fn bare_empty_array_with_no_merge_partner_round_trips() {
    let value = json!({"xs": []});
    let rendered = jsonxsd::generate("Root", &[value.clone()], &value, "root.xsd", Locale::En).unwrap();
    let back = jsonxsd::parse(&rendered.xsd, &rendered.xml, "Root", Locale::En).unwrap();
    assert_eq!(back, value);
}
