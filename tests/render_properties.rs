//! Rendering properties: dimensions, embedded JSON and foreign scalars

use serde_json::{json, Value};
use vega_html::{encode, ChartSpec, Error, PlainMap, PlainValue, ScalarAdapters, VisualizationSpec};

fn fixture() -> ChartSpec {
    let text = std::fs::read_to_string("tests/fixtures/bar.json").expect("read fixture");
    ChartSpec::from_json(&text).expect("parse fixture")
}

/// Pull the escaped JSON out of the bundled template's `data-spec` attribute.
fn embedded_spec(html: &str) -> Value {
    let start = html.find("data-spec=\"").expect("data-spec attribute") + "data-spec=\"".len();
    let len = html[start..].find('"').expect("closing quote");
    let escaped = &html[start..start + len];
    let json = htmlize::unescape(escaped);
    serde_json::from_str(&json).expect("embedded spec is valid JSON")
}

#[test]
fn stored_dimensions_are_embedded_and_kept() {
    let mut spec = fixture();
    let html = vega_html::render(&mut spec, None, None).unwrap();

    assert!(html.contains("width: 300px; height: 200px;"));
    let embedded = embedded_spec(&html);
    assert_eq!(embedded["width"], json!(300));
    assert_eq!(embedded["height"], json!(200));
    assert_eq!(spec.width(), 300);
    assert_eq!(spec.height(), 200);
}

#[test]
fn overrides_are_embedded_and_written_back() {
    for (w, h) in [(1, 1), (640, 480), (1920, 1080), (0, 5)] {
        let mut spec = fixture();
        let html = vega_html::render(&mut spec, Some(w), Some(h)).unwrap();

        assert!(html.contains(&format!("width: {}px; height: {}px;", w, h)));
        assert_eq!((spec.width(), spec.height()), (w, h));

        let embedded = embedded_spec(&html);
        assert_eq!(embedded["width"], json!(w));
        assert_eq!(embedded["height"], json!(h));
    }
}

#[test]
fn single_override_leaves_other_dimension_alone() {
    let mut spec = fixture();
    vega_html::render(&mut spec, None, Some(99)).unwrap();
    assert_eq!((spec.width(), spec.height()), (300, 99));
}

#[test]
fn embedded_blob_round_trips_to_plain_form() {
    let mut spec = fixture();
    let html = vega_html::render(&mut spec, None, None).unwrap();

    let expected = encode::to_value(&spec.to_plain().unwrap(), &ScalarAdapters::default()).unwrap();
    assert_eq!(embedded_spec(&html), expected);
    assert_eq!(
        embedded_spec(&html)["description"],
        json!("A simple bar chart with <embedded> data & \"quotes\".")
    );
}

#[test]
fn markup_in_spec_is_escaped() {
    let mut spec = fixture();
    let html = vega_html::render(&mut spec, None, None).unwrap();
    assert!(!html.contains("<embedded>"));
    assert!(html.contains("&lt;embedded&gt;"));
}

#[test]
fn foreign_scalars_become_native_numbers() {
    let mut values = Vec::new();
    for (i, b) in [12.5f32, 7.25, 3.0].into_iter().enumerate() {
        let mut row = PlainMap::new();
        row.insert("a".into(), PlainValue::foreign(i as u16));
        row.insert("b".into(), PlainValue::foreign(b));
        row.insert("flag".into(), PlainValue::foreign(i % 2 == 0));
        values.push(PlainValue::Map(row));
    }
    let mut data = PlainMap::new();
    data.insert("values".into(), PlainValue::Seq(values));

    let mut spec = ChartSpec::default().with_viewport(200, 100);
    spec.insert("mark", "point");
    spec.insert("data", PlainValue::Map(data));

    let html = vega_html::render(&mut spec, None, None).unwrap();
    assert_eq!(
        embedded_spec(&html)["data"]["values"],
        json!([
            {"a": 0, "b": 12.5, "flag": true},
            {"a": 1, "b": 7.25, "flag": false},
            {"a": 2, "b": 3.0, "flag": true}
        ])
    );
}

#[test]
fn unknown_foreign_type_fails_serialization() {
    #[derive(Debug, Clone, PartialEq)]
    struct Timestamp(u64);

    let mut spec = fixture();
    spec.insert("generated", PlainValue::foreign(Timestamp(1)));

    match vega_html::render(&mut spec, None, None) {
        Err(Error::SerializationError(msg)) => assert!(msg.contains("Timestamp"), "{}", msg),
        other => panic!("expected serialization error, got {:?}", other),
    }
}

#[test]
fn nan_fails_serialization() {
    let mut spec = fixture();
    spec.insert("opacity", PlainValue::Float(f64::NAN));
    assert!(matches!(
        vega_html::render(&mut spec, None, None),
        Err(Error::SerializationError(_))
    ));
}

#[test]
fn float_and_keyword_dimensions_render() {
    let mut spec = ChartSpec::from_json(r#"{"mark": "bar", "width": 400.0, "height": "container"}"#)
        .expect("dimensions other than integers are accepted");
    assert_eq!(spec.width(), 400);

    let html = vega_html::render(&mut spec, None, None).unwrap();
    let embedded = embedded_spec(&html);
    assert_eq!(embedded["width"], json!(400));
    assert_eq!(embedded["height"], json!("container"));
}

#[test]
fn every_render_is_fresh() {
    let mut spec = fixture();
    let a = vega_html::render(&mut spec, None, None).unwrap();
    let b = vega_html::render(&mut spec, None, None).unwrap();
    assert_eq!(a, b);
}
