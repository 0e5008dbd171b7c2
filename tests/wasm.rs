#![cfg(target_arch = "wasm32")]

use gpx_elevation_extend::{extend_gpx, extend_gpx_report};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const GPX: &str = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <name>Ride</name>
    <trkseg>
      <trkpt lat="45.0" lon="6.0"><ele>100</ele><time>2025-05-10T06:00:00Z</time></trkpt>
      <trkpt lat="45.1" lon="6.1"><ele>105</ele><time>2025-05-10T06:01:00Z</time></trkpt>
      <trkpt lat="45.2" lon="6.2"><ele>103</ele><time>2025-05-10T06:02:00Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

#[wasm_bindgen_test]
fn extends_with_default_options() {
    let out = extend_gpx(GPX, 4.0, JsValue::UNDEFINED).unwrap();
    assert!(out.contains("<time>2025-05-10T06:03:00Z</time>"));
    assert!(out.contains("<time>2025-05-10T06:04:00Z</time>"));
}

#[wasm_bindgen_test]
fn reports_errors_as_strings() {
    let err = extend_gpx(GPX, 50.0, JsValue::NULL).unwrap_err();
    assert!(err.as_string().unwrap().starts_with("No points found to reach 50 m"));
}

#[wasm_bindgen_test]
fn report_is_an_object() {
    let report = extend_gpx_report(GPX, 4.0, JsValue::UNDEFINED).unwrap();
    assert!(report.is_object());
}
