pub mod error;
pub mod extend;
pub mod gpx_types;
pub mod options;
pub mod output;
pub mod parser;
pub mod run;
pub mod stream;
pub mod writer;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use crate::error::{Error, ErrorKind, ExtendError, GpxError};
pub use crate::extend::{extend_by_elevation, Extension, DEFAULT_TRACK_NAME};
pub use crate::gpx_types::*;
pub use crate::options::ExtendOptions;
pub use crate::parser::parse_gpx;
pub use crate::run::{extend_file, Outcome, RunError};
pub use crate::writer::write_gpx;

/// Parse `gpx_string`, append the elevation track and serialize the result.
pub fn extend_gpx_str(
    gpx_string: &str,
    target_elevation: f64,
    opts: &ExtendOptions,
) -> Result<(String, Extension), Error> {
    let mut data = parse_gpx(gpx_string)?;
    let extension = extend_by_elevation(&mut data, target_elevation, opts)?;
    Ok((write_gpx(&data)?, extension))
}

#[derive(Serialize)]
struct ExtendReport {
    gpx: String,
    extension: Extension,
}

/// Extend a GPX string by elevation, returning the modified GPX string.
#[wasm_bindgen(js_name = extendGpx)]
pub fn extend_gpx(
    gpx_string: &str,
    target_elevation: f64,
    options: JsValue,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let (gpx, _) = extend_gpx_str(gpx_string, target_elevation, &opts)?;
    Ok(gpx)
}

/// Extend a GPX string by elevation, returning `{ gpx, extension }` as a JS object.
#[wasm_bindgen(js_name = extendGpxReport)]
pub fn extend_gpx_report(
    gpx_string: &str,
    target_elevation: f64,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let (gpx, extension) = extend_gpx_str(gpx_string, target_elevation, &opts)?;
    serde_wasm_bindgen::to_value(&ExtendReport { gpx, extension })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<ExtendOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ExtendOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
