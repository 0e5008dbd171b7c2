use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Output path next to `input`: `ride.gpx` becomes `ride_modified.gpx`, or
/// `ride_modified_fake_time.gpx` when the recording was detached.
pub fn derived_output_path(input: &Path, detach: bool) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();

    name.push("_modified");
    if detach {
        name.push("_fake_time");
    }
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}
