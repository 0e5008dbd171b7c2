//! File-to-file extension, as performed by the command line tool.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::error::{ErrorKind, ExtendError, GpxError};
use crate::extend::{extend_by_elevation, Extension};
use crate::options::ExtendOptions;
use crate::output::derived_output_path;
use crate::parser::parse_gpx;
use crate::writer::write_gpx;

/// Failure of [`extend_file`], tagged with the file it concerns.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("gpx file {} not accessible: {source}", .path.display())]
    InputUnavailable { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    MalformedSource { path: PathBuf, source: GpxError },
    #[error("cannot extend {}: {source}", .path.display())]
    Extend { path: PathBuf, source: ExtendError },
    #[error("failed to serialize GPX: {0}")]
    Serialize(#[source] GpxError),
    #[error("failed to write {}: {source}", .path.display())]
    OutputUnavailable { path: PathBuf, source: io::Error },
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputUnavailable { .. } => ErrorKind::InputUnavailable,
            Self::MalformedSource { .. } => ErrorKind::MalformedSource,
            Self::Extend { source, .. } => source.kind(),
            Self::Serialize(_) | Self::OutputUnavailable { .. } => ErrorKind::OutputUnavailable,
        }
    }
}

/// What [`extend_file`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: PathBuf,
    pub extension: Extension,
}

/// Read `input`, append the elevation track and write the result to `output`,
/// or next to `input` under the derived name. Nothing is written on failure.
pub fn extend_file(
    input: &Path,
    target_elevation: f64,
    opts: &ExtendOptions,
    output: Option<&Path>,
) -> Result<Outcome, RunError> {
    let xml = fs::read_to_string(input).map_err(|source| RunError::InputUnavailable {
        path: input.to_path_buf(),
        source,
    })?;
    let mut data = parse_gpx(&xml).map_err(|source| RunError::MalformedSource {
        path: input.to_path_buf(),
        source,
    })?;
    debug!(
        tracks = data.tracks.len(),
        points = data.track_points().count(),
        "parsed {}",
        input.display()
    );

    let extension =
        extend_by_elevation(&mut data, target_elevation, opts).map_err(|source| {
            RunError::Extend {
                path: input.to_path_buf(),
                source,
            }
        })?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derived_output_path(input, opts.detach));
    let modified = write_gpx(&data).map_err(RunError::Serialize)?;
    fs::write(&output, modified).map_err(|source| RunError::OutputUnavailable {
        path: output.clone(),
        source,
    })?;
    info!(
        points = extension.point_count,
        net = extension.net_elevation,
        "wrote {}",
        output.display()
    );

    Ok(Outcome { output, extension })
}
