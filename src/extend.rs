//! Extend a recording with a synthetic track that climbs a given net elevation.
//!
//! The new track copies the leading points of the flattened recording until
//! the elevation of the latest copied point, relative to the first one,
//! reaches the target. Copies are re-timed so that they start shortly after
//! the recorded activity ends while keeping the original spacing between
//! points.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExtendError;
use crate::gpx_types::*;
use crate::options::ExtendOptions;

type Result<T> = std::result::Result<T, ExtendError>;

/// Name given to the new track when the first track has none.
pub const DEFAULT_TRACK_NAME: &str = "Untitled";

/// Summary of a successful extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub track_name: String,
    pub point_count: usize,
    /// Elevation of the last new point minus elevation of the first, in meters.
    pub net_elevation: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Offset applied to every existing point in detach mode, zero otherwise.
    pub shift_seconds: i64,
}

#[derive(Debug)]
struct Selection {
    points: Vec<GpxPoint>,
    net: f64,
}

/// Append a track made of the leading points of `data` whose net elevation
/// delta reaches `target` meters.
///
/// The reference segment is the last segment of the last track; the new
/// track starts `opts.start_gap()` after its last point. With `opts.detach`
/// every existing point is first moved later by the reference segment's
/// duration plus `opts.detach_buffer()`.
///
/// On error `data` is left exactly as it was.
pub fn extend_by_elevation(
    data: &mut GpxData,
    target: f64,
    opts: &ExtendOptions,
) -> Result<Extension> {
    if !target.is_finite() || target <= 0.0 {
        return Err(ExtendError::InvalidTarget(target));
    }

    let (first, last) = reference_span(data)?;
    let shift = if opts.detach {
        (last - first) + opts.detach_buffer()
    } else {
        TimeDelta::zero()
    };
    let start = last
        .checked_add_signed(shift)
        .and_then(|t| t.checked_add_signed(opts.start_gap()))
        .ok_or(ExtendError::TimeOutOfRange)?;
    debug!(%first, %last, shift = shift.num_seconds(), %start, "reference segment");

    let selection = select_points(data.track_points(), target, start)?;
    let track_name = template_name(data, opts);

    if opts.detach {
        shift_times(data, shift)?;
    }

    let end = selection
        .points
        .last()
        .and_then(|p| p.time)
        .unwrap_or(start);
    let extension = Extension {
        track_name: track_name.clone(),
        point_count: selection.points.len(),
        net_elevation: selection.net,
        start_time: start,
        end_time: end,
        shift_seconds: shift.num_seconds(),
    };

    data.tracks.push(GpxTrack {
        name: Some(track_name),
        segments: vec![GpxSegment::new(selection.points)],
        ..Default::default()
    });

    info!(
        track = %extension.track_name,
        points = extension.point_count,
        net = extension.net_elevation,
        "appended elevation track"
    );
    Ok(extension)
}

/// First and last timestamps of the last segment of the last track.
fn reference_span(data: &GpxData) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let track = data.tracks.last().ok_or(ExtendError::NoTracks)?;
    let segment = track.segments.last().ok_or(ExtendError::NoSegments)?;
    let (Some(first), Some(last)) = (segment.points.first(), segment.points.last()) else {
        return Err(ExtendError::NoPoints);
    };
    match (first.time, last.time) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(ExtendError::MissingTimestamps),
    }
}

/// Name of the new track: the configured override, else the first track's name.
fn template_name(data: &GpxData, opts: &ExtendOptions) -> String {
    opts.track_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            data.tracks
                .first()
                .and_then(|t| t.name.as_deref())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or(DEFAULT_TRACK_NAME)
        .to_string()
}

/// Copy points until the net elevation delta reaches `target`.
///
/// The threshold is checked before each point, so the point that made `net`
/// reach the target is the last one copied. The net delta is signed: a
/// descent lowers it again.
fn select_points<'a>(
    stream: impl Iterator<Item = &'a GpxPoint>,
    target: f64,
    start: DateTime<Utc>,
) -> Result<Selection> {
    let mut net = 0.0;
    let mut previous: Option<(&GpxPoint, f64, DateTime<Utc>)> = None;
    let mut points = Vec::new();

    for (index, point) in stream.enumerate() {
        if net >= target {
            debug!(index, net, "threshold reached");
            return Ok(Selection { points, net });
        }

        let ele = point.ele.ok_or(ExtendError::MissingElevation { index })?;
        let time = match previous {
            None => start,
            Some((prev, prev_ele, prev_time)) => {
                let (Some(now), Some(then)) = (point.time, prev.time) else {
                    return Err(ExtendError::UntimedPoint { index });
                };
                net += ele - prev_ele;
                prev_time
                    .checked_add_signed(now - then)
                    .ok_or(ExtendError::TimeOutOfRange)?
            }
        };

        let mut copy = point.clone();
        copy.time = Some(time);
        points.push(copy);
        previous = Some((point, ele, time));
    }

    if net >= target {
        debug!(net, "threshold reached on the last point");
        Ok(Selection { points, net })
    } else {
        Err(ExtendError::ThresholdUnreachable {
            target,
            reached: net,
        })
    }
}

/// Move every timestamp in the document by `shift`, or none if any would overflow.
fn shift_times(data: &mut GpxData, shift: TimeDelta) -> Result<()> {
    let fits = data
        .all_points()
        .filter_map(|p| p.time)
        .all(|t| t.checked_add_signed(shift).is_some());
    if !fits {
        return Err(ExtendError::TimeOutOfRange);
    }
    for point in data.all_points_mut() {
        if let Some(time) = point.time.as_mut() {
            *time += shift;
        }
    }
    Ok(())
}
