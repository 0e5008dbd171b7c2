//! Flattened views over the points of a [`GpxData`].

use std::iter::FusedIterator;
use std::slice;

use crate::gpx_types::*;

/// Every track point of a document, track by track and segment by segment.
///
/// Call [`GpxData::track_points`] again to walk the document from the start.
#[derive(Debug, Clone, Default)]
pub struct TrackPoints<'a> {
    tracks: slice::Iter<'a, GpxTrack>,
    segments: slice::Iter<'a, GpxSegment>,
    points: slice::Iter<'a, GpxPoint>,
}

impl<'a> Iterator for TrackPoints<'a> {
    type Item = &'a GpxPoint;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(point) = self.points.next() {
                return Some(point);
            }
            if let Some(segment) = self.segments.next() {
                self.points = segment.points.iter();
                continue;
            }
            let track = self.tracks.next()?;
            self.segments = track.segments.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.segments.len() == 0 && self.tracks.len() == 0 {
            (self.points.len(), Some(self.points.len()))
        } else {
            (self.points.len(), None)
        }
    }
}

impl FusedIterator for TrackPoints<'_> {}

impl GpxData {
    /// Track points in document order. Waypoints and routes are not included.
    pub fn track_points(&self) -> TrackPoints<'_> {
        TrackPoints {
            tracks: self.tracks.iter(),
            ..Default::default()
        }
    }

    /// Every point carried by the document: waypoints, route points, then track points.
    pub fn all_points(&self) -> impl Iterator<Item = &GpxPoint> {
        self.waypoints
            .iter()
            .chain(self.routes.iter().flat_map(|r| r.points.iter()))
            .chain(self.track_points())
    }

    /// Mutable counterpart of [`GpxData::all_points`].
    pub fn all_points_mut(&mut self) -> impl Iterator<Item = &mut GpxPoint> {
        self.waypoints
            .iter_mut()
            .chain(self.routes.iter_mut().flat_map(|r| r.points.iter_mut()))
            .chain(
                self.tracks
                    .iter_mut()
                    .flat_map(|t| t.segments.iter_mut())
                    .flat_map(|s| s.points.iter_mut()),
            )
    }
}
