use chrono::{DateTime, Utc};

/// Parsed GPX data containing all waypoints, routes, and tracks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxData {
    pub creator: Option<String>,
    /// Root attributes other than `version`, `creator` and the default
    /// namespace, e.g. `xmlns:gpxtpx` or `xsi:schemaLocation`.
    pub root_attributes: Vec<(String, String)>,
    /// Raw content of `<metadata>`, written back verbatim.
    pub metadata: Option<String>,
    pub waypoints: Vec<GpxPoint>,
    pub routes: Vec<GpxRoute>,
    pub tracks: Vec<GpxTrack>,
    pub extensions: Option<String>,
}

/// A single GPX point (used for wpt, rtept, trkpt).
#[derive(Debug, Clone, PartialEq)]
pub struct GpxPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub sym: Option<String>,
    pub point_type: Option<String>,
    pub link: Option<GpxLink>,
    /// Raw content of `<extensions>` (heart rate, cadence, power...)
    pub extensions: Option<String>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
            name: None,
            cmt: None,
            desc: None,
            src: None,
            sym: None,
            point_type: None,
            link: None,
            extensions: None,
        }
    }

    pub fn with_ele(mut self, ele: f64) -> Self {
        self.ele = Some(ele);
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// A GPX link element.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxLink {
    pub href: String,
    pub text: Option<String>,
    pub link_type: Option<String>,
}

/// A GPX route (<rte>).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxRoute {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub link: Option<GpxLink>,
    pub number: Option<u32>,
    pub route_type: Option<String>,
    pub extensions: Option<String>,
    pub points: Vec<GpxPoint>,
}

/// A GPX track (<trk>).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxTrack {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub link: Option<GpxLink>,
    pub number: Option<u32>,
    pub track_type: Option<String>,
    pub extensions: Option<String>,
    pub segments: Vec<GpxSegment>,
}

impl GpxTrack {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// A GPX track segment (<trkseg>).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxSegment {
    pub points: Vec<GpxPoint>,
    pub extensions: Option<String>,
}

impl GpxSegment {
    pub fn new(points: Vec<GpxPoint>) -> Self {
        Self {
            points,
            extensions: None,
        }
    }
}
