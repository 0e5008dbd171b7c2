use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::GpxError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, GpxError>;
type XmlReader<'a> = Reader<&'a [u8]>;

/// An element whose start tag has just been read.
struct Element<'a> {
    tag: BytesStart<'a>,
    /// false for `<tag/>`, which has no content to read
    open: bool,
}

impl<'a> Element<'a> {
    fn open(tag: BytesStart<'a>) -> Self {
        Self { tag, open: true }
    }

    fn empty(tag: BytesStart<'a>) -> Self {
        Self { tag, open: false }
    }

    fn is(&self, local_name: &[u8]) -> bool {
        self.tag.local_name().as_ref() == local_name
    }

    /// Attribute value with entities resolved.
    fn attribute(&self, name: &[u8]) -> Option<String> {
        self.tag
            .attributes()
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == name)
            .map(|attr| unescaped(&attr.value))
    }
}

/// Parse a GPX XML string into GpxData.
pub fn parse_gpx(xml: &str) -> Result<GpxData> {
    let mut reader = Reader::from_str(xml);
    let mut data = GpxData::default();

    loop {
        let element = match reader.read_event()? {
            Event::Start(tag) => Element::open(tag),
            Event::Empty(tag) => Element::empty(tag),
            Event::Eof => return Ok(data),
            _ => continue,
        };
        if element.is(b"gpx") {
            parse_root(&mut reader, &element, &mut data)?;
        } else {
            skip(&mut reader, &element)?;
        }
    }
}

/// Parse a GPX timestamp. Zone-less timestamps are read as UTC.
pub fn parse_time(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|t| t.and_utc())
        .map_err(|_| GpxError::InvalidTime(text.to_string()))
}

/// Visit every child element of `parent` until its end tag. The visitor must
/// consume the content of the children it is handed.
fn children<'a>(
    reader: &mut XmlReader<'a>,
    parent: &Element<'_>,
    mut visit: impl FnMut(&mut XmlReader<'a>, Element<'a>) -> Result<()>,
) -> Result<()> {
    if !parent.open {
        return Ok(());
    }
    loop {
        let child = match reader.read_event()? {
            Event::Start(tag) => Element::open(tag),
            Event::Empty(tag) => Element::empty(tag),
            Event::End(end) if end.name().as_ref() == parent.tag.name().as_ref() => {
                return Ok(());
            }
            Event::Eof => return Ok(()),
            _ => continue,
        };
        visit(reader, child)?;
    }
}

fn skip(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<()> {
    if element.open {
        reader.read_to_end(element.tag.name())?;
    }
    Ok(())
}

/// Content of an element exactly as written, markup included.
fn raw(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<String> {
    if !element.open {
        return Ok(String::new());
    }
    Ok(reader.read_text(element.tag.name())?.to_string())
}

/// Text content of an element: text and CDATA joined, references resolved,
/// nested markup ignored.
fn text(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<String> {
    let mut out = String::new();
    if !element.open {
        return Ok(out);
    }
    loop {
        match reader.read_event()? {
            Event::Text(t) => out.push_str(std::str::from_utf8(t.as_ref()).unwrap_or_default()),
            Event::CData(t) => out.push_str(std::str::from_utf8(t.as_ref()).unwrap_or_default()),
            Event::GeneralRef(r) => match r.resolve_char_ref() {
                Ok(Some(ch)) => out.push(ch),
                _ => out.extend(predefined_entity(r.as_ref())),
            },
            Event::Start(nested) => {
                reader.read_to_end(nested.name())?;
            }
            Event::End(end) if end.name().as_ref() == element.tag.name().as_ref() => {
                return Ok(out);
            }
            Event::Eof => return Ok(out),
            _ => {}
        }
    }
}

fn predefined_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        _ => None,
    }
}

fn unescaped(value: &[u8]) -> String {
    let value = std::str::from_utf8(value).unwrap_or_default();
    unescape(value)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn parse_root<'a>(
    reader: &mut XmlReader<'a>,
    root: &Element<'a>,
    data: &mut GpxData,
) -> Result<()> {
    for attr in root.tag.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        match key.as_str() {
            "creator" => data.creator = Some(unescaped(&attr.value)),
            "version" | "xmlns" => {}
            _ => data.root_attributes.push((key, unescaped(&attr.value))),
        }
    }

    children(reader, root, |reader, child| {
        match child.tag.local_name().as_ref() {
            b"metadata" => data.metadata = Some(raw(reader, &child)?),
            b"extensions" => data.extensions = Some(raw(reader, &child)?),
            b"wpt" => data.waypoints.extend(parse_point(reader, &child)?),
            b"rte" => data.routes.push(parse_route(reader, &child)?),
            b"trk" => data.tracks.push(parse_track(reader, &child)?),
            _ => skip(reader, &child)?,
        }
        Ok(())
    })
}

fn parse_lat_lon(element: &Element<'_>) -> Result<(f64, f64)> {
    let coordinate = |attribute: &'static str| -> Result<f64> {
        let value = element
            .attribute(attribute.as_bytes())
            .ok_or(GpxError::MissingAttribute {
                element: "point",
                attribute,
            })?;
        let parsed = value.trim().parse::<f64>();
        parsed.map_err(|_| GpxError::InvalidAttribute {
            element: "point",
            attribute,
            value,
        })
    };
    Ok((coordinate("lat")?, coordinate("lon")?))
}

/// A wpt, rtept or trkpt. Points without usable coordinates are dropped.
fn parse_point<'a>(
    reader: &mut XmlReader<'a>,
    element: &Element<'a>,
) -> Result<Option<GpxPoint>> {
    let Ok((lat, lon)) = parse_lat_lon(element) else {
        skip(reader, element)?;
        return Ok(None);
    };
    let mut point = GpxPoint::new(lat, lon);

    children(reader, element, |reader, child| {
        match child.tag.local_name().as_ref() {
            b"ele" => point.ele = text(reader, &child)?.trim().parse().ok(),
            b"time" => point.time = Some(parse_time(&text(reader, &child)?)?),
            b"name" => point.name = Some(text(reader, &child)?),
            b"cmt" => point.cmt = Some(text(reader, &child)?),
            b"desc" => point.desc = Some(text(reader, &child)?),
            b"src" => point.src = Some(text(reader, &child)?),
            b"sym" => point.sym = Some(text(reader, &child)?),
            b"type" => point.point_type = Some(text(reader, &child)?),
            b"link" => point.link = Some(parse_link(reader, &child)?),
            b"extensions" => point.extensions = Some(raw(reader, &child)?),
            // GPX 1.0 speed/course, magvar, fix and the like
            _ => skip(reader, &child)?,
        }
        Ok(())
    })?;

    Ok(Some(point))
}

fn parse_link<'a>(reader: &mut XmlReader<'a>, element: &Element<'a>) -> Result<GpxLink> {
    let mut link = GpxLink {
        href: element.attribute(b"href").unwrap_or_default(),
        text: None,
        link_type: None,
    };
    children(reader, element, |reader, child| {
        if child.is(b"text") {
            link.text = Some(text(reader, &child)?);
        } else if child.is(b"type") {
            link.link_type = Some(text(reader, &child)?);
        } else {
            skip(reader, &child)?;
        }
        Ok(())
    })?;
    Ok(link)
}

fn parse_route<'a>(reader: &mut XmlReader<'a>, element: &Element<'a>) -> Result<GpxRoute> {
    let mut route = GpxRoute::default();
    children(reader, element, |reader, child| {
        match child.tag.local_name().as_ref() {
            b"rtept" => route.points.extend(parse_point(reader, &child)?),
            b"name" => route.name = Some(text(reader, &child)?),
            b"cmt" => route.cmt = Some(text(reader, &child)?),
            b"desc" => route.desc = Some(text(reader, &child)?),
            b"src" => route.src = Some(text(reader, &child)?),
            b"type" => route.route_type = Some(text(reader, &child)?),
            b"number" => route.number = text(reader, &child)?.trim().parse().ok(),
            b"link" => route.link = Some(parse_link(reader, &child)?),
            b"extensions" => route.extensions = Some(raw(reader, &child)?),
            _ => skip(reader, &child)?,
        }
        Ok(())
    })?;
    Ok(route)
}

/// A trk element. Empty segments are kept.
fn parse_track<'a>(reader: &mut XmlReader<'a>, element: &Element<'a>) -> Result<GpxTrack> {
    let mut track = GpxTrack::default();
    children(reader, element, |reader, child| {
        match child.tag.local_name().as_ref() {
            b"trkseg" => track.segments.push(parse_segment(reader, &child)?),
            b"name" => track.name = Some(text(reader, &child)?),
            b"cmt" => track.cmt = Some(text(reader, &child)?),
            b"desc" => track.desc = Some(text(reader, &child)?),
            b"src" => track.src = Some(text(reader, &child)?),
            b"type" => track.track_type = Some(text(reader, &child)?),
            b"number" => track.number = text(reader, &child)?.trim().parse().ok(),
            b"link" => track.link = Some(parse_link(reader, &child)?),
            b"extensions" => track.extensions = Some(raw(reader, &child)?),
            _ => skip(reader, &child)?,
        }
        Ok(())
    })?;
    Ok(track)
}

fn parse_segment<'a>(reader: &mut XmlReader<'a>, element: &Element<'a>) -> Result<GpxSegment> {
    let mut segment = GpxSegment::default();
    children(reader, element, |reader, child| {
        if child.is(b"trkpt") {
            segment.points.extend(parse_point(reader, &child)?);
        } else if child.is(b"extensions") {
            segment.extensions = Some(raw(reader, &child)?);
        } else {
            skip(reader, &child)?;
        }
        Ok(())
    })?;
    Ok(segment)
}
