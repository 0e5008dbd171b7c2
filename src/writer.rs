use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::GpxError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, GpxError>;

pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
pub const DEFAULT_CREATOR: &str = "gpx-elevation-extend";

/// Serialize GpxData as a GPX 1.1 document.
pub fn write_gpx(data: &GpxData) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", data.creator.as_deref().unwrap_or(DEFAULT_CREATOR)));
    root.push_attribute(("xmlns", GPX_NAMESPACE));
    for (key, value) in &data.root_attributes {
        root.push_attribute((key.as_str(), value.as_str()));
    }
    writer.write_event(Event::Start(root))?;

    write_raw(&mut writer, "metadata", &data.metadata)?;

    for wpt in &data.waypoints {
        write_point(&mut writer, "wpt", wpt)?;
    }
    for rte in &data.routes {
        write_route(&mut writer, rte)?;
    }
    for trk in &data.tracks {
        write_track(&mut writer, trk)?;
    }
    write_raw(&mut writer, "extensions", &data.extensions)?;

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Format a timestamp the way GPX expects it: RFC 3339 in UTC with a `Z` suffix.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn write_point<W: Write>(writer: &mut Writer<W>, tag: &str, pt: &GpxPoint) -> Result<()> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("lat", pt.lat.to_string().as_str()));
    start.push_attribute(("lon", pt.lon.to_string().as_str()));
    writer.write_event(Event::Start(start))?;

    if let Some(ele) = pt.ele {
        write_text(writer, "ele", &ele.to_string())?;
    }
    if let Some(time) = &pt.time {
        write_text(writer, "time", &format_time(time))?;
    }
    write_optional(writer, "name", &pt.name)?;
    write_optional(writer, "cmt", &pt.cmt)?;
    write_optional(writer, "desc", &pt.desc)?;
    write_optional(writer, "src", &pt.src)?;
    write_link(writer, &pt.link)?;
    write_optional(writer, "sym", &pt.sym)?;
    write_optional(writer, "type", &pt.point_type)?;
    write_raw(writer, "extensions", &pt.extensions)?;

    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_route<W: Write>(writer: &mut Writer<W>, rte: &GpxRoute) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("rte")))?;
    write_optional(writer, "name", &rte.name)?;
    write_optional(writer, "cmt", &rte.cmt)?;
    write_optional(writer, "desc", &rte.desc)?;
    write_optional(writer, "src", &rte.src)?;
    write_link(writer, &rte.link)?;
    if let Some(n) = rte.number {
        write_text(writer, "number", &n.to_string())?;
    }
    write_optional(writer, "type", &rte.route_type)?;
    write_raw(writer, "extensions", &rte.extensions)?;
    for pt in &rte.points {
        write_point(writer, "rtept", pt)?;
    }
    writer.write_event(Event::End(BytesEnd::new("rte")))?;
    Ok(())
}

fn write_track<W: Write>(writer: &mut Writer<W>, trk: &GpxTrack) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    write_optional(writer, "name", &trk.name)?;
    write_optional(writer, "cmt", &trk.cmt)?;
    write_optional(writer, "desc", &trk.desc)?;
    write_optional(writer, "src", &trk.src)?;
    write_link(writer, &trk.link)?;
    if let Some(n) = trk.number {
        write_text(writer, "number", &n.to_string())?;
    }
    write_optional(writer, "type", &trk.track_type)?;
    write_raw(writer, "extensions", &trk.extensions)?;
    for seg in &trk.segments {
        writer.write_event(Event::Start(BytesStart::new("trkseg")))?;
        for pt in &seg.points {
            write_point(writer, "trkpt", pt)?;
        }
        write_raw(writer, "extensions", &seg.extensions)?;
        writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("trk")))?;
    Ok(())
}

fn write_link<W: Write>(writer: &mut Writer<W>, link: &Option<GpxLink>) -> Result<()> {
    if let Some(link) = link {
        let mut start = BytesStart::new("link");
        start.push_attribute(("href", link.href.as_str()));
        writer.write_event(Event::Start(start))?;
        write_optional(writer, "text", &link.text)?;
        write_optional(writer, "type", &link.link_type)?;
        writer.write_event(Event::End(BytesEnd::new("link")))?;
    }
    Ok(())
}

fn write_optional<W: Write>(writer: &mut Writer<W>, tag: &str, value: &Option<String>) -> Result<()> {
    if let Some(v) = value {
        write_text(writer, tag, v)?;
    }
    Ok(())
}

/// Write `content` inside `tag` as is, without escaping.
fn write_raw<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    content: &Option<String>,
) -> Result<()> {
    if let Some(content) = content {
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        writer.write_event(Event::Text(BytesText::from_escaped(content.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
