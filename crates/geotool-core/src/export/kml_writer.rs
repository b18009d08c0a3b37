use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{export_error, ExportFormat};
use crate::error::Result;
use crate::models::{Capture, CaptureShape, Coordinate};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

pub(super) fn write(captures: &[Capture]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
        ))
        .map_err(xml_error)?;
    start(&mut writer, "Document")?;
    text_element(&mut writer, "name", "GeoTool Export")?;

    for capture in captures {
        placemark(&mut writer, capture)?;
    }

    end(&mut writer, "Document")?;
    end(&mut writer, "kml")?;

    String::from_utf8(writer.into_inner()).map_err(|e| export_error(ExportFormat::Kml, e))
}

fn placemark(writer: &mut Writer<Vec<u8>>, capture: &Capture) -> Result<()> {
    start(writer, "Placemark")?;
    text_element(writer, "name", capture.name())?;
    text_element(writer, "description", capture.description())?;

    match capture.shape() {
        CaptureShape::Point { coordinates, .. } => {
            start(writer, "Point")?;
            text_element(writer, "coordinates", &coordinate_list(std::slice::from_ref(coordinates)))?;
            end(writer, "Point")?;
        }
        CaptureShape::Line { coordinates, .. } => {
            start(writer, "LineString")?;
            text_element(writer, "coordinates", &coordinate_list(coordinates))?;
            end(writer, "LineString")?;
        }
        CaptureShape::Polygon { coordinates, .. } => {
            let mut ring = coordinates.clone();
            if let Some(first) = ring.first().copied() {
                if ring.last() != Some(&first) {
                    ring.push(first);
                }
            }
            start(writer, "Polygon")?;
            start(writer, "outerBoundaryIs")?;
            start(writer, "LinearRing")?;
            text_element(writer, "coordinates", &coordinate_list(&ring))?;
            end(writer, "LinearRing")?;
            end(writer, "outerBoundaryIs")?;
            end(writer, "Polygon")?;
        }
    }

    end(writer, "Placemark")
}

/// `lon,lat,0` tuples separated by spaces
fn coordinate_list(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(|c| format!("{},{},0", c.lon, c.lat))
        .collect::<Vec<_>>()
        .join(" ")
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_error)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_error)?;
    end(writer, name)
}

fn xml_error(err: impl std::fmt::Display) -> crate::error::GeotoolError {
    export_error(ExportFormat::Kml, err)
}
