//! Capture export to interchange formats.
//!
//! Every exporter takes an immutable slice of captures and returns the whole
//! document as text. Coordinates leave in lon,lat order for GeoJSON and KML.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeotoolError, Result};
use crate::models::Capture;

mod csv_writer;
mod geojson_writer;
mod kml_writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    GeoJson,
    Kml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::GeoJson, ExportFormat::Kml];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::GeoJson => "application/geo+json",
            ExportFormat::Kml => "application/vnd.google-earth.kml+xml",
        }
    }

    /// Suggested download name
    pub fn file_name(&self) -> String {
        format!("geotool_export.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::GeoJson => "GeoJSON",
            ExportFormat::Kml => "KML",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = GeotoolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "1" => Ok(ExportFormat::Csv),
            "geojson" | "json" | "2" => Ok(ExportFormat::GeoJson),
            "kml" | "3" => Ok(ExportFormat::Kml),
            other => Err(GeotoolError::UnsupportedFormat {
                extension: other.to_string(),
                supported: "csv, geojson, kml".to_string(),
            }),
        }
    }
}

/// Serialize `captures` in `format`
pub fn export(captures: &[Capture], format: ExportFormat) -> Result<String> {
    if captures.is_empty() {
        return Err(GeotoolError::NothingToExport);
    }

    let document = match format {
        ExportFormat::Csv => csv_writer::write(captures),
        ExportFormat::GeoJson => geojson_writer::write(captures)?,
        ExportFormat::Kml => kml_writer::write(captures)?,
    };

    tracing::info!(format = %format, captures = captures.len(), bytes = document.len(), "Export written");
    Ok(document)
}

fn export_error(format: ExportFormat, err: impl fmt::Display) -> GeotoolError {
    GeotoolError::Export {
        format: format.to_string(),
        message: err.to_string(),
    }
}
