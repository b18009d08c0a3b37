use clap::{Parser, Subcommand};
use geotool_core::export::ExportFormat;
use geotool_core::models::CaptureTool;
use std::path::PathBuf;

/// GeoTool - forestry field data collection
#[derive(Parser, Debug)]
#[command(name = "geotool")]
#[command(about = "Capture, measure and export forestry field data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geotool.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data file holding captures and the GPS track
    #[arg(long, global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive capture session
    Capture(CaptureArgs),

    /// List stored captures
    List,

    /// Show capture totals
    Stats,

    /// Remove a capture by id
    Remove(RemoveArgs),

    /// Export all captures
    Export(ExportArgs),

    /// Load a reference layer (GeoJSON, KML or shapefile) and fit the view to it
    Load(LoadArgs),

    /// Record or show the GPS track
    Track(TrackArgs),

    /// Delete every capture and the GPS track
    Clear(ClearArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct CaptureArgs {
    /// Tool to start with (point, line, polygon, area)
    #[arg(long, short = 't')]
    pub tool: Option<CaptureTool>,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Capture id as shown by `geotool list`
    pub id: u64,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Export format (csv, geojson, kml)
    #[arg(long, short = 'f', default_value = "geojson")]
    pub format: ExportFormat,

    /// Output file (defaults to geotool_export.<ext>; use - for stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Path to a .geojson, .json, .kml, zipped shapefile or .shp file
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct TrackArgs {
    #[command(subcommand)]
    pub command: TrackCommand,
}

#[derive(Subcommand, Debug)]
pub enum TrackCommand {
    /// Append a GPS fix
    Add(TrackAddArgs),

    /// Show the recorded track
    Show,
}

#[derive(Parser, Debug)]
pub struct TrackAddArgs {
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(allow_negative_numbers = true)]
    pub lon: f64,

    /// Horizontal accuracy in meters
    #[arg(long, default_value = "10")]
    pub accuracy: f64,

    /// Altitude in meters
    #[arg(long, allow_negative_numbers = true)]
    pub altitude: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}
