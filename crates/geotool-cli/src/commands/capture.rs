//! Interactive capture session.
//!
//! Each line typed is either a coordinate ("lat,lon"), which acts as a map
//! click, or a command. Prompts for names and confirmations come from the
//! capture machine through [`DialoguerPrompter`].

use anyhow::Result;
use console::style;
use geotool_core::capture::{CaptureState, Renderer};
use geotool_core::config::LayeredConfig;
use geotool_core::models::{CaptureId, CaptureTool, Coordinate, TrackSample};
use geotool_core::FieldSession;

use super::open_session;
use crate::cli::CaptureArgs;
use crate::interactive::{read_command, DialoguerPrompter, TerminalMap};
use crate::output::{format_area, format_length, OutputWriter};

const HELP: &str = "\
  lat,lon            click on the map at this position
  point | line | polygon | area
                     select a tool
  none               deselect the tool (discards an unfinished shape)
  gps lat,lon [acc]  record a GPS fix
  rm <id>            remove a capture
  zoom <id>          center the view on a capture
  stats              show totals
  help               show this help
  quit               leave the session";

enum Command {
    Click(Coordinate),
    Select(CaptureTool),
    Deselect,
    Gps(Coordinate, f64),
    Remove(u64),
    Zoom(u64),
    Stats,
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word.to_lowercase().as_str() {
        "" => Ok(Command::Empty),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "help" | "?" => Ok(Command::Help),
        "stats" => Ok(Command::Stats),
        "none" | "esc" => Ok(Command::Deselect),
        "point" | "line" | "polygon" | "area" => word.parse().map(Command::Select),
        "rm" | "remove" => rest
            .parse()
            .map(Command::Remove)
            .map_err(|_| format!("'{}' is not a capture id", rest)),
        "zoom" => rest
            .parse()
            .map(Command::Zoom)
            .map_err(|_| format!("'{}' is not a capture id", rest)),
        "gps" => {
            let (position, accuracy) = rest.split_once(char::is_whitespace).unwrap_or((rest, "10"));
            let coordinate: Coordinate = position.parse().map_err(|e| format!("{}", e))?;
            let accuracy = accuracy
                .trim()
                .parse()
                .map_err(|_| format!("'{}' is not an accuracy in meters", accuracy.trim()))?;
            Ok(Command::Gps(coordinate, accuracy))
        }
        _ => line
            .parse()
            .map(Command::Click)
            .map_err(|e| format!("{} (type 'help' for commands)", e)),
    }
}

fn prompt_for(state: &CaptureState) -> String {
    match state {
        CaptureState::Idle => "no tool".to_string(),
        CaptureState::ToolSelected { kind } => format!("{}", kind),
        CaptureState::Accumulating { kind, vertices } => {
            format!("{} ({} vertices)", kind, vertices.len())
        }
    }
}

pub async fn execute(args: CaptureArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = open_session(config).await;
    let mut renderer = Renderer::new(TerminalMap::default());
    renderer.render_all(session.captures());
    let prompter = DialoguerPrompter;

    output.info(format!(
        "Capture session on {} ({} captures). Type 'help' for commands.",
        config.data_file.value.display(),
        session.captures().len()
    ));
    if let Some(tool) = args.tool {
        renderer.apply(&session.select_tool(tool));
    }

    loop {
        let line = read_command(prompt_for(session.state())).await?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                output.warning(message);
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Stats => print_stats(&session),
            Command::Select(tool) => renderer.apply(&session.select_tool(tool)),
            Command::Deselect => renderer.apply(&session.deselect()),
            Command::Click(coordinate) => {
                let outcome = session.click(coordinate, &prompter).await;
                renderer.apply(&outcome.events);
                match outcome.capture {
                    Some(capture) => {
                        let id = capture.id.map(|id| id.to_string()).unwrap_or_default();
                        output.success(format!("Saved {} '{}' (id {})", capture.kind(), capture.name(), id));
                        if let Some(length) = capture.length() {
                            output.kv("Length", format_length(length));
                        }
                        if let Some(area) = capture.area() {
                            output.kv("Area", format_area(area));
                        }
                    }
                    None if matches!(session.state(), CaptureState::Idle) => {
                        output.info("Select a tool first (point, line, polygon, area)");
                    }
                    None => {}
                }
            }
            Command::Gps(coordinate, accuracy) => {
                session
                    .record_position(TrackSample::new(coordinate, accuracy, None))
                    .await;
                output.success("GPS fix recorded");
            }
            Command::Remove(id) => {
                let events = session.remove_capture(CaptureId(id)).await;
                if events.is_empty() {
                    output.warning(format!("No capture with id {}", id));
                } else {
                    renderer.apply(&events);
                    output.success(format!("Removed capture {}", id));
                }
            }
            Command::Zoom(id) => match session.store().get(CaptureId(id)) {
                Some(capture) => renderer.zoom_to(capture),
                None => output.warning(format!("No capture with id {}", id)),
            },
        }
    }

    print_stats(&session);
    Ok(())
}

fn print_stats(session: &FieldSession) {
    let stats = session.stats();
    println!(
        "{} {} points, {} lines ({}), {} polygons ({}), {} GPS fixes",
        style("Σ").bold(),
        stats.point_count,
        stats.line_count,
        format_length(stats.total_length),
        stats.polygon_count,
        format_area(stats.total_area),
        stats.track_samples
    );
}
