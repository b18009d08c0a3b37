use anyhow::Result;
use geotool_core::config::LayeredConfig;
use geotool_core::models::{Coordinate, TrackSample};
use geotool_core::utm;

use super::open_session;
use crate::cli::{TrackArgs, TrackCommand};
use crate::output::OutputWriter;
use crate::output_types::{TrackOutput, TrackRow};

pub async fn execute(args: TrackArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = open_session(config).await;

    match args.command {
        TrackCommand::Add(fix) => {
            let coordinate = Coordinate::validated(fix.lat, fix.lon)?;
            session
                .record_position(TrackSample::new(coordinate, fix.accuracy, fix.altitude))
                .await;
            output.success(format!(
                "Recorded fix {:.6}, {:.6} (±{:.0} m)",
                coordinate.lat, coordinate.lon, fix.accuracy
            ));
            output.kv("Position", utm::readout(coordinate));
        }
        TrackCommand::Show => {
            let store = session.store();
            let rows: Vec<TrackRow> = store
                .track()
                .iter()
                .enumerate()
                .map(|(i, sample)| TrackRow::new(i, sample))
                .collect();
            let last_fix_utm = store.track().last().map(|s| utm::readout(s.coordinate));
            let data = TrackOutput {
                samples: store.track().to_vec(),
                duration_seconds: store.track_duration().map(|d| d.num_seconds()),
                last_fix_utm: last_fix_utm.clone(),
            };
            output.table(rows, &data)?;
            if let Some(readout) = last_fix_utm {
                output.kv("Last fix", readout);
            }
        }
    }
    Ok(())
}
