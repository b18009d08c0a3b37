use anyhow::Result;
use geotool_core::config::LayeredConfig;
use std::collections::BTreeMap;

use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigRow};

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let entries: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| {
            let entry = ConfigEntry {
                value,
                source: format!("{:?}", source),
            };
            (key, entry)
        })
        .collect();

    let rows: Vec<ConfigRow> = entries
        .iter()
        .map(|(key, entry)| ConfigRow {
            key: key.clone(),
            value: entry.value.clone(),
            source: entry.source.clone(),
        })
        .collect();

    output.table(rows, &entries)
}
