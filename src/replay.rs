/// Recorded match format
///
/// A recording is JSON lines, one record per line, in engine order:
///
/// ```text
/// {"frame": {"current_frame_number": 0, "character_data": [...]}}
/// {"hit": {"attacker": "P1", "attack": {"attack_type": 2, ...}}}
/// {"round_end": null}
/// ```
///
/// `"round_end"` on its own is accepted as well. Blank lines are skipped.
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::game::{FrameData, HitEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayRecord {
    Frame(FrameData),
    Hit(HitEvent),
    RoundEnd,
}

/// Parse every record from `reader`
pub fn read_recording<R: BufRead>(reader: R) -> Result<Vec<ReplayRecord>, ReplayError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|source| ReplayError::Parse {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_recording(path: &Path) -> Result<Vec<ReplayRecord>, ReplayError> {
    let file = File::open(path)?;
    let records = read_recording(BufReader::new(file))?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write `records` as JSON lines
pub fn write_recording<W: Write>(mut writer: W, records: &[ReplayRecord]) -> Result<(), ReplayError> {
    for record in records {
        let line = serde_json::to_string(record).map_err(ReplayError::Encode)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}
