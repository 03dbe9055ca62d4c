//! trackgen export library
//!
//! Writes a generated track to disk: one OBJ per piece, a shared material
//! library and the `track_data.json` placement record.

pub mod metadata;
pub mod obj;

use anyhow::{Context, Result};
use std::path::Path;

use trackgen_core::{EmitReport, Track, TrackConfig, emit};

pub use metadata::{METADATA_FILE, TrackMetadata};
pub use obj::{MTL_FILE, OBJ_DIR, ObjSink};

/// Outcome of a full export
#[derive(Debug)]
pub struct ExportSummary {
    pub report: EmitReport,
    pub metadata: TrackMetadata,
}

/// Emit every piece of `track` into `output` and write the metadata record
///
/// Pieces the writer rejects are skipped and left out of the record; only a
/// failure to write the record itself is an error.
pub fn export_track(track: &Track, output: &Path) -> Result<ExportSummary> {
    let mut sink = ObjSink::new(output)?;
    let report = emit(track, &mut sink);

    let metadata = TrackMetadata::from_track(track, &report);
    metadata.write(&output.join(METADATA_FILE))?;

    Ok(ExportSummary { report, metadata })
}

/// Load a config file, falling back to defaults when `path` is `None`
pub fn load_config(path: Option<&Path>) -> Result<TrackConfig> {
    match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {:?}", path))?;
            TrackConfig::parse(&content).with_context(|| format!("Failed to parse config: {:?}", path))
        }
        None => Ok(TrackConfig::default()),
    }
}

/// Render a config as TOML
pub fn config_to_toml(config: &TrackConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}
