//! Export metadata record (track_data.json)
//!
//! Lists piece placements, spawn points and checkpoints with their
//! respawns. Positions are meters, rotations Euler XYZ degrees, both
//! rounded to 3 decimals.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use trackgen_core::{EmitReport, Marker, MarkerKind, Track};

/// Default file name of the record
pub const METADATA_FILE: &str = "track_data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshEntry {
    pub name: String,
    pub pos: [f32; 3],
    pub rot: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub name: String,
    pub pos: [f32; 3],
    pub rot: [f32; 3],
    pub row: u32,
    pub col: u32,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointEntry {
    pub id: u32,
    pub name: String,
    pub pos: [f32; 3],
    pub rot: [f32; 3],
    pub respawns: Vec<SpawnEntry>,
}

/// Whole record as written to disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub meshes: Vec<MeshEntry>,
    pub spawn_points: Vec<SpawnEntry>,
    pub checkpoints: Vec<CheckpointEntry>,
    /// Every checkpoint's respawns, flattened
    pub respawns: Vec<SpawnEntry>,
}

// Adding 0.0 folds -0.0 into 0.0
fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0 + 0.0
}

fn position(v: Vec3) -> [f32; 3] {
    [round3(v.x), round3(v.y), round3(v.z)]
}

fn degrees(euler: Vec3) -> [f32; 3] {
    [
        round3(euler.x.to_degrees()),
        round3(euler.y.to_degrees()),
        round3(euler.z.to_degrees()),
    ]
}

fn grid_entry(marker: &Marker) -> SpawnEntry {
    let (row, col, index) = match marker.kind {
        MarkerKind::Spawn { row, col, index } => (row, col, index),
        MarkerKind::Respawn { row, col, index, .. } => (row, col, index),
        MarkerKind::Checkpoint { .. } => (0, 0, 0),
    };
    SpawnEntry {
        name: marker.name.clone(),
        pos: position(marker.position),
        rot: degrees(marker.rotation),
        row,
        col,
        index,
    }
}

impl TrackMetadata {
    /// Build the record for the pieces that were actually exported
    pub fn from_track(track: &Track, report: &EmitReport) -> Self {
        let meshes = report
            .exported_pieces(track)
            .map(|piece| MeshEntry {
                name: piece.name.clone(),
                pos: position(piece.anchor),
                rot: [0.0; 3],
            })
            .collect();

        let spawn_points = track.spawn_points.iter().map(grid_entry).collect();

        let checkpoints: Vec<CheckpointEntry> = track
            .checkpoints
            .iter()
            .map(|cp| CheckpointEntry {
                id: match cp.marker.kind {
                    MarkerKind::Checkpoint { id } => id,
                    _ => 0,
                },
                name: cp.marker.name.clone(),
                pos: position(cp.marker.position),
                rot: degrees(cp.marker.rotation),
                respawns: cp.respawns.iter().map(grid_entry).collect(),
            })
            .collect();

        let respawns = checkpoints
            .iter()
            .flat_map(|cp| cp.respawns.iter().cloned())
            .collect();

        Self {
            meshes,
            spawn_points,
            checkpoints,
            respawns,
        }
    }

    /// Write the record as pretty JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write {:?}", path))?;

        tracing::info!(
            "Wrote {:?}: {} meshes, {} spawns, {} checkpoints, {} respawns",
            path,
            self.meshes.len(),
            self.spawn_points.len(),
            self.checkpoints.len(),
            self.respawns.len()
        );
        Ok(())
    }
}
