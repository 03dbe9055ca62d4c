//! Placement markers
//!
//! Spawn grid at the start line and checkpoints with respawn grids along
//! the track. Markers carry no geometry; they end up in the export record.

use glam::{EulerRot, Mat3, Quat, Vec3};

use crate::config::{CheckpointSection, SpawnSection};
use crate::frames::{Frame, WORLD_UP};

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Spawn { row: u32, col: u32, index: u32 },
    Checkpoint { id: u32 },
    Respawn { checkpoint: u32, row: u32, col: u32, index: u32 },
}

/// Placed marker
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub name: String,
    pub position: Vec3,
    /// Euler XYZ rotation in radians
    pub rotation: Vec3,
}

/// Checkpoint with its own respawn grid
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub marker: Marker,
    pub respawns: Vec<Marker>,
}

/// Rotation whose local +Z follows `forward` and local +Y leans to world up,
/// as Euler XYZ angles (X applied first)
pub fn track_rotation(forward: Vec3) -> Vec3 {
    let z = forward.normalize_or(Vec3::Y);
    let y = (WORLD_UP - z * WORLD_UP.dot(z))
        .try_normalize()
        .unwrap_or_else(|| z.any_orthonormal_vector());
    let x = y.cross(z);

    let (rz, ry, rx) = Quat::from_mat3(&Mat3::from_cols(x, y, z)).to_euler(EulerRot::ZYX);
    Vec3::new(rx, ry, rz)
}

/// Lay out a `rows x cols` grid centred on the track axis, rows stepping back
fn grid(
    origin: Vec3,
    frame: &Frame,
    rows: u32,
    cols: u32,
    spacing_x: f32,
    spacing_y: f32,
) -> impl Iterator<Item = (u32, u32, Vec3)> + '_ {
    let half = (cols.saturating_sub(1)) as f32 * spacing_x * 0.5;
    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| {
            let lateral = frame.right * (col as f32 * spacing_x - half);
            let back = frame.forward * (-(row as f32) * spacing_y);
            (row, col, origin + lateral + back)
        })
    })
}

/// Spawn grid ahead of the first frame
pub fn build_spawn_points(start: &Frame, config: &SpawnSection) -> Vec<Marker> {
    let origin = start.position + start.forward * config.offset_forward + start.up * config.offset_up;
    let rotation = track_rotation(start.forward);

    let spawns: Vec<Marker> = grid(origin, start, config.rows, config.per_row, config.spacing_x, config.spacing_y)
        .map(|(row, col, position)| Marker {
            kind: MarkerKind::Spawn {
                row,
                col,
                index: row * config.per_row + col,
            },
            name: format!("Spawn_{}_{}", row, col),
            position,
            rotation,
        })
        .collect();

    tracing::info!("{} spawn points", spawns.len());
    spawns
}

/// Checkpoints at a fixed frame cadence, each with a respawn grid
pub fn build_checkpoints(frames: &[Frame], config: &CheckpointSection) -> Vec<Checkpoint> {
    let Some(last) = frames.last() else {
        return Vec::new();
    };

    let mean_step = last.arc_position / frames.len() as f32;
    let stride = ((config.spacing / mean_step) as usize).max(1);
    let limit = if config.count == 0 { usize::MAX } else { config.count as usize };

    let checkpoints: Vec<Checkpoint> = frames
        .iter()
        .step_by(stride)
        .take(limit)
        .enumerate()
        .map(|(id, frame)| {
            let id = id as u32;
            let rotation = track_rotation(frame.forward);
            let marker = Marker {
                kind: MarkerKind::Checkpoint { id },
                name: format!("Checkpoint_{}", id),
                position: frame.position + frame.up * config.offset_up,
                rotation,
            };

            let origin = frame.position
                + frame.forward * config.respawn_offset_forward
                + frame.up * config.offset_up;
            let respawns = grid(
                origin,
                frame,
                config.respawn_rows,
                config.respawn_cols,
                config.respawn_spacing_x,
                config.respawn_spacing_y,
            )
            .map(|(row, col, position)| Marker {
                kind: MarkerKind::Respawn {
                    checkpoint: id,
                    row,
                    col,
                    index: row * config.respawn_cols + col,
                },
                name: format!("Respawn_{}_{}_{}", id, row, col),
                position,
                rotation,
            })
            .collect();

            Checkpoint { marker, respawns }
        })
        .collect();

    tracing::info!("{} checkpoints with respawns", checkpoints.len());
    checkpoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{FrameParams, integrate_frames};
    use crate::program::straight;

    fn frames(length: f32) -> Vec<Frame> {
        integrate_frames(&straight(length, 2.0), &FrameParams::default())
    }

    #[test]
    fn test_rotation_maps_z_to_forward() {
        for forward in [Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.2).normalize(), Vec3::NEG_X] {
            let r = track_rotation(forward);
            let q = Quat::from_euler(EulerRot::ZYX, r.z, r.y, r.x);
            assert!((q * Vec3::Z - forward).length() < 1e-4, "{:?}", forward);
            assert!((q * Vec3::Y).z >= 0.0);
        }
    }

    #[test]
    fn test_rotation_along_x() {
        // Looking along +X with +Y up: 90 degrees about X then 90 about Z
        let r = track_rotation(Vec3::X);
        assert!((r.x - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        assert!(r.y.abs() < 1e-4);
        assert!((r.z - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_grid() {
        let frames = frames(40.0);
        let config = SpawnSection::default();
        let spawns = build_spawn_points(&frames[0], &config);
        assert_eq!(spawns.len(), 8);

        assert_eq!(spawns[5].name, "Spawn_1_1");
        assert_eq!(spawns[5].kind, MarkerKind::Spawn { row: 1, col: 1, index: 5 });

        // First row centred on the track axis, ahead of the first frame
        let row0: Vec<_> = spawns.iter().take(4).collect();
        let mean_y: f32 = row0.iter().map(|m| m.position.y).sum::<f32>() / 4.0;
        assert!(mean_y.abs() < 1e-3);
        let expected_x = frames[0].position.x + config.offset_forward;
        assert!((row0[0].position.x - expected_x).abs() < 1e-3);
        assert!((spawns[4].position.x - (expected_x - config.spacing_y)).abs() < 1e-3);
        assert!((row0[0].position.z - config.offset_up).abs() < 1e-2);
    }

    #[test]
    fn test_checkpoint_cadence() {
        let frames = frames(1000.0);
        let config = CheckpointSection::default();
        let checkpoints = build_checkpoints(&frames, &config);
        // 500 frames, stride 100
        assert_eq!(checkpoints.len(), 5);
        assert_eq!(checkpoints[1].marker.name, "Checkpoint_1");
        assert_eq!(checkpoints[2].respawns.len(), 6);
        assert_eq!(checkpoints[2].respawns[4].name, "Respawn_2_1_1");
        assert_eq!(
            checkpoints[2].respawns[4].kind,
            MarkerKind::Respawn { checkpoint: 2, row: 1, col: 1, index: 4 }
        );
    }

    #[test]
    fn test_checkpoint_count_caps() {
        let frames = frames(1000.0);
        let config = CheckpointSection {
            count: 2,
            ..CheckpointSection::default()
        };
        assert_eq!(build_checkpoints(&frames, &config).len(), 2);
    }

    #[test]
    fn test_checkpoints_on_short_track() {
        let frames = frames(10.0);
        let checkpoints = build_checkpoints(&frames, &CheckpointSection::default());
        assert_eq!(checkpoints.len(), 1);
        assert!(build_checkpoints(&[], &CheckpointSection::default()).is_empty());
    }
}
