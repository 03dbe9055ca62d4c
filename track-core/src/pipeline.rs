//! Batch pipeline
//!
//! program -> frames -> features -> weld -> merge -> partition -> recenter.
//! Every stage runs to completion before the next starts. One seeded random
//! stream is shared by the program generator and the random features, in a
//! fixed order: program, buildings (left, right), obstacles, start plaza,
//! end plaza.

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::config::TrackConfig;
use crate::error::ConfigError;
use crate::features::{self, Side, TrackEnd};
use crate::frames::{Frame, FrameParams, integrate_frames};
use crate::markers::{Checkpoint, Marker, build_checkpoints, build_spawn_points};
use crate::materials::MaterialTable;
use crate::mesh::{MeshApply, MeshFragment, Weld, combine};
use crate::partition::{materialize, partition};
use crate::program::generate_program;
use crate::recenter::{Piece, recenter};
use crate::sink::MeshSink;

/// Geometry of one feature before merging
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: String,
    pub mesh: MeshFragment,
}

/// Counters collected while generating
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackStats {
    pub steps: usize,
    pub track_length: f32,
    pub merged_vertices: usize,
    pub merged_faces: usize,
    /// Degenerate faces rejected while building features
    pub dropped_faces: usize,
    pub groups: usize,
    /// Groups that produced no usable piece
    pub skipped_pieces: usize,
}

/// Fully generated track, ready to emit
#[derive(Debug, Clone)]
pub struct Track {
    pub map_name: String,
    pub frames: Vec<Frame>,
    pub pieces: Vec<Piece>,
    pub spawn_points: Vec<Marker>,
    pub checkpoints: Vec<Checkpoint>,
    pub materials: MaterialTable,
    pub stats: TrackStats,
}

/// Result of handing pieces to a sink
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitReport {
    /// Indices into [`Track::pieces`] that were written
    pub exported: Vec<usize>,
    /// Pieces the sink rejected, with its message
    pub failed: Vec<(String, String)>,
    /// Error from the sink's final flush, if any
    pub finish_error: Option<String>,
}

impl EmitReport {
    pub fn exported_pieces<'a>(&'a self, track: &'a Track) -> impl Iterator<Item = &'a Piece> + 'a {
        self.exported.iter().map(move |&i| &track.pieces[i])
    }
}

/// Build every enabled feature over the frame sequence, in stream order
pub fn build_features(frames: &[Frame], config: &TrackConfig, rng: &mut Pcg64) -> Vec<Feature> {
    let mut out = Vec::new();
    let mut push = |name: &str, mesh: MeshFragment| {
        tracing::debug!("{}: {} vertices, {} faces", name, mesh.vertex_count(), mesh.face_count());
        out.push(Feature {
            name: name.to_string(),
            mesh,
        });
    };

    push("road", features::build_road(frames, config));

    if config.barriers.enabled {
        for side in Side::BOTH {
            push(&format!("barrier_{}", side.label()), features::build_barrier(frames, config, side));
        }
    }

    if config.pads.enabled {
        for side in Side::BOTH {
            push(&format!("pad_{}", side.label()), features::build_pad(frames, config, side));
        }
    }

    if config.tunnel.enabled {
        push("tunnel", features::build_tunnel(frames, config));
    }

    if config.buildings.enabled {
        let sides = [(Side::Left, config.buildings.left), (Side::Right, config.buildings.right)];
        for (side, enabled) in sides {
            if enabled {
                push(
                    &format!("buildings_{}", side.label()),
                    features::build_buildings(frames, config, side, rng),
                );
            }
        }
    }

    if config.obstacles.enabled {
        push("obstacles", features::build_obstacles(frames, config, rng));
    }

    if let (true, Some(first), Some(last)) = (config.plazas.enabled, frames.first(), frames.last()) {
        let ends = [
            (TrackEnd::Start, first, config.plazas.start),
            (TrackEnd::End, last, config.plazas.end),
        ];
        for (end, frame, enabled) in ends {
            if !enabled {
                continue;
            }
            push(&format!("plaza_{}", end.label()), features::build_plaza(frame, end, config, rng));
            if config.plazas.walls {
                push(
                    &format!("wall_{}", end.label()),
                    features::build_boundary_wall(frame, end, config),
                );
            }
        }
    }

    out
}

/// Run the whole generator for a validated configuration
pub fn generate(config: &TrackConfig) -> Result<Track, ConfigError> {
    config.validate()?;

    let mut rng = Pcg64::seed_from_u64(config.track.seed);
    tracing::info!(
        "Generating '{}' (seed {}, {} blocks)",
        config.track.map_name,
        config.track.seed,
        config.track.blocks
    );

    let program = generate_program(config.track.blocks, config.track.step_length, &mut rng);
    let frames = integrate_frames(&program, &FrameParams::from_config(config));
    let track_length = frames.last().map_or(0.0, |f| f.arc_position);
    tracing::info!("{} frames, {:.1} m of track", frames.len(), track_length);

    let mut features = build_features(&frames, config, &mut rng);
    let dropped_faces = features.iter().map(|f| f.mesh.dropped_faces()).sum();
    if dropped_faces > 0 {
        tracing::warn!("{} degenerate faces dropped while building features", dropped_faces);
    }

    for feature in &mut features {
        feature.mesh.apply(Weld::new(config.export.weld_distance));
    }
    let merged = combine(&features.iter().map(|f| &f.mesh).collect::<Vec<_>>());
    tracing::info!(
        "Merged {} features: {} vertices, {} faces",
        features.len(),
        merged.vertex_count(),
        merged.face_count()
    );

    let groups = partition(
        &merged,
        config.export.vertex_limit as usize,
        config.export.lod_limit,
    );

    let mut pieces = Vec::with_capacity(groups.len());
    let mut skipped_pieces = 0;
    for group in &groups {
        let name = format!("{}_split_{}", config.track.map_name, pieces.len());
        match recenter(name, materialize(&merged, group), config.export.anchor_mode) {
            Ok(piece) => pieces.push(piece),
            Err(e) => {
                tracing::warn!("Skipping piece: {}", e);
                skipped_pieces += 1;
            }
        }
    }

    let spawn_points = match (config.spawns.enabled, frames.first()) {
        (true, Some(start)) => build_spawn_points(start, &config.spawns),
        _ => Vec::new(),
    };
    let checkpoints = if config.checkpoints.enabled {
        build_checkpoints(&frames, &config.checkpoints)
    } else {
        Vec::new()
    };

    let stats = TrackStats {
        steps: frames.len(),
        track_length,
        merged_vertices: merged.vertex_count(),
        merged_faces: merged.face_count(),
        dropped_faces,
        groups: groups.len(),
        skipped_pieces,
    };

    Ok(Track {
        map_name: config.track.map_name.clone(),
        frames,
        pieces,
        spawn_points,
        checkpoints,
        materials: MaterialTable::from_config(&config.materials),
        stats,
    })
}

/// Hand every piece to `sink`, skipping (and logging) the ones it rejects
pub fn emit<S: MeshSink>(track: &Track, sink: &mut S) -> EmitReport {
    let mut report = EmitReport::default();

    for (index, piece) in track.pieces.iter().enumerate() {
        match sink.write_piece(piece, &track.materials) {
            Ok(()) => {
                tracing::debug!(
                    "Wrote {} ({} vertices, {} faces)",
                    piece.name,
                    piece.mesh.vertex_count(),
                    piece.mesh.face_count()
                );
                report.exported.push(index);
            }
            Err(e) => {
                tracing::warn!("Failed to write {}: {}", piece.name, e);
                report.failed.push((piece.name.clone(), e.to_string()));
            }
        }
    }

    if let Err(e) = sink.finish(&track.materials) {
        tracing::warn!("Failed to finish output: {}", e);
        report.finish_error = Some(e.to_string());
    }

    tracing::info!(
        "Exported {} of {} pieces",
        report.exported.len(),
        track.pieces.len()
    );
    report
}
