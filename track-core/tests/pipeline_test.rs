//! End-to-end checks over the generator pipeline
//!
//! program -> frames -> features -> partition -> recenter

use glam::Vec3;
use hashbrown::HashSet;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use trackgen_core::features::{Side, build_barrier, build_road};
use trackgen_core::frames::WORLD_UP;
use trackgen_core::mesh::{MeshFragment, OrientedBox, build_box, combine};
use trackgen_core::partition::{materialize, partition};
use trackgen_core::pipeline::build_features;
use trackgen_core::program::{PathCommand, curve, straight};
use trackgen_core::recenter::recenter;
use trackgen_core::{AnchorMode, FrameParams, TrackConfig, generate, generate_program, integrate_frames};

const EPS: f32 = 1e-4;

fn program(seed: u64, blocks: u32) -> Vec<PathCommand> {
    generate_program(blocks, 2.0, &mut Pcg64::seed_from_u64(seed))
}

fn road_and_barriers(config: &TrackConfig) -> MeshFragment {
    let frames = integrate_frames(&program(config.track.seed, config.track.blocks), &FrameParams::from_config(config));
    let road = build_road(&frames, config);
    let left = build_barrier(&frames, config, Side::Left);
    let right = build_barrier(&frames, config, Side::Right);
    combine(&[&road, &left, &right])
}

#[test]
fn test_frames_stay_orthonormal() {
    for seed in [1, 2, 3, 99] {
        let frames = integrate_frames(&program(seed, 20), &FrameParams::default());
        for f in &frames {
            assert!((f.forward.length() - 1.0).abs() < EPS);
            assert!((f.right.length() - 1.0).abs() < EPS);
            assert!((f.up.length() - 1.0).abs() < EPS);
            assert!(f.forward.dot(f.right).abs() < EPS);
            assert!(f.forward.dot(f.up).abs() < EPS);
            assert!(f.right.dot(f.up).abs() < EPS);
        }
    }
}

#[test]
fn test_curve_turns_requested_angle() {
    for (angle, radius) in [(35.0, 60.0), (-25.0, 90.0), (15.0, 50.0)] {
        let cmds = curve(angle, radius, 2.0);
        let total: f32 = cmds.iter().map(|c| c.yaw_delta).sum();
        assert!((total - angle).abs() < 1e-3, "{} vs {}", total, angle);

        // One trailing straight step shows the heading after the curve
        let mut cmds = cmds;
        cmds.extend(straight(2.0, 2.0));
        let frames = integrate_frames(&cmds, &FrameParams::default());
        let heading = frames.last().unwrap().forward;
        let expected = Vec3::new(angle.to_radians().cos(), angle.to_radians().sin(), 0.0);
        assert!(heading.dot(expected) > 0.9999, "{:?} vs {:?}", heading, expected);
    }
}

#[test]
fn test_bank_never_exceeds_max() {
    let mut params = FrameParams::default();
    for max in [2.0, 10.0, 30.0] {
        params.bank_max_deg = max;
        params.bank_smooth = 1.0;
        let frames = integrate_frames(&program(7, 30), &params);
        assert!(frames.iter().all(|f| f.bank_angle.abs() <= max + EPS));
    }
}

#[test]
fn test_partition_covers_every_face_once() {
    let mut config = TrackConfig::default();
    config.track.blocks = 6;
    let frames = integrate_frames(&program(3, 6), &FrameParams::from_config(&config));
    let features = build_features(&frames, &config, &mut Pcg64::seed_from_u64(3));
    let merged = combine(&features.iter().map(|f| &f.mesh).collect::<Vec<_>>());

    for (limit, lod) in [(4, 10.0), (64, 25.0), (500, 80.0), (32767, 200.0)] {
        let groups = partition(&merged, limit, lod);
        let mut seen = HashSet::new();
        for group in &groups {
            assert!(group.vertex_count <= limit, "limit {}: {}", limit, group.vertex_count);
            for &face in &group.faces {
                assert!(seen.insert(face), "face {} assigned twice", face);
                let centroid = merged.face_centroid(&merged.faces[face]);
                assert!(centroid.distance(group.seed_centroid) <= lod + EPS);
            }
        }
        assert_eq!(seen.len(), merged.face_count());
    }
}

#[test]
fn test_recenter_roundtrip_on_partitioned_track() {
    let mesh = road_and_barriers(&TrackConfig::default());
    let groups = partition(&mesh, 2000, 100.0);
    assert!(groups.len() > 1);

    for mode in [AnchorMode::Median, AnchorMode::Bounds] {
        for group in &groups {
            let local = materialize(&mesh, group);
            let original = local.positions.clone();
            let piece = recenter("piece", local, mode).unwrap();
            for (world, expected) in piece.world_positions().zip(&original) {
                assert!((world - *expected).length() < 1e-2, "{:?}: {:?} vs {:?}", mode, world, expected);
            }
        }
    }
}

#[test]
fn test_left_handed_box_faces_outward() {
    let center = Vec3::new(12.0, -3.0, 4.0);
    let (right, forward, up) = (Vec3::NEG_X, Vec3::Y * 2.0, Vec3::Z * 0.5);
    assert!(right.cross(forward).dot(up) < 0.0);

    let mesh = build_box(&OrientedBox::new(center, right, forward, up, Vec3::new(2.0, 4.0, 1.0)), 0);
    let wants = [right, -right, forward, -forward, up, -up];
    for (face, want) in mesh.faces.iter().zip(wants) {
        let normal = mesh.face_normal(face);
        assert!(normal.dot(want.normalize()) > 0.99);
        assert!(normal.dot(mesh.face_centroid(face) - center) > 0.0);
    }
}

#[test]
fn test_seed_one_end_to_end() {
    let mut config = TrackConfig::default();
    config.track.seed = 1;
    config.track.blocks = 5;
    config.export.vertex_limit = 32767;
    config.export.lod_limit = 200.0;

    let frames = integrate_frames(&program(1, 5), &FrameParams::from_config(&config));
    assert!(!frames.is_empty());
    assert!(frames.windows(2).all(|w| w[1].arc_position > w[0].arc_position));

    let mesh = road_and_barriers(&config);
    let groups = partition(&mesh, 32767, 200.0);
    assert!(!groups.is_empty());
    for group in &groups {
        assert!(materialize(&mesh, group).vertex_count() <= 32767);
    }

    // Same run through the full pipeline
    let track = generate(&config).unwrap();
    assert_eq!(track.frames, frames);
    assert!(track.pieces.iter().all(|p| p.mesh.vertex_count() <= 32767));
    for (i, piece) in track.pieces.iter().enumerate() {
        assert_eq!(piece.name, format!("tracks_split_{}", i));
    }
}

#[test]
fn test_straight_road_top_matches_up() {
    let config = TrackConfig::default();
    let frames = integrate_frames(&straight(10.0, 2.0), &FrameParams::from_config(&config));
    assert!(frames.windows(2).all(|w| w[0].up == w[1].up && w[0].road_width == w[1].road_width));

    let road = build_road(&frames, &config);
    let half_t = config.road.thickness * 0.5;
    let tops: Vec<_> = road
        .faces
        .iter()
        .filter(|f| road.face_centroid(f).z > half_t * 0.5)
        .collect();
    assert_eq!(tops.len(), frames.len() - 1);
    for face in tops {
        assert!(road.face_normal(face).dot(frames[0].up) > 1.0 - EPS);
    }
    assert!(frames[0].up.dot(WORLD_UP) > 1.0 - EPS);
}
