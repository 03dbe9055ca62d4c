//! Building rows along the build pads

use rand::Rng;

use crate::config::TrackConfig;
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, OrientedBox, append_box};

use super::pads::pad_inner_offset;
use super::{Side, placement_axes};

/// Place building rows on one side of the track.
///
/// One placement attempt is made each time the arc position passes the
/// next multiple of `buildings.step`. Each accepted attempt places one
/// building per row, rows stepping away from the road.
pub fn build_buildings<R: Rng + ?Sized>(
    frames: &[Frame],
    config: &TrackConfig,
    side: Side,
    rng: &mut R,
) -> MeshFragment {
    let b = &config.buildings;
    let s = side.sign();
    let surface = config.road.thickness * 0.5 + config.pads.height;
    let material = Material::Building.index();

    let mut mesh = MeshFragment::new();
    let mut placed = 0usize;
    let mut next_arc = b.step;

    for frame in frames {
        if frame.arc_position < next_arc {
            continue;
        }
        next_arc += b.step;

        if rng.random::<f32>() > b.probability {
            continue;
        }

        let (right, forward, up) = placement_axes(frame, b.align_world);
        let pad_edge = pad_inner_offset(frame, config);

        for row in 0..b.rows {
            let row_offset = pad_edge + b.setback + row as f32 * b.row_spacing;
            let base = frame.position + right * (row_offset * s) + up * surface;

            let jitter_r = rng.random_range(-1.0f32..=1.0) * b.jitter_lateral;
            let jitter_f = rng.random_range(-1.0f32..=1.0) * b.jitter_forward;

            let width = rng.random_range(b.width_min..=b.width_max);
            let depth = rng.random_range(b.depth_min..=b.depth_max);
            let variation = b.row_height_variation;
            let modulation = 1.0 + rng.random_range(-variation..=variation) * (row + 1) as f32;
            // Far rows can modulate down to nothing
            let height = (rng.random_range(b.height_min..=b.height_max) * modulation).max(b.height_min * 0.1);

            let center = base + right * (jitter_r * s) + forward * jitter_f + up * (height * 0.5);

            // Mirror both horizontal axes on the left so the box stays right-handed
            let spec = OrientedBox::new(
                center,
                right * s,
                forward * s,
                up,
                glam::Vec3::new(width, depth, height),
            );
            append_box(&mut mesh, &spec, material);
            placed += 1;
        }
    }

    tracing::debug!("{} buildings on the {} side", placed, side.label());
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::{mixed_frames, straight_frames};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_all_attempts_accepted() {
        let frames = straight_frames(100.0);
        let mut config = TrackConfig::default();
        config.buildings.probability = 1.0;
        config.buildings.rows = 2;

        let mesh = build_buildings(&frames, &config, Side::Right, &mut Pcg64::seed_from_u64(3));
        // Attempts at 10, 20, ..., 100
        assert_eq!(mesh.face_count(), 10 * 2 * 6);
    }

    #[test]
    fn test_zero_probability_places_nothing() {
        let frames = straight_frames(100.0);
        let mut config = TrackConfig::default();
        config.buildings.probability = 0.0;
        let mesh = build_buildings(&frames, &config, Side::Left, &mut Pcg64::seed_from_u64(3));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_buildings_stand_on_pad_outside_barrier() {
        let frames = straight_frames(100.0);
        let mut config = TrackConfig::default();
        config.buildings.probability = 1.0;
        let surface = config.road.thickness * 0.5 + config.pads.height;
        let clearance = pad_inner_offset(&frames[0], &config) + config.buildings.setback
            - config.buildings.jitter_lateral
            - config.buildings.width_max * 0.5;

        for side in Side::BOTH {
            let mesh = build_buildings(&frames, &config, side, &mut Pcg64::seed_from_u64(9));
            let min_z = mesh.positions.iter().map(|p| p.z).fold(f32::MAX, f32::min);
            assert!((min_z - surface).abs() < 1e-3);
            assert!(mesh.positions.iter().all(|p| p.y * -side.sign() > clearance - 1e-3));
        }
    }

    #[test]
    fn test_building_normals_outward_on_both_sides() {
        let frames = mixed_frames();
        let mut config = TrackConfig::default();
        config.buildings.probability = 1.0;
        config.buildings.rows = 1;

        for side in Side::BOTH {
            let mesh = build_buildings(&frames, &config, side, &mut Pcg64::seed_from_u64(5));
            for (k, faces) in mesh.faces.chunks(6).enumerate() {
                let corners = &mesh.positions[k * 8..k * 8 + 8];
                let center = corners.iter().copied().sum::<glam::Vec3>() / 8.0;
                for face in faces {
                    let outward = mesh.face_centroid(face) - center;
                    assert!(mesh.face_normal(face).dot(outward) > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_buildings() {
        let frames = mixed_frames();
        let config = TrackConfig::default();
        let a = build_buildings(&frames, &config, Side::Left, &mut Pcg64::seed_from_u64(11));
        let b = build_buildings(&frames, &config, Side::Left, &mut Pcg64::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
