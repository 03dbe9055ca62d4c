//! Side barriers

use crate::config::TrackConfig;
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, Section, loft};

use super::Side;

/// Barrier wall standing on the road top just outside the shoulder
pub fn build_barrier(frames: &[Frame], config: &TrackConfig, side: Side) -> MeshFragment {
    let b = &config.barriers;
    let s = side.sign();
    let road_top = config.road.thickness * 0.5;

    let sections: Vec<Section> = frames
        .iter()
        .map(|f| {
            let edge = f.edge_offset() + b.offset;
            let base = f.position + f.right * (edge * s) + f.up * road_top;
            let across = f.right * (b.thickness * s);
            let rise = f.up * b.height;
            Section {
                corners: [base, base + across, base + across + rise, base + rise],
                outward: [-f.up, f.right * s, f.up, -f.right * s],
                forward: f.forward,
            }
        })
        .collect();

    loft(&sections, Material::Barrier.index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::straight_frames;
    use glam::Vec3;

    #[test]
    fn test_barrier_sides_mirror() {
        let frames = straight_frames(20.0);
        let config = TrackConfig::default();
        let left = build_barrier(&frames, &config, Side::Left);
        let right = build_barrier(&frames, &config, Side::Right);

        assert_eq!(left.face_count(), right.face_count());
        // Left lies at +Y for a track running along +X
        assert!(left.positions.iter().all(|p| p.y > 28.0));
        assert!(right.positions.iter().all(|p| p.y < -28.0));
    }

    #[test]
    fn test_barrier_inner_face_points_at_road() {
        let frames = straight_frames(20.0);
        let config = TrackConfig::default();
        for side in Side::BOTH {
            let mesh = build_barrier(&frames, &config, side);
            let inner = frames[0].edge_offset();
            let facing_road = mesh.faces.iter().any(|face| {
                let n = mesh.face_normal(face);
                let c = mesh.face_centroid(face);
                (c.y.abs() - inner).abs() < 0.01 && n.dot(Vec3::Y * side.sign()) > 0.99
            });
            assert!(facing_road, "{} barrier has no road-facing side", side.label());
        }
    }

    #[test]
    fn test_barrier_sits_on_road() {
        let frames = straight_frames(10.0);
        let config = TrackConfig::default();
        let mesh = build_barrier(&frames, &config, Side::Right);
        let min_z = mesh.positions.iter().map(|p| p.z).fold(f32::MAX, f32::min);
        assert!((min_z - config.road.thickness * 0.5).abs() < 0.01);
    }
}
