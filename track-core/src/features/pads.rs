//! Build pads

use crate::config::TrackConfig;
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, Section, loft};

use super::Side;

/// Distance from the center line to the inner edge of a build pad
pub fn pad_inner_offset(frame: &Frame, config: &TrackConfig) -> f32 {
    frame.edge_offset() + config.barriers.offset + config.barriers.thickness + config.pads.offset
}

/// Flat slab outside the barrier; buildings stand on its top
pub fn build_pad(frames: &[Frame], config: &TrackConfig, side: Side) -> MeshFragment {
    let p = &config.pads;
    let s = side.sign();
    let road_top = config.road.thickness * 0.5;

    let sections: Vec<Section> = frames
        .iter()
        .map(|f| {
            let base = f.position + f.right * (pad_inner_offset(f, config) * s) + f.up * road_top;
            let across = f.right * (p.width * s);
            let rise = f.up * p.height;
            Section {
                corners: [base, base + across, base + across + rise, base + rise],
                outward: [-f.up, f.right * s, f.up, -f.right * s],
                forward: f.forward,
            }
        })
        .collect();

    loft(&sections, Material::BuildPad.index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::mixed_frames;

    #[test]
    fn test_pad_normals_consistent_both_sides() {
        let frames = mixed_frames();
        let config = TrackConfig::default();
        for side in Side::BOTH {
            let mesh = build_pad(&frames, &config, side);
            assert_eq!(mesh.dropped_faces(), 0);
            let tops = mesh
                .faces
                .iter()
                .filter(|face| mesh.face_normal(face).z > 0.9)
                .count();
            // One top quad per segment
            assert_eq!(tops, frames.len() - 1, "{} pad", side.label());
        }
    }

    #[test]
    fn test_pad_starts_after_barrier() {
        let frames = mixed_frames();
        let config = TrackConfig::default();
        let f = &frames[0];
        let expected = f.edge_offset() + config.barriers.thickness;
        assert!((pad_inner_offset(f, &config) - expected).abs() < 1e-5);
    }
}
