//! Road ribbon

use crate::config::TrackConfig;
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, Section, loft};

/// Closed road slab spanning both shoulders, capped at both ends
pub fn build_road(frames: &[Frame], config: &TrackConfig) -> MeshFragment {
    let half_t = config.road.thickness * 0.5;

    let sections: Vec<Section> = frames
        .iter()
        .map(|f| {
            let w = f.edge_offset();
            let left = f.position - f.right * w;
            let right = f.position + f.right * w;
            Section {
                corners: [
                    left - f.up * half_t,
                    right - f.up * half_t,
                    right + f.up * half_t,
                    left + f.up * half_t,
                ],
                outward: [-f.up, f.right, f.up, -f.right],
                forward: f.forward,
            }
        })
        .collect();

    loft(&sections, Material::Road.index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::{mixed_frames, straight_frames};

    #[test]
    fn test_road_face_count() {
        let frames = straight_frames(20.0);
        let mesh = build_road(&frames, &TrackConfig::default());
        assert_eq!(mesh.vertex_count(), frames.len() * 4);
        assert_eq!(mesh.face_count(), (frames.len() - 1) * 4 + 2);
        assert!(mesh.faces.iter().all(|f| f.material == Material::Road.index()));
    }

    #[test]
    fn test_straight_top_normal_matches_up() {
        let frames = straight_frames(10.0);
        let mesh = build_road(&frames, &TrackConfig::default());
        let up = frames[0].up;
        let top: Vec<_> = mesh
            .faces
            .iter()
            .filter(|face| mesh.face_centroid(face).z > 0.6)
            .collect();
        assert_eq!(top.len(), frames.len() - 1);
        for face in top {
            assert!((mesh.face_normal(face) - up).length() < 1e-3);
        }
    }

    #[test]
    fn test_road_normals_point_away_from_axis() {
        let frames = mixed_frames();
        let mesh = build_road(&frames, &TrackConfig::default());
        // Side faces: normal agrees with the offset from the nearest frame
        for face in &mesh.faces {
            let c = mesh.face_centroid(face);
            let nearest = frames
                .iter()
                .min_by(|a, b| a.position.distance(c).total_cmp(&b.position.distance(c)))
                .unwrap();
            let n = mesh.face_normal(face);
            let offset = c - nearest.position;
            if offset.length() > 1.0 {
                assert!(n.dot(offset) > 0.0);
            }
        }
    }
}
