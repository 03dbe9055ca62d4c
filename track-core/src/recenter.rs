//! Anchor recentering
//!
//! Every exported piece is re-based so its anchor sits at the local origin;
//! the anchor itself becomes the piece's placement transform.

use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::mesh::{MeshApply, MeshFragment, Translate};

/// How a piece's anchor is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// Mean of all vertex positions
    #[default]
    Median,
    /// Center of the axis-aligned bounding box
    Bounds,
}

/// Partitioned, recentered export unit
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub name: String,
    /// Geometry relative to `anchor`
    pub mesh: MeshFragment,
    /// World position of the local origin
    pub anchor: Vec3,
}

impl Piece {
    /// Vertex positions back in world space
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.mesh.positions.iter().map(move |&p| p + self.anchor)
    }
}

/// Anchor of a set of positions, `None` when there are none
pub fn compute_anchor(positions: &[Vec3], mode: AnchorMode) -> Option<Vec3> {
    if positions.is_empty() {
        return None;
    }

    let anchor = match mode {
        AnchorMode::Median => {
            let sum: DVec3 = positions.iter().map(|p| p.as_dvec3()).sum();
            (sum / positions.len() as f64).as_vec3()
        }
        AnchorMode::Bounds => {
            let (min, max) = positions
                .iter()
                .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), &p| {
                    (lo.min(p), hi.max(p))
                });
            (min + max) * 0.5
        }
    };
    Some(anchor)
}

/// Move `mesh` so its anchor is at the origin and wrap it as a named piece
pub fn recenter(name: impl Into<String>, mut mesh: MeshFragment, mode: AnchorMode) -> Result<Piece, GeometryError> {
    let name = name.into();
    if mesh.is_empty() {
        return Err(GeometryError::EmptyPiece(name));
    }
    let anchor = compute_anchor(&mesh.positions, mode).ok_or_else(|| GeometryError::EmptyPiece(name.clone()))?;

    mesh.apply(Translate(-anchor));
    Ok(Piece { name, mesh, anchor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{OrientedBox, build_box};

    fn skewed_mesh() -> MeshFragment {
        let spec = OrientedBox::new(Vec3::new(100.0, -40.0, 3.0), Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(4.0, 2.0, 6.0));
        let mut mesh = build_box(&spec, 0);
        // Extra vertex pulls the mean away from the box center
        let extra = mesh.push_vertex(Vec3::new(110.0, -40.0, 3.0));
        mesh.push_face(&[0, 4, extra], 0).unwrap();
        mesh
    }

    #[test]
    fn test_roundtrip_both_modes() {
        for mode in [AnchorMode::Median, AnchorMode::Bounds] {
            let original = skewed_mesh();
            let piece = recenter("p", original.clone(), mode).unwrap();
            for (world, expected) in piece.world_positions().zip(&original.positions) {
                assert!((world - *expected).length() < 1e-4, "{:?}", mode);
            }
        }
    }

    #[test]
    fn test_median_anchor_is_mean() {
        let mesh = skewed_mesh();
        let mean = mesh.positions.iter().copied().sum::<Vec3>() / mesh.positions.len() as f32;
        let piece = recenter("p", mesh, AnchorMode::Median).unwrap();
        assert!((piece.anchor - mean).length() < 1e-4);
        let local_mean = piece.mesh.positions.iter().copied().sum::<Vec3>();
        assert!(local_mean.length() < 1e-3);
    }

    #[test]
    fn test_bounds_anchor_is_box_center() {
        let piece = recenter("p", skewed_mesh(), AnchorMode::Bounds).unwrap();
        // x spans 98..110, y -41..-39, z 0..6
        assert!((piece.anchor - Vec3::new(104.0, -40.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn test_empty_piece_rejected() {
        assert_eq!(
            recenter("hollow", MeshFragment::new(), AnchorMode::Median),
            Err(GeometryError::EmptyPiece("hollow".to_string()))
        );
    }
}
