//! Mesh modifiers
//!
//! Modifiers operate on a [`MeshFragment`] in place. Use the [`MeshApply`]
//! extension trait to chain them:
//! ```
//! use glam::Vec3;
//! use trackgen_core::mesh::*;
//!
//! let spec = OrientedBox::new(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE);
//! let mut mesh = build_box(&spec, 0);
//! mesh.apply(Weld::new(0.0001)).apply(Translate(Vec3::Z));
//! ```

use glam::{IVec3, Vec3};
use hashbrown::HashMap;
use smallvec::SmallVec;

use super::fragment::{Face, MeshFragment, distinct_count};

/// Trait for mesh modifiers
pub trait MeshModifier {
    /// Apply this modifier to a mesh, modifying it in place
    fn apply(&self, mesh: &mut MeshFragment);
}

/// Extension trait for fluent modifier application
pub trait MeshApply {
    /// Apply a modifier and return `&mut Self` for chaining
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self;
}

impl MeshApply for MeshFragment {
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Offset every vertex
#[derive(Debug, Clone, Copy)]
pub struct Translate(pub Vec3);

impl MeshModifier for Translate {
    fn apply(&self, mesh: &mut MeshFragment) {
        for p in &mut mesh.positions {
            *p += self.0;
        }
    }
}

/// Merge vertices closer than `distance` (merge by distance)
///
/// Faces that collapse below three distinct corners are removed. A
/// non-positive distance does nothing.
#[derive(Debug, Clone, Copy)]
pub struct Weld {
    pub distance: f32,
}

impl Weld {
    pub fn new(distance: f32) -> Self {
        Self { distance }
    }
}

impl MeshModifier for Weld {
    fn apply(&self, mesh: &mut MeshFragment) {
        if self.distance <= 0.0 || mesh.positions.is_empty() {
            return;
        }

        let cell_size = self.distance;
        let dist_sq = self.distance * self.distance;
        let cell = |p: Vec3| (p / cell_size).floor().as_ivec3();

        // Spatial hash of kept vertices; any match lies in a neighbouring cell
        let mut grid: HashMap<IVec3, SmallVec<[u32; 2]>> = HashMap::new();
        let mut kept: Vec<Vec3> = Vec::with_capacity(mesh.positions.len());
        let mut remap: Vec<u32> = Vec::with_capacity(mesh.positions.len());

        for &p in &mesh.positions {
            let c = cell(p);
            let mut found = None;
            'search: for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if let Some(bucket) = grid.get(&(c + IVec3::new(dx, dy, dz))) {
                            if let Some(&k) =
                                bucket.iter().find(|&&k| kept[k as usize].distance_squared(p) <= dist_sq)
                            {
                                found = Some(k);
                                break 'search;
                            }
                        }
                    }
                }
            }

            let index = match found {
                Some(k) => k,
                None => {
                    let k = kept.len() as u32;
                    kept.push(p);
                    grid.entry(c).or_default().push(k);
                    k
                }
            };
            remap.push(index);
        }

        let before_faces = mesh.faces.len();
        let before_vertices = mesh.positions.len();

        let faces: Vec<Face> = mesh
            .faces
            .iter()
            .filter_map(|face| {
                let mut indices: SmallVec<[u32; 4]> = SmallVec::new();
                for &i in &face.indices {
                    let r = remap[i as usize];
                    if indices.last() != Some(&r) {
                        indices.push(r);
                    }
                }
                while indices.len() > 1 && indices.first() == indices.last() {
                    indices.pop();
                }
                (distinct_count(&indices) >= 3).then_some(Face {
                    indices,
                    material: face.material,
                })
            })
            .collect();

        mesh.positions = kept;
        mesh.faces = faces;

        tracing::debug!(
            "weld: {} -> {} vertices, {} faces removed",
            before_vertices,
            mesh.positions.len(),
            before_faces - mesh.faces.len()
        );
    }
}
