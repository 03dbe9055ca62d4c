//! Mesh partitioner
//!
//! Splits a merged mesh into groups bounded by a distinct-vertex budget and
//! a radius around each group's seed face. Faces are scanned in centroid
//! order (x, then y, then z); each group is grown greedily in one pass with
//! no backtracking, so the result is deterministic for a given input.

use glam::Vec3;
use hashbrown::{HashMap, HashSet};

use crate::mesh::{Face, MeshFragment};

/// Faces assigned to one output piece
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionGroup {
    /// Centroid of the face that started the group
    pub seed_centroid: Vec3,
    /// Indices into the source mesh's face list, in scan order
    pub faces: Vec<usize>,
    /// Distinct source vertices referenced by the group
    pub vertex_count: usize,
}

/// Partition `mesh` into groups of at most `vertex_limit` distinct vertices
/// whose face centroids lie within `lod_limit` of the group's seed centroid.
///
/// Every face ends up in exactly one group. A face that cannot fit even in
/// an empty group (more corners than the budget) gets a group of its own.
pub fn partition(mesh: &MeshFragment, vertex_limit: usize, lod_limit: f32) -> Vec<PartitionGroup> {
    let centroids: Vec<Vec3> = mesh.faces.iter().map(|f| mesh.face_centroid(f)).collect();

    let mut order: Vec<usize> = (0..mesh.faces.len()).collect();
    order.sort_by(|&a, &b| {
        let (ca, cb) = (centroids[a], centroids[b]);
        ca.x.total_cmp(&cb.x)
            .then(ca.y.total_cmp(&cb.y))
            .then(ca.z.total_cmp(&cb.z))
    });

    let mut assigned = vec![false; mesh.faces.len()];
    let mut cursor = 0;
    let mut groups = Vec::new();

    while let Some(offset) = order[cursor..].iter().position(|&f| !assigned[f]) {
        cursor += offset;
        let seed = order[cursor];
        let seed_centroid = centroids[seed];

        let mut faces = Vec::new();
        let mut vertices: HashSet<u32> = HashSet::new();

        for &candidate in &order[cursor..] {
            if assigned[candidate] {
                continue;
            }
            let c = centroids[candidate];
            // Sorted by x: nothing further along can be within range
            if c.x - seed_centroid.x > lod_limit {
                break;
            }
            if c.distance(seed_centroid) > lod_limit {
                continue;
            }

            let indices = &mesh.faces[candidate].indices;
            let new_vertices = indices
                .iter()
                .enumerate()
                .filter(|&(k, i)| !vertices.contains(i) && !indices[..k].contains(i))
                .count();
            if vertices.len() + new_vertices > vertex_limit {
                continue;
            }

            vertices.extend(indices.iter().copied());
            assigned[candidate] = true;
            faces.push(candidate);
        }

        if faces.is_empty() {
            tracing::warn!(
                "face {} exceeds the vertex limit of {} on its own; emitting it alone",
                seed,
                vertex_limit
            );
            assigned[seed] = true;
            faces.push(seed);
            vertices.extend(mesh.faces[seed].indices.iter().copied());
        }

        tracing::trace!(
            "group {}: {} faces, {} vertices, seed {:?}",
            groups.len(),
            faces.len(),
            vertices.len(),
            seed_centroid
        );

        groups.push(PartitionGroup {
            seed_centroid,
            faces,
            vertex_count: vertices.len(),
        });
    }

    tracing::info!(
        "partitioned {} faces into {} groups (vertex limit {}, LOD {})",
        mesh.faces.len(),
        groups.len(),
        vertex_limit,
        lod_limit
    );
    groups
}

/// Build a standalone mesh from a group, renumbering its vertices in first-use order
pub fn materialize(mesh: &MeshFragment, group: &PartitionGroup) -> MeshFragment {
    let mut remap: HashMap<u32, u32> = HashMap::with_capacity(group.vertex_count);
    let mut out = MeshFragment::with_capacity(group.vertex_count, group.faces.len());

    for &face_index in &group.faces {
        let face = &mesh.faces[face_index];
        let indices: Vec<u32> = face
            .indices
            .iter()
            .map(|&i| {
                *remap
                    .entry(i)
                    .or_insert_with(|| out.push_vertex(mesh.positions[i as usize]))
            })
            .collect();
        out.faces.push(Face::new(&indices, face.material));
    }

    out
}
