//! Indexed polygon mesh with per-face material slots

use glam::Vec3;
use smallvec::SmallVec;

use crate::error::GeometryError;

/// Twice the area below which a face counts as degenerate
const MIN_DOUBLE_AREA: f32 = 1e-10;

/// One polygon of a [`MeshFragment`]
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Vertex indices in winding order (quads stay inline)
    pub indices: SmallVec<[u32; 4]>,
    /// Material slot index
    pub material: u32,
}

impl Face {
    pub fn new(indices: &[u32], material: u32) -> Self {
        Self {
            indices: SmallVec::from_slice(indices),
            material,
        }
    }
}

/// Vertex positions plus material-tagged polygons
///
/// Every feature builder produces one of these. Fragments are merged by
/// index-offset concatenation; nothing is shared between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshFragment {
    pub positions: Vec<Vec3>,
    pub faces: Vec<Face>,
    dropped_faces: usize,
}

impl MeshFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
            dropped_faces: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Faces rejected at creation time since this fragment was built
    pub fn dropped_faces(&self) -> usize {
        self.dropped_faces
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        self.positions.push(position);
        (self.positions.len() - 1) as u32
    }

    /// Append a face after checking that it references existing vertices,
    /// has at least three distinct corners and encloses a non-zero area.
    pub fn push_face(&mut self, indices: &[u32], material: u32) -> Result<(), GeometryError> {
        let count = self.positions.len();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(GeometryError::IndexOutOfRange { index, count });
        }

        let distinct = distinct_count(indices);
        if distinct < 3 {
            return Err(GeometryError::TooFewVertices(distinct));
        }

        if self.area_vector(indices).length() < MIN_DOUBLE_AREA {
            return Err(GeometryError::ZeroArea);
        }

        self.faces.push(Face::new(indices, material));
        Ok(())
    }

    /// Append a quad whose normal points along `want`.
    ///
    /// The winding is taken from the first three corners; if that normal
    /// disagrees with `want` the quad is emitted as `[a, d, c, b]`.
    /// Degenerate quads are dropped and counted.
    pub fn push_quad_facing(&mut self, quad: [u32; 4], want: Vec3, material: u32) {
        let [a, b, c, d] = quad;
        let p = |i: u32| self.positions.get(i as usize).copied().unwrap_or(Vec3::ZERO);
        let n = (p(b) - p(a)).cross(p(c) - p(a));
        let ordered = if n.dot(want) < 0.0 { [a, d, c, b] } else { quad };

        if let Err(e) = self.push_face(&ordered, material) {
            tracing::trace!("dropping face {:?}: {}", ordered, e);
            self.dropped_faces += 1;
        }
    }

    /// Unnormalized polygon normal (Newell's method); its length is twice the area
    pub fn area_vector(&self, indices: &[u32]) -> Vec3 {
        let mut n = Vec3::ZERO;
        for (k, &i) in indices.iter().enumerate() {
            let cur = self.positions[i as usize];
            let next = self.positions[indices[(k + 1) % indices.len()] as usize];
            n += cur.cross(next);
        }
        n
    }

    /// Unit normal of a face, zero for degenerate faces
    pub fn face_normal(&self, face: &Face) -> Vec3 {
        self.area_vector(&face.indices).normalize_or_zero()
    }

    /// Mean of a face's corner positions
    pub fn face_centroid(&self, face: &Face) -> Vec3 {
        let sum: Vec3 = face
            .indices
            .iter()
            .map(|&i| self.positions[i as usize])
            .sum();
        sum / face.indices.len() as f32
    }

    /// Append another fragment, offsetting its indices past our vertices
    pub fn merge(&mut self, other: &MeshFragment) {
        if other.positions.is_empty() {
            return;
        }

        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.faces.reserve(other.faces.len());
        for face in &other.faces {
            self.faces.push(Face {
                indices: face.indices.iter().map(|&i| i + offset).collect(),
                material: face.material,
            });
        }
        self.dropped_faces += other.dropped_faces;
    }
}

/// Number of distinct indices in a (short) face index list
pub(crate) fn distinct_count(indices: &[u32]) -> usize {
    indices
        .iter()
        .enumerate()
        .filter(|&(k, i)| !indices[..k].contains(i))
        .count()
}

/// Merge several fragments into one
pub fn combine(fragments: &[&MeshFragment]) -> MeshFragment {
    let vertices = fragments.iter().map(|f| f.positions.len()).sum();
    let faces = fragments.iter().map(|f| f.faces.len()).sum();

    let mut result = MeshFragment::with_capacity(vertices, faces);
    for fragment in fragments {
        result.merge(fragment);
    }
    result
}
