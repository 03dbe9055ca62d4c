//! Oriented primitives
//!
//! Boxes and lofted strips whose faces are wound from an intended outward
//! direction rather than from the handedness of the axes they were given.
//! Builders on the left side of the track pass mirrored axes; the winding
//! check in [`MeshFragment::push_quad_facing`] keeps their normals outward.

use glam::Vec3;

use super::fragment::MeshFragment;

/// Box placed by a center and three (not necessarily unit) axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vec3,
    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Full extents along right, forward and up
    pub size: Vec3,
}

impl OrientedBox {
    pub fn new(center: Vec3, right: Vec3, forward: Vec3, up: Vec3, size: Vec3) -> Self {
        Self {
            center,
            right,
            forward,
            up,
            size,
        }
    }
}

/// Build a closed six-quad box
pub fn build_box(spec: &OrientedBox, material: u32) -> MeshFragment {
    let mut mesh = MeshFragment::with_capacity(8, 6);
    append_box(&mut mesh, spec, material);
    mesh
}

/// Append a closed six-quad box to an existing fragment
pub fn append_box(mesh: &mut MeshFragment, spec: &OrientedBox, material: u32) {
    let right = spec.right.normalize_or_zero();
    let forward = spec.forward.normalize_or_zero();
    let up = spec.up.normalize_or_zero();

    let ex = right * (spec.size.x * 0.5);
    let ey = forward * (spec.size.y * 0.5);
    let ez = up * (spec.size.z * 0.5);

    // Corner k has sign bits (x: 4, y: 2, z: 1)
    let mut corners = [0u32; 8];
    for (k, corner) in corners.iter_mut().enumerate() {
        let sx = if k & 4 != 0 { 1.0 } else { -1.0 };
        let sy = if k & 2 != 0 { 1.0 } else { -1.0 };
        let sz = if k & 1 != 0 { 1.0 } else { -1.0 };
        *corner = mesh.push_vertex(spec.center + ex * sx + ey * sy + ez * sz);
    }

    let idx = |sx: i32, sy: i32, sz: i32| {
        let k = (if sx > 0 { 4 } else { 0 }) + (if sy > 0 { 2 } else { 0 }) + (if sz > 0 { 1 } else { 0 });
        corners[k]
    };

    let faces = [
        ([idx(1, -1, -1), idx(1, -1, 1), idx(1, 1, 1), idx(1, 1, -1)], right),
        ([idx(-1, 1, -1), idx(-1, 1, 1), idx(-1, -1, 1), idx(-1, -1, -1)], -right),
        ([idx(-1, 1, -1), idx(1, 1, -1), idx(1, 1, 1), idx(-1, 1, 1)], forward),
        ([idx(1, -1, -1), idx(-1, -1, -1), idx(-1, -1, 1), idx(1, -1, 1)], -forward),
        ([idx(-1, -1, 1), idx(1, -1, 1), idx(1, 1, 1), idx(-1, 1, 1)], up),
        ([idx(-1, 1, -1), idx(1, 1, -1), idx(1, -1, -1), idx(-1, -1, -1)], -up),
    ];

    for (quad, want) in faces {
        mesh.push_quad_facing(quad, want, material);
    }
}

/// Quads between two parallel rails of vertex indices.
///
/// Quad `i` spans `a[i], b[i], b[i+1], a[i+1]` and faces `outward[i]`.
pub fn strip(mesh: &mut MeshFragment, a: &[u32], b: &[u32], outward: &[Vec3], material: u32) {
    let n = a.len().min(b.len()).min(outward.len());
    for i in 0..n.saturating_sub(1) {
        mesh.push_quad_facing([a[i], b[i], b[i + 1], a[i + 1]], outward[i], material);
    }
}

/// Closed four-corner cross-section at one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Corners in loop order
    pub corners: [Vec3; 4],
    /// Outward direction of the side running from corner `k` to `k + 1`
    pub outward: [Vec3; 4],
    /// Track forward direction at this section (for end caps)
    pub forward: Vec3,
}

/// Loft a closed tube through consecutive sections, capping both ends
pub fn loft(sections: &[Section], material: u32) -> MeshFragment {
    let mut mesh = MeshFragment::with_capacity(sections.len() * 4, sections.len() * 4 + 2);
    if sections.is_empty() {
        return mesh;
    }

    let mut rails: [Vec<u32>; 4] = Default::default();
    for section in sections {
        for (rail, &corner) in rails.iter_mut().zip(&section.corners) {
            rail.push(mesh.push_vertex(corner));
        }
    }

    for k in 0..4 {
        let outward: Vec<Vec3> = sections.iter().map(|s| s.outward[k]).collect();
        strip(&mut mesh, &rails[k], &rails[(k + 1) % 4], &outward, material);
    }

    let first = [rails[0][0], rails[1][0], rails[2][0], rails[3][0]];
    mesh.push_quad_facing(first, -sections[0].forward, material);

    let n = sections.len() - 1;
    let last = [rails[0][n], rails[1][n], rails[2][n], rails[3][n]];
    mesh.push_quad_facing(last, sections[n].forward, material);

    mesh
}
