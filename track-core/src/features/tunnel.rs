//! Tunnel shell
//!
//! Two walls centred on the barriers, each with an inner and an outer skin,
//! joined by an optional roof slab. The shell is open at both ends.

use crate::config::TrackConfig;
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, strip};

/// Build the tunnel walls and roof along every frame
pub fn build_tunnel(frames: &[Frame], config: &TrackConfig) -> MeshFragment {
    let t = &config.tunnel;
    let material = Material::Tunnel.or_collision(t.visible).index();

    let floor = config.road.thickness * 0.5;
    let top = floor + t.height;
    let outer_top = if t.roof { top + t.roof_thickness } else { top };

    let mut mesh = MeshFragment::with_capacity(frames.len() * 8, frames.len() * 6);
    let mut left_inner_bottom = Vec::with_capacity(frames.len());
    let mut left_inner_top = Vec::with_capacity(frames.len());
    let mut left_outer_bottom = Vec::with_capacity(frames.len());
    let mut left_outer_top = Vec::with_capacity(frames.len());
    let mut right_inner_bottom = Vec::with_capacity(frames.len());
    let mut right_inner_top = Vec::with_capacity(frames.len());
    let mut right_outer_bottom = Vec::with_capacity(frames.len());
    let mut right_outer_top = Vec::with_capacity(frames.len());

    for f in frames {
        let wall = f.edge_offset() + config.barriers.offset + config.barriers.thickness * 0.5;
        let left = f.position - f.right * wall;
        let right = f.position + f.right * wall;
        let skin = f.right * t.thickness;

        left_inner_bottom.push(mesh.push_vertex(left + f.up * floor));
        left_inner_top.push(mesh.push_vertex(left + f.up * top));
        left_outer_bottom.push(mesh.push_vertex(left + f.up * floor - skin));
        left_outer_top.push(mesh.push_vertex(left + f.up * outer_top - skin));

        right_inner_bottom.push(mesh.push_vertex(right + f.up * floor));
        right_inner_top.push(mesh.push_vertex(right + f.up * top));
        right_outer_bottom.push(mesh.push_vertex(right + f.up * floor + skin));
        right_outer_top.push(mesh.push_vertex(right + f.up * outer_top + skin));
    }

    let rights: Vec<_> = frames.iter().map(|f| f.right).collect();
    let lefts: Vec<_> = rights.iter().map(|&r| -r).collect();
    let ups: Vec<_> = frames.iter().map(|f| f.up).collect();
    let downs: Vec<_> = ups.iter().map(|&u| -u).collect();

    // Inner skins face the road, outer skins face away from it
    strip(&mut mesh, &left_inner_bottom, &left_inner_top, &rights, material);
    strip(&mut mesh, &right_inner_bottom, &right_inner_top, &lefts, material);
    strip(&mut mesh, &left_outer_bottom, &left_outer_top, &lefts, material);
    strip(&mut mesh, &right_outer_bottom, &right_outer_top, &rights, material);

    if t.roof {
        strip(&mut mesh, &left_inner_top, &right_inner_top, &downs, material);
        strip(&mut mesh, &left_outer_top, &right_outer_top, &ups, material);
    }

    mesh
}
