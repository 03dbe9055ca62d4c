//! Track feature builders
//!
//! Each builder is an independent generator over the same frame sequence
//! and returns its own [`MeshFragment`](crate::mesh::MeshFragment). Builders
//! that draw random numbers take the shared stream by `&mut` and must be
//! called in a fixed order to keep runs reproducible.

use glam::Vec3;

use crate::frames::{Frame, WORLD_UP};

pub mod barriers;
pub mod buildings;
pub mod obstacles;
pub mod pads;
pub mod plazas;
pub mod road;
pub mod tunnel;

pub use barriers::build_barrier;
pub use buildings::build_buildings;
pub use obstacles::build_obstacles;
pub use pads::build_pad;
pub use plazas::{TrackEnd, build_boundary_wall, build_plaza};
pub use road::build_road;
pub use tunnel::build_tunnel;

/// Side of the track, seen along the forward direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Multiplier for the frame's `right` axis
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Frame axes `(right, forward, up)`, optionally re-derived against world up.
///
/// In world-aligned mode forward is flattened onto the horizontal plane so
/// structures stay vertical regardless of track pitch and bank.
pub(crate) fn placement_axes(frame: &Frame, align_world: bool) -> (Vec3, Vec3, Vec3) {
    if align_world {
        let flat = Vec3::new(frame.forward.x, frame.forward.y, 0.0);
        if let Some(forward) = flat.try_normalize() {
            let right = forward.cross(WORLD_UP).normalize();
            return (right, forward, WORLD_UP);
        }
    }
    (frame.right, frame.forward, frame.up)
}
