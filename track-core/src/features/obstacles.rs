//! Roadside obstacles
//!
//! Obstacles are placed at a fixed arc cadence that tightens while the
//! track is banked (in curves). Each placement picks lateral sides from the
//! placement mode, applies a random yaw and tilt, and emits a group of
//! shape instances spaced along the forward axis.

use glam::{Quat, Vec3};
use rand::Rng;
use smallvec::{SmallVec, smallvec};

use crate::config::{JitterMode, ObstaclePlacement, ObstacleSection, ObstacleShape, TrackConfig};
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, OrientedBox, append_box};

use super::placement_axes;

/// Emit one obstacle of `shape` whose footprint is centred on `base`.
///
/// `base` lies on the supporting surface; the shape extends `size.z` along
/// `up` from there.
pub fn append_obstacle(
    mesh: &mut MeshFragment,
    shape: ObstacleShape,
    base: Vec3,
    axes: (Vec3, Vec3, Vec3),
    size: Vec3,
    material: u32,
) {
    let (right, forward, up) = axes;
    let (w, d, h) = (size.x, size.y, size.z);
    let block = |mesh: &mut MeshFragment, center: Vec3, r: Vec3, u: Vec3, size: Vec3| {
        append_box(mesh, &OrientedBox::new(center, r, forward, u, size), material);
    };

    match shape {
        ObstacleShape::Pillar => block(mesh, base + up * (h * 0.5), right, up, Vec3::new(w, d, h)),
        ObstacleShape::Wall => {
            block(mesh, base + up * (h * 0.5), right, up, Vec3::new(w * 3.0, d * 0.5, h))
        }
        ObstacleShape::Arch => {
            let column_h = h * 0.8;
            let beam_h = h - column_h;
            let column = Vec3::new(w * 0.4, d * 0.8, column_h);
            let spread = right * (w * 1.2);
            block(mesh, base - spread + up * (column_h * 0.5), right, up, column);
            block(mesh, base + spread + up * (column_h * 0.5), right, up, column);
            let beam = Vec3::new(w * 3.0, d * 0.8, beam_h);
            block(mesh, base + up * (column_h + beam_h * 0.5), right, up, beam);
        }
        ObstacleShape::CrossedBeam => {
            let center = base + up * (h * 0.5);
            for tilt in [-45.0f32, 45.0] {
                let roll = Quat::from_axis_angle(forward, tilt.to_radians());
                block(mesh, center, roll * right, roll * up, Vec3::new(w, d, h));
            }
        }
        ObstacleShape::SolidBox => block(
            mesh,
            base + up * (h * 0.5),
            right,
            up,
            Vec3::new(w * 1.5, d * 1.5, h),
        ),
    }
}

/// Lateral signs (-1 left, 0 center, +1 right) for one placement
fn placement_sides<R: Rng + ?Sized>(
    o: &ObstacleSection,
    toggle: &mut f32,
    rng: &mut R,
) -> SmallVec<[f32; 2]> {
    let sides: SmallVec<[f32; 2]> = match o.placement {
        ObstaclePlacement::Center => smallvec![0.0],
        ObstaclePlacement::Alternating => {
            *toggle = -*toggle;
            smallvec![*toggle]
        }
        ObstaclePlacement::BothSides => smallvec![-1.0, 1.0],
        ObstaclePlacement::Random => smallvec![[-1.0, 0.0, 1.0][rng.random_range(0..3)]],
    };

    if o.reverse {
        sides.into_iter().map(|s| -s).collect()
    } else {
        sides
    }
}

/// Signed lateral jitter for one instance, pointing away from (or toward)
/// the track axis according to the jitter mode
fn lateral_jitter<R: Rng + ?Sized>(o: &ObstacleSection, side: f32, rng: &mut R) -> f32 {
    let raw = rng.random_range(-o.side_jitter..=o.side_jitter);
    let magnitude = match o.jitter_mode {
        JitterMode::Both => raw,
        JitterMode::Outward => raw.abs(),
        JitterMode::Inward => -raw.abs(),
    };
    if side == 0.0 { magnitude } else { magnitude * side }
}

/// Place obstacles along the whole track
pub fn build_obstacles<R: Rng + ?Sized>(
    frames: &[Frame],
    config: &TrackConfig,
    rng: &mut R,
) -> MeshFragment {
    let o = &config.obstacles;
    let material = Material::Obstacle.index();
    let road_top = config.road.thickness * 0.5;

    let mut mesh = MeshFragment::new();
    let mut placed = 0usize;
    let mut next_arc = o.step;
    let mut toggle = -1.0f32;

    for frame in frames {
        if frame.arc_position < next_arc {
            continue;
        }

        let in_curve = frame.bank_angle.abs() > o.bank_threshold_deg;
        if o.curve_only && !in_curve {
            continue;
        }
        next_arc += if in_curve { o.step * o.curve_step_factor } else { o.step };

        if o.skip_underground && !o.tunnel_mode && frame.position.z < 0.0 {
            continue;
        }

        if rng.random::<f32>() > o.probability {
            continue;
        }

        let sides = placement_sides(o, &mut toggle, rng);

        let (right, forward, up) = placement_axes(frame, o.align_world);
        let yaw = rng.random_range(-o.yaw_variation_deg..=o.yaw_variation_deg).to_radians();
        let tilt = rng.random_range(-o.tilt_variation_deg..=o.tilt_variation_deg).to_radians();
        let rotation = Quat::from_axis_angle(up, yaw) * Quat::from_axis_angle(right, tilt);
        let axes = (rotation * right, rotation * forward, rotation * up);

        for side in sides {
            let lateral = o.side_offset * side + lateral_jitter(o, side, rng);
            let anchor = frame.position + right * lateral + up * (road_top + o.up_offset);

            for g in 0..o.group_size {
                let size = Vec3::new(
                    rng.random_range(o.width_min..=o.width_max),
                    rng.random_range(o.depth_min..=o.depth_max),
                    rng.random_range(o.height_min..=o.height_max),
                );

                let mut base = anchor + axes.1 * (g as f32 * o.group_spacing);
                if o.tunnel_mode && o.tunnel_hang {
                    // Top of the obstacle touches the tunnel roof
                    base += up * (config.tunnel.height - size.z);
                }

                append_obstacle(&mut mesh, o.shape, base, axes, size, material);
                placed += 1;
            }
        }
    }

    tracing::debug!("{} obstacles ({:?})", placed, o.shape);
    mesh
}
