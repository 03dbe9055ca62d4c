//! Command program generator
//!
//! A track is a random sequence of blocks (straights, curves, grades), each
//! expanded into fixed-length integration steps. Per-step turn and pitch
//! deltas follow an easing envelope normalised so that a block's steps sum
//! to exactly the block's total.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use std::f32::consts::PI;

/// One integration step of the path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCommand {
    /// Heading change in degrees, positive turns left (counter-clockwise about +Z)
    pub yaw_delta: f32,
    /// Requested pitch change in degrees
    pub pitch_delta: f32,
    /// Arc length of the step in meters
    pub arc_length: f32,
}

/// Block categories of the random program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Straight,
    CurveLeft,
    CurveRight,
    GradeUp,
    GradeDown,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Straight,
        BlockKind::CurveLeft,
        BlockKind::CurveRight,
        BlockKind::GradeUp,
        BlockKind::GradeDown,
    ];

    /// Relative selection weights, parallel to [`BlockKind::ALL`]
    pub const WEIGHTS: [u32; 5] = [4, 2, 2, 1, 1];
}

const STRAIGHT_LENGTH: (f32, f32) = (30.0, 60.0);
const CURVE_ANGLES: [f32; 3] = [15.0, 25.0, 35.0];
const CURVE_RADIUS: (f32, f32) = (50.0, 90.0);
const GRADE_LENGTH: (f32, f32) = (35.0, 55.0);
const GRADE_RISE: (f32, f32) = (6.0, 12.0);

/// Steps needed to cover `length` (at least one)
fn step_count(length: f32, step_length: f32) -> usize {
    ((length / step_length).ceil() as usize).max(1)
}

/// Spread `total` over `steps` following `envelope(u)` sampled at step midpoints
fn eased(total: f32, steps: usize, envelope: impl Fn(f32) -> f32) -> Vec<f32> {
    let weights: Vec<f32> = (0..steps)
        .map(|i| envelope((i as f32 + 0.5) / steps as f32))
        .collect();
    let sum: f32 = weights.iter().sum();
    if sum <= f32::EPSILON {
        return vec![total / steps as f32; steps];
    }
    weights.iter().map(|w| total * w / sum).collect()
}

/// Straight block: no turn, no pitch
pub fn straight(length: f32, step_length: f32) -> Vec<PathCommand> {
    let steps = step_count(length, step_length);
    vec![
        PathCommand {
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            arc_length: step_length,
        };
        steps
    ]
}

/// Curve block turning `angle_deg` (signed, positive left) along an arc of `radius`.
///
/// The turn rate follows a half-sine envelope: it builds up, peaks
/// mid-curve, and relaxes.
pub fn curve(angle_deg: f32, radius: f32, step_length: f32) -> Vec<PathCommand> {
    let arc = angle_deg.abs().to_radians() * radius.max(1e-6);
    let steps = step_count(arc, step_length);
    eased(angle_deg, steps, |u| (u * PI).sin())
        .into_iter()
        .map(|yaw_delta| PathCommand {
            yaw_delta,
            pitch_delta: 0.0,
            arc_length: step_length,
        })
        .collect()
}

/// Grade block climbing `rise` meters (negative descends) over `length`.
///
/// Pitch deltas follow a raised-cosine ramp and sum to `atan2(rise, length)`.
pub fn grade(length: f32, rise: f32, step_length: f32) -> Vec<PathCommand> {
    let steps = step_count(length, step_length);
    let pitch_total = rise.atan2(length).to_degrees();
    eased(pitch_total, steps, |u| 0.5 - 0.5 * (u * PI).cos())
        .into_iter()
        .map(|pitch_delta| PathCommand {
            yaw_delta: 0.0,
            pitch_delta,
            arc_length: step_length,
        })
        .collect()
}

/// Draw one block from the random stream and expand it
pub fn random_block<R: Rng + ?Sized>(
    rng: &mut R,
    chooser: &WeightedIndex<u32>,
    step_length: f32,
) -> (BlockKind, Vec<PathCommand>) {
    let kind = BlockKind::ALL[chooser.sample(rng)];
    let commands = match kind {
        BlockKind::Straight => straight(rng.random_range(STRAIGHT_LENGTH.0..=STRAIGHT_LENGTH.1), step_length),
        BlockKind::CurveLeft | BlockKind::CurveRight => {
            let angle = CURVE_ANGLES[rng.random_range(0..CURVE_ANGLES.len())];
            let radius = rng.random_range(CURVE_RADIUS.0..=CURVE_RADIUS.1);
            let signed = if kind == BlockKind::CurveLeft { angle } else { -angle };
            curve(signed, radius, step_length)
        }
        BlockKind::GradeUp | BlockKind::GradeDown => {
            let length = rng.random_range(GRADE_LENGTH.0..=GRADE_LENGTH.1);
            let rise = rng.random_range(GRADE_RISE.0..=GRADE_RISE.1);
            let signed = if kind == BlockKind::GradeUp { rise } else { -rise };
            grade(length, signed, step_length)
        }
    };
    (kind, commands)
}

/// Generate the full command program for `block_count` random blocks
pub fn generate_program<R: Rng + ?Sized>(
    block_count: u32,
    step_length: f32,
    rng: &mut R,
) -> Vec<PathCommand> {
    let chooser = WeightedIndex::new(BlockKind::WEIGHTS).expect("block weights are positive constants");

    let mut program = Vec::new();
    for block in 0..block_count {
        let (kind, commands) = random_block(rng, &chooser, step_length);
        tracing::trace!("block {}: {:?} ({} steps)", block, kind, commands.len());
        program.extend(commands);
    }

    tracing::debug!("program: {} blocks, {} steps", block_count, program.len());
    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_straight_steps() {
        let cmds = straight(41.0, 2.0);
        assert_eq!(cmds.len(), 21);
        assert!(cmds.iter().all(|c| c.yaw_delta == 0.0 && c.pitch_delta == 0.0));
        assert!(cmds.iter().all(|c| c.arc_length == 2.0));
    }

    #[test]
    fn test_curve_total_turn() {
        for angle in [15.0, -25.0, 35.0] {
            let cmds = curve(angle, 60.0, 2.0);
            let total: f32 = cmds.iter().map(|c| c.yaw_delta).sum();
            assert!((total - angle).abs() < 1e-3, "{} vs {}", total, angle);
        }
    }

    #[test]
    fn test_curve_step_count() {
        // 30 degrees at radius 60 is ~31.4 m of arc
        assert_eq!(curve(30.0, 60.0, 2.0).len(), 16);
    }

    #[test]
    fn test_curve_eases_in_and_out() {
        let cmds = curve(35.0, 80.0, 2.0);
        let mid = cmds[cmds.len() / 2].yaw_delta;
        assert!(cmds[0].yaw_delta < mid);
        assert!(cmds[cmds.len() - 1].yaw_delta < mid);
        assert!(cmds.iter().all(|c| c.yaw_delta > 0.0));
    }

    #[test]
    fn test_right_curve_is_negative() {
        assert!(curve(-15.0, 50.0, 2.0).iter().all(|c| c.yaw_delta < 0.0));
    }

    #[test]
    fn test_grade_total_pitch() {
        let cmds = grade(40.0, 8.0, 2.0);
        let total: f32 = cmds.iter().map(|c| c.pitch_delta).sum();
        let expected = 8.0f32.atan2(40.0).to_degrees();
        assert!((total - expected).abs() < 1e-3);

        let down: f32 = grade(40.0, -8.0, 2.0).iter().map(|c| c.pitch_delta).sum();
        assert!((down + expected).abs() < 1e-3);
    }

    #[test]
    fn test_program_is_deterministic() {
        let a = generate_program(20, 2.0, &mut Pcg64::seed_from_u64(42));
        let b = generate_program(20, 2.0, &mut Pcg64::seed_from_u64(42));
        assert_eq!(a, b);

        let c = generate_program(20, 2.0, &mut Pcg64::seed_from_u64(43));
        assert_ne!(a, c);
    }

    #[test]
    fn test_program_uses_fixed_step() {
        let program = generate_program(10, 1.5, &mut Pcg64::seed_from_u64(1));
        assert!(!program.is_empty());
        assert!(program.iter().all(|c| c.arc_length == 1.5));
    }
}
