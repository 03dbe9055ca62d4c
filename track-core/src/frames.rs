//! Frame integrator
//!
//! Walks a command program and produces one oriented, banked frame per
//! step. Pitch, bank and the vertical position are low-pass filtered so
//! discrete grade and curve transitions do not show up as kinks.

use glam::{Quat, Vec3};

use crate::config::TrackConfig;
use crate::program::PathCommand;

/// World up axis
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Oriented sample of the track center line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Cumulative arc length at this frame (meters)
    pub arc_position: f32,
    pub position: Vec3,
    pub forward: Vec3,
    /// Lateral axis after banking
    pub right: Vec3,
    /// Road normal after banking
    pub up: Vec3,
    /// Smoothed bank angle in degrees, positive on left turns; the basis is
    /// rolled by this angle about `forward`
    pub bank_angle: f32,
    pub road_width: f32,
    pub shoulder_width: f32,
}

impl Frame {
    /// Lateral distance from the center line to the outer shoulder edge
    pub fn edge_offset(&self) -> f32 {
        self.road_width * 0.5 + self.shoulder_width
    }
}

/// Tuning of the integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub base_road_width: f32,
    pub base_shoulder_width: f32,
    /// Step length used by the width narrowing term
    pub step_length: f32,
    pub target_speed: f32,
    pub gravity: f32,
    pub min_radius: f32,
    pub bank_max_deg: f32,
    pub bank_smooth: f32,
    pub pitch_smooth: f32,
    pub max_pitch_step_deg: f32,
    pub vertical_smooth: f32,
    pub width_curvature: f32,
}

impl FrameParams {
    pub fn from_config(config: &TrackConfig) -> Self {
        let d = &config.dynamics;
        Self {
            base_road_width: config.road.width,
            base_shoulder_width: config.road.shoulder_width,
            step_length: config.track.step_length,
            target_speed: d.target_speed,
            gravity: d.gravity,
            min_radius: d.min_radius,
            bank_max_deg: d.bank_max_deg,
            bank_smooth: d.bank_smooth,
            pitch_smooth: d.pitch_smooth,
            max_pitch_step_deg: d.max_pitch_step_deg,
            vertical_smooth: d.vertical_smooth,
            width_curvature: d.width_curvature,
        }
    }
}

impl Default for FrameParams {
    fn default() -> Self {
        Self::from_config(&TrackConfig::default())
    }
}

/// Integrate a command program into frames, one per command
pub fn integrate_frames(program: &[PathCommand], params: &FrameParams) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(program.len());

    let mut position = Vec3::ZERO;
    let mut yaw = 0.0f32;
    let mut pitch = 0.0f32;
    let mut bank = 0.0f32;
    let mut arc = 0.0f32;
    let mut last_right = Vec3::NEG_Y;

    for cmd in program {
        let pitch_delta = cmd
            .pitch_delta
            .clamp(-params.max_pitch_step_deg, params.max_pitch_step_deg);
        let target_pitch = pitch + pitch_delta;
        pitch += params.pitch_smooth * (target_pitch - pitch);

        let (sy, cy) = yaw.to_radians().sin_cos();
        let (sp, cp) = pitch.to_radians().sin_cos();
        let forward = Vec3::new(cy * cp, sy * cp, sp).normalize();

        // Unbanked basis; keep the previous lateral axis if forward is vertical
        let right = match forward.cross(WORLD_UP).try_normalize() {
            Some(r) => r,
            None => (last_right - forward * last_right.dot(forward)).normalize(),
        };
        let up = right.cross(forward).normalize();
        last_right = right;

        let ds = cmd.arc_length.max(1e-6);
        let curvature = cmd.yaw_delta.to_radians().abs() / ds;
        let lateral = if curvature > 1e-6 {
            let radius = (1.0 / curvature).max(params.min_radius);
            params.target_speed * params.target_speed / (radius * params.gravity)
        } else {
            0.0
        };
        let magnitude = lateral.min(1.0).atan().to_degrees().min(params.bank_max_deg);
        let bank_target = if cmd.yaw_delta >= 0.0 { magnitude } else { -magnitude };
        bank += params.bank_smooth * (bank_target - bank);

        // Roll by +bank about forward: positive bank raises the left edge
        let roll = Quat::from_axis_angle(forward, bank.to_radians());
        let right = (roll * right).normalize();
        let up = (roll * up).normalize();

        let width_factor =
            1.0 - params.width_curvature * (curvature * params.step_length * 4.0).min(1.0);
        let road_width = params.base_road_width * width_factor.max(0.7);
        let shoulder_width = params.base_shoulder_width * (0.8 + 0.4 * width_factor);

        let raw = position + forward * cmd.arc_length;
        let z = position.z + params.vertical_smooth * (raw.z - position.z);
        position = Vec3::new(raw.x, raw.y, z);
        arc += cmd.arc_length;

        frames.push(Frame {
            arc_position: arc,
            position,
            forward,
            right,
            up,
            bank_angle: bank,
            road_width,
            shoulder_width,
        });

        yaw += cmd.yaw_delta;
    }

    frames
}
