//! Track configuration (track.toml)
//!
//! One flat-per-section document consumed once at startup. Every field has
//! a default, so an empty document describes the stock track. Values are
//! checked by [`TrackConfig::validate`] before anything is generated.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::recenter::AnchorMode;

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TrackConfig {
    #[serde(default)]
    pub track: TrackSection,
    #[serde(default)]
    pub road: RoadSection,
    #[serde(default)]
    pub dynamics: DynamicsSection,
    #[serde(default)]
    pub barriers: BarrierSection,
    #[serde(default)]
    pub pads: PadSection,
    #[serde(default)]
    pub tunnel: TunnelSection,
    #[serde(default)]
    pub buildings: BuildingSection,
    #[serde(default)]
    pub obstacles: ObstacleSection,
    #[serde(default)]
    pub plazas: PlazaSection,
    #[serde(default)]
    pub spawns: SpawnSection,
    #[serde(default)]
    pub checkpoints: CheckpointSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub materials: MaterialsConfig,
}

/// Run identity and path program size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackSection {
    /// Prefix for exported piece names (default: "tracks")
    pub map_name: String,
    /// Seed of the single random stream (default: 1)
    pub seed: u64,
    /// Number of randomly chosen path blocks (default: 50)
    pub blocks: u32,
    /// Arc length of one integration step in meters (default: 2.0)
    pub step_length: f32,
}

impl Default for TrackSection {
    fn default() -> Self {
        Self {
            map_name: "tracks".to_string(),
            seed: 1,
            blocks: 50,
            step_length: 2.0,
        }
    }
}

/// Road surface dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadSection {
    /// Base road width before curvature narrowing (default: 56.0)
    pub width: f32,
    /// Base shoulder width on each side (default: 0.6)
    pub shoulder_width: f32,
    /// Slab thickness (default: 1.4)
    pub thickness: f32,
}

impl Default for RoadSection {
    fn default() -> Self {
        Self {
            width: 56.0,
            shoulder_width: 0.6,
            thickness: 1.4,
        }
    }
}

/// Frame integration tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DynamicsSection {
    /// Assumed vehicle speed for the banking model in m/s (default: 45.0)
    pub target_speed: f32,
    /// Maximum absolute bank angle in degrees (default: 10.0)
    pub bank_max_deg: f32,
    /// Exponential smoothing factor for banking, 0..1 (default: 0.25)
    pub bank_smooth: f32,
    /// Road narrowing strength in curves (default: 0.10)
    pub width_curvature: f32,
    /// Exponential smoothing factor for pitch, 0..1 (default: 0.06)
    pub pitch_smooth: f32,
    /// Low-pass factor for the vertical position, 0..1 (default: 0.6)
    pub vertical_smooth: f32,
    /// Per-step pitch change clamp in degrees (default: 1.8)
    pub max_pitch_step_deg: f32,
    /// Floor for the effective turn radius in meters (default: 1.0)
    pub min_radius: f32,
    /// Gravity in m/s^2 (default: 9.81)
    pub gravity: f32,
}

impl Default for DynamicsSection {
    fn default() -> Self {
        Self {
            target_speed: 45.0,
            bank_max_deg: 10.0,
            bank_smooth: 0.25,
            width_curvature: 0.10,
            pitch_smooth: 0.06,
            vertical_smooth: 0.6,
            max_pitch_step_deg: 1.8,
            min_radius: 1.0,
            gravity: 9.81,
        }
    }
}

/// Side barriers along the road edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarrierSection {
    pub enabled: bool,
    pub height: f32,
    pub thickness: f32,
    /// Extra lateral distance from the road edge
    pub offset: f32,
}

impl Default for BarrierSection {
    fn default() -> Self {
        Self {
            enabled: true,
            height: 1.6,
            thickness: 0.4,
            offset: 0.0,
        }
    }
}

/// Flat build pads outside the barriers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PadSection {
    pub enabled: bool,
    pub width: f32,
    pub height: f32,
    /// Extra lateral distance after the barrier
    pub offset: f32,
}

impl Default for PadSection {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 50.0,
            height: 0.2,
            offset: 0.0,
        }
    }
}

/// Tunnel shell between the barriers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TunnelSection {
    pub enabled: bool,
    pub height: f32,
    pub thickness: f32,
    pub roof: bool,
    pub roof_thickness: f32,
    /// When false the shell is emitted as invisible collision
    pub visible: bool,
}

impl Default for TunnelSection {
    fn default() -> Self {
        Self {
            enabled: false,
            height: 10.0,
            thickness: 0.4,
            roof: true,
            roof_thickness: 0.4,
            visible: false,
        }
    }
}

/// Building rows on the build pads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingSection {
    pub enabled: bool,
    pub left: bool,
    pub right: bool,
    /// Arc distance between placement attempts
    pub step: f32,
    /// Chance that an attempt places a building
    pub probability: f32,
    pub rows: u32,
    pub row_spacing: f32,
    /// Per-row height modulation factor, 0..1
    pub row_height_variation: f32,
    pub width_min: f32,
    pub width_max: f32,
    pub depth_min: f32,
    pub depth_max: f32,
    pub height_min: f32,
    pub height_max: f32,
    /// Distance from the inner pad edge to the first row
    pub setback: f32,
    pub jitter_lateral: f32,
    pub jitter_forward: f32,
    /// Keep buildings vertical regardless of track pitch and bank
    pub align_world: bool,
}

impl Default for BuildingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            left: true,
            right: true,
            step: 10.0,
            probability: 0.85,
            rows: 2,
            row_spacing: 20.0,
            row_height_variation: 0.4,
            width_min: 4.0,
            width_max: 12.0,
            depth_min: 5.0,
            depth_max: 18.0,
            height_min: 6.0,
            height_max: 58.0,
            setback: 10.0,
            jitter_lateral: 0.8,
            jitter_forward: 0.8,
            align_world: true,
        }
    }
}

/// Lateral placement of obstacles relative to the track axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObstaclePlacement {
    /// On the track axis
    Center,
    /// Left and right in turn
    #[default]
    Alternating,
    /// One on each side
    BothSides,
    /// Left, center or right at random
    Random,
}

/// Obstacle geometry template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleShape {
    Pillar,
    /// Transverse wall, three times wider than deep
    #[default]
    Wall,
    /// Two columns and a top beam
    Arch,
    /// Two beams tilted +-45 degrees about the forward axis
    CrossedBeam,
    SolidBox,
}

/// Direction of the random lateral obstacle offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JitterMode {
    Both,
    /// Away from the track axis
    #[default]
    Outward,
    /// Towards the track axis
    Inward,
}

/// Roadside obstacles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObstacleSection {
    pub enabled: bool,
    /// Arc distance between placement attempts on straights
    pub step: f32,
    pub probability: f32,
    pub width_min: f32,
    pub width_max: f32,
    pub depth_min: f32,
    pub depth_max: f32,
    pub height_min: f32,
    pub height_max: f32,
    pub yaw_variation_deg: f32,
    pub tilt_variation_deg: f32,
    pub up_offset: f32,
    pub align_world: bool,
    pub placement: ObstaclePlacement,
    pub side_offset: f32,
    /// Mirror the chosen sides
    pub reverse: bool,
    /// Instances per placement, spaced along forward
    pub group_size: u32,
    pub group_spacing: f32,
    /// Only place while the track is banked past the threshold
    pub curve_only: bool,
    /// Step multiplier while banked past the threshold
    pub curve_step_factor: f32,
    pub bank_threshold_deg: f32,
    /// Skip frames below world z = 0
    pub skip_underground: bool,
    /// Place inside the tunnel instead of on the road
    pub tunnel_mode: bool,
    /// In tunnel mode, hang from the roof
    pub tunnel_hang: bool,
    pub shape: ObstacleShape,
    pub side_jitter: f32,
    pub jitter_mode: JitterMode,
}

impl Default for ObstacleSection {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 20.0,
            probability: 0.7,
            width_min: 0.6,
            width_max: 2.0,
            depth_min: 0.6,
            depth_max: 2.5,
            height_min: 3.0,
            height_max: 10.0,
            yaw_variation_deg: 10.0,
            tilt_variation_deg: 4.0,
            up_offset: 0.0,
            align_world: true,
            placement: ObstaclePlacement::default(),
            side_offset: 4.0,
            reverse: false,
            group_size: 1,
            group_spacing: 2.5,
            curve_only: false,
            curve_step_factor: 0.6,
            bank_threshold_deg: 2.5,
            skip_underground: true,
            tunnel_mode: false,
            tunnel_hang: false,
            shape: ObstacleShape::default(),
            side_jitter: 14.0,
            jitter_mode: JitterMode::default(),
        }
    }
}

/// Transverse boundary wall at one end of the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallConfig {
    pub visible: bool,
    pub height: f32,
    pub thickness: f32,
    /// Shift of the wall's front face along the end frame's forward axis
    pub offset: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            visible: true,
            height: 12.0,
            thickness: 0.6,
            offset: 0.0,
        }
    }
}

/// Start and end plazas with perimeter buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlazaSection {
    pub enabled: bool,
    pub start: bool,
    pub end: bool,
    pub length: f32,
    pub width: f32,
    /// Mean building height
    pub building_height: f32,
    pub building_spacing: f32,
    /// Chance that each perimeter cell gets a building
    pub building_density: f32,
    pub floor_height: f32,
    pub floor_visible: bool,
    /// Emit the boundary walls
    pub walls: bool,
    pub start_wall: WallConfig,
    pub end_wall: WallConfig,
}

impl Default for PlazaSection {
    fn default() -> Self {
        Self {
            enabled: true,
            start: true,
            end: true,
            length: 80.0,
            width: 120.0,
            building_height: 40.0,
            building_spacing: 20.0,
            building_density: 0.9,
            floor_height: 1.0,
            floor_visible: true,
            walls: true,
            start_wall: WallConfig::default(),
            end_wall: WallConfig::default(),
        }
    }
}

/// Starting grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnSection {
    pub enabled: bool,
    pub rows: u32,
    pub per_row: u32,
    /// Lateral spacing between columns
    pub spacing_x: f32,
    /// Spacing between rows
    pub spacing_y: f32,
    pub offset_forward: f32,
    pub offset_up: f32,
}

impl Default for SpawnSection {
    fn default() -> Self {
        Self {
            enabled: true,
            rows: 2,
            per_row: 4,
            spacing_x: 5.0,
            spacing_y: 7.0,
            offset_forward: 10.0,
            offset_up: 1.0,
        }
    }
}

/// Checkpoints and their respawn grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckpointSection {
    pub enabled: bool,
    /// Upper bound on checkpoints, 0 for no limit (default: 0)
    pub count: u32,
    /// Arc distance between checkpoints
    pub spacing: f32,
    pub offset_up: f32,
    pub respawn_rows: u32,
    pub respawn_cols: u32,
    pub respawn_spacing_x: f32,
    pub respawn_spacing_y: f32,
    pub respawn_offset_forward: f32,
}

impl Default for CheckpointSection {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 0,
            spacing: 200.0,
            offset_up: 1.0,
            respawn_rows: 2,
            respawn_cols: 3,
            respawn_spacing_x: 5.0,
            respawn_spacing_y: 8.0,
            respawn_offset_forward: 8.0,
        }
    }
}

/// Partitioning and recentering of the merged mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    /// Maximum distinct vertices per piece (default: 32767)
    pub vertex_limit: u32,
    /// Maximum centroid distance from a piece's seed face (default: 200.0)
    pub lod_limit: f32,
    pub anchor_mode: AnchorMode,
    /// Merge-by-distance threshold applied per feature, 0 disables (default: 0.0001)
    pub weld_distance: f32,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            vertex_limit: 32767,
            lod_limit: 200.0,
            anchor_mode: AnchorMode::default(),
            weld_distance: 0.0001,
        }
    }
}

/// RGBA colours of the material slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialsConfig {
    pub road: [f32; 4],
    pub barrier: [f32; 4],
    pub build_pad: [f32; 4],
    pub building: [f32; 4],
    pub obstacle: [f32; 4],
    pub plaza_floor: [f32; 4],
    pub boundary_wall: [f32; 4],
    pub tunnel: [f32; 4],
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            road: [0.5, 0.4, 0.1, 1.0],
            barrier: [0.1, 0.1, 0.1, 1.0],
            build_pad: [0.1, 0.6, 0.6, 1.0],
            building: [0.0, 0.1, 0.6, 1.0],
            obstacle: [1.0, 0.35, 0.1, 1.0],
            plaza_floor: [0.05, 0.05, 0.05, 1.0],
            boundary_wall: [0.8, 0.0, 0.0, 1.0],
            tunnel: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

impl TrackConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config document without validating it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check every numeric constraint, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.track;
        if t.map_name.trim().is_empty() {
            return Err(ConfigError::invalid("track.map_name", "\"\"", "must not be empty"));
        }
        if t.blocks == 0 {
            return Err(ConfigError::invalid("track.blocks", t.blocks, "must be at least 1"));
        }
        positive("track.step_length", t.step_length)?;

        let r = &self.road;
        positive("road.width", r.width)?;
        non_negative("road.shoulder_width", r.shoulder_width)?;
        positive("road.thickness", r.thickness)?;

        let d = &self.dynamics;
        non_negative("dynamics.target_speed", d.target_speed)?;
        non_negative("dynamics.bank_max_deg", d.bank_max_deg)?;
        if d.bank_max_deg >= 90.0 {
            return Err(ConfigError::invalid(
                "dynamics.bank_max_deg",
                d.bank_max_deg,
                "must be below 90",
            ));
        }
        smoothing("dynamics.bank_smooth", d.bank_smooth)?;
        smoothing("dynamics.pitch_smooth", d.pitch_smooth)?;
        smoothing("dynamics.vertical_smooth", d.vertical_smooth)?;
        unit_interval("dynamics.width_curvature", d.width_curvature)?;
        positive("dynamics.max_pitch_step_deg", d.max_pitch_step_deg)?;
        positive("dynamics.min_radius", d.min_radius)?;
        positive("dynamics.gravity", d.gravity)?;

        let b = &self.barriers;
        positive("barriers.height", b.height)?;
        positive("barriers.thickness", b.thickness)?;
        non_negative("barriers.offset", b.offset)?;

        let p = &self.pads;
        positive("pads.width", p.width)?;
        positive("pads.height", p.height)?;
        non_negative("pads.offset", p.offset)?;

        let tu = &self.tunnel;
        positive("tunnel.height", tu.height)?;
        positive("tunnel.thickness", tu.thickness)?;
        non_negative("tunnel.roof_thickness", tu.roof_thickness)?;

        let bu = &self.buildings;
        positive("buildings.step", bu.step)?;
        unit_interval("buildings.probability", bu.probability)?;
        non_negative("buildings.row_spacing", bu.row_spacing)?;
        unit_interval("buildings.row_height_variation", bu.row_height_variation)?;
        size_range("buildings.width_min", "buildings.width_max", bu.width_min, bu.width_max)?;
        size_range("buildings.depth_min", "buildings.depth_max", bu.depth_min, bu.depth_max)?;
        size_range("buildings.height_min", "buildings.height_max", bu.height_min, bu.height_max)?;
        non_negative("buildings.setback", bu.setback)?;
        non_negative("buildings.jitter_lateral", bu.jitter_lateral)?;
        non_negative("buildings.jitter_forward", bu.jitter_forward)?;

        let o = &self.obstacles;
        positive("obstacles.step", o.step)?;
        unit_interval("obstacles.probability", o.probability)?;
        size_range("obstacles.width_min", "obstacles.width_max", o.width_min, o.width_max)?;
        size_range("obstacles.depth_min", "obstacles.depth_max", o.depth_min, o.depth_max)?;
        size_range("obstacles.height_min", "obstacles.height_max", o.height_min, o.height_max)?;
        non_negative("obstacles.yaw_variation_deg", o.yaw_variation_deg)?;
        non_negative("obstacles.tilt_variation_deg", o.tilt_variation_deg)?;
        non_negative("obstacles.side_offset", o.side_offset)?;
        if o.group_size == 0 {
            return Err(ConfigError::invalid("obstacles.group_size", 0, "must be at least 1"));
        }
        non_negative("obstacles.group_spacing", o.group_spacing)?;
        positive("obstacles.curve_step_factor", o.curve_step_factor)?;
        non_negative("obstacles.bank_threshold_deg", o.bank_threshold_deg)?;
        non_negative("obstacles.side_jitter", o.side_jitter)?;

        let pl = &self.plazas;
        positive("plazas.length", pl.length)?;
        positive("plazas.width", pl.width)?;
        positive("plazas.building_height", pl.building_height)?;
        positive("plazas.building_spacing", pl.building_spacing)?;
        unit_interval("plazas.building_density", pl.building_density)?;
        positive("plazas.floor_height", pl.floor_height)?;
        positive("plazas.start_wall.height", pl.start_wall.height)?;
        positive("plazas.start_wall.thickness", pl.start_wall.thickness)?;
        finite("plazas.start_wall.offset", pl.start_wall.offset)?;
        positive("plazas.end_wall.height", pl.end_wall.height)?;
        positive("plazas.end_wall.thickness", pl.end_wall.thickness)?;
        finite("plazas.end_wall.offset", pl.end_wall.offset)?;

        let s = &self.spawns;
        non_negative("spawns.spacing_x", s.spacing_x)?;
        non_negative("spawns.spacing_y", s.spacing_y)?;
        finite("spawns.offset_forward", s.offset_forward)?;
        finite("spawns.offset_up", s.offset_up)?;

        let c = &self.checkpoints;
        positive("checkpoints.spacing", c.spacing)?;
        finite("checkpoints.offset_up", c.offset_up)?;
        non_negative("checkpoints.respawn_spacing_x", c.respawn_spacing_x)?;
        non_negative("checkpoints.respawn_spacing_y", c.respawn_spacing_y)?;
        finite("checkpoints.respawn_offset_forward", c.respawn_offset_forward)?;

        let e = &self.export;
        if e.vertex_limit < 3 {
            return Err(ConfigError::invalid(
                "export.vertex_limit",
                e.vertex_limit,
                "must be at least 3",
            ));
        }
        positive("export.lod_limit", e.lod_limit)?;
        non_negative("export.weld_distance", e.weld_distance)?;

        let m = &self.materials;
        for (field, rgba) in [
            ("materials.road", m.road),
            ("materials.barrier", m.barrier),
            ("materials.build_pad", m.build_pad),
            ("materials.building", m.building),
            ("materials.obstacle", m.obstacle),
            ("materials.plaza_floor", m.plaza_floor),
            ("materials.boundary_wall", m.boundary_wall),
            ("materials.tunnel", m.tunnel),
        ] {
            for channel in rgba {
                unit_interval(field, channel)?;
            }
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "must be finite"))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "must be greater than 0"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "must be 0 or greater"))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "must be within 0..=1"))
    }
}

fn smoothing(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "must be within (0, 1]"))
    }
}

fn size_range(
    min_field: &'static str,
    max_field: &'static str,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    positive(min_field, min)?;
    positive(max_field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange {
            min_field,
            max_field,
            min,
            max,
        });
    }
    Ok(())
}
