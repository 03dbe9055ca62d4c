//! Start and end plazas, boundary walls

use glam::Vec3;
use rand::Rng;

use crate::config::TrackConfig;
use crate::frames::Frame;
use crate::materials::Material;
use crate::mesh::{MeshFragment, OrientedBox, append_box};

const PLAZA_BUILDING_FOOTPRINT: (f32, f32) = (6.0, 12.0);
const PLAZA_HEIGHT_SPREAD: (f32, f32) = (0.6, 1.2);

/// Which end of the track a plaza or wall belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEnd {
    Start,
    End,
}

impl TrackEnd {
    /// Direction from the track end into the plaza
    fn outward(self, frame: &Frame) -> Vec3 {
        match self {
            TrackEnd::Start => -frame.forward,
            TrackEnd::End => frame.forward,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackEnd::Start => "start",
            TrackEnd::End => "end",
        }
    }
}

/// Plaza floor beyond one end of the track plus its perimeter buildings.
///
/// Buildings sit on a grid of `building_spacing` cells; every cell draws
/// against `building_density`, and interior cells are then discarded so
/// only the perimeter is built up.
pub fn build_plaza<R: Rng + ?Sized>(
    frame: &Frame,
    end: TrackEnd,
    config: &TrackConfig,
    rng: &mut R,
) -> MeshFragment {
    let p = &config.plazas;
    let (right, forward, up) = (frame.right, frame.forward, frame.up);
    let center = frame.position + end.outward(frame) * (p.length * 0.5);

    let mut mesh = MeshFragment::new();

    let floor = OrientedBox::new(
        center - up * (p.floor_height * 0.5),
        right,
        forward,
        up,
        Vec3::new(p.width, p.length, p.floor_height),
    );
    let floor_material = Material::PlazaFloor.or_collision(p.floor_visible);
    append_box(&mut mesh, &floor, floor_material.index());

    let nx = (p.width / p.building_spacing) as i32;
    let nz = (p.length / p.building_spacing) as i32;
    let (hx, hz) = (nx.div_euclid(2), nz.div_euclid(2));
    let mut buildings = 0usize;

    for ix in (-nx).div_euclid(2)..=hx {
        for iz in (-nz).div_euclid(2)..=hz {
            if rng.random::<f32>() > p.building_density {
                continue;
            }
            if ix.abs() < hx - 1 && iz.abs() < hz - 1 {
                continue;
            }

            let height = rng.random_range(
                p.building_height * PLAZA_HEIGHT_SPREAD.0..=p.building_height * PLAZA_HEIGHT_SPREAD.1,
            );
            let width = rng.random_range(PLAZA_BUILDING_FOOTPRINT.0..=PLAZA_BUILDING_FOOTPRINT.1);
            let depth = rng.random_range(PLAZA_BUILDING_FOOTPRINT.0..=PLAZA_BUILDING_FOOTPRINT.1);

            let position = center
                + right * (ix as f32 * p.building_spacing)
                + forward * (iz as f32 * p.building_spacing)
                + up * (height * 0.5);
            let spec = OrientedBox::new(position, right, forward, up, Vec3::new(width, depth, height));
            append_box(&mut mesh, &spec, Material::Building.index());
            buildings += 1;
        }
    }

    tracing::debug!("{} plaza: {} buildings", end.label(), buildings);
    mesh
}

/// Transverse wall closing one end of the road
///
/// The wall spans the base road width and stands on the end frame. Its
/// front face sits `offset` along the frame's forward axis and the wall
/// extends `thickness` back against forward, at either end.
pub fn build_boundary_wall(frame: &Frame, end: TrackEnd, config: &TrackConfig) -> MeshFragment {
    let wall = match end {
        TrackEnd::Start => &config.plazas.start_wall,
        TrackEnd::End => &config.plazas.end_wall,
    };
    let center = frame.position + frame.forward * (wall.offset - wall.thickness * 0.5)
        + frame.up * (wall.height * 0.5);

    let spec = OrientedBox::new(
        center,
        frame.right,
        frame.forward,
        frame.up,
        Vec3::new(config.road.width, wall.thickness, wall.height),
    );
    let material = Material::BoundaryWall.or_collision(wall.visible);
    let mut mesh = MeshFragment::with_capacity(8, 6);
    append_box(&mut mesh, &spec, material.index());
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::straight_frames;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_start_plaza_lies_behind_track() {
        let frames = straight_frames(20.0);
        let config = TrackConfig::default();
        let mesh = build_plaza(&frames[0], TrackEnd::Start, &config, &mut Pcg64::seed_from_u64(1));
        let start_x = frames[0].position.x;
        // Floor spans [start - length, start]
        let floor = &mesh.positions[..8];
        let min_x = floor.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = floor.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((max_x - start_x).abs() < 0.01);
        assert!((min_x - (start_x - config.plazas.length)).abs() < 0.01);
    }

    #[test]
    fn test_full_density_builds_perimeter_only() {
        let frames = straight_frames(20.0);
        let mut config = TrackConfig::default();
        config.plazas.building_density = 1.0;
        let last = frames.last().unwrap();
        let mesh = build_plaza(last, TrackEnd::End, &config, &mut Pcg64::seed_from_u64(1));

        // 120/20 = 6 -> ix in -3..=3; 80/20 = 4 -> iz in -2..=2
        // Interior: |ix| < 2 and |iz| < 1 -> 3 cells
        let cells = 7 * 5 - 3;
        assert_eq!(mesh.face_count(), 6 + cells * 6);
    }

    #[test]
    fn test_zero_density_floor_only() {
        let frames = straight_frames(20.0);
        let mut config = TrackConfig::default();
        config.plazas.building_density = 0.0;
        let mesh = build_plaza(&frames[0], TrackEnd::Start, &config, &mut Pcg64::seed_from_u64(1));
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_hidden_floor_is_collision() {
        let frames = straight_frames(20.0);
        let mut config = TrackConfig::default();
        config.plazas.floor_visible = false;
        config.plazas.building_density = 0.0;
        let mesh = build_plaza(&frames[0], TrackEnd::Start, &config, &mut Pcg64::seed_from_u64(1));
        assert!(mesh.faces.iter().all(|f| f.material == Material::Collision.index()));
    }

    #[test]
    fn test_boundary_walls() {
        let frames = straight_frames(20.0);
        let mut config = TrackConfig::default();
        config.plazas.end_wall.visible = false;

        let start = build_boundary_wall(&frames[0], TrackEnd::Start, &config);
        let end = build_boundary_wall(frames.last().unwrap(), TrackEnd::End, &config);
        assert_eq!(start.face_count(), 6);
        assert_eq!(start.faces[0].material, Material::BoundaryWall.index());
        assert_eq!(end.faces[0].material, Material::Collision.index());

        // Both walls end at their frame and extend back against forward
        assert!(start.positions.iter().all(|p| p.x <= frames[0].position.x + 1e-3));
        assert!(end.positions.iter().all(|p| p.x <= frames.last().unwrap().position.x + 1e-3));
        let span = start.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max) * 2.0;
        assert!((span - config.road.width).abs() < 0.01);
    }

    fn centroid(mesh: &MeshFragment) -> Vec3 {
        mesh.positions.iter().copied().sum::<Vec3>() / mesh.positions.len() as f32
    }

    #[test]
    fn test_end_wall_sits_on_the_track() {
        let frames = straight_frames(20.0);
        let last = frames.last().unwrap();
        let mut config = TrackConfig::default();

        for offset in [0.0, 3.0, -2.0] {
            config.plazas.end_wall.offset = offset;
            let wall = build_boundary_wall(last, TrackEnd::End, &config);
            let along = (centroid(&wall) - last.position).dot(last.forward);
            let expected = offset - config.plazas.end_wall.thickness * 0.5;
            assert!((along - expected).abs() < 1e-3, "offset {}: {} vs {}", offset, along, expected);
        }
    }

    #[test]
    fn test_start_wall_offset_follows_forward() {
        let frames = straight_frames(20.0);
        let mut config = TrackConfig::default();
        config.plazas.start_wall.offset = 4.0;
        let wall = build_boundary_wall(&frames[0], TrackEnd::Start, &config);
        let along = (centroid(&wall) - frames[0].position).dot(frames[0].forward);
        assert!((along - (4.0 - config.plazas.start_wall.thickness * 0.5)).abs() < 1e-3);
    }
}
