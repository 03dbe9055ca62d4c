//! Material slots
//!
//! Every face carries the index of one of these slots. The slot order is
//! fixed so the index written into a face is stable across runs.

use crate::config::MaterialsConfig;

/// Material slot assigned to generated faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Road,
    Barrier,
    BuildPad,
    Building,
    Obstacle,
    PlazaFloor,
    BoundaryWall,
    Tunnel,
    /// Invisible collision-only surface
    Collision,
}

impl Material {
    /// All slots in index order
    pub const ALL: [Material; 9] = [
        Material::Road,
        Material::Barrier,
        Material::BuildPad,
        Material::Building,
        Material::Obstacle,
        Material::PlazaFloor,
        Material::BoundaryWall,
        Material::Tunnel,
        Material::Collision,
    ];

    /// Face material index for this slot
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Material::Road => "mat_road",
            Material::Barrier => "mat_barrier",
            Material::BuildPad => "mat_buildpad",
            Material::Building => "mat_building",
            Material::Obstacle => "mat_obstacle",
            Material::PlazaFloor => "mat_plaza_floor",
            Material::BoundaryWall => "mat_boundary_wall",
            Material::Tunnel => "mat_tunnel",
            Material::Collision => "mat_collision",
        }
    }

    /// Pick `self` when the feature is visible, otherwise the collision slot
    pub fn or_collision(self, visible: bool) -> Self {
        if visible { self } else { Material::Collision }
    }
}

/// Resolved appearance of one slot
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDef {
    pub material: Material,
    /// Linear RGBA
    pub color: [f32; 4],
    pub visible: bool,
}

/// Appearance of every slot, indexed by [`Material::index`]
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTable {
    defs: Vec<MaterialDef>,
}

impl MaterialTable {
    pub fn from_config(config: &MaterialsConfig) -> Self {
        let defs = Material::ALL
            .iter()
            .map(|&material| {
                let color = match material {
                    Material::Road => config.road,
                    Material::Barrier => config.barrier,
                    Material::BuildPad => config.build_pad,
                    Material::Building => config.building,
                    Material::Obstacle => config.obstacle,
                    Material::PlazaFloor => config.plaza_floor,
                    Material::BoundaryWall => config.boundary_wall,
                    Material::Tunnel => config.tunnel,
                    Material::Collision => [0.0, 0.0, 0.0, 0.0],
                };
                MaterialDef {
                    material,
                    color,
                    visible: material != Material::Collision && color[3] > 0.0,
                }
            })
            .collect();

        Self { defs }
    }

    pub fn get(&self, index: u32) -> Option<&MaterialDef> {
        self.defs.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::from_config(&MaterialsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_slot_order() {
        for (slot, material) in Material::ALL.into_iter().enumerate() {
            assert_eq!(material.index() as usize, slot);
        }
    }

    #[test]
    fn test_collision_slot_is_invisible() {
        let table = MaterialTable::default();
        let collision = table.get(Material::Collision.index()).unwrap();
        assert!(!collision.visible);
        assert!(table.get(Material::Road.index()).unwrap().visible);
    }

    #[test]
    fn test_or_collision() {
        assert_eq!(Material::Tunnel.or_collision(true), Material::Tunnel);
        assert_eq!(Material::Tunnel.or_collision(false), Material::Collision);
    }

    #[test]
    fn test_custom_color() {
        let config = MaterialsConfig {
            road: [1.0, 0.0, 0.0, 1.0],
            ..Default::default()
        };
        let table = MaterialTable::from_config(&config);
        assert_eq!(table.get(0).unwrap().color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(table.len(), Material::ALL.len());
    }
}
