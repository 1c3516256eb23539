use std::collections::BTreeMap;

use glam::Vec3;

use super::topology::GridCoord;
use crate::collision::shapes::{check_radius, CapsuleObstacle, GroundPlane, SphereObstacle};
use crate::error::{ClothError, Result};

/// Per-frame constraints coupling the cloth to the body, all in world space.
///
/// Anchors are cleared and re-added every frame. Obstacle lists keep their
/// order across frames so renderers can track proxies by index.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    fixed: BTreeMap<GridCoord, Vec3>,
    spheres: Vec<SphereObstacle>,
    capsules: Vec<CapsuleObstacle>,
    pub ground: Option<GroundPlane>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every fixed anchor. Obstacles are refreshed in place instead.
    pub fn clear(&mut self) {
        self.fixed.clear();
    }

    /// Drops anchors and obstacles alike.
    pub fn clear_all(&mut self) {
        self.fixed.clear();
        self.spheres.clear();
        self.capsules.clear();
    }

    pub fn add_fixed_position(&mut self, ku: usize, kv: usize, position: Vec3) {
        self.fixed.insert(GridCoord::new(ku, kv), position);
    }

    pub fn remove_fixed_position(&mut self, ku: usize, kv: usize) -> Option<Vec3> {
        self.fixed.remove(&GridCoord::new(ku, kv))
    }

    pub fn anchor(&self, ku: usize, kv: usize) -> Option<Vec3> {
        self.fixed.get(&GridCoord::new(ku, kv)).copied()
    }

    pub fn anchors(&self) -> impl Iterator<Item = (GridCoord, Vec3)> + '_ {
        self.fixed.iter().map(|(coord, position)| (*coord, *position))
    }

    pub fn anchor_count(&self) -> usize {
        self.fixed.len()
    }

    /// Appends a sphere and returns its index.
    pub fn add_sphere(&mut self, sphere: SphereObstacle) -> Result<usize> {
        check_radius(sphere.radius)?;
        self.spheres.push(sphere);
        Ok(self.spheres.len() - 1)
    }

    /// Appends a capsule and returns its index.
    pub fn add_capsule(&mut self, capsule: CapsuleObstacle) -> Result<usize> {
        check_radius(capsule.radius)?;
        self.capsules.push(capsule);
        Ok(self.capsules.len() - 1)
    }

    /// Refreshes sphere `index`, appending it when `index == len`.
    ///
    /// An existing sphere keeps the radius it was created with.
    /// Returns `true` when a new sphere was created.
    pub fn update_sphere(&mut self, index: usize, center: Vec3, radius: f32) -> Result<bool> {
        check_radius(radius)?;
        let len = self.spheres.len();
        match self.spheres.get_mut(index) {
            Some(sphere) => {
                sphere.center = center;
                Ok(false)
            }
            None if index == len => {
                self.spheres.push(SphereObstacle::new(center, radius));
                Ok(true)
            }
            None => Err(ClothError::ObstacleOutOfOrder { index, len }),
        }
    }

    /// Refreshes capsule `index`, appending it when `index == len`.
    pub fn update_capsule(
        &mut self,
        index: usize,
        start: Vec3,
        end: Vec3,
        radius: f32,
    ) -> Result<bool> {
        check_radius(radius)?;
        let len = self.capsules.len();
        match self.capsules.get_mut(index) {
            Some(capsule) => {
                capsule.start = start;
                capsule.end = end;
                Ok(false)
            }
            None if index == len => {
                self.capsules.push(CapsuleObstacle::new(start, end, radius));
                Ok(true)
            }
            None => Err(ClothError::ObstacleOutOfOrder { index, len }),
        }
    }

    pub fn truncate_obstacles(&mut self, spheres: usize, capsules: usize) {
        self.spheres.truncate(spheres);
        self.capsules.truncate(capsules);
    }

    pub fn spheres(&self) -> &[SphereObstacle] {
        &self.spheres
    }

    pub fn capsules(&self) -> &[CapsuleObstacle] {
        &self.capsules
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.spheres.is_empty() && self.capsules.is_empty() && self.ground.is_none()
    }
}
