//! Coupling between a live skeleton and the cloth constraints.
//!
//! The rig never sees a skeleton object: it reads a flat slice of joint
//! world positions and derives anchors and body proxies from it. Joint
//! indices follow the Mixamo humanoid hierarchy used by the character assets
//! (0 hips, 2/3 up legs, 5/6 legs, 11/12 shoulders, 16/17 arms, 23/24 forearms).

use std::ops::Range;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::shapes::{check_radius, GroundPlane};
use crate::core::{constraints::ConstraintSet, topology::GridCoord};
use crate::error::{ClothError, Result};

/// Cloth particle glued to a joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAnchor {
    pub coord: GridCoord,
    pub joint: usize,
}

/// Sphere centered on a joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSphere {
    pub joint: usize,
    pub radius: f32,
}

/// Capsule along the bone between two joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointCapsule {
    pub start_joint: usize,
    pub end_joint: usize,
    pub radius: f32,
}

/// Obstacles created by a refresh, for renderers that keep one proxy per obstacle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RigUpdate {
    pub new_spheres: Range<usize>,
    pub new_capsules: Range<usize>,
}

impl RigUpdate {
    pub fn created_any(&self) -> bool {
        !self.new_spheres.is_empty() || !self.new_capsules.is_empty()
    }
}

/// Which joints drive which constraints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyRig {
    pub anchors: Vec<JointAnchor>,
    pub spheres: Vec<JointSphere>,
    pub capsules: Vec<JointCapsule>,
    pub ground: Option<GroundPlane>,
}

impl BodyRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cape hanging from both arms of a Mixamo humanoid, with hips, shoulders,
    /// forearms and legs as obstacles and a floor at `y = 0`.
    pub fn humanoid_cape(sample_count: usize) -> Self {
        let last = sample_count.saturating_sub(1);
        let spheres = [
            (0, 0.20),
            (11, 0.05),
            (12, 0.05),
            (23, 0.05),
            (24, 0.05),
            (2, 0.15),
            (3, 0.15),
            (5, 0.10),
            (6, 0.10),
        ];
        let capsules = [((11, 23), 0.08), ((12, 24), 0.08), ((2, 5), 0.10), ((3, 6), 0.10)];

        Self::new()
            .with_anchor(0, 0, 17)
            .with_anchor(0, last, 16)
            .with_spheres(spheres.iter().map(|&(joint, radius)| JointSphere { joint, radius }))
            .with_capsules(capsules.iter().map(|&((start_joint, end_joint), radius)| JointCapsule {
                start_joint,
                end_joint,
                radius,
            }))
            .with_ground(GroundPlane::y_up(0.0))
    }

    pub fn with_anchor(mut self, ku: usize, kv: usize, joint: usize) -> Self {
        self.anchors.push(JointAnchor {
            coord: GridCoord::new(ku, kv),
            joint,
        });
        self
    }

    pub fn with_sphere(mut self, joint: usize, radius: f32) -> Self {
        self.spheres.push(JointSphere { joint, radius });
        self
    }

    pub fn with_capsule(mut self, start_joint: usize, end_joint: usize, radius: f32) -> Self {
        self.capsules.push(JointCapsule {
            start_joint,
            end_joint,
            radius,
        });
        self
    }

    pub fn with_spheres(mut self, spheres: impl IntoIterator<Item = JointSphere>) -> Self {
        self.spheres.extend(spheres);
        self
    }

    pub fn with_capsules(mut self, capsules: impl IntoIterator<Item = JointCapsule>) -> Self {
        self.capsules.extend(capsules);
        self
    }

    pub fn with_ground(mut self, ground: GroundPlane) -> Self {
        self.ground = Some(ground);
        self
    }

    /// Moves every anchor on the last column of a previous grid to the last column of a `sample_count` grid.
    pub fn retarget_anchors(&mut self, previous: usize, sample_count: usize) {
        let (old_last, new_last) = (previous.saturating_sub(1), sample_count.saturating_sub(1));
        for anchor in &mut self.anchors {
            if anchor.coord.ku == old_last {
                anchor.coord.ku = new_last;
            }
            if anchor.coord.kv == old_last {
                anchor.coord.kv = new_last;
            }
        }
    }

    /// Largest joint index referenced by the rig.
    pub fn max_joint(&self) -> Option<usize> {
        let anchors = self.anchors.iter().map(|a| a.joint);
        let spheres = self.spheres.iter().map(|s| s.joint);
        let capsules = self
            .capsules
            .iter()
            .flat_map(|c| [c.start_joint, c.end_joint]);
        anchors.chain(spheres).chain(capsules).max()
    }

    /// Checks anchors against a grid and radii for positivity.
    pub fn validate(&self, sample_count: usize) -> Result<()> {
        for anchor in &self.anchors {
            let GridCoord { ku, kv } = anchor.coord;
            if ku >= sample_count || kv >= sample_count {
                return Err(ClothError::CoordinateOutOfBounds { ku, kv, sample_count });
            }
        }
        self.check_radii()
    }

    fn check_radii(&self) -> Result<()> {
        let radii = self
            .spheres
            .iter()
            .map(|s| s.radius)
            .chain(self.capsules.iter().map(|c| c.radius));
        radii.map(check_radius).collect()
    }

    fn check_joints(&self, joints: &[Vec3]) -> Result<()> {
        match self.max_joint() {
            Some(index) if index >= joints.len() => Err(ClothError::JointOutOfRange {
                index,
                count: joints.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Derives a fresh constraint set from the current joint positions.
    pub fn derive(&self, joints: &[Vec3]) -> Result<ConstraintSet> {
        let mut constraints = ConstraintSet::new();
        self.refresh(joints, &mut constraints)?;
        Ok(constraints)
    }

    /// Re-derives `constraints` in place, keeping obstacle order and identity.
    ///
    /// Anchors are cleared and re-added; obstacle centers and endpoints are
    /// refreshed while radii stay as created. Nothing is touched when a
    /// joint index is out of range.
    pub fn refresh(&self, joints: &[Vec3], constraints: &mut ConstraintSet) -> Result<RigUpdate> {
        self.check_joints(joints)?;
        self.check_radii()?;

        constraints.clear();
        for anchor in &self.anchors {
            constraints.add_fixed_position(anchor.coord.ku, anchor.coord.kv, joints[anchor.joint]);
        }

        let spheres_before = constraints.spheres().len();
        let capsules_before = constraints.capsules().len();
        constraints.truncate_obstacles(self.spheres.len(), self.capsules.len());

        for (index, sphere) in self.spheres.iter().enumerate() {
            constraints.update_sphere(index, joints[sphere.joint], sphere.radius)?;
        }
        for (index, capsule) in self.capsules.iter().enumerate() {
            constraints.update_capsule(
                index,
                joints[capsule.start_joint],
                joints[capsule.end_joint],
                capsule.radius,
            )?;
        }
        constraints.ground = self.ground;

        Ok(RigUpdate {
            new_spheres: spheres_before.min(self.spheres.len())..self.spheres.len(),
            new_capsules: capsules_before.min(self.capsules.len())..self.capsules.len(),
        })
    }
}
