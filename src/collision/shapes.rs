use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::queries::{closest_point_on_segment, perpendicular_to, project_outside};
use crate::error::{ClothError, Result};

/// Rejects radii that are not positive and finite.
pub fn check_radius(radius: f32) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ClothError::InvalidRadius(radius))
    }
}

/// Spherical body proxy the cloth must stay outside of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereObstacle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Corrected position for a particle inside the sphere, `None` otherwise.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        project_outside(point, self.center, self.radius, Vec3::Y)
    }

    pub fn distance(&self, point: Vec3) -> f32 {
        point.distance(self.center)
    }
}

/// Capsule (swept sphere along a bone segment) body proxy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleObstacle {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl CapsuleObstacle {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        closest_point_on_segment(point, self.start, self.end)
    }

    /// Pushes a particle out radially from the closest point on the bone segment.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let anchor = self.closest_point(point);
        project_outside(point, anchor, self.radius, perpendicular_to(self.end - self.start))
    }

    /// Distance from `point` to the bone segment.
    pub fn distance(&self, point: Vec3) -> f32 {
        point.distance(self.closest_point(point))
    }
}

/// Half-space floor: particles must satisfy `dot(p, normal) >= height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    pub normal: Vec3,
    pub height: f32,
}

impl GroundPlane {
    pub fn new(normal: Vec3, height: f32) -> Self {
        Self {
            normal: normal.normalize_or(Vec3::Y),
            height,
        }
    }

    /// Horizontal floor at `height` along +Y.
    pub fn y_up(height: f32) -> Self {
        Self::new(Vec3::Y, height)
    }

    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let elevation = point.dot(self.normal);
        (elevation < self.height).then(|| point + self.normal * (self.height - elevation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn capsule_pushes_out_perpendicular_to_bone() {
        let capsule = CapsuleObstacle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0.1);
        let projected = capsule
            .project(Vec3::new(0.05, 0.0, 0.5))
            .expect("point is inside the capsule");
        assert_abs_diff_eq!(projected.x, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn capsule_caps_are_round() {
        let capsule = CapsuleObstacle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0.2);
        let projected = capsule
            .project(Vec3::new(0.0, 0.0, 1.1))
            .expect("point is inside the end cap");
        assert_abs_diff_eq!(projected.z, 1.2, epsilon = 1e-6);
        assert!(capsule.project(Vec3::new(0.0, 0.0, 1.3)).is_none());
    }

    #[test]
    fn point_on_bone_axis_gets_pushed_sideways() {
        let capsule = CapsuleObstacle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0.1);
        let projected = capsule.project(Vec3::new(0.0, 0.0, 0.5)).expect("inside");
        assert_abs_diff_eq!(capsule.distance(projected), 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(projected.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn radius_must_be_positive_and_finite() {
        assert!(check_radius(0.05).is_ok());
        assert_eq!(check_radius(0.0), Err(ClothError::InvalidRadius(0.0)));
        assert_eq!(check_radius(-0.2), Err(ClothError::InvalidRadius(-0.2)));
        assert!(check_radius(f32::NAN).is_err());
    }

    #[test]
    fn ground_lifts_points_below() {
        let ground = GroundPlane::y_up(0.0);
        assert_eq!(ground.project(Vec3::new(1.0, -0.3, 2.0)), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(ground.project(Vec3::new(1.0, 0.3, 2.0)), None);
    }
}
