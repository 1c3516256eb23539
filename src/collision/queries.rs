use glam::Vec3;

/// Closest point to `point` on the segment `[start, end]`.
///
/// A zero-length segment collapses to `start`.
pub fn closest_point_on_segment(point: Vec3, start: Vec3, end: Vec3) -> Vec3 {
    let axis = end - start;
    let length_sq = axis.length_squared();
    if length_sq <= f32::EPSILON * f32::EPSILON {
        return start;
    }
    let t = ((point - start).dot(axis) / length_sq).clamp(0.0, 1.0);
    start + axis * t
}

/// Pushes `point` radially out of the ball `(center, radius)`.
///
/// Returns `None` when the point is already outside (distance >= radius).
/// A point sitting exactly on `center` is pushed along `fallback`.
pub fn project_outside(point: Vec3, center: Vec3, radius: f32, fallback: Vec3) -> Option<Vec3> {
    let offset = point - center;
    if offset.length_squared() >= radius * radius {
        return None;
    }
    let direction = offset.try_normalize().unwrap_or(fallback);
    Some(center + direction * radius)
}

/// Unit direction perpendicular to `axis`, or +Y when the axis is degenerate.
pub fn perpendicular_to(axis: Vec3) -> Vec3 {
    axis.try_normalize()
        .map(|unit| unit.any_orthonormal_vector())
        .unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let start = Vec3::ZERO;
        let end = Vec3::new(0.0, 0.0, 2.0);
        assert_eq!(closest_point_on_segment(Vec3::new(1.0, 0.0, -3.0), start, end), start);
        assert_eq!(closest_point_on_segment(Vec3::new(1.0, 0.0, 5.0), start, end), end);
        assert_eq!(
            closest_point_on_segment(Vec3::new(1.0, 0.0, 0.5), start, end),
            Vec3::new(0.0, 0.0, 0.5)
        );
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        let p = Vec3::splat(1.0);
        assert_eq!(closest_point_on_segment(Vec3::X, p, p), p);
    }

    #[test]
    fn projection_keeps_direction() {
        let projected = project_outside(Vec3::new(0.1, 0.0, 0.0), Vec3::ZERO, 0.5, Vec3::Z)
            .expect("point is inside");
        assert_abs_diff_eq!(projected.x, 0.5, epsilon = 1e-6);
        assert_eq!(projected.y, 0.0);
        assert_eq!(projected.z, 0.0);
    }

    #[test]
    fn projection_ignores_points_outside() {
        assert!(project_outside(Vec3::new(0.6, 0.0, 0.0), Vec3::ZERO, 0.5, Vec3::Z).is_none());
    }

    #[test]
    fn centered_point_uses_fallback() {
        let projected = project_outside(Vec3::ONE, Vec3::ONE, 0.25, Vec3::Z).expect("inside");
        assert_eq!(projected, Vec3::new(1.0, 1.0, 1.25));
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        let axis = Vec3::new(1.0, 2.0, 3.0);
        let perp = perpendicular_to(axis);
        assert_abs_diff_eq!(perp.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(perp.dot(axis), 0.0, epsilon = 1e-5);
        assert_eq!(perpendicular_to(Vec3::ZERO), Vec3::Y);
    }
}
