use glam::Vec3;

use crate::core::{cloth::ClothState, constraints::ConstraintSet, topology::GridCoord};

/// Counters describing what one constraint pass changed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SolverStepMetrics {
    pub anchors_applied: usize,
    /// Anchors whose coordinate lies outside the current grid.
    pub anchors_skipped: Vec<GridCoord>,
    pub sphere_corrections: usize,
    pub capsule_corrections: usize,
    pub ground_corrections: usize,
    /// Sum of the lengths of all obstacle corrections.
    pub correction_distance: f32,
}

impl SolverStepMetrics {
    pub fn total_corrections(&self) -> usize {
        self.sphere_corrections + self.capsule_corrections + self.ground_corrections
    }

    pub fn merge(&mut self, other: &Self) {
        self.anchors_applied += other.anchors_applied;
        for coord in &other.anchors_skipped {
            if !self.anchors_skipped.contains(coord) {
                self.anchors_skipped.push(*coord);
            }
        }
        self.sphere_corrections += other.sphere_corrections;
        self.capsule_corrections += other.capsule_corrections;
        self.ground_corrections += other.ground_corrections;
        self.correction_distance += other.correction_distance;
    }
}

/// Projects integrated particles back onto the feasible set.
///
/// Single sequential pass: anchors, then spheres, then capsules, then the
/// ground. Overlapping obstacles are resolved in list order, so a particle
/// pushed out of one may remain inside another until a later step.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSolver;

impl ConstraintSolver {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, cloth: &mut ClothState, constraints: &ConstraintSet) -> SolverStepMetrics {
        let mut metrics = SolverStepMetrics::default();

        cloth.release_pins();
        for (coord, target) in constraints.anchors() {
            match cloth.index(coord.ku, coord.kv) {
                Some(index) => {
                    cloth.pin(index, target);
                    metrics.anchors_applied += 1;
                }
                None => metrics.anchors_skipped.push(coord),
            }
        }

        let ClothState {
            position,
            inverse_mass,
            ..
        } = cloth;

        for (point, &w) in position.iter_mut().zip(inverse_mass.iter()) {
            // anchors are body-attached ground truth
            if w == 0.0 {
                continue;
            }
            for sphere in constraints.spheres() {
                if let Some(corrected) = sphere.project(*point) {
                    Self::record(&mut metrics.correction_distance, point, corrected);
                    metrics.sphere_corrections += 1;
                }
            }
            for capsule in constraints.capsules() {
                if let Some(corrected) = capsule.project(*point) {
                    Self::record(&mut metrics.correction_distance, point, corrected);
                    metrics.capsule_corrections += 1;
                }
            }
            if let Some(corrected) = constraints.ground.and_then(|ground| ground.project(*point)) {
                Self::record(&mut metrics.correction_distance, point, corrected);
                metrics.ground_corrections += 1;
            }
        }

        metrics
    }

    #[inline]
    fn record(distance: &mut f32, point: &mut Vec3, corrected: Vec3) {
        *distance += point.distance(corrected);
        *point = corrected;
    }
}
