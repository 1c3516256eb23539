use glam::Vec3;

use crate::config::{DEFAULT_MAX_FORCE, DEFAULT_MAX_POSITION};
use crate::core::{cloth::ClothState, topology::GridCoord};

/// Why a particle was flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DivergenceCause {
    NonFinitePosition,
    NonFiniteVelocity,
    NonFiniteForce,
    PositionOutOfBounds(f32),
    VelocityOutOfBounds(f32),
    ForceOutOfBounds(f32),
}

/// First offending particle found by a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceReport {
    pub coord: GridCoord,
    pub cause: DivergenceCause,
}

impl std::fmt::Display for DivergenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (ku, kv) = (self.coord.ku, self.coord.kv);
        match self.cause {
            DivergenceCause::NonFinitePosition => write!(f, "non-finite position at ({ku}, {kv})"),
            DivergenceCause::NonFiniteVelocity => write!(f, "non-finite velocity at ({ku}, {kv})"),
            DivergenceCause::NonFiniteForce => write!(f, "non-finite force at ({ku}, {kv})"),
            DivergenceCause::PositionOutOfBounds(d) => {
                write!(f, "particle ({ku}, {kv}) is {d:.2} away from the origin")
            }
            DivergenceCause::VelocityOutOfBounds(s) => {
                write!(f, "particle ({ku}, {kv}) moves at {s:.2}")
            }
            DivergenceCause::ForceOutOfBounds(m) => {
                write!(f, "strong force magnitude {m:.2} on ({ku}, {kv})")
            }
        }
    }
}

/// Post-step scan for numerical blow-up.
///
/// Detection only: the state is never modified, so it can be inspected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceMonitor {
    pub max_position: f32,
    pub max_force: f32,
    pub max_velocity: Option<f32>,
}

impl Default for DivergenceMonitor {
    fn default() -> Self {
        Self {
            max_position: DEFAULT_MAX_POSITION,
            max_force: DEFAULT_MAX_FORCE,
            max_velocity: None,
        }
    }
}

impl DivergenceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = Some(max_velocity);
        self
    }

    pub fn detect(&self, cloth: &ClothState) -> Option<DivergenceReport> {
        let particles = cloth
            .position
            .iter()
            .zip(&cloth.velocity)
            .zip(&cloth.force)
            .enumerate();
        for (index, ((position, velocity), force)) in particles {
            if let Some(cause) = self.check(*position, *velocity, *force) {
                return Some(DivergenceReport {
                    coord: cloth.coord(index),
                    cause,
                });
            }
        }
        None
    }

    pub fn detect_divergence(&self, cloth: &ClothState) -> bool {
        self.detect(cloth).is_some()
    }

    fn check(&self, position: Vec3, velocity: Vec3, force: Vec3) -> Option<DivergenceCause> {
        if !position.is_finite() {
            return Some(DivergenceCause::NonFinitePosition);
        }
        if !velocity.is_finite() {
            return Some(DivergenceCause::NonFiniteVelocity);
        }
        if !force.is_finite() {
            return Some(DivergenceCause::NonFiniteForce);
        }
        let distance = position.length();
        if distance > self.max_position {
            return Some(DivergenceCause::PositionOutOfBounds(distance));
        }
        let magnitude = force.length();
        if magnitude > self.max_force {
            return Some(DivergenceCause::ForceOutOfBounds(magnitude));
        }
        match self.max_velocity {
            Some(limit) if velocity.length() > limit => {
                Some(DivergenceCause::VelocityOutOfBounds(velocity.length()))
            }
            _ => None,
        }
    }
}

/// Scan with the default thresholds.
pub fn detect_divergence(cloth: &ClothState) -> bool {
    DivergenceMonitor::default().detect_divergence(cloth)
}
