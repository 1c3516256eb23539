use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{
    DAMPING_RANGE, DEFAULT_DAMPING, DEFAULT_GRAVITY, DEFAULT_STIFFNESS, DEFAULT_TIME_STEP,
    DEFAULT_TOTAL_MASS, MASS_RANGE, STIFFNESS_RANGE, TIME_STEP_RANGE, WIND_RANGE,
};
use crate::error::{ClothError, Result};

/// Uniform wind pushing on the whole cloth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    /// Total force magnitude spread over the cloth.
    pub magnitude: f32,
    /// Direction of the wind; normalized when applied.
    pub direction: Vec3,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            magnitude: 0.0,
            direction: Vec3::Y,
        }
    }
}

impl Wind {
    pub fn new(magnitude: f32, direction: Vec3) -> Self {
        Self {
            magnitude,
            direction,
        }
    }

    /// Total wind force acting on the cloth.
    pub fn total_force(&self) -> Vec3 {
        self.direction.normalize_or_zero() * self.magnitude
    }
}

/// Tunable parameters read by every simulation step.
///
/// These are usually edited live from a parameter panel, so the driver
/// validates them before accepting a new set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Integration time step in seconds.
    pub dt: f32,
    /// Spring stiffness `K`.
    pub stiffness: f32,
    /// Linear drag coefficient `mu`.
    pub damping: f32,
    /// Total cloth mass.
    pub mass_total: f32,
    pub wind: Wind,
    pub gravity: Vec3,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            dt: DEFAULT_TIME_STEP,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            mass_total: DEFAULT_TOTAL_MASS,
            wind: Wind::default(),
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
        }
    }
}

impl SimulationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_step(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_mass(mut self, mass_total: f32) -> Self {
        self.mass_total = mass_total;
        self
    }

    pub fn with_wind(mut self, wind: Wind) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Checks the positivity and finiteness expectations of every field.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ClothError::InvalidTimeStep(self.dt));
        }
        if !(self.mass_total.is_finite() && self.mass_total > 0.0) {
            return Err(ClothError::InvalidMass(self.mass_total));
        }
        if !(self.stiffness.is_finite() && self.stiffness >= 0.0) {
            return Err(ClothError::InvalidStiffness(self.stiffness));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(ClothError::InvalidDamping(self.damping));
        }
        if !(self.wind.magnitude.is_finite() && self.wind.direction.is_finite()) {
            return Err(ClothError::InvalidWind);
        }
        if !self.gravity.is_finite() {
            return Err(ClothError::InvalidGravity);
        }
        Ok(())
    }

    /// Returns a copy clamped into the ranges offered by the parameter panel.
    pub fn clamped(&self) -> Self {
        let clamp = |value: f32, (lo, hi): (f32, f32)| value.clamp(lo, hi);
        Self {
            dt: clamp(self.dt, TIME_STEP_RANGE),
            stiffness: clamp(self.stiffness, STIFFNESS_RANGE),
            damping: clamp(self.damping, DAMPING_RANGE),
            mass_total: clamp(self.mass_total, MASS_RANGE),
            wind: Wind {
                magnitude: clamp(self.wind.magnitude, WIND_RANGE),
                direction: self.wind.direction,
            },
            gravity: self.gravity,
        }
    }
}
