use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{
    cloth::ClothState,
    params::SimulationParameters,
    topology::SpringKind,
};

/// A force acting on cloth particles.
///
/// Generators are evaluated per particle (a gather), so evaluating every
/// particle concurrently never writes to shared state.
pub trait ForceGenerator: Send + Sync {
    fn force_on(&self, cloth: &ClothState, params: &SimulationParameters, index: usize) -> Vec3;
}

/// Hookean force on the particle at `position` from a spring attached to `other`.
///
/// Equal and opposite when the endpoints are swapped.
pub fn spring_force(position: Vec3, other: Vec3, rest_length: f32, stiffness: f32) -> Vec3 {
    let offset = other - position;
    let length = offset.length();
    if length < 1e-6 {
        return Vec3::ZERO;
    }
    offset * (stiffness * (length - rest_length) / length)
}

/// Uniform gravity, proportional to particle mass.
pub struct GravityForce;

impl ForceGenerator for GravityForce {
    fn force_on(&self, cloth: &ClothState, params: &SimulationParameters, _index: usize) -> Vec3 {
        params.gravity * cloth.particle_mass()
    }
}

/// Linear drag opposing the particle velocity.
pub struct DampingForce;

impl ForceGenerator for DampingForce {
    fn force_on(&self, cloth: &ClothState, params: &SimulationParameters, index: usize) -> Vec3 {
        -params.damping * cloth.particle_mass() * cloth.velocity[index]
    }
}

/// Wind shared evenly across particles, without any dependence on the surface normal.
pub struct WindForce;

impl ForceGenerator for WindForce {
    fn force_on(&self, cloth: &ClothState, params: &SimulationParameters, _index: usize) -> Vec3 {
        params.wind.total_force() / cloth.particle_count() as f32
    }
}

/// Structural, shear and bending springs of the grid, all sharing stiffness `K`.
pub struct SpringNetwork {
    kinds: Vec<SpringKind>,
}

impl Default for SpringNetwork {
    fn default() -> Self {
        Self {
            kinds: SpringKind::ALL.to_vec(),
        }
    }
}

impl SpringNetwork {
    /// Network restricted to the given spring kinds.
    pub fn only(kinds: &[SpringKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
        }
    }

    pub fn kinds(&self) -> &[SpringKind] {
        &self.kinds
    }
}

impl ForceGenerator for SpringNetwork {
    fn force_on(&self, cloth: &ClothState, params: &SimulationParameters, index: usize) -> Vec3 {
        let coord = cloth.coord(index);
        let position = cloth.position[index];
        let mut force = Vec3::ZERO;
        for &kind in &self.kinds {
            let rest_length = cloth.rest_spacing() * kind.rest_factor();
            for neighbor in cloth.neighbors(coord.ku, coord.kv, kind) {
                force += spring_force(position, cloth.position[neighbor], rest_length, params.stiffness);
            }
        }
        force
    }
}

/// Collection of forces evaluated on every particle each step.
pub struct ForceRegistry {
    forces: Vec<Box<dyn ForceGenerator>>,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self {
            forces: Vec::new(),
            parallel: false,
        }
    }

    /// Gravity, springs, damping and wind.
    pub fn cloth() -> Self {
        let mut registry = Self::new();
        registry.add_force(GravityForce);
        registry.add_force(SpringNetwork::default());
        registry.add_force(DampingForce);
        registry.add_force(WindForce);
        registry
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.push(Box::new(force));
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Enables the rayon gather when the `parallel` feature is compiled in.
    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    /// Net force on one particle.
    pub fn net_force(&self, cloth: &ClothState, params: &SimulationParameters, index: usize) -> Vec3 {
        self.forces
            .iter()
            .map(|force| force.force_on(cloth, params, index))
            .sum()
    }

    /// Overwrites `cloth.force` with the net force on every particle.
    ///
    /// Pinned particles get a force too; the integrator ignores it.
    pub fn compute(&self, cloth: &mut ClothState, params: &SimulationParameters) {
        let mut forces = std::mem::take(&mut cloth.force);
        forces.resize(cloth.particle_count(), Vec3::ZERO);
        let view: &ClothState = cloth;

        #[cfg(feature = "parallel")]
        if self.parallel {
            forces
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, force)| *force = self.net_force(view, params, index));
            cloth.force = forces;
            return;
        }

        for (index, force) in forces.iter_mut().enumerate() {
            *force = self.net_force(view, params, index);
        }
        cloth.force = forces;
    }
}
