use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::cloth::ClothState;

/// Semi-implicit (symplectic) Euler integrator for the cloth particles.
///
/// One call is one pass; the driver decides how many passes make a frame.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    #[inline]
    fn integrate_particle(position: &mut Vec3, velocity: &mut Vec3, force: Vec3, inverse_mass: f32, dt: f32) {
        if inverse_mass == 0.0 {
            return;
        }
        *velocity += force * inverse_mass * dt;
        *position += *velocity * dt;
    }

    /// Advances velocity then position of every free particle from `cloth.force`.
    pub fn integrate(&self, cloth: &mut ClothState, dt: f32) {
        let ClothState {
            position,
            velocity,
            force,
            inverse_mass,
            ..
        } = cloth;

        #[cfg(feature = "parallel")]
        if self.parallel {
            position
                .par_iter_mut()
                .zip(velocity.par_iter_mut())
                .zip(force.par_iter().zip(inverse_mass.par_iter()))
                .for_each(|((p, v), (f, w))| Self::integrate_particle(p, v, *f, *w, dt));
            return;
        }

        for ((p, v), (f, w)) in position
            .iter_mut()
            .zip(velocity.iter_mut())
            .zip(force.iter().zip(inverse_mass.iter()))
        {
            Self::integrate_particle(p, v, *f, *w, dt);
        }
    }
}
