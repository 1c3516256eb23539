//! Simulation dynamics: force model, integration, constraint projection, and divergence monitoring.

pub mod divergence;
pub mod forces;
pub mod integrator;
pub mod solver;

pub use divergence::{detect_divergence, DivergenceCause, DivergenceMonitor, DivergenceReport};
pub use forces::{
    spring_force, DampingForce, ForceGenerator, ForceRegistry, GravityForce, SpringNetwork, WindForce,
};
pub use integrator::Integrator;
pub use solver::{ConstraintSolver, SolverStepMetrics};
