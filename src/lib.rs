//! Cape Sim – mass-spring cloth coupled to an animated character.
//!
//! A square particle grid is held together by structural, shear and bending
//! springs, pinned to skeleton joints, and pushed out of sphere and capsule
//! proxies of the body every step. The crate exposes the cloth state, the
//! force model, the constraint projection, and a per-frame driver tying them
//! to a stream of joint positions.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod rig;
pub mod utils;
pub mod world;

pub use glam::{Mat4, Vec3};

pub use collision::shapes::{CapsuleObstacle, GroundPlane, SphereObstacle};
pub use core::{
    cloth::{ClothLayout, ClothState},
    constraints::ConstraintSet,
    params::{SimulationParameters, Wind},
    topology::{GridCoord, Spring, SpringKind},
};
pub use dynamics::{
    divergence::{detect_divergence, DivergenceCause, DivergenceMonitor, DivergenceReport},
    forces::{
        spring_force, DampingForce, ForceGenerator, ForceRegistry, GravityForce, SpringNetwork,
        WindForce,
    },
    integrator::Integrator,
    solver::{ConstraintSolver, SolverStepMetrics},
};
pub use error::{ClothError, Result};
pub use rig::{BodyRig, JointAnchor, JointCapsule, JointSphere, RigUpdate};
pub use utils::{
    logging::{Diagnostics, DiagnosticsHandle},
    math::joint_translations,
};
pub use world::{ClothSimulation, SimulationStatus, StepOutcome};
