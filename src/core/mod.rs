//! Core types describing the cloth, its parameters, and the constraints binding it to the body.

pub mod cloth;
pub mod constraints;
pub mod params;
pub mod topology;

pub use cloth::{ClothLayout, ClothState};
pub use constraints::ConstraintSet;
pub use params::{SimulationParameters, Wind};
pub use topology::{GridCoord, Spring, SpringKind};
