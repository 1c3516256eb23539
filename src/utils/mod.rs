//! Utility helpers: math extensions, logging and diagnostics, profiling.

pub mod logging;
pub mod math;
pub mod profiling;

pub use logging::{Diagnostics, DiagnosticsHandle, ScopedTimer};
pub use math::*;
pub use profiling::{PhaseTimer, StepProfiler};
