//! Global configuration constants for the cape simulation.

/// Default gravity vector applied to every particle (Y-up, matching skeleton data).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 0.005;

/// Default spring stiffness shared by structural, shear and bending springs.
pub const DEFAULT_STIFFNESS: f32 = 5.0;

/// Default linear drag coefficient.
pub const DEFAULT_DAMPING: f32 = 10.0;

/// Default total mass of the cloth, spread evenly over all particles.
pub const DEFAULT_TOTAL_MASS: f32 = 1.0;

/// Default number of integration passes per rendered frame.
pub const DEFAULT_SUBSTEPS: u32 = 1;

/// Smallest supported number of samples along one cloth edge.
pub const MIN_SAMPLE_COUNT: usize = 4;

/// Largest supported number of samples along one cloth edge.
pub const MAX_SAMPLE_COUNT: usize = 80;

/// Samples per edge used when nothing else is requested.
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Per-particle force magnitude above which the state counts as diverged.
pub const DEFAULT_MAX_FORCE: f32 = 600.0;

/// Distance from the origin above which a particle counts as diverged.
pub const DEFAULT_MAX_POSITION: f32 = 1000.0;

/// Number of times a given warning is logged before it is suppressed.
pub const DEFAULT_MAX_WARNING_REPEATS: u32 = 4;

/// Range exposed by the parameter panel for the time step.
pub const TIME_STEP_RANGE: (f32, f32) = (0.0001, 0.02);

/// Range exposed by the parameter panel for the spring stiffness.
pub const STIFFNESS_RANGE: (f32, f32) = (0.2, 50.0);

/// Range exposed by the parameter panel for the damping coefficient.
pub const DAMPING_RANGE: (f32, f32) = (1.0, 30.0);

/// Range exposed by the parameter panel for the total cloth mass.
pub const MASS_RANGE: (f32, f32) = (0.2, 5.0);

/// Range exposed by the parameter panel for the wind magnitude.
pub const WIND_RANGE: (f32, f32) = (0.0, 60.0);
