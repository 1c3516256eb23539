use std::time::{Duration, Instant};

use glam::Vec3;

use crate::{
    config::DEFAULT_SUBSTEPS,
    core::{
        cloth::{ClothLayout, ClothState},
        constraints::ConstraintSet,
        params::SimulationParameters,
    },
    dynamics::{
        divergence::{DivergenceMonitor, DivergenceReport},
        forces::ForceRegistry,
        integrator::Integrator,
        solver::{ConstraintSolver, SolverStepMetrics},
    },
    error::Result,
    rig::{BodyRig, RigUpdate},
    utils::{
        logging::{warn_if_frame_budget_exceeded, Diagnostics, DiagnosticsHandle, ScopedTimer},
        profiling::{PhaseTimer, StepProfiler},
    },
};

/// Whether the simulation may keep stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationStatus {
    Running,
    /// Stepping is suspended until [`ClothSimulation::resume`] or a reinitialization.
    Diverged(DivergenceReport),
}

/// Result of one frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Advanced,
    /// This frame produced a diverged state; it is left in place for inspection.
    Diverged(DivergenceReport),
    /// A previous divergence halted the simulation; nothing was stepped.
    Halted,
}

/// Per-frame driver: rig refresh, force/integrate/project sub-steps, divergence scan, normals.
pub struct ClothSimulation {
    pub cloth: ClothState,
    pub constraints: ConstraintSet,
    pub rig: BodyRig,
    pub forces: ForceRegistry,
    pub integrator: Integrator,
    pub solver: ConstraintSolver,
    pub monitor: DivergenceMonitor,
    parameters: SimulationParameters,
    layout: ClothLayout,
    substeps: u32,
    status: SimulationStatus,
    diagnostics: DiagnosticsHandle,
    profiler: StepProfiler,
    last_metrics: SolverStepMetrics,
    frame_budget_ms: Option<f32>,
    parallel_enabled: bool,
    frame_count: u64,
}

impl ClothSimulation {
    pub fn new(sample_count: usize, parameters: SimulationParameters) -> Result<Self> {
        parameters.validate()?;
        let layout = ClothLayout::default();
        let cloth = ClothState::with_layout(sample_count, &layout, parameters.mass_total)?;
        log::info!(
            "cloth initialized: {sample_count}x{sample_count} particles, dt = {}",
            parameters.dt
        );

        Ok(Self {
            cloth,
            constraints: ConstraintSet::new(),
            rig: BodyRig::new(),
            forces: ForceRegistry::cloth(),
            integrator: Integrator::new(),
            solver: ConstraintSolver::new(),
            monitor: DivergenceMonitor::default(),
            parameters,
            layout,
            substeps: DEFAULT_SUBSTEPS,
            status: SimulationStatus::Running,
            diagnostics: Diagnostics::shared(),
            profiler: StepProfiler::default(),
            last_metrics: SolverStepMetrics::default(),
            frame_budget_ms: None,
            parallel_enabled: false,
            frame_count: 0,
        })
    }

    /// Attaches a rig after checking it against the current grid.
    pub fn with_rig(mut self, rig: BodyRig) -> Result<Self> {
        rig.validate(self.cloth.sample_count())?;
        self.rig = rig;
        Ok(self)
    }

    /// Uses a session diagnostics instance owned by the caller.
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsHandle) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Rebuilds the cloth with a new layout, keeping the sample count.
    pub fn with_layout(mut self, layout: ClothLayout) -> Result<Self> {
        self.cloth =
            ClothState::with_layout(self.cloth.sample_count(), &layout, self.parameters.mass_total)?;
        self.layout = layout;
        Ok(self)
    }

    /// Destroys and rebuilds the whole grid in its flat rest configuration.
    ///
    /// Anchors are cleared, rig anchors on the last row/column follow the new
    /// edge, and a diverged status is reset.
    pub fn reinitialize(&mut self, sample_count: usize) -> Result<()> {
        let cloth = ClothState::with_layout(sample_count, &self.layout, self.parameters.mass_total)?;
        let mut rig = self.rig.clone();
        rig.retarget_anchors(self.cloth.sample_count(), sample_count);
        rig.validate(sample_count)?;

        self.cloth = cloth;
        self.rig = rig;
        self.constraints.clear();
        self.status = SimulationStatus::Running;
        self.last_metrics = SolverStepMetrics::default();
        log::info!("cloth reinitialized: {sample_count}x{sample_count} particles");
        Ok(())
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Replaces the parameters; rejected sets leave the current ones in place.
    pub fn set_parameters(&mut self, parameters: SimulationParameters) -> Result<()> {
        parameters.validate()?;
        self.cloth.set_total_mass(parameters.mass_total)?;
        self.parameters = parameters;
        Ok(())
    }

    pub fn substeps(&self) -> u32 {
        self.substeps
    }

    /// Number of force/integrate/project passes per frame (at least one).
    pub fn set_substeps(&mut self, substeps: u32) {
        self.substeps = substeps.max(1);
    }

    pub fn set_frame_budget(&mut self, budget_ms: Option<f32>) {
        self.frame_budget_ms = budget_ms;
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
        self.forces.set_parallel(enabled);
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.status, SimulationStatus::Diverged(_))
    }

    /// Allows stepping again after a divergence, without touching the state.
    pub fn resume(&mut self) {
        self.status = SimulationStatus::Running;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn diagnostics(&self) -> &DiagnosticsHandle {
        &self.diagnostics
    }

    pub fn profiler(&self) -> &StepProfiler {
        &self.profiler
    }

    /// Accumulated constraint metrics of the last stepped frame.
    pub fn last_metrics(&self) -> &SolverStepMetrics {
        &self.last_metrics
    }

    /// Re-derives anchors and obstacles from the joint world positions.
    pub fn update_constraints(&mut self, joints: &[Vec3]) -> Result<RigUpdate> {
        let update = self.rig.refresh(joints, &mut self.constraints)?;
        if update.created_any() {
            log::debug!(
                "rig created spheres {:?} and capsules {:?}",
                update.new_spheres,
                update.new_capsules
            );
        }
        Ok(update)
    }

    /// Refreshes the constraints from `joints`, then steps one frame.
    pub fn step_frame(&mut self, joints: &[Vec3]) -> Result<StepOutcome> {
        if self.is_halted() {
            return Ok(self.report_halted());
        }
        let start = Instant::now();
        self.update_constraints(joints)?;
        Ok(self.advance(start, start.elapsed()))
    }

    /// Steps one frame against the current constraint set.
    pub fn step(&mut self) -> StepOutcome {
        if self.is_halted() {
            return self.report_halted();
        }
        self.advance(Instant::now(), Duration::ZERO)
    }

    fn report_halted(&mut self) -> StepOutcome {
        self.diagnostics
            .lock()
            .warn("simulation-halted", "cloth diverged earlier; stepping skipped");
        StepOutcome::Halted
    }

    fn advance(&mut self, start: Instant, constraint_update_time: Duration) -> StepOutcome {
        let _frame_timer = ScopedTimer::new("cloth::frame");
        self.profiler.reset();
        self.profiler.constraint_update_time = constraint_update_time;
        self.profiler.particle_count = self.cloth.particle_count();
        self.profiler.substeps = self.substeps;

        let mut metrics = SolverStepMetrics::default();

        for _ in 0..self.substeps {
            {
                let _timer = PhaseTimer::new(&mut self.profiler.force_time);
                self.forces.compute(&mut self.cloth, &self.parameters);
            }
            {
                let _timer = PhaseTimer::new(&mut self.profiler.integrator_time);
                self.integrator.integrate(&mut self.cloth, self.parameters.dt);
            }
            {
                let _timer = PhaseTimer::new(&mut self.profiler.projection_time);
                let step_metrics = self.solver.apply(&mut self.cloth, &self.constraints);
                metrics.merge(&step_metrics);
            }
        }

        if !metrics.anchors_skipped.is_empty() {
            let detail = format!(
                "anchors {:?} lie outside the {}x{} cloth",
                metrics.anchors_skipped,
                self.cloth.sample_count(),
                self.cloth.sample_count()
            );
            self.diagnostics.lock().warn("anchor-outside-grid", &detail);
        }

        let report = {
            let _timer = PhaseTimer::new(&mut self.profiler.divergence_time);
            self.monitor.detect(&self.cloth)
        };

        {
            let _timer = PhaseTimer::new(&mut self.profiler.normal_time);
            self.cloth.update_normals();
        }

        self.frame_count += 1;
        self.profiler.corrections = metrics.total_corrections();
        self.last_metrics = metrics;
        self.profiler.total_frame_time = start.elapsed();
        self.profiler.report();
        if let Some(budget) = self.frame_budget_ms {
            warn_if_frame_budget_exceeded(self.profiler.total_frame_time, budget);
        }

        match report {
            Some(report) => {
                self.status = SimulationStatus::Diverged(report);
                self.diagnostics.lock().error(
                    "simulation-diverged",
                    &format!("{report} at frame {}; simulation stopped", self.frame_count),
                );
                StepOutcome::Diverged(report)
            }
            None => StepOutcome::Advanced,
        }
    }
}
