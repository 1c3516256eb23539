use std::time::{Duration, Instant};

/// Per-frame timing of the simulation phases.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub constraint_update_time: Duration,
    pub force_time: Duration,
    pub integrator_time: Duration,
    pub projection_time: Duration,
    pub divergence_time: Duration,
    pub normal_time: Duration,
    pub total_frame_time: Duration,

    pub particle_count: usize,
    pub substeps: u32,
    pub corrections: usize,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_frame_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        let line = |label: &str, phase: Duration| {
            log::debug!(
                "  {label:<18} {:.3} ms ({:.1}%)",
                phase.as_secs_f32() * 1000.0,
                (phase.as_micros() as f32 / total_us) * 100.0
            );
        };

        log::debug!(
            "cloth frame: {:.3} ms, {} particles, {} substeps, {} corrections",
            self.total_frame_time.as_secs_f32() * 1000.0,
            self.particle_count,
            self.substeps,
            self.corrections
        );
        line("constraint update", self.constraint_update_time);
        line("forces", self.force_time);
        line("integration", self.integrator_time);
        line("projection", self.projection_time);
        line("divergence", self.divergence_time);
        line("normals", self.normal_time);
    }
}

/// Adds the lifetime of the guard to a phase duration.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
