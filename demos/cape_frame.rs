//! Drives a cape on a procedurally swaying skeleton and logs a summary.
//!
//! Run with `RUST_LOG=info cargo run --example cape_frame`.

use cape_sim::*;
use glam::Quat;

const FRAMES: u32 = 240;
const JOINT_COUNT: usize = 27;

/// Rest pose of the Mixamo joints used by the cape rig, Y-up, in metres.
fn rest_pose() -> Vec<Vec3> {
    let mut joints = vec![Vec3::new(0.0, 1.0, 0.0); JOINT_COUNT];
    joints[2] = Vec3::new(-0.1, 0.9, 0.0);
    joints[3] = Vec3::new(0.1, 0.9, 0.0);
    joints[5] = Vec3::new(-0.1, 0.5, 0.0);
    joints[6] = Vec3::new(0.1, 0.5, 0.0);
    joints[11] = Vec3::new(-0.2, 1.45, 0.0);
    joints[12] = Vec3::new(0.2, 1.45, 0.0);
    joints[16] = Vec3::new(0.25, 1.5, -0.12);
    joints[17] = Vec3::new(-0.25, 1.5, -0.12);
    joints[23] = Vec3::new(-0.45, 1.45, 0.0);
    joints[24] = Vec3::new(0.45, 1.45, 0.0);
    joints
}

/// Global joint frames of a character turning about the vertical axis.
fn global_frames(rest: &[Vec3], time: f32) -> Vec<Mat4> {
    let rotation = Quat::from_rotation_y(0.6 * (time * 1.5).sin());
    let sway = Vec3::new(0.2 * (time * 0.8).sin(), 0.0, 0.0);
    rest.iter()
        .map(|joint| Mat4::from_rotation_translation(rotation, rotation * *joint + sway))
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let params = SimulationParameters::default()
        .with_wind(Wind::new(8.0, Vec3::new(0.0, 0.2, -1.0)));
    let rest = rest_pose();
    let mut sim = ClothSimulation::new(config::DEFAULT_SAMPLE_COUNT, params)?
        .with_rig(BodyRig::humanoid_cape(config::DEFAULT_SAMPLE_COUNT))?;
    sim.set_parallel_enabled(true);
    sim.set_frame_budget(Some(16.0));

    for frame in 0..FRAMES {
        let time = frame as f32 * params.dt * 4.0;
        let joints = joint_translations(&global_frames(&rest, time));
        match sim.step_frame(&joints)? {
            StepOutcome::Advanced => {}
            StepOutcome::Diverged(report) => {
                log::error!("stopping at frame {frame}: {report}");
                break;
            }
            StepOutcome::Halted => break,
        }

        if frame % 60 == 0 {
            let lowest = sim
                .cloth
                .position
                .iter()
                .map(|p| p.y)
                .fold(f32::INFINITY, f32::min);
            log::info!(
                "frame {frame}: kinetic energy {:.4}, lowest point {lowest:.3}, {} corrections",
                sim.cloth.kinetic_energy(),
                sim.last_metrics().total_corrections()
            );
        }
    }

    log::info!(
        "finished {} frames with status {:?}",
        sim.frame_count(),
        sim.status()
    );
    Ok(())
}
