use cape_sim::*;

const EPS: f32 = 1e-5;

fn pinned_square() -> ClothSimulation {
    let params = SimulationParameters::default()
        .with_time_step(0.01)
        .with_stiffness(10.0);
    let mut sim = ClothSimulation::new(4, params).unwrap();
    sim.constraints.add_fixed_position(0, 0, Vec3::new(-0.5, 0.0, 0.0));
    sim.constraints.add_fixed_position(0, 3, Vec3::new(0.5, 0.0, 0.0));
    sim
}

/// Synthetic Y-up T-pose skeleton with the 27 Mixamo joints, hips at 1 m.
fn skeleton(offset: Vec3) -> Vec<Vec3> {
    let mut joints = vec![Vec3::new(0.0, 1.0, 0.0); 27];
    joints[2] = Vec3::new(-0.1, 0.9, 0.0);
    joints[3] = Vec3::new(0.1, 0.9, 0.0);
    joints[5] = Vec3::new(-0.1, 0.5, 0.0);
    joints[6] = Vec3::new(0.1, 0.5, 0.0);
    joints[11] = Vec3::new(-0.2, 1.45, 0.0);
    joints[12] = Vec3::new(0.2, 1.45, 0.0);
    joints[16] = Vec3::new(0.25, 1.5, -0.15);
    joints[17] = Vec3::new(-0.25, 1.5, -0.15);
    joints[23] = Vec3::new(-0.45, 1.45, 0.0);
    joints[24] = Vec3::new(0.45, 1.45, 0.0);
    joints.iter().map(|j| *j + offset).collect()
}

#[test]
fn test_pinned_square_sags_without_diverging() {
    let mut sim = pinned_square();
    let left = Vec3::new(-0.5, 0.0, 0.0);
    let right = Vec3::new(0.5, 0.0, 0.0);

    for _ in 0..100 {
        assert_eq!(sim.step(), StepOutcome::Advanced);
        assert_eq!(sim.cloth.position_at(0, 0), Some(left));
        assert_eq!(sim.cloth.position_at(0, 3), Some(right));
    }

    assert_eq!(sim.frame_count(), 100);
    assert_eq!(sim.status(), SimulationStatus::Running);
    assert!(sim.cloth.position.iter().all(|p| p.is_finite()));

    let a = sim.cloth.position_at(0, 1).unwrap();
    let b = sim.cloth.position_at(0, 2).unwrap();
    assert!(a.y < 0.0 && b.y < 0.0, "top edge should sag: {a} {b}");
    assert!((a.y - b.y).abs() < 1e-3);
    assert!((a.x + b.x).abs() < 1e-3);
    assert!(sim.cloth.position_at(3, 1).unwrap().y < a.y);
    assert!(sim.cloth.kinetic_energy() < 0.1);
}

#[test]
fn test_free_fall_without_constraints() {
    let params = SimulationParameters::default().with_damping(0.0);
    let mut sim = ClothSimulation::new(5, params).unwrap();
    let dt = params.dt;
    let start = sim.cloth.position.clone();

    for _ in 0..10 {
        sim.step();
    }

    // symplectic Euler: sum_{k=1..10} k * g * dt^2
    let expected_drop = 9.81 * dt * dt * 55.0;
    for (now, before) in sim.cloth.position.iter().zip(&start) {
        assert!(((before.y - now.y) - expected_drop).abs() < 1e-4);
        assert_eq!(now.z, before.z);
    }
}

#[test]
fn test_step_frame_tracks_skeleton() {
    let rig = BodyRig::humanoid_cape(10);
    let mut sim = ClothSimulation::new(10, SimulationParameters::default())
        .unwrap()
        .with_rig(rig)
        .unwrap();

    let frame_joints = |frame: u32| skeleton(Vec3::new(frame as f32 * 0.01, 0.0, 0.0));
    for frame in 0..20 {
        let joints = frame_joints(frame);
        let outcome = sim.step_frame(&joints).unwrap();
        assert_eq!(outcome, StepOutcome::Advanced);

        assert_eq!(sim.cloth.position_at(0, 0), Some(joints[17]));
        assert_eq!(sim.cloth.position_at(0, 9), Some(joints[16]));
        for (index, position) in sim.cloth.position.iter().enumerate() {
            if !sim.cloth.is_pinned(index) {
                assert!(position.y >= -EPS, "particle {index} below the floor");
            }
        }
    }

    assert_eq!(sim.constraints.spheres().len(), 9);
    assert_eq!(sim.constraints.capsules().len(), 4);
    assert_eq!(sim.constraints.spheres()[0].center, frame_joints(19)[0]);
    assert_eq!(sim.last_metrics().anchors_applied, 2);
}

#[test]
fn test_cape_hangs_down_from_the_arms() {
    let mut sim = ClothSimulation::new(8, SimulationParameters::default())
        .unwrap()
        .with_layout(ClothLayout {
            origin: Vec3::new(-0.25, 1.5, -0.15),
            edge_length: 0.5,
            ..ClothLayout::default()
        })
        .unwrap()
        .with_rig(BodyRig::humanoid_cape(8))
        .unwrap();
    let joints = skeleton(Vec3::ZERO);

    for _ in 0..50 {
        assert_eq!(sim.step_frame(&joints).unwrap(), StepOutcome::Advanced);
    }

    // free hem stays below the arms and above the floor
    for kv in 0..8 {
        let hem = sim.cloth.position_at(7, kv).unwrap();
        assert!(hem.y < 1.5 && hem.y > 0.0, "hem {kv} at {hem}");
    }
    assert_eq!(sim.last_metrics().ground_corrections, 0);
}

#[test]
fn test_short_skeleton_is_rejected() {
    let mut sim = ClothSimulation::new(10, SimulationParameters::default())
        .unwrap()
        .with_rig(BodyRig::humanoid_cape(10))
        .unwrap();
    let joints = vec![Vec3::ZERO; 12];

    let err = sim.step_frame(&joints).unwrap_err();

    assert_eq!(err, ClothError::JointOutOfRange { index: 24, count: 12 });
    assert_eq!(sim.frame_count(), 0);
}

#[test]
fn test_rig_update_reports_new_obstacles() {
    let mut sim = ClothSimulation::new(10, SimulationParameters::default())
        .unwrap()
        .with_rig(BodyRig::humanoid_cape(10))
        .unwrap();
    let joints = skeleton(Vec3::ZERO);

    let first = sim.update_constraints(&joints).unwrap();
    assert_eq!(first.new_spheres, 0..9);
    assert_eq!(first.new_capsules, 0..4);
    assert!(!sim.update_constraints(&joints).unwrap().created_any());
}

#[test]
fn test_rig_anchor_outside_grid_is_rejected() {
    let sim = ClothSimulation::new(4, SimulationParameters::default()).unwrap();
    let err = sim
        .with_rig(BodyRig::new().with_anchor(0, 9, 16))
        .err()
        .unwrap();
    assert_eq!(
        err,
        ClothError::CoordinateOutOfBounds {
            ku: 0,
            kv: 9,
            sample_count: 4
        }
    );
}

#[test]
fn test_stale_anchor_is_skipped_and_warned() {
    let mut sim = pinned_square();
    sim.constraints.add_fixed_position(7, 7, Vec3::ZERO);

    assert_eq!(sim.step(), StepOutcome::Advanced);

    assert_eq!(sim.last_metrics().anchors_skipped, vec![GridCoord::new(7, 7)]);
    assert_eq!(sim.diagnostics().lock().count("anchor-outside-grid"), 1);
}

#[test]
fn test_divergence_halts_until_reinitialized() {
    let mut sim = pinned_square();
    sim.cloth.position[10] = Vec3::new(5000.0, 0.0, 0.0);

    let outcome = sim.step();
    assert!(matches!(outcome, StepOutcome::Diverged(_)));
    assert!(sim.is_halted());
    assert_eq!(sim.diagnostics().lock().count("simulation-diverged"), 1);

    let frozen = sim.cloth.position.clone();
    for _ in 0..6 {
        assert_eq!(sim.step(), StepOutcome::Halted);
    }
    assert_eq!(sim.cloth.position, frozen);
    assert_eq!(sim.frame_count(), 1);
    assert_eq!(sim.diagnostics().lock().count("simulation-halted"), 6);

    sim.reinitialize(4).unwrap();
    assert_eq!(sim.status(), SimulationStatus::Running);
    assert_eq!(sim.constraints.anchor_count(), 0);
    assert_eq!(sim.step(), StepOutcome::Advanced);
}

#[test]
fn test_resume_keeps_diverged_state() {
    let mut sim = pinned_square();
    sim.cloth.position[10] = Vec3::new(5000.0, 0.0, 0.0);
    sim.step();
    assert!(sim.is_halted());

    sim.resume();
    assert!(!sim.is_halted());
    assert!(matches!(sim.step(), StepOutcome::Diverged(_)));
}

#[test]
fn test_reinitialize_retargets_rig_anchors() {
    let mut sim = ClothSimulation::new(20, SimulationParameters::default())
        .unwrap()
        .with_rig(BodyRig::humanoid_cape(20))
        .unwrap();
    sim.step_frame(&skeleton(Vec3::ZERO)).unwrap();

    sim.reinitialize(8).unwrap();

    assert_eq!(sim.cloth.sample_count(), 8);
    assert_eq!(sim.cloth.particle_count(), 64);
    assert_eq!(sim.rig.anchors[1].coord, GridCoord::new(0, 7));
    let joints = skeleton(Vec3::ZERO);
    sim.step_frame(&joints).unwrap();
    assert_eq!(sim.cloth.position_at(0, 7), Some(joints[16]));
}

#[test]
fn test_reinitialize_with_bad_count_keeps_cloth() {
    let mut sim = pinned_square();
    let err = sim.reinitialize(100).unwrap_err();
    assert!(matches!(err, ClothError::InvalidSampleCount { requested: 100, .. }));
    assert_eq!(sim.cloth.sample_count(), 4);
    assert_eq!(sim.constraints.anchor_count(), 2);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let mut sim = pinned_square();
    let before = *sim.parameters();

    let err = sim
        .set_parameters(SimulationParameters::default().with_time_step(-0.01))
        .unwrap_err();

    assert_eq!(err, ClothError::InvalidTimeStep(-0.01));
    assert_eq!(*sim.parameters(), before);
    assert!(ClothSimulation::new(4, SimulationParameters::default().with_mass(0.0)).is_err());
}

#[test]
fn test_mass_change_applies_without_rebuild() {
    let mut sim = pinned_square();
    sim.set_parameters(sim.parameters().with_mass(4.0)).unwrap();
    assert!((sim.cloth.particle_mass() - 0.25).abs() < EPS);

    sim.step();
    assert!((sim.cloth.particle_mass() - 0.25).abs() < EPS);
    assert_eq!(sim.cloth.inverse_mass[0], 0.0);
}

#[test]
fn test_rejected_mass_keeps_particle_mass() {
    let mut sim = pinned_square();
    let before = sim.cloth.particle_mass();

    let err = sim.set_parameters(sim.parameters().with_mass(-2.0)).unwrap_err();

    assert_eq!(err, ClothError::InvalidMass(-2.0));
    assert_eq!(sim.cloth.particle_mass(), before);
    assert_eq!(sim.parameters().mass_total, SimulationParameters::default().mass_total);
}

#[test]
fn test_substeps_repeat_the_inner_loop() {
    let mut sim = pinned_square();
    sim.set_substeps(0);
    assert_eq!(sim.substeps(), 1);

    sim.set_substeps(3);
    sim.step();
    assert_eq!(sim.frame_count(), 1);
    assert_eq!(sim.last_metrics().anchors_applied, 6);
    assert_eq!(sim.profiler().substeps, 3);
    assert_eq!(sim.profiler().particle_count, 16);
}

#[test]
fn test_parallel_stepping_matches_sequential() {
    let mut sequential = pinned_square();
    let mut parallel = pinned_square();
    parallel.set_parallel_enabled(true);
    assert!(parallel.parallel_enabled());

    for _ in 0..25 {
        sequential.step();
        parallel.step();
    }

    assert_eq!(sequential.cloth.position, parallel.cloth.position);
}

#[test]
fn test_normals_are_refreshed_every_frame() {
    let mut sim = pinned_square();
    for _ in 0..30 {
        sim.step();
    }
    for normal in &sim.cloth.normal {
        assert!((normal.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn test_custom_layout_survives_reinitialize() {
    let layout = ClothLayout {
        origin: Vec3::new(-0.25, 1.5, -0.1),
        edge_length: 0.5,
        ..ClothLayout::default()
    };
    let mut sim = ClothSimulation::new(6, SimulationParameters::default())
        .unwrap()
        .with_layout(layout)
        .unwrap();
    assert_eq!(sim.cloth.position_at(0, 0), Some(layout.origin));

    sim.reinitialize(9).unwrap();
    assert_eq!(sim.cloth.position_at(0, 0), Some(layout.origin));
    assert!((sim.cloth.rest_spacing() - 0.5 / 8.0).abs() < EPS);
}
