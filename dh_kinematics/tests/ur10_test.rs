//! UR10 regression and round-trip tests
#![allow(clippy::approx_constant)]

use dh_kinematics::{impair, IkSolver, KinematicChain, KinematicsError, RobotConfig};
use nalgebra::Matrix4;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ur10() -> KinematicChain {
    KinematicChain::from_flat(&[
        0.0, 0.0, 0.0, 118.0,
        1.5707963267949, 0.0, 3.14159265358979, 0.0,
        0.0, 612.7, 0.0, 0.0,
        0.0, 571.6, 0.0, 163.9,
        -1.5707963267949, 0.0, 0.0, 115.7,
        1.5707963267949, 0.0, 3.14159265358979, 92.2,
    ])
    .unwrap()
}

fn deg(joints: &[f64]) -> Vec<f64> {
    joints.iter().map(|j| j.to_radians()).collect()
}

fn assert_close(actual: &Matrix4<f64>, expected: &Matrix4<f64>, rtol: f64, atol: f64) {
    for i in 0..4 {
        for j in 0..4 {
            let (a, e) = (actual[(i, j)], expected[(i, j)]);
            assert!(
                (a - e).abs() <= atol + rtol * e.abs(),
                "element ({}, {}): actual {:.6}, expected {:.6}",
                i,
                j,
                a,
                e
            );
        }
    }
}

const IK_CASES: [[f64; 6]; 4] = [
    [0.0, -90.0, 90.0, 0.0, 90.0, 0.0],
    [10.0, 90.0, 80.0, 20.0, 90.0, 123.0],
    [20.0, -40.0, 90.0, 10.0, 20.0, 0.0],
    [-10.0, 20.0, -30.0, 40.0, -50.0, 60.0],
];

#[test]
fn test_num_dof() {
    assert_eq!(ur10().num_dof(), 6);
}

#[test]
fn test_fk_regression() {
    let joints = deg(&[0.0, -90.0, 90.0, 0.0, 90.0, 0.0]);

    let expected = Matrix4::new(
        0.0, 0.0, -1.0, -663.8,
        -1.0, 0.0, 0.0, -163.9,
        0.0, 1.0, 0.0, 615.0,
        0.0, 0.0, 0.0, 1.0,
    );

    let actual = ur10().fk(&joints).unwrap();
    assert_close(&actual, &expected, 1e-6, 1e-6);
}

#[test]
fn test_fk_preset_matches_literal_table() {
    let joints = deg(&[15.0, -60.0, 45.0, 30.0, -20.0, 75.0]);
    let preset = RobotConfig::ur10().chain().unwrap();
    assert_close(&preset.fk(&joints).unwrap(), &ur10().fk(&joints).unwrap(), 0.0, 1e-6);
}

#[test]
fn test_fk_deterministic() {
    let chain = ur10();
    let joints = deg(&[12.0, -34.0, 56.0, -78.0, 90.0, -12.0]);
    assert_eq!(chain.fk(&joints).unwrap(), chain.fk(&joints).unwrap());
}

#[test]
fn test_fk_dimension_mismatch() {
    let chain = ur10();
    let result = chain.fk(&[0.0; 5]);
    assert_eq!(
        result,
        Err(KinematicsError::DimensionMismatch { expected: 6, actual: 5 })
    );
}

#[test]
fn test_impair_robot_model() {
    let robot = ur10();
    let mut rng = StdRng::seed_from_u64(2017);
    let impaired = impair(&robot, 0.1, &mut rng).unwrap();

    let original = robot.to_table();
    let perturbed = impaired.to_table();
    assert_eq!(perturbed.len(), original.len());

    for (before, after) in original.iter().zip(perturbed.iter()) {
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() > 1e-9);
        }
    }

    // The nominal model keeps its parameters
    assert_eq!(robot, ur10());
}

#[test]
fn test_ik() {
    let robot = ur10();

    for case in IK_CASES.iter() {
        let expected_joints = deg(case);
        let expected_transform = robot.fk(&expected_joints).unwrap();

        let actual_joints = robot.ik(&expected_transform, None).unwrap();
        let actual_transform = robot.fk(&actual_joints).unwrap();

        assert_eq!(actual_joints.len(), expected_joints.len());
        assert_close(&actual_transform, &expected_transform, 1e-1, 1e-1);
    }
}

#[test]
fn test_ik_with_initial_guess() {
    let robot = ur10();
    let expected_joints = deg(&IK_CASES[2]);
    let target = robot.fk(&expected_joints).unwrap();

    // Start near the answer
    let guess: Vec<f64> = expected_joints.iter().map(|j| j + 0.05).collect();
    let result = IkSolver::default().solve(&robot, &target, Some(&guess[..])).unwrap();

    assert!(result.converged);
    assert_close(&robot.fk(&result.joints).unwrap(), &target, 1e-3, 1e-3);
}

#[test]
fn test_ik_guess_dimension_mismatch() {
    let robot = ur10();
    let target = robot.fk(&[0.0; 6]).unwrap();
    assert_eq!(
        robot.ik(&target, Some(&[0.0; 7][..])),
        Err(KinematicsError::DimensionMismatch { expected: 6, actual: 7 })
    );
}

#[test]
fn test_ik_on_impaired_model() {
    let nominal = ur10();

    for seed in 0..3 {
        let impaired = nominal.impair(0.1, &mut StdRng::seed_from_u64(seed)).unwrap();

        for case in IK_CASES.iter() {
            let target = impaired.fk(&deg(case)).unwrap();
            let joints = impaired.ik(&target, None).unwrap();
            assert_close(&impaired.fk(&joints).unwrap(), &target, 1e-1, 1e-1);
        }
    }
}

#[test]
fn test_ik_all_presets() {
    let cases = [
        [10.0, -20.0, 30.0, -40.0, 50.0, -60.0, 15.0],
        [45.0, 30.0, -60.0, 20.0, -30.0, 90.0, -10.0],
    ];

    for model in dh_kinematics::RobotModel::all() {
        let chain = RobotConfig::from_model(model).chain().unwrap();
        let n = chain.num_dof();

        for case in cases.iter() {
            let target = chain.fk(&deg(&case[..n])).unwrap();
            let result = IkSolver::default().solve(&chain, &target, None).unwrap();
            assert!(
                result.converged,
                "{} did not converge, residual {}",
                model.short_name(),
                result.residual_norm
            );
            assert_close(&chain.fk(&result.joints).unwrap(), &target, 1e-3, 1e-3);
        }
    }
}
