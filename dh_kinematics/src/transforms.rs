//! Homogeneous transform utilities.
//!
//! Transforms are plain `nalgebra::Matrix4<f64>` values. This module pulls
//! them apart into translation/rotation, measures the 6D discrepancy between
//! two of them (used as the inverse kinematics residual) and converts to and
//! from the [`Pose`] (X, Y, Z, W, P, R) representation.
//!
//! # Examples
//!
//! ```rust
//! use dh_kinematics::transforms::Pose;
//! use nalgebra::Matrix4;
//!
//! let pose = Pose { x: 100.0, y: 0.0, z: 250.0, w: 0.0, p: 0.0, r: 0.0 };
//! let t: Matrix4<f64> = pose.into();
//! assert_eq!(t[(2, 3)], 250.0);
//! ```

use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3, Vector6};
use serde::{Deserialize, Serialize};

/// Position part of a homogeneous transform
pub fn translation(t: &Matrix4<f64>) -> Vector3<f64> {
    Vector3::new(t[(0, 3)], t[(1, 3)], t[(2, 3)])
}

/// Rotation part (top-left 3x3 block) of a homogeneous transform
pub fn rotation(t: &Matrix4<f64>) -> Matrix3<f64> {
    t.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Rotation vector (axis * angle, angle in [0, π]) of a rotation matrix.
///
/// Goes through a unit quaternion so that rotations close to π keep a
/// well-defined axis. The half angle comes from `atan2(|v|, w)` which stays
/// accurate for tiny rotations, unlike `acos(w)`.
pub fn rotation_vector(r: &Matrix3<f64>) -> Vector3<f64> {
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*r));
    let quat = q.quaternion();

    // q and -q are the same rotation; keep w >= 0 so the angle is in [0, π]
    let (w, v) = if quat.scalar() < 0.0 {
        (-quat.scalar(), -quat.imag())
    } else {
        (quat.scalar(), quat.imag())
    };

    let sin_half = v.norm();
    if sin_half == 0.0 {
        return Vector3::zeros();
    }
    v * (2.0 * sin_half.atan2(w) / sin_half)
}

/// 6D pose error between two transforms: `[dx, dy, dz, rx, ry, rz]`.
///
/// The first three components are `actual - target` translation, the last
/// three the rotation vector of `R_actual * R_target^T`. The error is zero
/// iff both transforms describe the same pose.
pub fn pose_error(actual: &Matrix4<f64>, target: &Matrix4<f64>) -> Vector6<f64> {
    let dp = translation(actual) - translation(target);
    let dr = rotation_vector(&(rotation(actual) * rotation(target).transpose()));
    Vector6::new(dp.x, dp.y, dp.z, dr.x, dr.y, dr.z)
}

/// Check the structural invariants of a homogeneous transform: last row
/// `[0, 0, 0, 1]` and an orthonormal, right-handed rotation block.
pub fn is_homogeneous(t: &Matrix4<f64>, tol: f64) -> bool {
    let last_row_ok = t[(3, 0)].abs() <= tol
        && t[(3, 1)].abs() <= tol
        && t[(3, 2)].abs() <= tol
        && (t[(3, 3)] - 1.0).abs() <= tol;

    let r = rotation(t);
    let orthonormal = (r.transpose() * r - Matrix3::identity()).amax() <= tol;
    let right_handed = (r.determinant() - 1.0).abs() <= tol;

    last_row_ok && orthonormal && right_handed
}

/// Position in mm plus W-P-R orientation in radians.
///
/// W, P and R are rotations about the fixed X, Y and Z axes, applied in that
/// order: `R = Rz(r) * Ry(p) * Rx(w)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
    pub p: f64,
    pub r: f64,
}

impl Pose {
    /// Extract a pose from a homogeneous transform.
    ///
    /// At the gimbal-lock pitch (±90°) W is reported as zero and the whole
    /// rotation about the common axis is folded into R.
    pub fn from_matrix(t: &Matrix4<f64>) -> Self {
        let m = rotation(t);
        let p = (-m[(2, 0)]).clamp(-1.0, 1.0).asin();

        let (w, r) = if p.cos().abs() > 1e-9 {
            (m[(2, 1)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(0, 0)]))
        } else {
            (0.0, (-m[(0, 1)]).atan2(m[(1, 1)]))
        };

        Self {
            x: t[(0, 3)],
            y: t[(1, 3)],
            z: t[(2, 3)],
            w,
            p,
            r,
        }
    }
}

impl From<Pose> for Matrix4<f64> {
    fn from(pose: Pose) -> Self {
        let rot = Rotation3::from_euler_angles(pose.w, pose.p, pose.r);
        let mut t = rot.to_homogeneous();
        t[(0, 3)] = pose.x;
        t[(1, 3)] = pose.y;
        t[(2, 3)] = pose.z;
        t
    }
}

impl From<&Pose> for Matrix4<f64> {
    fn from(pose: &Pose) -> Self {
        (*pose).into()
    }
}
