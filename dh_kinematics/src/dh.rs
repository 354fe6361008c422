//! Denavit-Hartenberg link parameters and the per-link homogeneous transform.
//!
//! Tables are always laid out as `[alpha, a, theta, d]`:
//!
//! Param | Meaning           | Unit
//! ------|-------------------|--------
//! α     | link twist        | rad
//! a     | link length       | mm
//! θ     | joint angle offset| rad
//! d     | link offset       | mm
//!
//! Joints are revolute: the joint value is added to θ.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Which DH formula composes the four elementary transforms of a link.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DhConvention {
    /// Craig's modified convention: `Rx(α) · Tx(a) · Rz(θ) · Tz(d)`.
    #[default]
    Modified,
    /// Classic convention: `Rz(θ) · Tz(d) · Tx(a) · Rx(α)`.
    Standard,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct DhParameters {
    pub alpha: f64,
    pub a: f64,
    pub theta: f64,
    pub d: f64,
}

impl DhParameters {
    pub fn new(alpha: f64, a: f64, theta: f64, d: f64) -> Self {
        Self { alpha, a, theta, d }
    }

    /// Build from one `[alpha, a, theta, d]` table row
    pub fn from_row(row: [f64; 4]) -> Self {
        let [alpha, a, theta, d] = row;
        Self { alpha, a, theta, d }
    }

    pub fn to_row(&self) -> [f64; 4] {
        [self.alpha, self.a, self.theta, self.d]
    }

    /// Homogeneous transform of this link with joint value `q` added to θ.
    ///
    /// NaN or infinite inputs are not checked and propagate into the result.
    pub fn transform(&self, convention: DhConvention, q: f64) -> Matrix4<f64> {
        let theta = self.theta + q;
        match convention {
            DhConvention::Modified => modified_dh_transform(self.alpha, self.a, theta, self.d),
            DhConvention::Standard => standard_dh_transform(self.alpha, self.a, theta, self.d),
        }
    }
}

impl From<[f64; 4]> for DhParameters {
    fn from(row: [f64; 4]) -> Self {
        Self::from_row(row)
    }
}

/// Modified DH link transform (frame i-1 to frame i)
///
/// # Arguments
/// * `alpha` - Link twist α_{i-1}
/// * `a` - Link length a_{i-1}
/// * `theta` - Joint angle θ_i
/// * `d` - Link offset d_i
fn modified_dh_transform(alpha: f64, a: f64, theta: f64, d: f64) -> Matrix4<f64> {
    let (st, ct) = theta.sin_cos();
    let (sa, ca) = alpha.sin_cos();

    Matrix4::new(
        ct, -st, 0.0, a,
        st * ca, ct * ca, -sa, -d * sa,
        st * sa, ct * sa, ca, d * ca,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Standard DH link transform (frame i-1 to frame i)
fn standard_dh_transform(alpha: f64, a: f64, theta: f64, d: f64) -> Matrix4<f64> {
    let (st, ct) = theta.sin_cos();
    let (sa, ca) = alpha.sin_cos();

    Matrix4::new(
        ct, -st * ca, st * sa, a * ct,
        st, ct * ca, -ct * sa, a * st,
        0.0, sa, ca, d,
        0.0, 0.0, 0.0, 1.0,
    )
}
