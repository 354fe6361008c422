//! Model impairment: simulate manufacturing and calibration error by adding
//! bounded uniform noise to every DH parameter of a nominal chain.
//!
//! The same magnitude is applied to all four columns whatever their unit, so
//! a magnitude of 0.1 means ±0.1 rad on α and θ and ±0.1 mm on a and d.
//!
//! # Examples
//!
//! ```rust
//! use dh_kinematics::{impair, RobotConfig};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let nominal = RobotConfig::ur10().chain().unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let impaired = impair(&nominal, 0.1, &mut rng).unwrap();
//! assert_eq!(impaired.num_dof(), nominal.num_dof());
//! assert_ne!(impaired.to_table(), nominal.to_table());
//! ```

use rand::Rng;
use tracing::debug;

use crate::chain::KinematicChain;
use crate::dh::DhParameters;
use crate::errors::{KinematicsError, Result};

// Draws this close to zero (relative to the magnitude) are redrawn
const MIN_RELATIVE_NOISE: f64 = 1e-6;

// Redraws per parameter before falling back to the interval ends
const MAX_DRAWS: usize = 64;

/// Return a perturbed copy of `chain`; the original is left untouched.
///
/// Every parameter of every link gets independent noise drawn uniformly from
/// `[-magnitude, magnitude]`, never closer to zero than
/// `magnitude * 1e-6`, and redrawn until the perturbed value is a different
/// float from the nominal one. World frame, tool and convention are copied
/// as is.
///
/// # Errors
/// * `InvalidMagnitude` if `magnitude` is negative, NaN or infinite, or too
///   small to change some parameter at f64 precision
pub fn impair<R: Rng + ?Sized>(
    chain: &KinematicChain,
    magnitude: f64,
    rng: &mut R,
) -> Result<KinematicChain> {
    if !magnitude.is_finite() || magnitude < 0.0 {
        return Err(KinematicsError::InvalidMagnitude(magnitude));
    }
    if magnitude == 0.0 {
        return Ok(chain.clone());
    }

    let mut links = Vec::with_capacity(chain.num_dof());
    for link in chain.links() {
        links.push(DhParameters {
            alpha: perturb(link.alpha, magnitude, rng)?,
            a: perturb(link.a, magnitude, rng)?,
            theta: perturb(link.theta, magnitude, rng)?,
            d: perturb(link.d, magnitude, rng)?,
        });
    }

    debug!(links = links.len(), magnitude, "impaired kinematic model");

    Ok(chain.with_links(links))
}

fn perturb<R: Rng + ?Sized>(value: f64, magnitude: f64, rng: &mut R) -> Result<f64> {
    let floor = magnitude * MIN_RELATIVE_NOISE;
    for _ in 0..MAX_DRAWS {
        // Scaling a unit draw keeps the range finite for any finite magnitude
        let noise = magnitude * rng.gen_range(-1.0_f64..=1.0);
        if noise.abs() <= floor {
            continue;
        }
        let perturbed = value + noise;
        if perturbed != value {
            return Ok(perturbed);
        }
    }

    // Only the ends of the interval can still move the value
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    [value + sign * magnitude, value - sign * magnitude]
        .into_iter()
        .find(|perturbed| *perturbed != value)
        .ok_or(KinematicsError::InvalidMagnitude(magnitude))
}
