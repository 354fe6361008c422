//! Numerical inverse kinematics.
//!
//! No closed form is assumed: the solver minimises the 6D pose error
//! `pose_error(fk(q), target)` with Levenberg-Marquardt, estimating the
//! Jacobian by forward differences. Attempts that stall are retried from
//! seeded random starting points and the lowest-residual answer wins.
//!
//! Running out of iterations is not an error. The best joints found are
//! returned together with the convergence flag in [`IkResult`].

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, Matrix4, Vector6};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::chain::KinematicChain;
use crate::errors::{KinematicsError, Result};
use crate::transforms::pose_error;

const MIN_DAMPING: f64 = 1e-12;

/// Configuration for the Levenberg-Marquardt solver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IkConfig {
    /// Maximum iterations per attempt.
    pub max_iterations: u32,
    /// Residual norm below which the solve has converged. The residual mixes
    /// chain length units (mm) with radians.
    pub tolerance: f64,
    /// Finite-difference step for the Jacobian (rad).
    pub step_size: f64,
    /// Starting damping factor (lambda).
    pub initial_damping: f64,
    /// An attempt gives up once lambda grows past this without finding a
    /// step that lowers the error.
    pub max_damping: f64,
    /// Extra attempts from random starting points if the first one fails.
    pub restarts: u32,
    /// Seed for the restart starting points.
    pub seed: u64,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-6,
            step_size: 1e-6,
            initial_damping: 1e-3,
            max_damping: 1e12,
            restarts: 8,
            seed: 0,
        }
    }
}

/// Result of an IK solve.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IkResult {
    /// Best joint vector found (radians).
    pub joints: Vec<f64>,
    /// Whether the residual norm dropped below the tolerance.
    pub converged: bool,
    /// Iterations spent by the attempt that produced `joints`.
    pub iterations: u32,
    /// Norm of the final pose error.
    pub residual_norm: f64,
}

#[derive(Debug, Clone, Default)]
pub struct IkSolver {
    config: IkConfig,
}

impl IkSolver {
    pub const fn new(config: IkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IkConfig {
        &self.config
    }

    /// Solve for joints placing the chain's tool at `target`.
    ///
    /// # Arguments
    /// * `chain` - Robot model
    /// * `target` - Desired tool pose in the world frame
    /// * `initial_guess` - Starting joints, zeros when `None`
    ///
    /// # Errors
    /// * `DimensionMismatch` if the initial guess has the wrong length
    pub fn solve(
        &self,
        chain: &KinematicChain,
        target: &Matrix4<f64>,
        initial_guess: Option<&[f64]>,
    ) -> Result<IkResult> {
        let n = chain.num_dof();
        let start = match initial_guess {
            Some(guess) if guess.len() != n => {
                return Err(KinematicsError::DimensionMismatch {
                    expected: n,
                    actual: guess.len(),
                });
            }
            Some(guess) => guess.to_vec(),
            None => vec![0.0; n],
        };

        let mut best = self.levenberg_marquardt(chain, target, start)?;
        debug!(
            converged = best.converged,
            iterations = best.iterations,
            residual = best.residual_norm,
            "IK attempt from initial guess"
        );

        if !best.converged && self.config.restarts > 0 {
            let mut rng = StdRng::seed_from_u64(self.config.seed);
            for attempt in 1..=self.config.restarts {
                let start: Vec<f64> = (0..n).map(|_| rng.gen_range(-PI..=PI)).collect();
                let candidate = self.levenberg_marquardt(chain, target, start)?;
                debug!(
                    attempt,
                    converged = candidate.converged,
                    residual = candidate.residual_norm,
                    "IK restart"
                );

                if candidate.residual_norm < best.residual_norm {
                    best = candidate;
                }
                if best.converged {
                    break;
                }
            }
        }

        if !best.converged {
            warn!(
                residual = best.residual_norm,
                tolerance = self.config.tolerance,
                "IK did not converge, returning best estimate"
            );
        }

        Ok(best)
    }

    /// One damped least-squares descent from `q`.
    fn levenberg_marquardt(
        &self,
        chain: &KinematicChain,
        target: &Matrix4<f64>,
        mut q: Vec<f64>,
    ) -> Result<IkResult> {
        let n = q.len();
        let mut r = residual(chain, &q, target)?;
        let mut cost = r.norm_squared();
        let mut lambda = self.config.initial_damping;
        let mut iterations = 0;

        while iterations < self.config.max_iterations && cost.sqrt() >= self.config.tolerance {
            iterations += 1;

            let jacobian = self.jacobian(chain, target, &q, &r)?;
            let jtj = jacobian.transpose() * &jacobian;
            let rhs = -(jacobian.transpose() * DVector::from_column_slice(r.as_slice()));

            let mut improved = false;
            while lambda <= self.config.max_damping {
                // Marquardt scaling plus an identity term keeps zero columns solvable
                let mut damped = jtj.clone();
                for i in 0..n {
                    damped[(i, i)] += lambda * (jtj[(i, i)] + 1.0);
                }

                let Some(step) = solve_normal_equations(damped, &rhs) else {
                    lambda *= 10.0;
                    continue;
                };

                let candidate: Vec<f64> = q.iter().zip(step.iter()).map(|(qi, dq)| qi + dq).collect();
                let r_candidate = residual(chain, &candidate, target)?;
                let cost_candidate = r_candidate.norm_squared();

                if cost_candidate < cost {
                    q = candidate;
                    r = r_candidate;
                    cost = cost_candidate;
                    lambda = (lambda / 10.0).max(MIN_DAMPING);
                    improved = true;
                    break;
                }
                lambda *= 10.0;
            }

            trace!(iteration = iterations, residual = cost.sqrt(), lambda, "LM step");

            if !improved {
                debug!(iteration = iterations, lambda, "no descent step found, stopping attempt");
                break;
            }
        }

        let residual_norm = cost.sqrt();
        Ok(IkResult {
            joints: q,
            converged: residual_norm < self.config.tolerance,
            iterations,
            residual_norm,
        })
    }

    /// Forward-difference Jacobian of the pose error, 6 × N.
    fn jacobian(
        &self,
        chain: &KinematicChain,
        target: &Matrix4<f64>,
        q: &[f64],
        r: &Vector6<f64>,
    ) -> Result<DMatrix<f64>> {
        let eps = self.config.step_size;
        let mut jacobian = DMatrix::zeros(6, q.len());
        let mut perturbed = q.to_vec();

        for j in 0..q.len() {
            perturbed[j] = q[j] + eps;
            let r_j = residual(chain, &perturbed, target)?;
            perturbed[j] = q[j];

            for i in 0..6 {
                jacobian[(i, j)] = (r_j[i] - r[i]) / eps;
            }
        }

        Ok(jacobian)
    }
}

fn residual(chain: &KinematicChain, q: &[f64], target: &Matrix4<f64>) -> Result<Vector6<f64>> {
    Ok(pose_error(&chain.fk(q)?, target))
}

/// Solve the damped normal equations, Cholesky first with LU as fallback.
fn solve_normal_equations(a: DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let step = match a.clone().cholesky() {
        Some(cholesky) => cholesky.solve(b),
        None => a.lu().solve(b)?,
    };

    if step.iter().all(|v| v.is_finite()) {
        Some(step)
    } else {
        None
    }
}
