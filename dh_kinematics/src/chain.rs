// Serial kinematic chain described by Denavit-Hartenberg parameters.
// Forward kinematics composes the link transforms base-to-flange:
//   T0^tool = World · T0^1 · T1^2 · ... · T(n-1)^n · Tool

use nalgebra::Matrix4;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dh::{DhConvention, DhParameters};
use crate::errors::{KinematicsError, Result};
use crate::ik::IkSolver;

fn identity() -> Matrix4<f64> {
    Matrix4::identity()
}

/// Ordered sequence of DH links from the robot base to the flange.
///
/// The link order is fixed at construction and defines the joint index
/// mapping: joint `i` drives the θ of link `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicChain {
    links: Vec<DhParameters>,
    convention: DhConvention,

    // Base of the robot expressed in the world frame
    #[serde(default = "identity")]
    world_frame: Matrix4<f64>,

    // Tool centre point expressed in the flange frame
    #[serde(default = "identity")]
    tool: Matrix4<f64>,
}

impl KinematicChain {
    /// Create a chain from its links.
    ///
    /// # Errors
    /// * `EmptyChain` if `links` is empty
    pub fn new(links: Vec<DhParameters>, convention: DhConvention) -> Result<Self> {
        if links.is_empty() {
            return Err(KinematicsError::EmptyChain);
        }

        Ok(Self {
            links,
            convention,
            world_frame: Matrix4::identity(),
            tool: Matrix4::identity(),
        })
    }

    /// Create a modified-DH chain from an N×4 `[alpha, a, theta, d]` table
    pub fn from_table(table: &[[f64; 4]]) -> Result<Self> {
        Self::from_table_with_convention(table, DhConvention::Modified)
    }

    pub fn from_table_with_convention(
        table: &[[f64; 4]],
        convention: DhConvention,
    ) -> Result<Self> {
        let links = table.iter().copied().map(DhParameters::from_row).collect();
        Self::new(links, convention)
    }

    /// Create a modified-DH chain from a row-major table flattened into one
    /// slice (4 values per link).
    pub fn from_flat(values: &[f64]) -> Result<Self> {
        if values.is_empty() || values.len() % 4 != 0 {
            return Err(KinematicsError::MalformedTable(format!(
                "expected a non-zero multiple of 4 values, got {}",
                values.len()
            )));
        }

        let links = values
            .chunks_exact(4)
            .map(|row| DhParameters::new(row[0], row[1], row[2], row[3]))
            .collect();
        Self::new(links, DhConvention::Modified)
    }

    /// Place the robot base in a world frame
    pub fn with_world_frame(mut self, world_frame: Matrix4<f64>) -> Self {
        self.world_frame = world_frame;
        self
    }

    /// Attach a tool (flange to TCP transform)
    pub fn with_tool(mut self, tool: Matrix4<f64>) -> Self {
        self.tool = tool;
        self
    }

    /// Degrees of freedom; one revolute joint per link.
    pub fn num_dof(&self) -> usize {
        self.links.len()
    }

    pub fn links(&self) -> &[DhParameters] {
        &self.links
    }

    pub fn convention(&self) -> DhConvention {
        self.convention
    }

    pub fn world_frame(&self) -> &Matrix4<f64> {
        &self.world_frame
    }

    pub fn tool(&self) -> &Matrix4<f64> {
        &self.tool
    }

    /// Parameter table in `[alpha, a, theta, d]` row order
    pub fn to_table(&self) -> Vec<[f64; 4]> {
        self.links.iter().map(DhParameters::to_row).collect()
    }

    pub(crate) fn with_links(&self, links: Vec<DhParameters>) -> Self {
        Self {
            links,
            ..self.clone()
        }
    }

    fn check_joints(&self, joints: &[f64]) -> Result<()> {
        if joints.len() != self.num_dof() {
            return Err(KinematicsError::DimensionMismatch {
                expected: self.num_dof(),
                actual: joints.len(),
            });
        }
        Ok(())
    }

    /// Forward kinematics: pose of the tool in the world frame.
    ///
    /// # Arguments
    /// * `joints` - Joint angles in radians, one per link
    ///
    /// # Errors
    /// * `DimensionMismatch` if `joints.len() != self.num_dof()`
    pub fn fk(&self, joints: &[f64]) -> Result<Matrix4<f64>> {
        self.check_joints(joints)?;

        let flange = self
            .links
            .iter()
            .zip(joints)
            .fold(self.world_frame, |acc, (link, &q)| {
                acc * link.transform(self.convention, q)
            });

        Ok(flange * self.tool)
    }

    /// Every link frame in the world frame, base to flange.
    ///
    /// Entry `i` is the frame of link `i` after joint `i` moved; the tool
    /// is not applied, so the last entry is the flange.
    pub fn fk_frames(&self, joints: &[f64]) -> Result<Vec<Matrix4<f64>>> {
        self.check_joints(joints)?;

        let mut frames = Vec::with_capacity(self.num_dof());
        let mut acc = self.world_frame;
        for (link, &q) in self.links.iter().zip(joints) {
            acc *= link.transform(self.convention, q);
            frames.push(acc);
        }

        Ok(frames)
    }

    /// Inverse kinematics with the default solver settings.
    ///
    /// Returns the best joint vector found, whether or not the solver
    /// converged; verify it with [`KinematicChain::fk`] if it matters. Use
    /// [`IkSolver::solve`] to get the convergence report.
    ///
    /// # Arguments
    /// * `target` - Desired tool pose in the world frame
    /// * `initial_guess` - Starting joints, zeros when `None`
    pub fn ik(&self, target: &Matrix4<f64>, initial_guess: Option<&[f64]>) -> Result<Vec<f64>> {
        let result = IkSolver::default().solve(self, target, initial_guess)?;
        Ok(result.joints)
    }

    /// Copy of this chain with every DH parameter perturbed by uniform noise
    /// in `[-magnitude, magnitude]`. See [`crate::impair::impair`].
    pub fn impair<R: Rng + ?Sized>(&self, magnitude: f64, rng: &mut R) -> Result<Self> {
        crate::impair::impair(self, magnitude, rng)
    }
}
